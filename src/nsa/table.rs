// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An in-memory, column-oriented galaxy table.

use indexmap::IndexMap;
use itertools::Itertools;

use super::NsaError;

/// A single column of a galaxy table.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
    /// e.g. NSA's ABSMAG, which has a magnitude per band (FNugriz).
    FloatArray(Vec<Vec<f64>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::FloatArray(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A table of galaxies. Rows are addressed by index and columns by name. The
/// table is never modified by lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalaxyTable {
    columns: IndexMap<String, Column>,
    num_rows: usize,
}

impl GalaxyTable {
    pub fn new() -> GalaxyTable {
        GalaxyTable::default()
    }

    /// Add a column. Every column must have the same number of rows.
    pub fn insert_column(&mut self, name: &str, column: Column) -> Result<(), NsaError> {
        if !self.columns.is_empty() && column.len() != self.num_rows {
            return Err(NsaError::ColumnLength {
                column: name.to_string(),
                expected: self.num_rows,
                got: column.len(),
            });
        }
        self.num_rows = column.len();
        self.columns.insert(name.to_string(), column);
        Ok(())
    }

    /// Builder-style [`GalaxyTable::insert_column`].
    pub fn with_column(mut self, name: &str, column: Column) -> Result<GalaxyTable, NsaError> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn column(&self, name: &str) -> Result<&Column, NsaError> {
        self.columns
            .get(name)
            .ok_or_else(|| NsaError::MissingColumn(name.to_string()))
    }

    fn check_row(&self, row: usize) -> Result<(), NsaError> {
        if row < self.num_rows {
            Ok(())
        } else {
            Err(NsaError::RowOutOfRange {
                row,
                num_rows: self.num_rows,
            })
        }
    }

    /// A numeric value. Integer columns are converted.
    pub fn float(&self, row: usize, name: &str) -> Result<f64, NsaError> {
        self.check_row(row)?;
        match self.column(name)? {
            Column::Float(v) => Ok(v[row]),
            Column::Int(v) => Ok(v[row] as f64),
            _ => Err(NsaError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    pub fn int(&self, row: usize, name: &str) -> Result<i64, NsaError> {
        self.check_row(row)?;
        match self.column(name)? {
            Column::Int(v) => Ok(v[row]),
            _ => Err(NsaError::ColumnType {
                column: name.to_string(),
                expected: "integer",
            }),
        }
    }

    pub fn text(&self, row: usize, name: &str) -> Result<&str, NsaError> {
        self.check_row(row)?;
        match self.column(name)? {
            Column::Text(v) => Ok(v[row].as_str()),
            _ => Err(NsaError::ColumnType {
                column: name.to_string(),
                expected: "text",
            }),
        }
    }

    pub fn float_array(&self, row: usize, name: &str) -> Result<&[f64], NsaError> {
        self.check_row(row)?;
        match self.column(name)? {
            Column::FloatArray(v) => Ok(v[row].as_slice()),
            _ => Err(NsaError::ColumnType {
                column: name.to_string(),
                expected: "array",
            }),
        }
    }

    /// One element of an array value. Negative indices count from the end.
    pub fn float_array_element(&self, row: usize, name: &str, index: isize) -> Result<f64, NsaError> {
        let array = self.float_array(row, name)?;
        let len = array.len();
        let i = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index as usize)
        };
        i.and_then(|i| array.get(i).copied())
            .ok_or_else(|| NsaError::ArrayTooShort {
                column: name.to_string(),
                row,
                len,
                index: index.unsigned_abs(),
            })
    }

    /// Any value, formatted for display.
    pub fn display_value(&self, row: usize, name: &str) -> Result<String, NsaError> {
        self.check_row(row)?;
        Ok(match self.column(name)? {
            Column::Int(v) => v[row].to_string(),
            Column::Float(v) => v[row].to_string(),
            Column::Text(v) => v[row].clone(),
            Column::FloatArray(v) => format!("[{}]", v[row].iter().join(", ")),
        })
    }
}
