// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading galaxy tables from files.

use std::{fs::File, io::BufReader, path::Path, str::FromStr};

use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::Value;

use super::{Column, GalaxyTable, GalaxyTableType, TableReadError};

/// Read a galaxy table. The kind of file is determined by its extension
/// (".fits" and ".fit" are FITS).
pub fn read_galaxy_table<P: AsRef<Path>>(path: P) -> Result<GalaxyTable, TableReadError> {
    fn inner(path: &Path) -> Result<GalaxyTable, TableReadError> {
        let ext = path
            .extension()
            .and_then(|os_str| os_str.to_str())
            .map(|s| s.to_lowercase());
        let table_type = match ext.as_deref() {
            Some("fit") => GalaxyTableType::Fits,
            Some(ext) => GalaxyTableType::from_str(ext)
                .map_err(|_| TableReadError::UnknownType(path.to_path_buf()))?,
            None => return Err(TableReadError::UnknownType(path.to_path_buf())),
        };

        debug!("Reading {} as a {table_type} galaxy table", path.display());
        let table = match table_type {
            GalaxyTableType::Json => {
                let mut f = BufReader::new(File::open(path)?);
                galaxy_table_from_json(&mut f)?
            }

            #[cfg(feature = "fits")]
            GalaxyTableType::Fits => super::fits::read_fits_galaxy_table(path)?,

            #[cfg(not(feature = "fits"))]
            GalaxyTableType::Fits => return Err(TableReadError::NoFitsSupport),
        };
        debug!(
            "Read {} galaxies with {} columns",
            table.num_rows(),
            table.column_names().count()
        );
        Ok(table)
    }
    inner(path.as_ref())
}

/// The kind of a column, as it is inferred from JSON values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// Only masked values so far.
    Null,
    Int,
    Float,
    Text,
    FloatArray,
}

fn kind_of(value: &Value) -> Option<Kind> {
    match value {
        Value::Null => Some(Kind::Null),
        Value::Number(n) if n.is_i64() => Some(Kind::Int),
        Value::Number(_) => Some(Kind::Float),
        Value::String(_) => Some(Kind::Text),
        Value::Array(a) if a.iter().all(|v| v.is_number() || v.is_null()) => {
            Some(Kind::FloatArray)
        }
        _ => None,
    }
}

/// The kind of a column holding values of kinds `a` and `b`, if they can live
/// together.
fn unify(a: Kind, b: Kind) -> Option<Kind> {
    match (a, b) {
        (a, b) if a == b => Some(a),
        (Kind::Null, k) | (k, Kind::Null) => Some(k),
        (Kind::Int, Kind::Float) | (Kind::Float, Kind::Int) => Some(Kind::Float),
        _ => None,
    }
}

fn as_float(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

/// Read a galaxy table from JSON: an array of objects, one per galaxy, all with
/// the same keys. Integer columns that also have non-integer values are read as
/// floats. A null is a masked value: NaN in numeric columns (which makes an
/// integer column a float column), an empty array in array columns and an
/// empty string in text columns.
pub fn galaxy_table_from_json<R: std::io::Read>(
    reader: &mut R,
) -> Result<GalaxyTable, TableReadError> {
    let records: Vec<Value> = serde_json::from_reader(reader)?;
    let records = records
        .into_iter()
        .map(|r| match r {
            Value::Object(o) => Ok(o),
            _ => Err(TableReadError::NotRecords),
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Columns are kept in the order they first appear. The flag records
    // whether a column has masked values.
    let mut kinds: IndexMap<String, (Kind, bool)> = IndexMap::new();
    for (i_row, record) in records.iter().enumerate() {
        for (name, value) in record {
            let inconsistent = || TableReadError::Inconsistent {
                column: name.clone(),
                row: i_row,
            };
            let kind = kind_of(value).ok_or_else(inconsistent)?;
            let entry = kinds.entry(name.clone()).or_insert((kind, false));
            entry.0 = unify(entry.0, kind).ok_or_else(inconsistent)?;
            entry.1 |= kind == Kind::Null;
        }
    }
    let kinds = kinds.into_iter().map(|(name, (kind, masked))| {
        let kind = match kind {
            Kind::Null => Kind::Float,
            Kind::Int if masked => Kind::Float,
            k => k,
        };
        (name, kind)
    });

    let mut table = GalaxyTable::new();
    for (name, kind) in kinds {
        let mut values = Vec::with_capacity(records.len());
        for (i_row, record) in records.iter().enumerate() {
            let value = record.get(&name).ok_or_else(|| TableReadError::MissingValue {
                column: name.clone(),
                row: i_row,
            })?;
            values.push(value);
        }

        let column = match kind {
            Kind::Int => Column::Int(values.iter().filter_map(|v| v.as_i64()).collect()),
            Kind::Null | Kind::Float => {
                Column::Float(values.iter().map(|v| as_float(v)).collect())
            }
            Kind::Text => Column::Text(
                values
                    .iter()
                    .map(|v| v.as_str().unwrap_or_default().to_string())
                    .collect(),
            ),
            Kind::FloatArray => Column::FloatArray(
                values
                    .iter()
                    .map(|v| match v {
                        Value::Array(a) => a.iter().map(as_float).collect(),
                        _ => vec![],
                    })
                    .collect(),
            ),
        };
        trace!("Column {name}: {kind:?}");
        table.insert_column(&name, column)?;
    }
    Ok(table)
}
