// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::GALAXY_TABLE_TYPES_COMMA_SEPARATED;

/// Errors associated with looking things up in a galaxy table.
#[derive(Error, Debug, PartialEq)]
pub enum NsaError {
    #[error("The galaxy table has no column '{0}'")]
    MissingColumn(String),

    #[error("Column '{column}' doesn't hold {expected} values")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("Column '{column}' has {got} rows, but the table has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Row {row} doesn't exist; the table has {num_rows} rows")]
    RowOutOfRange { row: usize, num_rows: usize },

    #[error("Row {row}: column '{column}' has only {len} elements, but element {index} was requested")]
    ArrayTooShort {
        column: String,
        row: usize,
        len: usize,
        index: usize,
    },

    #[error("Row {row}: column '{column}' is {value}, but it must be positive to take its log")]
    NonPositive {
        column: &'static str,
        row: usize,
        value: f64,
    },

    #[error("'{0}' is not a valid NSAID; NSAIDs are integers")]
    InvalidNsaid(String),
}

/// Errors associated with reading a galaxy table from a file.
#[derive(Error, Debug)]
pub enum TableReadError {
    #[error("Couldn't tell what kind of galaxy table {0:?} is; supported extensions are: {}", *GALAXY_TABLE_TYPES_COMMA_SEPARATED)]
    UnknownType(PathBuf),

    #[error("Galaxy tables in JSON must be an array of objects (one per galaxy)")]
    NotRecords,

    #[error("Row {row}: the value of '{column}' doesn't match the other rows of that column")]
    Inconsistent { column: String, row: usize },

    #[error("Row {row} is missing the column '{column}'")]
    MissingValue { column: String, row: usize },

    #[error("FITS support wasn't compiled in; rebuild with the \"fits\" feature")]
    NoFitsSupport,

    #[cfg(feature = "fits")]
    #[error("{0}")]
    Fits(String),

    #[error(transparent)]
    Table(#[from] NsaError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
