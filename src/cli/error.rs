// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all galphot-related errors. This should be the *only* error
//! enum that is publicly visible from the binary.

use thiserror::Error;

use crate::{
    nsa::{NsaError, TableReadError},
    photometry::PhotometryError,
    query::QueryError,
};

/// The *only* publicly visible error from galphot. Each error message should
/// include a hint, unless it's "generic".
#[derive(Error, Debug)]
pub enum GalphotError {
    /// An error talking to a catalog service.
    #[error("{0}\n\nCatalog services are sometimes unavailable; try again later, or increase the timeout with --timeout. Use -v to see the queries being made.")]
    Query(String),

    /// An error turning catalog values into photometry.
    #[error("{0}\n\nUse -v to see the catalog rows being used.")]
    Photometry(String),

    /// An error looking something up in a galaxy table.
    #[error("{0}\n\nNSA tables are expected to have the columns of the NASA-Sloan Atlas v0.1.2 or v1.0.1 (crossed tables use _1 and _2 suffixes).")]
    Nsa(String),

    /// An error reading a galaxy table.
    #[error("{0}\n\nGalaxy tables may be JSON (an array of objects, one per galaxy) or FITS.")]
    GalaxyTable(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files are TOML or JSON, with the same names as the command-line arguments (using underscores rather than hyphens).")]
    ArgFile(String),

    /// Bad command-line arguments.
    #[error("{0}\n\nSee the subcommand's --help.")]
    Args(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<QueryError> for GalphotError {
    fn from(e: QueryError) -> Self {
        Self::Query(e.to_string())
    }
}

impl From<PhotometryError> for GalphotError {
    fn from(e: PhotometryError) -> Self {
        let s = e.to_string();
        match e {
            PhotometryError::Query(e) => Self::from(e),
            PhotometryError::LengthMismatch { .. } => Self::Args(s),
            PhotometryError::NoRows { .. } | PhotometryError::MaskedValue { .. } => {
                Self::Photometry(s)
            }
        }
    }
}

impl From<NsaError> for GalphotError {
    fn from(e: NsaError) -> Self {
        let s = e.to_string();
        match e {
            NsaError::InvalidNsaid(_) => Self::Args(s),
            NsaError::MissingColumn(_)
            | NsaError::ColumnType { .. }
            | NsaError::ColumnLength { .. }
            | NsaError::RowOutOfRange { .. }
            | NsaError::ArrayTooShort { .. }
            | NsaError::NonPositive { .. } => Self::Nsa(s),
        }
    }
}

impl From<TableReadError> for GalphotError {
    fn from(e: TableReadError) -> Self {
        let s = e.to_string();
        match e {
            TableReadError::Table(e) => Self::from(e),
            TableReadError::IO(e) => Self::from(e),
            TableReadError::UnknownType(_)
            | TableReadError::NotRecords
            | TableReadError::Inconsistent { .. }
            | TableReadError::MissingValue { .. }
            | TableReadError::NoFitsSupport
            | TableReadError::Json(_) => Self::GalaxyTable(s),
            #[cfg(feature = "fits")]
            TableReadError::Fits(_) => Self::GalaxyTable(s),
        }
    }
}

impl From<std::io::Error> for GalphotError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<serde_json::Error> for GalphotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<csv::Error> for GalphotError {
    fn from(e: csv::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for GalphotError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
