// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::{coord::SkyPosition, query::QueryError};

#[derive(Error, Debug)]
pub enum PhotometryError {
    #[error("{catalog} has no sources near {position}")]
    NoRows {
        catalog: &'static str,
        position: SkyPosition,
    },

    #[error("{catalog}: the closest source to {position} has no '{column}' value")]
    MaskedValue {
        catalog: &'static str,
        column: &'static str,
        position: SkyPosition,
    },

    #[error("Expected {expected} {what}, but got {got}; all lists must be the same length")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Query(#[from] QueryError),
}
