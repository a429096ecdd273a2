// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code for the NASA-Sloan Atlas (NSA) galaxy catalog, versions 0.1.2 and
//! 1.0.1, as well as tables crossing the two.
//!
//! Tables are loaded whole into a [`GalaxyTable`], searched by NSAID or IAU
//! name, and rows are summarised into rounded value lists.

mod error;
#[cfg(feature = "fits")]
mod fits;
mod read;
mod search;
mod summary;
mod table;

pub use error::*;
pub use read::*;
pub use search::*;
pub use summary::*;
pub use table::*;

use itertools::Itertools;
use strum::IntoEnumIterator;

/// All of the supported galaxy table file types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum GalaxyTableType {
    #[strum(serialize = "json")]
    Json,

    #[strum(serialize = "fits")]
    Fits,
}

lazy_static::lazy_static! {
    pub(crate) static ref GALAXY_TABLE_TYPES_COMMA_SEPARATED: String = GalaxyTableType::iter().join(", ");
}
