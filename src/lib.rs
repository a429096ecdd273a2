// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Galaxy photometry from catalog services (ALLWISE W4 and GALEX FUV flux
densities and luminosities) and lookups into NASA-Sloan Atlas galaxy tables.
 */

pub mod constants;
pub mod coord;
pub mod cosmology;
pub mod nsa;
pub mod photometry;
pub mod query;

mod cli;
mod printers;

use crossbeam_utils::atomic::AtomicCell;

// Re-exports.
pub use cli::{Galphot, GalphotError};
pub use coord::SkyPosition;
pub use cosmology::Cosmology;

/// Should we draw progress bars? Flipped on by the CLI unless the user asked
/// otherwise.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
