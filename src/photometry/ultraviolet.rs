// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! GALEX far-ultraviolet photometry from MAST.
//!
//! FUV lookups are best effort: the plain lookup functions never fail, and
//! report a [`Magnitude::Missing`] when nothing usable came back. Use
//! [`try_lookup_uv_magnitude`] to see why.

use indicatif::ProgressBar;
use log::{debug, info};

use super::{check_len, Band, FluxLuminosity, Magnitude, PhotometryError};
use crate::{
    constants::{FUV_SCALAR_SCAN_ROWS, GALEX_CATALOG},
    coord::SkyPosition,
    cosmology::Cosmology,
    query::CatalogService,
};

/// Query GALEX around `position` and return the first FUV magnitude found in
/// the first `max_rows` rows (all rows if `None`). Rows without an FUV
/// magnitude are skipped; if no row has one, the magnitude is missing. A
/// result with no rows at all is an error.
pub fn try_lookup_uv_magnitude<S: CatalogService + ?Sized>(
    service: &S,
    position: SkyPosition,
    max_rows: Option<usize>,
) -> Result<Magnitude, PhotometryError> {
    let mut table = service.query_object(GALEX_CATALOG, &position.to_object_string())?;
    if table.is_empty() {
        return Err(PhotometryError::NoRows {
            catalog: GALEX_CATALOG,
            position,
        });
    }
    if let Some(max_rows) = max_rows {
        table.truncate(max_rows);
    }

    for i_row in 0..table.len() {
        let mag = table.get(i_row, "fuv_mag")?.and_then(|c| c.as_f64());
        if let Some(mag) = mag {
            let err = table.get(i_row, "fuv_magerr")?.and_then(|c| c.as_f64());
            debug!("{position}: FUV {mag} from GALEX row {i_row}");
            return Ok(Magnitude::Measured { mag, err });
        }
    }
    debug!("{position}: no GALEX row has an FUV magnitude");
    Ok(Magnitude::Missing)
}

fn missing_on_error(position: SkyPosition, result: Result<Magnitude, PhotometryError>) -> Magnitude {
    result.unwrap_or_else(|e| {
        debug!("{position}: treating the FUV magnitude as missing: {e}");
        Magnitude::Missing
    })
}

/// The FUV magnitude of the source at `position`, looking at up to the three
/// closest GALEX rows. Any failure gives [`Magnitude::Missing`].
pub fn lookup_uv_magnitude<S: CatalogService + ?Sized>(
    service: &S,
    position: SkyPosition,
) -> Magnitude {
    missing_on_error(
        position,
        try_lookup_uv_magnitude(service, position, Some(FUV_SCALAR_SCAN_ROWS)),
    )
}

/// FUV magnitudes for many positions, one query each, in order. Every GALEX
/// row returned for a position is considered. Any failure gives
/// [`Magnitude::Missing`] for that position.
pub fn lookup_uv_magnitudes<S: CatalogService + ?Sized>(
    service: &S,
    positions: &[SkyPosition],
    progress: &ProgressBar,
) -> Vec<Magnitude> {
    let num_positions = positions.len();
    let mut mags = Vec::with_capacity(num_positions);
    for (i, &position) in positions.iter().enumerate() {
        mags.push(missing_on_error(
            position,
            try_lookup_uv_magnitude(service, position, None),
        ));
        progress.inc(1);
        if progress.is_hidden() {
            info!(
                "{} - {}% done",
                i + 1,
                (100.0 * (i + 1) as f64 / num_positions as f64).round()
            );
        }
    }
    progress.finish();
    mags
}

/// Convert an FUV magnitude into a flux density and luminosity for a source
/// `distance_mpc` away. The h correction is applied to measured magnitudes. A
/// missing magnitude is converted as magnitude 999 with error 0, so its flux
/// and luminosity are effectively zero, with zero errors.
pub fn uv_flux_luminosity(mag: Magnitude, distance_mpc: f64, cosmo: &Cosmology) -> FluxLuminosity {
    let (mag, err) = mag.with_placeholder();
    FluxLuminosity::from_ab_magnitude(
        Band::Fuv,
        mag + cosmo.magnitude_correction(),
        err,
        distance_mpc,
    )
}

/// [`uv_flux_luminosity`] for parallel lists of magnitudes and distances.
pub fn uv_flux_luminosity_list(
    mags: &[Magnitude],
    distances_mpc: &[f64],
    cosmo: &Cosmology,
) -> Result<Vec<FluxLuminosity>, PhotometryError> {
    check_len("distances", mags.len(), distances_mpc.len())?;
    Ok(mags
        .iter()
        .zip(distances_mpc)
        .map(|(&mag, &distance)| uv_flux_luminosity(mag, distance, cosmo))
        .collect())
}
