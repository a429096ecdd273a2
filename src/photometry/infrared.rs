// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! WISE W4 (22 μm) photometry from the ALLWISE point-source catalog.

use indicatif::ProgressBar;
use log::{debug, trace};
use serde::Serialize;

use super::{check_len, Band, FluxLuminosity, PhotometryError};
use crate::{
    constants::{
        ALLWISE_CATALOG, ALLWISE_SEARCH_RADIUS_ARCMIN, DEFAULT_W4_ERR_LIST,
        DEFAULT_W4_ERR_SCALAR, W4_VEGA_TO_AB,
    },
    coord::SkyPosition,
    cosmology::Cosmology,
    query::CatalogService,
};

/// The closest ALLWISE source to a position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfraredMatch {
    /// The ALLWISE designation, e.g. "J095959.99+021234.5".
    pub designation: String,

    /// W4 profile-fit magnitude (Vega).
    pub w4mpro: f64,

    /// W4 magnitude error. ALLWISE masks this for upper limits.
    pub w4sigmpro: Option<f64>,

    /// Separation of the source from the queried position \[arcsec\]
    pub dist_arcsec: f64,
}

/// Get the closest ALLWISE source within 2 arcmin of `position`. Exactly one
/// query is made, and any query error is returned as-is.
pub fn lookup_infrared_magnitude<S: CatalogService + ?Sized>(
    service: &S,
    position: SkyPosition,
) -> Result<InfraredMatch, PhotometryError> {
    let table = service.query_region(ALLWISE_CATALOG, position, ALLWISE_SEARCH_RADIUS_ARCMIN)?;
    if table.is_empty() {
        return Err(PhotometryError::NoRows {
            catalog: ALLWISE_CATALOG,
            position,
        });
    }

    let float = |column: &'static str| -> Result<Option<f64>, PhotometryError> {
        Ok(table.get(0, column)?.and_then(|c| c.as_f64()))
    };
    let masked = |column: &'static str| PhotometryError::MaskedValue {
        catalog: ALLWISE_CATALOG,
        column,
        position,
    };

    let designation = table
        .get(0, "designation")?
        .map(|c| c.to_string())
        .unwrap_or_default();
    let w4mpro = float("w4mpro")?.ok_or_else(|| masked("w4mpro"))?;
    let w4sigmpro = float("w4sigmpro")?;
    let dist_arcsec = float("dist")?.ok_or_else(|| masked("dist"))?;

    let m = InfraredMatch {
        designation,
        w4mpro,
        w4sigmpro,
        dist_arcsec,
    };
    trace!("{position}: {m:?}");
    Ok(m)
}

/// Human-readable lines describing an ALLWISE match.
pub fn report_infrared_match(m: &InfraredMatch) -> Vec<String> {
    let err = match m.w4sigmpro {
        Some(e) => e.to_string(),
        None => "--".to_string(),
    };
    vec![
        "designation\t\t w4mpro\t w4sigmpro\t dist".to_string(),
        format!(
            "{}\t {}\t+\t{}\t\t {} arcsec",
            m.designation, m.w4mpro, err, m.dist_arcsec
        ),
    ]
}

/// Convert an ALLWISE W4 match into a flux density and luminosity. The Vega
/// magnitude is moved onto the AB system with the h correction applied;
/// `default_err` stands in for a masked magnitude error.
pub fn w4_to_flux_luminosity(
    m: &InfraredMatch,
    default_err: f64,
    distance_mpc: f64,
    cosmo: &Cosmology,
) -> FluxLuminosity {
    let mag = m.w4mpro + W4_VEGA_TO_AB + cosmo.magnitude_correction();
    let err = m.w4sigmpro.unwrap_or_else(|| {
        debug!(
            "{}: W4 error is masked; using {default_err}",
            m.designation
        );
        default_err
    });
    FluxLuminosity::from_ab_magnitude(Band::W4, mag, err, distance_mpc)
}

/// Get the W4 flux density and luminosity of the source at `position`, which
/// is `distance_mpc` away. A masked error is replaced by 0.05 mag.
pub fn infrared_flux_luminosity<S: CatalogService + ?Sized>(
    service: &S,
    position: SkyPosition,
    distance_mpc: f64,
    cosmo: &Cosmology,
) -> Result<FluxLuminosity, PhotometryError> {
    let m = lookup_infrared_magnitude(service, position)?;
    Ok(w4_to_flux_luminosity(
        &m,
        DEFAULT_W4_ERR_SCALAR,
        distance_mpc,
        cosmo,
    ))
}

/// [`infrared_flux_luminosity`] for many positions, one query each, in order.
/// A masked error is replaced by 0.5 mag. `positions` and `distances_mpc` must
/// be the same length.
pub fn infrared_flux_luminosity_list<S: CatalogService + ?Sized>(
    service: &S,
    positions: &[SkyPosition],
    distances_mpc: &[f64],
    cosmo: &Cosmology,
    progress: &ProgressBar,
) -> Result<Vec<FluxLuminosity>, PhotometryError> {
    check_len("distances", positions.len(), distances_mpc.len())?;

    let mut results = Vec::with_capacity(positions.len());
    for (&position, &distance) in positions.iter().zip(distances_mpc) {
        let m = lookup_infrared_magnitude(service, position)?;
        results.push(w4_to_flux_luminosity(
            &m,
            DEFAULT_W4_ERR_LIST,
            distance,
            cosmo,
        ));
        progress.inc(1);
    }
    progress.finish();
    Ok(results)
}
