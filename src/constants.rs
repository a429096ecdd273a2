// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Flux densities are in CGS
(erg s⁻¹ cm⁻² Hz⁻¹) and luminosities in erg s⁻¹.
 */

pub use std::f64::consts::{LN_10, PI};

/// Speed of light \[cm/s\]
pub const VEL_C_CM: f64 = 2.997_924_58e10;

/// One megaparsec \[cm\]
pub const MPC_TO_CM: f64 = 3.085_677_581_491_367e24;

/// AB magnitudes are defined by m = -2.5 log10(F_ν) - 48.6, F_ν in CGS.
pub const AB_MAG_ZERO_POINT: f64 = 48.6;

/// The W4 band "monochromatic" wavelength \[cm\] (22 μm).
pub const W4_WAVELENGTH_CM: f64 = 22e-4;

/// The GALEX FUV band wavelength \[cm\]; the middle of 1350-1750 Å.
pub const FUV_WAVELENGTH_CM: f64 = (1350.0 + 1750.0) / 2.0 * 1e-8;

/// Offset converting a WISE W4 Vega magnitude to AB.
/// <https://wise2.ipac.caltech.edu/docs/release/allsky/expsup/sec4_4h.html>
pub const W4_VEGA_TO_AB: f64 = 6.62;

/// Substituted for a masked W4 magnitude error when converting a single
/// position.
pub const DEFAULT_W4_ERR_SCALAR: f64 = 0.05;

/// Substituted for a masked W4 magnitude error when converting a list of
/// positions.
pub const DEFAULT_W4_ERR_LIST: f64 = 0.5;

/// Magnitude used in place of a missing FUV magnitude. This drives the flux to
/// (effectively) zero.
pub const MISSING_MAG_PLACEHOLDER: f64 = 999.0;

/// Magnitude error used in place of a missing FUV magnitude error.
pub const MISSING_MAG_ERR_PLACEHOLDER: f64 = 0.0;

/// The name of the ALLWISE point-source catalog at IRSA.
pub const ALLWISE_CATALOG: &str = "allwise_p3as_psd";

/// The name of the GALEX catalog at MAST.
pub const GALEX_CATALOG: &str = "Galex";

/// ALLWISE cone-search radius \[arcmin\]
pub const ALLWISE_SEARCH_RADIUS_ARCMIN: f64 = 2.0;

/// MAST catalog cone-search radius \[degrees\]
pub const DEFAULT_MAST_RADIUS_DEG: f64 = 0.2;

/// When looking up the FUV magnitude of a single position, only this many of
/// the closest catalog rows are considered.
pub const FUV_SCALAR_SCAN_ROWS: usize = 3;

/// Velocity dispersions below this are under the SDSS instrumental resolution
/// \[km/s\]
pub const VDISP_RESOLUTION_LIMIT: f64 = 70.0;

/// Default dimensionless Hubble parameter.
pub const DEFAULT_LITTLE_H: f64 = 0.73;

/// Default speed of light used for redshift distances \[km/s\]
pub const DEFAULT_C_KM_S: f64 = 3e5;

/// Default Hubble constant \[km/s/Mpc\]
pub const DEFAULT_H0: f64 = 73.0;

/// Default timeout for remote catalog queries \[seconds\]
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_IRSA_TAP_URL: &str = "https://irsa.ipac.caltech.edu/TAP/sync";

pub const DEFAULT_MAST_INVOKE_URL: &str = "https://mast.stsci.edu/api/v0/invoke";
