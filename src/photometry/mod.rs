// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Catalog photometry: WISE W4 (22 μm) and GALEX FUV magnitudes, and their
//! conversion to flux densities and luminosities.
//!
//! Flux densities are in erg s⁻¹ cm⁻² Hz⁻¹ and luminosities (ν L_ν) in
//! erg s⁻¹.

mod error;
mod infrared;
#[cfg(test)]
mod tests;
mod ultraviolet;

pub use error::PhotometryError;
pub use infrared::*;
pub use ultraviolet::*;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AB_MAG_ZERO_POINT, FUV_WAVELENGTH_CM, LN_10, MISSING_MAG_ERR_PLACEHOLDER,
    MISSING_MAG_PLACEHOLDER, MPC_TO_CM, PI, VEL_C_CM, W4_WAVELENGTH_CM,
};

/// The photometric bands handled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Band {
    /// WISE W4, 22 μm.
    #[strum(serialize = "W4")]
    W4,

    /// GALEX far-ultraviolet, 1350-1750 Å.
    #[strum(serialize = "FUV")]
    Fuv,
}

impl Band {
    /// The wavelength used to represent the band \[cm\]
    pub fn wavelength_cm(self) -> f64 {
        match self {
            Band::W4 => W4_WAVELENGTH_CM,
            Band::Fuv => FUV_WAVELENGTH_CM,
        }
    }

    /// The frequency of the band's wavelength \[Hz\]
    pub fn frequency_hz(self) -> f64 {
        VEL_C_CM / self.wavelength_cm()
    }
}

/// A catalog magnitude, which may not exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Magnitude {
    Measured {
        mag: f64,
        /// The one-sigma error. Catalogs sometimes mask this even when the
        /// magnitude is present.
        err: Option<f64>,
    },
    Missing,
}

impl Magnitude {
    pub fn is_missing(&self) -> bool {
        matches!(self, Magnitude::Missing)
    }

    /// The (magnitude, error) pair to convert. A missing magnitude becomes the
    /// placeholder magnitude 999 with error 0, which yields a flux (and
    /// luminosity) of effectively zero with zero error. A missing error on a
    /// measured magnitude is NaN.
    pub fn with_placeholder(self) -> (f64, f64) {
        match self {
            Magnitude::Measured { mag, err } => (mag, err.unwrap_or(f64::NAN)),
            Magnitude::Missing => (MISSING_MAG_PLACEHOLDER, MISSING_MAG_ERR_PLACEHOLDER),
        }
    }
}

impl std::fmt::Display for Magnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Magnitude::Measured { mag, err: Some(err) } => write!(f, "{mag} ± {err}"),
            Magnitude::Measured { mag, err: None } => write!(f, "{mag} ± --"),
            Magnitude::Missing => write!(f, "nan"),
        }
    }
}

/// A flux density and luminosity, each with a one-sigma error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxLuminosity {
    /// \[erg s⁻¹ cm⁻² Hz⁻¹\]
    pub flux: f64,
    pub flux_err: f64,
    /// \[erg s⁻¹\]
    pub lum: f64,
    pub lum_err: f64,
}

impl FluxLuminosity {
    /// Convert an AB magnitude and its error in `band` for a source at
    /// `distance_mpc`.
    pub fn from_ab_magnitude(band: Band, mag: f64, mag_err: f64, distance_mpc: f64) -> Self {
        let flux = ab_mag_to_flux_density(mag);
        let flux_err = mag_err_to_flux_err(flux, mag_err);
        FluxLuminosity {
            flux,
            flux_err,
            lum: flux_density_to_luminosity(flux, band, distance_mpc),
            lum_err: flux_density_to_luminosity(flux_err, band, distance_mpc),
        }
    }
}

/// Convert an AB magnitude to a flux density \[erg s⁻¹ cm⁻² Hz⁻¹\].
pub fn ab_mag_to_flux_density(mag: f64) -> f64 {
    10f64.powf(-(mag + AB_MAG_ZERO_POINT) / 2.5)
}

/// Propagate a magnitude error to a flux-density error.
pub fn mag_err_to_flux_err(flux: f64, mag_err: f64) -> f64 {
    flux * (LN_10 / 2.5) * mag_err.abs()
}

/// 4π F ν d², with the distance in Mpc.
pub fn flux_density_to_luminosity(flux: f64, band: Band, distance_mpc: f64) -> f64 {
    let d_cm = distance_mpc * MPC_TO_CM;
    4.0 * PI * flux * band.frequency_hz() * d_cm * d_cm
}

/// Check that a parallel sequence has the expected length.
fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), PhotometryError> {
    if expected == got {
        Ok(())
    } else {
        Err(PhotometryError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}
