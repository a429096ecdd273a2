// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The cosmology used to turn catalog quantities into physical ones.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_C_KM_S, DEFAULT_H0, DEFAULT_LITTLE_H, PI};

/// Cosmological parameters. These are passed explicitly to anything that needs
/// them, so alternate cosmologies only require a different value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cosmology {
    /// Dimensionless Hubble parameter.
    pub h: f64,

    /// Speed of light used for redshift distances \[km/s\]
    pub c: f64,

    /// Hubble constant \[km/s/Mpc\]
    pub h0: f64,
}

impl Default for Cosmology {
    fn default() -> Self {
        Cosmology {
            h: DEFAULT_LITTLE_H,
            c: DEFAULT_C_KM_S,
            h0: DEFAULT_H0,
        }
    }
}

impl Cosmology {
    /// The magnitude correction applied for `h`, i.e. -5 log10(h).
    pub fn magnitude_correction(&self) -> f64 {
        -5.0 * self.h.log10()
    }

    /// Hubble-flow distance from a redshift \[Mpc\]
    pub fn redshift_distance(&self, z: f64) -> f64 {
        z * self.c / self.h0
    }

    /// Convert an angular size \[arcsec\] at a distance \[Mpc\] to a physical
    /// size \[kpc\].
    pub fn angular_to_physical_kpc(&self, theta_arcsec: f64, distance_mpc: f64) -> f64 {
        PI / 180.0 * theta_arcsec * distance_mpc / 3.6
    }

    /// log10(mass / h²). `None` if the mass isn't positive.
    pub fn log_mass(&self, mass: f64) -> Option<f64> {
        (mass > 0.0).then(|| (mass / self.h.powi(2)).log10())
    }
}
