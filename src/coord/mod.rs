// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sky positions.


use serde::{Deserialize, Serialize};

/// A Right Ascension and Declination. All units are in degrees.
///
/// No range checking is performed; whatever is given here is handed to the
/// catalog services as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    /// Right ascension \[degrees\]
    pub ra: f64,
    /// Declination \[degrees\]
    pub dec: f64,
}

impl SkyPosition {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Pair up parallel RA and Dec sequences. `None` if their lengths differ.
    pub fn zip(ras: &[f64], decs: &[f64]) -> Option<Vec<SkyPosition>> {
        if ras.len() != decs.len() {
            return None;
        }
        Some(
            ras.iter()
                .zip(decs)
                .map(|(&ra, &dec)| SkyPosition { ra, dec })
                .collect(),
        )
    }

    /// The angular separation between two positions \[degrees\]. Uses the
    /// Vincenty formula, which is well behaved at all separations.
    pub fn separation(&self, other: &SkyPosition) -> f64 {
        let (s_dec1, c_dec1) = self.dec.to_radians().sin_cos();
        let (s_dec2, c_dec2) = other.dec.to_radians().sin_cos();
        let (s_d_ra, c_d_ra) = (other.ra - self.ra).to_radians().sin_cos();

        let num1 = c_dec2 * s_d_ra;
        let num2 = c_dec1 * s_dec2 - s_dec1 * c_dec2 * c_d_ra;
        let denominator = s_dec1 * s_dec2 + c_dec1 * c_dec2 * c_d_ra;
        num1.hypot(num2).atan2(denominator).to_degrees()
    }

    /// The position as a string that the MAST name resolver accepts, e.g.
    /// "150.1 2.2".
    pub fn to_object_string(&self) -> String {
        format!("{} {}", self.ra, self.dec)
    }

    /// Parse a position written as "<ra> <dec>" (degrees, whitespace or comma
    /// separated).
    pub fn parse_object_string(s: &str) -> Option<SkyPosition> {
        let mut parts = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty());
        let ra = parts.next()?.parse().ok()?;
        let dec = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(SkyPosition { ra, dec })
    }
}

impl std::fmt::Display for SkyPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RA {:.6}°, Dec {:.6}°", self.ra, self.dec)
    }
}
