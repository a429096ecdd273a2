// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Summaries of single galaxies: rounded value lists for tabulating, and
//! human-readable reports.

use std::collections::BTreeMap;
use std::fmt::Display;

use log::debug;
use serde::Serialize;

use super::{Column, GalaxyTable, Lookup, NsaError};
use crate::{constants::VDISP_RESOLUTION_LIMIT, cosmology::Cosmology};

/// A single summarised value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl std::fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryValue::Text(s) => write!(f, "{s}"),
            SummaryValue::Int(i) => write!(f, "{i}"),
            SummaryValue::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A fixed-order list of values describing a galaxy, and the name of each
/// value by position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub values: Vec<SummaryValue>,
    pub columns: BTreeMap<usize, &'static str>,
}

impl Summary {
    fn from_pairs(pairs: Vec<(&'static str, SummaryValue)>) -> Summary {
        let mut values = Vec::with_capacity(pairs.len());
        let mut columns = BTreeMap::new();
        for (i, (name, value)) in pairs.into_iter().enumerate() {
            columns.insert(i, name);
            values.push(value);
        }
        Summary { values, columns }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value with the given name.
    pub fn get(&self, name: &str) -> Option<&SummaryValue> {
        self.columns
            .iter()
            .find(|(_, &n)| n == name)
            .and_then(|(&i, _)| self.values.get(i))
    }

    /// Names and values, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SummaryValue)> {
        self.columns
            .values()
            .copied()
            .zip(self.values.iter())
    }
}

/// Round half to even at `decimals` decimal places, as numpy does.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round_ties_even() / scale
}

/// An identifier (name or NSAID) as stored.
fn identifier(table: &GalaxyTable, row: usize, name: &str) -> Result<SummaryValue, NsaError> {
    Ok(match table.column(name)? {
        Column::Int(_) => SummaryValue::Int(table.int(row, name)?),
        Column::Float(_) => SummaryValue::Float(table.float(row, name)?),
        Column::Text(_) => SummaryValue::Text(table.text(row, name)?.to_string()),
        Column::FloatArray(_) => {
            return Err(NsaError::ColumnType {
                column: name.to_string(),
                expected: "scalar",
            })
        }
    })
}

fn rounded(
    table: &GalaxyTable,
    row: usize,
    name: &str,
    decimals: i32,
) -> Result<SummaryValue, NsaError> {
    Ok(SummaryValue::Float(round_to(table.float(row, name)?, decimals)))
}

fn log_mass(
    table: &GalaxyTable,
    row: usize,
    column: &'static str,
    cosmo: &Cosmology,
) -> Result<f64, NsaError> {
    let mass = table.float(row, column)?;
    cosmo.log_mass(mass).ok_or(NsaError::NonPositive {
        column,
        row,
        value: mass,
    })
}

/// Summarise a row of an NSA v0.1.2 table: 13 values.
pub fn summarize_galaxy(
    table: &GalaxyTable,
    row: usize,
    cosmo: &Cosmology,
) -> Result<Summary, NsaError> {
    let distance = cosmo.redshift_distance(table.float(row, "ZDIST")?);
    let petroth50 = table.float(row, "PETROTH50")?;
    let r_half = cosmo.angular_to_physical_kpc(petroth50, distance);

    Ok(Summary::from_pairs(vec![
        ("IAUNAME", identifier(table, row, "IAUNAME")?),
        ("NSAID", identifier(table, row, "NSAID")?),
        ("RA", rounded(table, row, "RA", 6)?),
        ("DEC", rounded(table, row, "DEC", 6)?),
        ("Z", rounded(table, row, "Z", 4)?),
        ("ZDIST", SummaryValue::Float(round_to(distance, 3))),
        (
            "ABSMAG",
            SummaryValue::Float(round_to(table.float_array_element(row, "ABSMAG", 1)?, 4)),
        ),
        ("SERSIC_N", rounded(table, row, "SERSIC_N", 3)?),
        ("PETROTH50", SummaryValue::Float(round_to(petroth50, 3))),
        ("r1/2", SummaryValue::Float(round_to(r_half, 3))),
        (
            "MASS",
            SummaryValue::Float(round_to(log_mass(table, row, "MASS", cosmo)?, 3)),
        ),
        ("VDISP", rounded(table, row, "VDISP", 3)?),
        ("D4000", rounded(table, row, "D4000", 4)?),
    ]))
}

/// Emission-line columns: flux, flux error, velocity width and its error.
/// Hα and Hβ also have equivalent widths and their errors.
const LINE_COLUMNS: [&[&str]; 7] = [
    &["HAFLUX", "HAFLUXERR", "HAVMEAS", "HAVMERR", "HAEW", "HAEWERR"],
    &["HBFLUX", "HBFLUXERR", "HBVMEAS", "HBVMERR", "HBEW", "HBEWERR"],
    &["O3FLUX", "O3FLUXERR", "O3VMEAS", "O3VMERR"],
    &["O2FLUX", "O2FLUXERR", "O2VMEAS", "O2VMERR"],
    &["O1FLUX", "O1FLUXERR", "O1VMEAS", "O1VMERR"],
    &["N2FLUX", "N2FLUXERR", "N2VMEAS", "N2VMERR"],
    &["S2FLUX", "S2FLUXERR", "S2VMEAS", "S2VMERR"],
];

/// Summarise the emission-line measurements of a row of an NSA v0.1.2 table:
/// 35 values. Fluxes are in units of 10⁻¹⁷ erg s⁻¹ cm⁻².
pub fn summarize_emission_lines(table: &GalaxyTable, row: usize) -> Result<Summary, NsaError> {
    let mut pairs = vec![
        ("IAUNAME", identifier(table, row, "IAUNAME")?),
        ("NSAID", identifier(table, row, "NSAID")?),
    ];
    for columns in LINE_COLUMNS {
        for (i, &name) in columns.iter().enumerate() {
            // Fluxes get 2 decimals, everything else 1.
            let decimals = if i == 0 { 2 } else { 1 };
            pairs.push((name, rounded(table, row, name, decimals)?));
        }
    }
    pairs.push(("S2RATIO", rounded(table, row, "S2RATIO", 3)?));
    Ok(Summary::from_pairs(pairs))
}

/// Summarise a row of a table crossing NSA v0.1.2 (`_1` columns) with v1.0.1:
/// 10 values.
pub fn summarize_crossed_galaxy(
    table: &GalaxyTable,
    row: usize,
    cosmo: &Cosmology,
) -> Result<Summary, NsaError> {
    Ok(Summary::from_pairs(vec![
        ("IAUNAME_1", identifier(table, row, "IAUNAME_1")?),
        ("NSAID_1", identifier(table, row, "NSAID_1")?),
        ("RA_1", rounded(table, row, "RA_1", 6)?),
        ("DEC_1", rounded(table, row, "DEC_1", 6)?),
        ("Z_1", rounded(table, row, "Z_1", 4)?),
        ("SERSIC_N_1", rounded(table, row, "SERSIC_N_1", 3)?),
        ("PETROTH50", rounded(table, row, "PETROTH50", 3)?),
        (
            "MASS",
            SummaryValue::Float(round_to(log_mass(table, row, "MASS", cosmo)?, 3)),
        ),
        ("VDISP", rounded(table, row, "VDISP", 3)?),
        ("D4000", rounded(table, row, "D4000", 4)?),
    ]))
}

/// Summarise a row of an NSA v1.0.1 table: 9 values.
pub fn summarize_galaxy_101(
    table: &GalaxyTable,
    row: usize,
    cosmo: &Cosmology,
) -> Result<Summary, NsaError> {
    let distance = cosmo.redshift_distance(table.float(row, "ZDIST")?);
    Ok(Summary::from_pairs(vec![
        ("IAUNAME", identifier(table, row, "IAUNAME")?),
        ("NSAID", identifier(table, row, "NSAID")?),
        ("RA", rounded(table, row, "RA", 6)?),
        ("DEC", rounded(table, row, "DEC", 6)?),
        ("Z", rounded(table, row, "Z", 4)?),
        ("ZDIST", SummaryValue::Float(round_to(distance, 3))),
        ("SERSIC_N", rounded(table, row, "SERSIC_N", 3)?),
        ("ELPETRO_TH50_R", rounded(table, row, "ELPETRO_TH50_R", 3)?),
        (
            "ELPETRO_MASS",
            SummaryValue::Float(round_to(
                log_mass(table, row, "ELPETRO_MASS", cosmo)?,
                3,
            )),
        ),
    ]))
}

fn vdisp_line(vdisp: f64) -> String {
    if vdisp < VDISP_RESOLUTION_LIMIT {
        format!("VDISP : {vdisp} km/s, value below resolution!")
    } else {
        format!("VDISP : {vdisp} km/s")
    }
}

fn absmag_line(table: &GalaxyTable, row: usize, column: &str) -> Result<String, NsaError> {
    let g = table.float_array_element(row, column, 1)?;
    let fuv = table.float_array_element(row, column, -1)?;
    Ok(format!("{column} g-band: {g} / FUV-band: {fuv}"))
}

fn plain_line(table: &GalaxyTable, row: usize, column: &str) -> Result<String, NsaError> {
    Ok(format!("{column} : {}", table.display_value(row, column)?))
}

fn galaxy_report_lines(
    table: &GalaxyTable,
    row: usize,
    cosmo: &Cosmology,
    lines: &mut Vec<String>,
) -> Result<(), NsaError> {
    for column in ["IAUNAME", "NSAID", "RA", "DEC", "Z"] {
        lines.push(plain_line(table, row, column)?);
    }
    let zdist = table.float(row, "ZDIST")?;
    let distance = cosmo.redshift_distance(zdist);
    lines.push(format!("ZDIST : {zdist} - {distance} Mpc"));
    lines.push(absmag_line(table, row, "ABSMAG")?);
    lines.push(plain_line(table, row, "SERSIC_N")?);
    let petroth50 = table.float(row, "PETROTH50")?;
    lines.push(format!(
        "PETROTH50 : {petroth50} arcsec - {} kpc",
        cosmo.angular_to_physical_kpc(petroth50, distance)
    ));
    lines.push(format!("MASS : {}", log_mass(table, row, "MASS", cosmo)?));
    lines.push(vdisp_line(table.float(row, "VDISP")?));
    lines.push(plain_line(table, row, "D4000")?);
    Ok(())
}

/// A human-readable description of a row of an NSA v0.1.2 table. If a value
/// can't be reported, the lines so far are followed by "Error in id: <row>".
pub fn galaxy_report(table: &GalaxyTable, row: usize, cosmo: &Cosmology) -> Vec<String> {
    let mut lines = vec![];
    if let Err(e) = galaxy_report_lines(table, row, cosmo, &mut lines) {
        debug!("Couldn't finish the report of row {row}: {e}");
        lines.push(format!("Error in id: {row}"));
    }
    lines
}

/// A human-readable description of the emission lines of a row of an NSA
/// v0.1.2 table.
pub fn emission_line_report(table: &GalaxyTable, row: usize) -> Result<Vec<String>, NsaError> {
    let f = |column: &str| table.display_value(row, column);
    let mut lines = vec![
        format!("IAUNAME : {}", f("IAUNAME")?),
        format!("NSAID : {}", f("NSAID")?),
    ];
    for columns in LINE_COLUMNS {
        lines.push(format!(
            "- {} : ({} + {})*10^-17 erg/cm^2/s",
            columns[0],
            f(columns[0])?,
            f(columns[1])?
        ));
        lines.push(format!("FWHM: ({} + {}) km/s", f(columns[2])?, f(columns[3])?));
        if let [_, _, _, _, ew, ew_err] = *columns {
            lines.push(format!("EW: ({} + {}) A", f(ew)?, f(ew_err)?));
        }
    }
    lines.push(format!(
        "ratio [SII]6731 / [SII]6716 : {}",
        f("S2RATIO")?
    ));
    Ok(lines)
}

/// A human-readable description of a row of a crossed NSA table. The distance
/// comes from the v0.1.2 redshift.
pub fn crossed_galaxy_report(
    table: &GalaxyTable,
    row: usize,
    cosmo: &Cosmology,
) -> Result<Vec<String>, NsaError> {
    let mut lines = vec![];
    for column in ["IAUNAME_1", "NSAID_1", "RA_1", "DEC_1"] {
        lines.push(plain_line(table, row, column)?);
    }
    let z = table.float(row, "Z_1")?;
    let distance = cosmo.redshift_distance(z);
    lines.push(format!("Z_1 : {z} - {distance} Mpc"));
    lines.push(absmag_line(table, row, "ABSMAG")?);
    lines.push(plain_line(table, row, "SERSIC_N_1")?);
    let petroth50 = table.float(row, "PETROTH50")?;
    lines.push(format!(
        "PETROTH50 : {petroth50} arcsec - {} kpc",
        cosmo.angular_to_physical_kpc(petroth50, distance)
    ));
    lines.push(format!("MASS : {}", log_mass(table, row, "MASS", cosmo)?));
    lines.push(vdisp_line(table.float(row, "VDISP")?));
    lines.push(plain_line(table, row, "D4000")?);
    Ok(lines)
}

/// A human-readable description of a search result in an NSA v1.0.1 table.
pub fn galaxy_101_report<K: Display>(
    table: &GalaxyTable,
    lookup: &Lookup<K>,
    cosmo: &Cosmology,
) -> Result<Vec<String>, NsaError> {
    let row = match lookup {
        Lookup::Found(row) => *row,
        Lookup::NotFound(key) => return Ok(vec![format!("No matches for {key}")]),
    };

    let mut lines = vec![];
    for column in ["IAUNAME", "NSAID", "RA", "DEC", "Z"] {
        lines.push(plain_line(table, row, column)?);
    }
    let zdist = table.float(row, "ZDIST")?;
    let distance = cosmo.redshift_distance(zdist);
    lines.push(format!("ZDIST : {zdist} - {distance} Mpc"));
    lines.push(absmag_line(table, row, "SERSIC_ABSMAG")?);
    let th50 = table.float(row, "ELPETRO_TH50_R")?;
    lines.push(format!(
        "ELPETRO_TH50_R : {th50} arcsec - {} kpc",
        cosmo.angular_to_physical_kpc(th50, distance)
    ));
    lines.push(format!(
        "ELPETRO_MASS : {}",
        log_mass(table, row, "ELPETRO_MASS", cosmo)?
    ));
    Ok(lines)
}
