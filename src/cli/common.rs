// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arguments shared between `galphot` subcommands, and argument-file handling.

use std::{fs::File, io::BufWriter, path::Path, str::FromStr};

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use vec1::Vec1;

use super::GalphotError;
use crate::{
    constants::{
        DEFAULT_C_KM_S, DEFAULT_H0, DEFAULT_IRSA_TAP_URL, DEFAULT_LITTLE_H,
        DEFAULT_MAST_INVOKE_URL, DEFAULT_MAST_RADIUS_DEG, DEFAULT_QUERY_TIMEOUT_SECS,
    },
    coord::SkyPosition,
    cosmology::Cosmology,
    query::QueryConfig,
    PROGRESS_BARS,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref OUTPUT_TYPES_COMMA_SEPARATED: String = OutputType::iter().join(", ");

    pub(super) static ref OUTPUT_HELP: String =
        format!("Write the results to this file. Supported formats: {}", *OUTPUT_TYPES_COMMA_SEPARATED);

    static ref LITTLE_H_HELP: String =
        format!("The dimensionless Hubble parameter, used for magnitude and mass corrections. Default: {DEFAULT_LITTLE_H}");

    static ref SPEED_OF_LIGHT_HELP: String =
        format!("The speed of light used to turn redshifts into distances [km/s]. Default: {DEFAULT_C_KM_S}");

    static ref HUBBLE_CONSTANT_HELP: String =
        format!("The Hubble constant used to turn redshifts into distances [km/s/Mpc]. Default: {DEFAULT_H0}");

    static ref IRSA_URL_HELP: String =
        format!("The IRSA TAP endpoint used for ALLWISE cone searches. Default: {DEFAULT_IRSA_TAP_URL}");

    static ref MAST_URL_HELP: String =
        format!("The MAST invoke endpoint used for GALEX searches. Default: {DEFAULT_MAST_INVOKE_URL}");

    static ref MAST_RADIUS_HELP: String =
        format!("The GALEX search radius [degrees]. Default: {DEFAULT_MAST_RADIUS_DEG}");

    static ref TIMEOUT_HELP: String =
        format!("How long to wait for a catalog service to respond [seconds]. Default: {DEFAULT_QUERY_TIMEOUT_SECS}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(GalphotError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(GalphotError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(GalphotError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Where sources are and how far away they are.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PositionArgs {
    /// Right ascensions of the sources [degrees].
    #[clap(short, long, multiple_values(true), help_heading = "SOURCES")]
    pub(super) ra: Option<Vec<f64>>,

    /// Declinations of the sources [degrees].
    #[clap(short, long, multiple_values(true), help_heading = "SOURCES")]
    pub(super) dec: Option<Vec<f64>>,

    /// Distances to the sources [Mpc].
    #[clap(long, multiple_values(true), help_heading = "SOURCES")]
    pub(super) distance: Option<Vec<f64>>,
}

impl PositionArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            ra: self.ra.or(other.ra),
            dec: self.dec.or(other.dec),
            distance: self.distance.or(other.distance),
        }
    }

    /// Pair up the RAs and Decs. The distances are returned as they are; their
    /// count is checked when they're used.
    pub(super) fn parse(self) -> Result<(Vec1<SkyPosition>, Vec<f64>), GalphotError> {
        let (ras, decs) = match (self.ra, self.dec) {
            (Some(ras), Some(decs)) => (ras, decs),
            _ => {
                return Err(GalphotError::Args(
                    "Source positions must be given with --ra and --dec".to_string(),
                ))
            }
        };
        let positions = SkyPosition::zip(&ras, &decs).ok_or_else(|| {
            GalphotError::Args(format!(
                "Got {} RAs but {} Decs; they must be paired",
                ras.len(),
                decs.len()
            ))
        })?;
        let positions = Vec1::try_from_vec(positions)
            .map_err(|_| GalphotError::Args("No source positions were given".to_string()))?;
        let distances = self.distance.ok_or_else(|| {
            GalphotError::Args("Source distances must be given with --distance".to_string())
        })?;
        Ok((positions, distances))
    }
}

/// Overrides for the default cosmology.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CosmologyArgs {
    #[clap(long, help = LITTLE_H_HELP.as_str(), help_heading = "COSMOLOGY")]
    pub(super) little_h: Option<f64>,

    #[clap(long, help = SPEED_OF_LIGHT_HELP.as_str(), help_heading = "COSMOLOGY")]
    pub(super) speed_of_light: Option<f64>,

    #[clap(long, help = HUBBLE_CONSTANT_HELP.as_str(), help_heading = "COSMOLOGY")]
    pub(super) hubble_constant: Option<f64>,
}

impl CosmologyArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            little_h: self.little_h.or(other.little_h),
            speed_of_light: self.speed_of_light.or(other.speed_of_light),
            hubble_constant: self.hubble_constant.or(other.hubble_constant),
        }
    }

    pub(super) fn parse(self) -> Result<Cosmology, GalphotError> {
        let default = Cosmology::default();
        let cosmo = Cosmology {
            h: self.little_h.unwrap_or(default.h),
            c: self.speed_of_light.unwrap_or(default.c),
            h0: self.hubble_constant.unwrap_or(default.h0),
        };
        for (name, value) in [("h", cosmo.h), ("c", cosmo.c), ("H0", cosmo.h0)] {
            if value.is_nan() || value <= 0.0 {
                return Err(GalphotError::Args(format!(
                    "The cosmological parameter {name} must be positive; got {value}"
                )));
            }
        }
        Ok(cosmo)
    }
}

/// Overrides for the remote catalog services.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct QueryArgs {
    #[clap(long, help = IRSA_URL_HELP.as_str(), help_heading = "CATALOG SERVICES")]
    pub(super) irsa_url: Option<String>,

    #[clap(long, help = MAST_URL_HELP.as_str(), help_heading = "CATALOG SERVICES")]
    pub(super) mast_url: Option<String>,

    #[clap(long, help = MAST_RADIUS_HELP.as_str(), help_heading = "CATALOG SERVICES")]
    pub(super) mast_radius: Option<f64>,

    #[clap(long, help = TIMEOUT_HELP.as_str(), help_heading = "CATALOG SERVICES")]
    pub(super) timeout: Option<u64>,
}

impl QueryArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            irsa_url: self.irsa_url.or(other.irsa_url),
            mast_url: self.mast_url.or(other.mast_url),
            mast_radius: self.mast_radius.or(other.mast_radius),
            timeout: self.timeout.or(other.timeout),
        }
    }

    pub(super) fn parse(self) -> QueryConfig {
        let default = QueryConfig::default();
        QueryConfig {
            irsa_tap_url: self.irsa_url.unwrap_or(default.irsa_tap_url),
            mast_invoke_url: self.mast_url.unwrap_or(default.mast_invoke_url),
            mast_radius_deg: self.mast_radius.unwrap_or(default.mast_radius_deg),
            timeout_secs: self.timeout.unwrap_or(default.timeout_secs),
            ..default
        }
    }
}

/// Supported result-file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub(super) enum OutputType {
    #[strum(serialize = "json")]
    Json,
    #[strum(serialize = "csv")]
    Csv,
}

impl OutputType {
    pub(super) fn from_path(path: &Path) -> Result<OutputType, GalphotError> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| OutputType::from_str(&e).ok())
            .ok_or_else(|| {
                GalphotError::Args(format!(
                    "Output file '{}' doesn't have a recognised file extension! Valid extensions are: {}",
                    path.display(),
                    *OUTPUT_TYPES_COMMA_SEPARATED
                ))
            })
    }
}

/// Write result records to a JSON or CSV file, depending on its extension.
pub(super) fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), GalphotError> {
    let output_type = OutputType::from_path(path)?;
    debug!("Writing {} records to {} as {output_type}", records.len(), path.display());
    match output_type {
        OutputType::Json => {
            let f = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(f, records)?;
        }
        OutputType::Csv => {
            let mut w = csv::Writer::from_path(path)?;
            for record in records {
                w.serialize(record)?;
            }
            w.flush()?;
        }
    }
    Ok(())
}

/// A progress bar for `len` catalog queries. It's hidden unless progress bars
/// were requested.
pub(super) fn query_progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let target = if PROGRESS_BARS.load() {
        ProgressDrawTarget::stdout()
    } else {
        ProgressDrawTarget::hidden()
    };
    let style = ProgressStyle::default_bar()
        .template("{msg:17}: [{wide_bar:.blue}] {pos:3}/{len:3} sources ({elapsed_precise}<{eta_precise})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::with_draw_target(Some(len as u64), target)
        .with_style(style)
        .with_position(0)
        .with_message(message)
}
