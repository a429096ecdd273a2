// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `w4-flux` and `fuv-flux` subcommands.


use std::{fs::read_to_string, path::PathBuf};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::{
    query_progress_bar, write_records, CosmologyArgs, PositionArgs, QueryArgs, ARG_FILE_HELP,
    OUTPUT_HELP,
};
use crate::{
    constants::{ALLWISE_CATALOG, DEFAULT_W4_ERR_SCALAR, GALEX_CATALOG},
    coord::SkyPosition,
    cosmology::Cosmology,
    photometry::{
        infrared_flux_luminosity_list, lookup_infrared_magnitude, lookup_uv_magnitude,
        lookup_uv_magnitudes, report_infrared_match, uv_flux_luminosity_list,
        w4_to_flux_luminosity, FluxLuminosity, Magnitude, PhotometryError,
    },
    printers::{display_warnings, InfoPrinter, Warn},
    query::{CatalogService, CatalogTable, PreloadedCatalogs, QueryConfig, RemoteCatalogs},
    GalphotError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct W4FluxArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "sources")]
    #[serde(default)]
    pub(super) position_args: PositionArgs,

    #[clap(flatten)]
    #[serde(rename = "cosmology")]
    #[serde(default)]
    pub(super) cosmology_args: CosmologyArgs,

    #[clap(flatten)]
    #[serde(rename = "services")]
    #[serde(default)]
    pub(super) query_args: QueryArgs,

    /// Answer ALLWISE queries from this CSV extract of the catalog rather
    /// than asking IRSA. It needs "ra", "dec", "designation", "w4mpro" and
    /// "w4sigmpro" columns.
    #[clap(long, parse(from_os_str), help_heading = "CATALOG SERVICES")]
    pub(super) allwise_csv: Option<PathBuf>,

    #[clap(short, long, parse(from_os_str), help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct FuvFluxArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "sources")]
    #[serde(default)]
    pub(super) position_args: PositionArgs,

    #[clap(flatten)]
    #[serde(rename = "cosmology")]
    #[serde(default)]
    pub(super) cosmology_args: CosmologyArgs,

    #[clap(flatten)]
    #[serde(rename = "services")]
    #[serde(default)]
    pub(super) query_args: QueryArgs,

    /// Answer GALEX queries from this CSV extract of the catalog rather than
    /// asking MAST. It needs "ra", "dec", "fuv_mag" and "fuv_magerr" columns.
    #[clap(long, parse(from_os_str), help_heading = "CATALOG SERVICES")]
    pub(super) galex_csv: Option<PathBuf>,

    #[clap(short, long, parse(from_os_str), help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

/// One row of a W4 results file.
#[derive(Debug, Serialize)]
struct W4Record {
    ra: f64,
    dec: f64,
    distance_mpc: f64,
    w4_flux: f64,
    w4_flux_err: f64,
    w4_lum: f64,
    w4_lum_err: f64,
}

/// One row of an FUV results file. A missing magnitude is left empty.
#[derive(Debug, Serialize)]
struct FuvRecord {
    ra: f64,
    dec: f64,
    distance_mpc: f64,
    fuv_mag: Option<f64>,
    fuv_flux: f64,
    fuv_flux_err: f64,
    fuv_lum: f64,
    fuv_lum_err: f64,
}

/// Everything needed to do photometry, after the arguments have been checked.
struct PhotometryParams {
    positions: Vec1<SkyPosition>,
    distances: Vec<f64>,
    cosmology: Cosmology,
    service: Box<dyn CatalogService>,
    output: Option<PathBuf>,
}

impl PhotometryParams {
    /// A single source is looked up the way an individual galaxy is; more
    /// than one is treated as a list.
    fn is_scalar(&self) -> bool {
        self.positions.len() == 1
    }
}

/// Read a CSV catalog extract and serve it as `catalog`, or fall back to the
/// remote services.
fn catalog_service(
    csv: Option<PathBuf>,
    catalog: &str,
    config: &QueryConfig,
) -> Result<Box<dyn CatalogService>, GalphotError> {
    match csv {
        Some(csv) => {
            debug!("Using {} for {catalog} queries", csv.display());
            let table = CatalogTable::from_csv(&read_to_string(&csv)?)?;
            Ok(Box::new(
                PreloadedCatalogs::new()
                    .with_object_radius(config.mast_radius_deg)
                    .with_table(catalog, table),
            ))
        }
        None => Ok(Box::new(RemoteCatalogs::new(config)?)),
    }
}

fn print_inputs(title: &'static str, params: &PhotometryParams, catalog_source: String) {
    let mut printer = InfoPrinter::new(title.into());
    printer.push_line(format!("{} source(s)", params.positions.len()).into());
    if params.positions.len() <= 5 {
        printer.push_block(
            params
                .positions
                .iter()
                .zip(params.distances.iter())
                .map(|(p, d)| format!("{p} at {d} Mpc").into())
                .collect(),
        );
    }
    let c = &params.cosmology;
    printer.push_line(format!("h = {}, c = {} km/s, H0 = {} km/s/Mpc", c.h, c.c, c.h0).into());
    printer.push_line(catalog_source.into());
    printer.display();
}

fn print_results(title: &'static str, positions: &[SkyPosition], results: &[FluxLuminosity]) {
    let mut printer = InfoPrinter::new(title.into());
    for (p, r) in positions.iter().zip(results) {
        printer.push_block(vec![
            format!("{p}").into(),
            format!("flux {:e} ± {:e} erg/s/cm^2/Hz", r.flux, r.flux_err).into(),
            format!("lum  {:e} ± {:e} erg/s", r.lum, r.lum_err).into(),
        ]);
    }
    printer.display();
}

macro_rules! merge_photometry_args {
    ($cli_args:expr, $args_type:ident, $csv:ident) => {{
        debug!("Merging command-line arguments with the argument file");

        let cli_args = $cli_args;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let $args_type {
                args_file: _,
                position_args,
                cosmology_args,
                query_args,
                $csv,
                output,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok($args_type {
                args_file: None,
                position_args: cli_args.position_args.merge(position_args),
                cosmology_args: cli_args.cosmology_args.merge(cosmology_args),
                query_args: cli_args.query_args.merge(query_args),
                $csv: cli_args.$csv.or($csv),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }};
}

impl W4FluxArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    pub(super) fn merge(self) -> Result<W4FluxArgs, GalphotError> {
        merge_photometry_args!(self, W4FluxArgs, allwise_csv)
    }

    fn parse(self) -> Result<PhotometryParams, GalphotError> {
        trace!("{:#?}", self);

        let Self {
            args_file: _,
            position_args,
            cosmology_args,
            query_args,
            allwise_csv,
            output,
        } = self;

        let (positions, distances) = position_args.parse()?;
        let cosmology = cosmology_args.parse()?;
        let config = query_args.parse();
        let catalog_source = match &allwise_csv {
            Some(csv) => format!("ALLWISE extract: {}", csv.display()),
            None => format!("ALLWISE from IRSA: {}", config.irsa_tap_url),
        };
        let service = catalog_service(allwise_csv, ALLWISE_CATALOG, &config)?;

        let params = PhotometryParams {
            positions,
            distances,
            cosmology,
            service,
            output,
        };
        print_inputs("W4 flux densities", &params, catalog_source);
        display_warnings();
        Ok(params)
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), GalphotError> {
        debug!("Converting arguments into parameters");
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let PhotometryParams {
            positions,
            distances,
            cosmology,
            service,
            output,
        } = &params;

        let results = if params.is_scalar() {
            let position = *positions.first();
            let distance = match distances.as_slice() {
                [d] => *d,
                _ => {
                    return Err(PhotometryError::LengthMismatch {
                        what: "distances",
                        expected: 1,
                        got: distances.len(),
                    }
                    .into())
                }
            };
            let m = lookup_infrared_magnitude(&**service, position)?;
            let mut printer = InfoPrinter::new("Closest ALLWISE source".into());
            printer.push_block(report_infrared_match(&m).into_iter().map(Into::into).collect());
            printer.display();
            vec![w4_to_flux_luminosity(
                &m,
                DEFAULT_W4_ERR_SCALAR,
                distance,
                cosmology,
            )]
        } else {
            let progress = query_progress_bar(positions.len(), "ALLWISE queries");
            infrared_flux_luminosity_list(
                &**service,
                positions,
                distances,
                cosmology,
                &progress,
            )?
        };
        print_results("W4 results", positions, &results);

        if let Some(output) = output {
            let records: Vec<W4Record> = positions
                .iter()
                .zip(distances)
                .zip(&results)
                .map(|((p, &d), r)| W4Record {
                    ra: p.ra,
                    dec: p.dec,
                    distance_mpc: d,
                    w4_flux: r.flux,
                    w4_flux_err: r.flux_err,
                    w4_lum: r.lum,
                    w4_lum_err: r.lum_err,
                })
                .collect();
            write_records(output, &records)?;
            info!("Wrote {}", output.display());
        }
        Ok(())
    }
}

impl FuvFluxArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    pub(super) fn merge(self) -> Result<FuvFluxArgs, GalphotError> {
        merge_photometry_args!(self, FuvFluxArgs, galex_csv)
    }

    fn parse(self) -> Result<PhotometryParams, GalphotError> {
        trace!("{:#?}", self);

        let Self {
            args_file: _,
            position_args,
            cosmology_args,
            query_args,
            galex_csv,
            output,
        } = self;

        let (positions, distances) = position_args.parse()?;
        let cosmology = cosmology_args.parse()?;
        let config = query_args.parse();
        let catalog_source = match &galex_csv {
            Some(csv) => format!("GALEX extract: {}", csv.display()),
            None => format!("GALEX from MAST: {}", config.mast_invoke_url),
        };
        let service = catalog_service(galex_csv, GALEX_CATALOG, &config)?;

        let params = PhotometryParams {
            positions,
            distances,
            cosmology,
            service,
            output,
        };
        print_inputs("FUV flux densities", &params, catalog_source);
        display_warnings();
        Ok(params)
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), GalphotError> {
        debug!("Converting arguments into parameters");
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let PhotometryParams {
            positions,
            distances,
            cosmology,
            service,
            output,
        } = &params;

        let mags = if params.is_scalar() {
            vec![lookup_uv_magnitude(&**service, *positions.first())]
        } else {
            let progress = query_progress_bar(positions.len(), "GALEX queries");
            lookup_uv_magnitudes(&**service, positions, &progress)
        };
        for (p, m) in positions.iter().zip(&mags) {
            match m {
                Magnitude::Missing => {
                    format!("No FUV magnitude for the source at {p}; its flux is effectively zero")
                        .warn()
                }
                m => debug!("{p}: FUV {m}"),
            }
        }
        display_warnings();

        let results = uv_flux_luminosity_list(&mags, distances, cosmology)?;
        print_results("FUV results", positions, &results);

        if let Some(output) = output {
            let records: Vec<FuvRecord> = positions
                .iter()
                .zip(distances)
                .zip(mags.iter().zip(&results))
                .map(|((p, &d), (m, r))| FuvRecord {
                    ra: p.ra,
                    dec: p.dec,
                    distance_mpc: d,
                    fuv_mag: match m {
                        Magnitude::Measured { mag, .. } => Some(*mag),
                        Magnitude::Missing => None,
                    },
                    fuv_flux: r.flux,
                    fuv_flux_err: r.flux_err,
                    fuv_lum: r.lum,
                    fuv_lum_err: r.lum_err,
                })
                .collect();
            write_records(output, &records)?;
            info!("Wrote {}", output.display());
        }
        Ok(())
    }
}
