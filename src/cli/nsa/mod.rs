// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `nsa-search` and `nsa-summary` subcommands.


use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::common::{write_records, CosmologyArgs, ARG_FILE_HELP, OUTPUT_HELP};
use crate::{
    cosmology::Cosmology,
    nsa::{
        crossed_galaxy_report, emission_line_report, galaxy_101_report, galaxy_report,
        parse_nsaid, read_galaxy_table, search_by_cross_nsaid, search_by_name, search_by_nsaid,
        summarize_crossed_galaxy, summarize_emission_lines, summarize_galaxy, summarize_galaxy_101,
        CrossSide, GalaxyTable, Lookup, ScanMode, Summary, SummaryValue,
        GALAXY_TABLE_TYPES_COMMA_SEPARATED,
    },
    printers::{display_warnings, InfoPrinter, Warn},
    GalphotError,
};

lazy_static::lazy_static! {
    static ref TABLE_HELP: String =
        format!("The NSA galaxy table to search. Supported formats: {}", *GALAXY_TABLE_TYPES_COMMA_SEPARATED);

    static ref CROSS_HELP: String =
        format!("Search a crossed table by the NSAID of this catalog version. Supported versions: {}", CrossVersion::iter().join(", "));

    static ref KIND_HELP: String =
        format!("What to summarise. Supported kinds: {}. Default: {}", SummaryKind::iter().join(", "), SummaryKind::default());
}

/// The NSA versions found on either side of a crossed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
enum CrossVersion {
    #[strum(serialize = "0.1.2")]
    V012,

    #[strum(serialize = "1.0.1")]
    V101,
}

impl From<CrossVersion> for CrossSide {
    fn from(v: CrossVersion) -> CrossSide {
        match v {
            CrossVersion::V012 => CrossSide::First,
            CrossVersion::V101 => CrossSide::Second,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
enum SummaryKind {
    /// An NSA v0.1.2 galaxy.
    #[default]
    #[strum(serialize = "galaxy")]
    Galaxy,

    /// The emission lines of an NSA v0.1.2 galaxy.
    #[strum(serialize = "lines")]
    Lines,

    /// A galaxy in a table crossing NSA v0.1.2 with v1.0.1.
    #[strum(serialize = "crossed")]
    Crossed,

    /// An NSA v1.0.1 galaxy.
    #[strum(serialize = "v1.0.1")]
    V101,
}

/// Which galaxy to look at, and where.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct GalaxySelectArgs {
    #[clap(short, long, parse(from_os_str), help = TABLE_HELP.as_str(), help_heading = "GALAXY")]
    pub(super) table: Option<PathBuf>,

    /// The NSAID of the galaxy.
    #[clap(long, help_heading = "GALAXY")]
    pub(super) nsaid: Option<String>,

    /// The IAU name of the galaxy, e.g. J095641.38+005057.1. Ignored if an
    /// NSAID is given.
    #[clap(long, help_heading = "GALAXY")]
    pub(super) name: Option<String>,

    #[clap(long, help = CROSS_HELP.as_str(), help_heading = "GALAXY")]
    pub(super) cross: Option<String>,

    /// Report a match on the first row of the table. NSA scripts have always
    /// treated the first row as "no match".
    #[clap(long, help_heading = "GALAXY")]
    #[serde(default)]
    pub(super) strict: bool,
}

/// A galaxy selection that makes sense.
#[derive(Debug)]
struct GalaxySelection {
    table: GalaxyTable,
    key: GalaxyKey,
    cross: Option<CrossSide>,
    mode: ScanMode,
}

#[derive(Debug)]
enum GalaxyKey {
    Nsaid(i64),
    Name(String),
}

impl GalaxySelectArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            table: self.table.or(other.table),
            nsaid: self.nsaid.or(other.nsaid),
            name: self.name.or(other.name),
            cross: self.cross.or(other.cross),
            strict: self.strict || other.strict,
        }
    }

    fn parse(self) -> Result<GalaxySelection, GalphotError> {
        let Self {
            table,
            nsaid,
            name,
            cross,
            strict,
        } = self;

        let key = match (nsaid, name) {
            (Some(nsaid), name) => {
                if name.is_some() {
                    "Both an NSAID and a name were given; using the NSAID".warn();
                }
                GalaxyKey::Nsaid(parse_nsaid(&nsaid)?)
            }
            (None, Some(name)) => GalaxyKey::Name(name),
            (None, None) => {
                return Err(GalphotError::Args(
                    "No galaxy was specified; use --nsaid or --name".to_string(),
                ))
            }
        };

        let cross = match cross {
            None => None,
            Some(s) => match CrossVersion::from_str(&s) {
                Ok(v) => Some(CrossSide::from(v)),
                Err(_) => {
                    return Err(GalphotError::Args(format!(
                        "Unrecognised NSA version for --cross: '{s}'. Supported versions: {}",
                        CrossVersion::iter().join(", ")
                    )))
                }
            },
        };
        if cross.is_some() && matches!(key, GalaxyKey::Name(_)) {
            "--cross only applies to NSAID searches; searching IAUNAME".warn();
        }

        let table = match table {
            Some(t) => t,
            None => {
                return Err(GalphotError::Args(
                    "No galaxy table was specified; use --table".to_string(),
                ))
            }
        };
        debug!("Reading galaxy table {}", table.display());
        let table = read_galaxy_table(&table)?;
        info!(
            "Read {} galaxies with {} columns",
            table.num_rows(),
            table.column_names().count()
        );

        Ok(GalaxySelection {
            table,
            key,
            cross,
            mode: if strict {
                ScanMode::Strict
            } else {
                ScanMode::Legacy
            },
        })
    }
}

impl GalaxySelection {
    /// Find the galaxy. A missing galaxy's key is handed back as text.
    fn find(&self) -> Result<Lookup<String>, GalphotError> {
        let lookup = match (&self.key, self.cross) {
            (GalaxyKey::Nsaid(nsaid), None) => {
                search_by_nsaid(&self.table, *nsaid, self.mode)?.map_key(|k| k.to_string())
            }
            (GalaxyKey::Nsaid(nsaid), Some(side)) => {
                search_by_cross_nsaid(&self.table, *nsaid, side, self.mode)?
                    .map_key(|k| k.to_string())
            }
            (GalaxyKey::Name(name), _) => search_by_name(&self.table, name, self.mode)?,
        };
        debug!("Search result: {lookup:?}");
        Ok(lookup)
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct NsaSearchArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "galaxy")]
    #[serde(default)]
    pub(super) select_args: GalaxySelectArgs,
}

impl NsaSearchArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    pub(super) fn merge(self) -> Result<NsaSearchArgs, GalphotError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let NsaSearchArgs {
                args_file: _,
                select_args,
            } = unpack_arg_file!(arg_file);

            Ok(NsaSearchArgs {
                args_file: None,
                select_args: cli_args.select_args.merge(select_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), GalphotError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let selection = self.select_args.parse()?;
        display_warnings();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let row = match selection.find()? {
            Lookup::Found(row) => row,
            Lookup::NotFound(key) => {
                info!("No matches for {key}");
                return Ok(());
            }
        };

        let table = &selection.table;
        let mut printer = InfoPrinter::new(format!("Row {row}").into());
        for name in table.column_names() {
            printer.push_line(format!("{name} : {}", table.display_value(row, name)?).into());
        }
        printer.display();
        Ok(())
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct NsaSummaryArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "galaxy")]
    #[serde(default)]
    pub(super) select_args: GalaxySelectArgs,

    #[clap(short, long, help = KIND_HELP.as_str())]
    pub(super) kind: Option<String>,

    #[clap(flatten)]
    #[serde(rename = "cosmology")]
    #[serde(default)]
    pub(super) cosmology_args: CosmologyArgs,

    #[clap(short, long, parse(from_os_str), help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

/// One row of a summary results file.
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    name: &'static str,
    value: &'a SummaryValue,
}

impl NsaSummaryArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    pub(super) fn merge(self) -> Result<NsaSummaryArgs, GalphotError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let NsaSummaryArgs {
                args_file: _,
                select_args,
                kind,
                cosmology_args,
                output,
            } = unpack_arg_file!(arg_file);

            Ok(NsaSummaryArgs {
                args_file: None,
                select_args: cli_args.select_args.merge(select_args),
                kind: cli_args.kind.or(kind),
                cosmology_args: cli_args.cosmology_args.merge(cosmology_args),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), GalphotError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);

        let Self {
            args_file: _,
            select_args,
            kind,
            cosmology_args,
            output,
        } = self;

        let kind = match kind {
            None => SummaryKind::default(),
            Some(s) => SummaryKind::from_str(&s).map_err(|_| {
                GalphotError::Args(format!(
                    "Unrecognised summary kind: '{s}'. Supported kinds: {}",
                    SummaryKind::iter().join(", ")
                ))
            })?,
        };
        let cosmo = cosmology_args.parse()?;
        let selection = select_args.parse()?;
        display_warnings();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let lookup = selection.find()?;
        let table = &selection.table;
        let row = match (kind, &lookup) {
            (_, Lookup::Found(row)) => *row,
            (SummaryKind::V101, Lookup::NotFound(_)) => {
                for line in galaxy_101_report(table, &lookup, &cosmo)? {
                    info!("{line}");
                }
                return Ok(());
            }
            (_, Lookup::NotFound(key)) => {
                info!("No matches for {key}");
                return Ok(());
            }
        };

        let (report, summary) = summarize(kind, table, row, &cosmo, &lookup)?;
        let mut printer = InfoPrinter::new(format!("{kind} summary of row {row}").into());
        printer.push_block(report.into_iter().map(Into::into).collect());
        printer.push_block(
            summary
                .iter()
                .map(|(name, value)| format!("{name} = {value}").into())
                .collect(),
        );
        printer.display();

        if let Some(output) = output {
            let records: Vec<SummaryRecord> = summary
                .iter()
                .map(|(name, value)| SummaryRecord { name, value })
                .collect();
            write_records(&output, &records)?;
            info!("Wrote {}", output.display());
        }
        Ok(())
    }
}

/// The report lines and summary of a found galaxy.
fn summarize(
    kind: SummaryKind,
    table: &GalaxyTable,
    row: usize,
    cosmo: &Cosmology,
    lookup: &Lookup<String>,
) -> Result<(Vec<String>, Summary), GalphotError> {
    let pair = match kind {
        SummaryKind::Galaxy => (
            galaxy_report(table, row, cosmo),
            summarize_galaxy(table, row, cosmo)?,
        ),
        SummaryKind::Lines => (
            emission_line_report(table, row)?,
            summarize_emission_lines(table, row)?,
        ),
        SummaryKind::Crossed => (
            crossed_galaxy_report(table, row, cosmo)?,
            summarize_crossed_galaxy(table, row, cosmo)?,
        ),
        SummaryKind::V101 => (
            galaxy_101_report(table, lookup, cosmo)?,
            summarize_galaxy_101(table, row, cosmo)?,
        ),
    };
    Ok(pair)
}
