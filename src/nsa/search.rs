// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding galaxies in a table by identifier.

use log::trace;

use super::{Column, GalaxyTable, NsaError};

/// How rows are matched against a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// NSA scripts have always treated row 0 as "no match": a match there is
    /// reported as [`Lookup::NotFound`], and with duplicate keys the first
    /// match after row 0 wins.
    #[default]
    Legacy,

    /// The first matching row, whatever it is.
    Strict,
}

/// The outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<K> {
    Found(usize),

    /// Nothing matched; the key is handed back unchanged.
    NotFound(K),
}

impl<K> Lookup<K> {
    pub fn row(&self) -> Option<usize> {
        match self {
            Lookup::Found(row) => Some(*row),
            Lookup::NotFound(_) => None,
        }
    }

    pub fn map_key<L>(self, f: impl FnOnce(K) -> L) -> Lookup<L> {
        match self {
            Lookup::Found(row) => Lookup::Found(row),
            Lookup::NotFound(key) => Lookup::NotFound(f(key)),
        }
    }
}

/// Which NSAID column of a crossed v0.1.2/v1.0.1 table to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossSide {
    /// NSA v0.1.2 (`NSAID_1`).
    First,

    /// NSA v1.0.1 (`NSAID_2`).
    Second,
}

impl CrossSide {
    pub fn column(self) -> &'static str {
        match self {
            CrossSide::First => "NSAID_1",
            CrossSide::Second => "NSAID_2",
        }
    }
}

/// Parse an NSAID given as text, e.g. from the command line.
pub fn parse_nsaid(s: &str) -> Result<i64, NsaError> {
    s.trim()
        .parse()
        .map_err(|_| NsaError::InvalidNsaid(s.to_string()))
}

fn scan<K>(key: K, mode: ScanMode, num_rows: usize, is_match: impl Fn(usize) -> bool) -> Lookup<K> {
    let first = match mode {
        ScanMode::Legacy => (0..num_rows).find(|&i| i != 0 && is_match(i)),
        ScanMode::Strict => (0..num_rows).find(|&i| is_match(i)),
    };
    match first {
        Some(row) => Lookup::Found(row),
        None => Lookup::NotFound(key),
    }
}

fn search_int_column(
    table: &GalaxyTable,
    column: &str,
    nsaid: i64,
    mode: ScanMode,
) -> Result<Lookup<i64>, NsaError> {
    let lookup = match table.column(column)? {
        Column::Int(ids) => scan(nsaid, mode, ids.len(), |i| ids[i] == nsaid),
        // NSAIDs read from some tables arrive as floats.
        Column::Float(ids) => scan(nsaid, mode, ids.len(), |i| ids[i] == nsaid as f64),
        _ => {
            return Err(NsaError::ColumnType {
                column: column.to_string(),
                expected: "integer",
            })
        }
    };
    trace!("{column} {nsaid}: {lookup:?}");
    Ok(lookup)
}

/// Find a galaxy by its `NSAID`.
pub fn search_by_nsaid(
    table: &GalaxyTable,
    nsaid: i64,
    mode: ScanMode,
) -> Result<Lookup<i64>, NsaError> {
    search_int_column(table, "NSAID", nsaid, mode)
}

/// Find a galaxy in a crossed table by the NSAID of one of its sides.
pub fn search_by_cross_nsaid(
    table: &GalaxyTable,
    nsaid: i64,
    side: CrossSide,
    mode: ScanMode,
) -> Result<Lookup<i64>, NsaError> {
    search_int_column(table, side.column(), nsaid, mode)
}

/// Find a galaxy by its `IAUNAME`. Names are compared exactly.
pub fn search_by_name(
    table: &GalaxyTable,
    name: &str,
    mode: ScanMode,
) -> Result<Lookup<String>, NsaError> {
    let names = match table.column("IAUNAME")? {
        Column::Text(names) => names,
        _ => {
            return Err(NsaError::ColumnType {
                column: "IAUNAME".to_string(),
                expected: "text",
            })
        }
    };
    let lookup = scan(name.to_string(), mode, names.len(), |i| names[i] == name);
    trace!("IAUNAME {name}: {lookup:?}");
    Ok(lookup)
}
