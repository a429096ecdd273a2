// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to query astronomical catalogs by sky position.
//!
//! Cone searches go to IRSA's TAP service, "object" searches go to MAST. Query
//! results are small tables whose columns are addressed by name.

mod error;
mod irsa;
mod mast;
mod preloaded;
#[cfg(test)]
mod tests;

pub use error::QueryError;
pub use irsa::IrsaClient;
pub use mast::MastClient;
pub use preloaded::PreloadedCatalogs;

use std::{cmp::Ordering, fmt::Display, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_IRSA_TAP_URL, DEFAULT_MAST_INVOKE_URL, DEFAULT_MAST_RADIUS_DEG,
        DEFAULT_QUERY_TIMEOUT_SECS,
    },
    coord::SkyPosition,
};

/// Anything that can answer catalog queries.
pub trait CatalogService {
    /// Get all rows of `catalog` within `radius_arcmin` of `position`. The
    /// result has an extra "dist" column, the separation from `position`
    /// \[arcsec\], and rows are sorted by it.
    fn query_region(
        &self,
        catalog: &str,
        position: SkyPosition,
        radius_arcmin: f64,
    ) -> Result<CatalogTable, QueryError>;

    /// Get the rows of `catalog` around an object. The object is given as a
    /// string, e.g. "150.1 2.2".
    fn query_object(&self, catalog: &str, object: &str) -> Result<CatalogTable, QueryError>;
}

/// Where the remote catalog services live and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub irsa_tap_url: String,
    pub mast_invoke_url: String,

    /// The cone radius used for object queries at MAST \[degrees\]
    pub mast_radius_deg: f64,

    /// How many times to ask MAST for results that are still being computed.
    pub mast_max_polls: u32,

    pub timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            irsa_tap_url: DEFAULT_IRSA_TAP_URL.to_string(),
            mast_invoke_url: DEFAULT_MAST_INVOKE_URL.to_string(),
            mast_radius_deg: DEFAULT_MAST_RADIUS_DEG,
            mast_max_polls: 30,
            timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
        }
    }
}

/// The remote catalog services: IRSA for cone searches and MAST for object
/// searches.
pub struct RemoteCatalogs {
    irsa: IrsaClient,
    mast: MastClient,
}

impl RemoteCatalogs {
    pub fn new(config: &QueryConfig) -> Result<RemoteCatalogs, QueryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("galphot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(QueryError::Client)?;
        Ok(RemoteCatalogs {
            irsa: IrsaClient::new(client.clone(), &config.irsa_tap_url),
            mast: MastClient::new(
                client,
                &config.mast_invoke_url,
                config.mast_radius_deg,
                config.mast_max_polls,
            ),
        })
    }
}

impl CatalogService for RemoteCatalogs {
    fn query_region(
        &self,
        catalog: &str,
        position: SkyPosition,
        radius_arcmin: f64,
    ) -> Result<CatalogTable, QueryError> {
        self.irsa.cone_search(catalog, position, radius_arcmin)
    }

    fn query_object(&self, catalog: &str, object: &str) -> Result<CatalogTable, QueryError> {
        self.mast.query_object(catalog, object)
    }
}

/// A single value in a catalog query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Float(f64),
    Int(i64),
    Text(String),
    /// The catalog has no value here.
    Masked,
}

impl Cell {
    /// Interpret text from a delimited table. Empty fields are masked.
    pub(crate) fn parse(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("null") {
            Cell::Masked
        } else if let Ok(i) = s.parse::<i64>() {
            Cell::Int(i)
        } else if let Ok(f) = s.parse::<f64>() {
            Cell::Float(f)
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// The value as a float. Masked cells, NaNs and text are `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(f) if !f.is_nan() => Some(*f),
            Cell::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_masked(&self) -> bool {
        match self {
            Cell::Masked => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Text(v) => write!(f, "{v}"),
            Cell::Masked => write!(f, "--"),
        }
    }
}

/// A table returned by a catalog query. Columns are ordered and named.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl CatalogTable {
    pub fn new(columns: Vec<String>) -> CatalogTable {
        CatalogTable {
            columns,
            rows: vec![],
        }
    }

    /// Add a row. It must have as many cells as there are columns.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), QueryError> {
        if row.len() != self.columns.len() {
            return Err(QueryError::RaggedRow {
                row: self.rows.len(),
                got: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Find a column by name. Exact matches are preferred, but catalog
    /// services aren't consistent with case, so a case-insensitive match is
    /// also accepted.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(name)))
    }

    /// Get a cell by row index and column name. `None` if the row doesn't
    /// exist; an error if the column doesn't.
    pub fn get(&self, row: usize, column: &str) -> Result<Option<&Cell>, QueryError> {
        let i_col = self
            .column_index(column)
            .ok_or_else(|| QueryError::MissingColumn(column.to_string()))?;
        Ok(self.rows.get(row).map(|r| &r[i_col]))
    }

    /// Sort the rows by a numeric column, smallest first. Rows where it is
    /// masked go last; ties keep their order.
    pub fn sort_by_column(&mut self, column: &str) -> Result<(), QueryError> {
        let i_col = self
            .column_index(column)
            .ok_or_else(|| QueryError::MissingColumn(column.to_string()))?;
        self.rows
            .sort_by(|a, b| match (a[i_col].as_f64(), b[i_col].as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        Ok(())
    }

    /// Read a table from CSV text with a header row, e.g. a catalog extract
    /// saved to disk. Empty fields are masked.
    pub fn from_csv(body: &str) -> Result<CatalogTable, QueryError> {
        irsa::parse_csv_table(body, "CSV file")
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }
}
