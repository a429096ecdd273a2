// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Catalogs held in memory, for offline use and testing.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::{CatalogService, CatalogTable, Cell, QueryError};
use crate::{constants::DEFAULT_MAST_RADIUS_DEG, coord::SkyPosition};

const SERVICE: &str = "preloaded catalogs";

/// Catalog tables that answer queries without a network. Each table needs
/// "ra" and "dec" columns \[degrees\].
#[derive(Debug, Clone)]
pub struct PreloadedCatalogs {
    tables: HashMap<String, CatalogTable>,
    unavailable: HashSet<String>,
    object_radius_deg: f64,
}

impl Default for PreloadedCatalogs {
    fn default() -> Self {
        PreloadedCatalogs {
            tables: HashMap::new(),
            unavailable: HashSet::new(),
            object_radius_deg: DEFAULT_MAST_RADIUS_DEG,
        }
    }
}

impl PreloadedCatalogs {
    pub fn new() -> PreloadedCatalogs {
        PreloadedCatalogs::default()
    }

    pub fn with_table(mut self, catalog: &str, table: CatalogTable) -> PreloadedCatalogs {
        self.tables.insert(catalog.to_string(), table);
        self
    }

    /// The cone radius used to answer object queries \[degrees\]
    pub fn with_object_radius(mut self, radius_deg: f64) -> PreloadedCatalogs {
        self.object_radius_deg = radius_deg;
        self
    }

    /// Make every query against `catalog` fail, as if the service were down.
    pub fn with_unavailable(mut self, catalog: &str) -> PreloadedCatalogs {
        self.unavailable.insert(catalog.to_string());
        self
    }

    /// Rows of `catalog` within `radius_deg` of `position`, closest first,
    /// along with their separations \[degrees\].
    fn cone(
        &self,
        catalog: &str,
        position: SkyPosition,
        radius_deg: f64,
    ) -> Result<(CatalogTable, Vec<f64>), QueryError> {
        if self.unavailable.contains(catalog) {
            return Err(QueryError::Status {
                service: SERVICE,
                status: 503,
            });
        }
        let table = self
            .tables
            .get(catalog)
            .ok_or_else(|| QueryError::UnknownCatalog(catalog.to_string()))?;
        let i_ra = table
            .column_index("ra")
            .ok_or_else(|| QueryError::MissingColumn("ra".to_string()))?;
        let i_dec = table
            .column_index("dec")
            .ok_or_else(|| QueryError::MissingColumn("dec".to_string()))?;

        let mut matches: Vec<(f64, &[Cell])> = table
            .rows()
            .filter_map(|row| {
                let ra = row[i_ra].as_f64()?;
                let dec = row[i_dec].as_f64()?;
                let sep = position.separation(&SkyPosition::new(ra, dec));
                (sep <= radius_deg).then_some((sep, row))
            })
            .collect();
        matches.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut result = CatalogTable::new(table.columns().to_vec());
        let mut separations = Vec::with_capacity(matches.len());
        for (sep, row) in matches {
            result.push_row(row.to_vec())?;
            separations.push(sep);
        }
        debug!("{catalog}: {} preloaded rows near {position}", result.len());
        Ok((result, separations))
    }
}

impl CatalogService for PreloadedCatalogs {
    fn query_region(
        &self,
        catalog: &str,
        position: SkyPosition,
        radius_arcmin: f64,
    ) -> Result<CatalogTable, QueryError> {
        let (table, separations) = self.cone(catalog, position, radius_arcmin / 60.0)?;

        let mut columns = table.columns().to_vec();
        columns.push("dist".to_string());
        let mut with_dist = CatalogTable::new(columns);
        for (row, sep) in table.rows().zip(separations) {
            let mut row = row.to_vec();
            row.push(Cell::Float(sep * 3600.0));
            with_dist.push_row(row)?;
        }
        Ok(with_dist)
    }

    fn query_object(&self, catalog: &str, object: &str) -> Result<CatalogTable, QueryError> {
        let position = SkyPosition::parse_object_string(object)
            .ok_or_else(|| QueryError::UnresolvedObject(object.to_string()))?;
        let (table, _) = self.cone(catalog, position, self.object_radius_deg)?;
        Ok(table)
    }
}
