// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cone searches against IRSA's TAP service.

use log::{debug, trace};
use reqwest::blocking::Client;

use super::{CatalogTable, Cell, QueryError};
use crate::coord::SkyPosition;

const SERVICE: &str = "IRSA";

pub struct IrsaClient {
    client: Client,
    tap_url: String,
}

impl IrsaClient {
    pub(super) fn new(client: Client, tap_url: &str) -> IrsaClient {
        IrsaClient {
            client,
            tap_url: tap_url.to_string(),
        }
    }

    /// Run a synchronous ADQL cone search. The result carries every catalog
    /// column plus "dist", the separation from `position` \[arcsec\].
    pub fn cone_search(
        &self,
        catalog: &str,
        position: SkyPosition,
        radius_arcmin: f64,
    ) -> Result<CatalogTable, QueryError> {
        let adql = cone_search_adql(catalog, position, radius_arcmin);
        debug!("Querying {SERVICE} {catalog} around {position}");
        trace!("ADQL: {adql}");

        let response = self
            .client
            .get(&self.tap_url)
            .query(&[
                ("REQUEST", "doQuery"),
                ("LANG", "ADQL"),
                ("FORMAT", "csv"),
                ("QUERY", adql.as_str()),
            ])
            .send()
            .map_err(|source| QueryError::Network {
                service: SERVICE,
                source,
            })?;
        if !response.status().is_success() {
            return Err(QueryError::Status {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }
        let body = response.text().map_err(|source| QueryError::Network {
            service: SERVICE,
            source,
        })?;

        let table = parse_csv_table(&body, SERVICE)?;
        debug!("{SERVICE} returned {} rows", table.len());
        Ok(table)
    }
}

/// Write the ADQL for a cone search that also reports the separation of each
/// row from the cone centre.
pub(super) fn cone_search_adql(catalog: &str, position: SkyPosition, radius_arcmin: f64) -> String {
    let SkyPosition { ra, dec } = position;
    let radius_deg = radius_arcmin / 60.0;
    format!(
        "SELECT t.*, DISTANCE(POINT('ICRS', t.ra, t.dec), POINT('ICRS', {ra}, {dec})) * 3600.0 AS dist \
         FROM {catalog} AS t \
         WHERE CONTAINS(POINT('ICRS', t.ra, t.dec), CIRCLE('ICRS', {ra}, {dec}, {radius_deg})) = 1 \
         ORDER BY dist"
    )
}

/// Parse a CSV table with a header row. Empty fields are masked.
pub(super) fn parse_csv_table(
    body: &str,
    service: &'static str,
) -> Result<CatalogTable, QueryError> {
    let parse_err = |e: csv::Error| QueryError::Parse {
        service,
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let columns = reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = CatalogTable::new(columns);
    for record in reader.records() {
        let record = record.map_err(parse_err)?;
        table.push_row(record.iter().map(Cell::parse).collect())?;
    }
    Ok(table)
}
