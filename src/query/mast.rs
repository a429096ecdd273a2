// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Catalog queries against the MAST "invoke" API.
//! <https://mast.stsci.edu/api/v0/>

use std::time::Duration;

use log::{debug, trace};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{CatalogTable, Cell, QueryError};
use crate::coord::SkyPosition;

const SERVICE: &str = "MAST";

/// The separation of each result from the search position.
const DISTANCE_COLUMN: &str = "distance";

/// How long to wait between polls of a MAST request that is still executing.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct MastClient {
    client: Client,
    invoke_url: String,
    radius_deg: f64,
    max_polls: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct MastResponse {
    pub(super) status: String,
    #[serde(default)]
    pub(super) msg: String,
    #[serde(default)]
    pub(super) fields: Vec<MastField>,
    #[serde(default)]
    pub(super) data: Vec<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MastField {
    pub(super) name: String,
}

impl MastClient {
    pub(super) fn new(client: Client, invoke_url: &str, radius_deg: f64, max_polls: u32) -> MastClient {
        MastClient {
            client,
            invoke_url: invoke_url.to_string(),
            radius_deg,
            max_polls,
        }
    }

    /// Query a MAST catalog around an object. Only positions ("<ra> <dec>")
    /// are understood; names aren't resolved.
    pub fn query_object(&self, catalog: &str, object: &str) -> Result<CatalogTable, QueryError> {
        let position = SkyPosition::parse_object_string(object)
            .ok_or_else(|| QueryError::UnresolvedObject(object.to_string()))?;
        let request = json!({
            "service": format!("Mast.{catalog}.Catalog"),
            "params": {
                "ra": position.ra,
                "dec": position.dec,
                "radius": self.radius_deg,
            },
            "format": "json",
            "page": 1,
            "pagesize": 2000,
        });
        debug!("Querying {SERVICE} {catalog} around {position}");
        trace!("Request: {request}");

        for poll in 0..self.max_polls.max(1) {
            if poll > 0 {
                std::thread::sleep(POLL_INTERVAL);
            }
            let response = self
                .client
                .post(&self.invoke_url)
                .form(&[("request", request.to_string())])
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
            let response: MastResponse =
                serde_json::from_str(&body).map_err(|e| QueryError::Parse {
                    service: SERVICE,
                    message: e.to_string(),
                })?;

            match response.status.as_str() {
                "COMPLETE" => {
                    let table = response_to_table(response)?;
                    debug!("{SERVICE} returned {} rows", table.len());
                    return Ok(table);
                }
                "EXECUTING" => trace!("{SERVICE} is still executing the request"),
                _ => {
                    return Err(QueryError::Service {
                        service: SERVICE,
                        message: format!("{}: {}", response.status, response.msg),
                    })
                }
            }
        }

        Err(QueryError::Incomplete {
            service: SERVICE,
            polls: self.max_polls,
        })
    }
}

/// Convert a MAST JSON response into a table. Columns follow the order of the
/// response's "fields"; JSON nulls are masked. Rows are put in order of their
/// "distance" from the search position when the response has one.
pub(super) fn response_to_table(response: MastResponse) -> Result<CatalogTable, QueryError> {
    let columns: Vec<String> = response.fields.into_iter().map(|f| f.name).collect();
    let mut table = CatalogTable::new(columns.clone());
    for record in response.data {
        let row = columns
            .iter()
            .map(|c| match record.get(c) {
                None | Some(Value::Null) => Cell::Masked,
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(i) => Cell::Int(i),
                    None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Masked),
                },
                Some(Value::String(s)) => Cell::Text(s.clone()),
                Some(Value::Bool(b)) => Cell::Int(i64::from(*b)),
                Some(other) => Cell::Text(other.to_string()),
            })
            .collect();
        table.push_row(row)?;
    }
    if table.column_index(DISTANCE_COLUMN).is_some() {
        table.sort_by_column(DISTANCE_COLUMN)?;
    }
    Ok(table)
}
