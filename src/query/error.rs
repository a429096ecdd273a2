// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Errors associated with querying a remote (or preloaded) catalog.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Couldn't set up an HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {service} failed: {source}")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} responded with HTTP status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} reported an error: {message}")]
    Service {
        service: &'static str,
        message: String,
    },

    #[error("Couldn't parse the response from {service}: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    #[error("{service} was still busy after {polls} polls")]
    Incomplete { service: &'static str, polls: u32 },

    #[error("The catalog '{0}' is not available from this service")]
    UnknownCatalog(String),

    #[error("Couldn't interpret '{0}' as a sky position (expected \"<ra> <dec>\" in degrees)")]
    UnresolvedObject(String),

    #[error("Column '{0}' is not in the query result")]
    MissingColumn(String),

    #[error("Row {row} of the query result has {got} cells, but there are {expected} columns")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
}
