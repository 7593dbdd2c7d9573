//! Guest table behind a PostgREST-style HTTP API.
//!
//! Endpoints, relative to `<url>/rest/v1/<table>`:
//!
//! | operation  | request                                                  |
//! |------------|----------------------------------------------------------|
//! | select all | `GET ?select=*&order=created_at.asc,id.asc`              |
//! | insert     | `POST` with `Prefer: return=representation`, JSON array  |
//! | delete     | `DELETE ?id=eq.<id>`                                     |
//! | update     | `PATCH ?id=eq.<id>`, JSON object                         |

use super::{GuestInsert, GuestRow, GuestTable, GuestUpdate, TableError};
use crate::model::GuestId;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`RestTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub url: String,
    pub table: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RestTable {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
}

impl RestTable {
    #[must_use]
    pub fn new(config: &RestConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(concat!("vows/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            endpoint: endpoint(&config.url, &config.table),
            api_key: config.api_key.clone(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, url)
            .set("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request
                .set("apikey", key)
                .set("Authorization", &format!("Bearer {key}"));
        }
        request
    }

    fn row_url(&self, id: GuestId) -> String {
        format!("{}?id=eq.{id}", self.endpoint)
    }
}

fn endpoint(url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", url.trim_end_matches('/'), table)
}

fn request_error(url: &str, err: ureq::Error) -> TableError {
    match err {
        ureq::Error::Status(status, response) => TableError::Status {
            url: url.to_string(),
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => TableError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

fn decode<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, TableError> {
    response.into_json::<T>().map_err(|err| TableError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

impl GuestTable for RestTable {
    fn select_all(&mut self) -> Result<Vec<GuestRow>, TableError> {
        let url = format!("{}?select=*&order=created_at.asc,id.asc", self.endpoint);
        let response = self
            .request("GET", &url)
            .call()
            .map_err(|err| request_error(&url, err))?;
        let rows: Vec<GuestRow> = decode(&url, response)?;
        debug!(count = rows.len(), "fetched guest rows");
        Ok(rows)
    }

    fn insert(&mut self, rows: &[GuestInsert]) -> Result<Vec<GuestRow>, TableError> {
        let url = self.endpoint.clone();
        let response = self
            .request("POST", &url)
            .set("Prefer", "return=representation")
            .send_json(rows)
            .map_err(|err| request_error(&url, err))?;
        let inserted: Vec<GuestRow> = decode(&url, response)?;
        if inserted.len() != rows.len() {
            return Err(TableError::RowCountMismatch {
                requested: rows.len(),
                returned: inserted.len(),
            });
        }
        Ok(inserted)
    }

    fn delete(&mut self, id: GuestId) -> Result<(), TableError> {
        let url = self.row_url(id);
        self.request("DELETE", &url)
            .call()
            .map_err(|err| request_error(&url, err))?;
        Ok(())
    }

    fn update(&mut self, id: GuestId, update: &GuestUpdate) -> Result<(), TableError> {
        let url = self.row_url(id);
        self.request("PATCH", &url)
            .send_json(update)
            .map_err(|err| request_error(&url, err))?;
        Ok(())
    }
}
