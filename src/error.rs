use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error(transparent)]
    Zabbix(#[from] ZbxError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Failures of the exactly-one lookup contract.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{entity} name cannot be empty")]
    EmptyName { entity: &'static str },
    #[error("no {entity} matched {selector}")]
    NotFound {
        entity: &'static str,
        selector: String,
    },
    #[error("{count} {entity} records matched {selector}, expected exactly one")]
    Ambiguous {
        entity: &'static str,
        selector: String,
        count: usize,
    },
}

/// A remote record that cannot back an entity.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("record is missing identifier field {field}")]
    MissingIdentifier { field: &'static str },
    #[error("invalid identifier in field {field}: {message}")]
    InvalidIdentifier {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum ZbxError {
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: reqwest::StatusCode },
    #[error("invalid JSON payload: {message}")]
    Json { message: String },
    #[error("Zabbix API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("missing field in API response: {field}")]
    MissingField { field: &'static str },
}

impl From<reqwest::Error> for ZbxError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_status() {
            if let Some(status) = source.status() {
                return Self::HttpStatus { status };
            }
        }
        Self::Request { source }
    }
}

impl Error {
    /// True when the failure came from the remote side rather than from
    /// local validation of names, records, or configuration.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Zabbix(_))
    }
}
