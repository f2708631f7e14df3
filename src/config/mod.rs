use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::error::Error;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for one Zabbix server.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub token: SecretString,
    pub http_request_timeout: Duration,
    pub http_connect_timeout: Duration,
    pub insecure_http: bool,
}

impl Config {
    /// Load configuration from a TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be read or
    /// parsed, when environment overrides are invalid, or when the
    /// resulting values fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(Error::from)?;
        raw.apply_env_overrides().map_err(Error::from)?;
        raw.validate_and_build()
    }
}
