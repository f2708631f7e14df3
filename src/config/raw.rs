use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;
use url::Url;

use crate::Result;
use crate::error::ConfigError;

use super::defaults::{default_connect_timeout, default_request_timeout};
use super::env::{env_bool, env_duration, env_string};
use super::{Config, HumantimeDuration};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("ZBX_OBJECTS")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) zabbix: RawZabbix,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawZabbix {
    pub(super) url: Option<String>,
    pub(super) token: Option<String>,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) request_timeout: Duration,
    #[serde(default = "default_connect_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) connect_timeout: Duration,
    #[serde(default)]
    pub(super) insecure_http: bool,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(url) = env_string("ZBX_URL")? {
            self.zabbix.url = Some(url);
        }
        if let Some(token) = env_string("ZBX_TOKEN")? {
            self.zabbix.token = Some(token);
        }
        if let Some(timeout) = env_duration("ZBX_HTTP_TIMEOUT")? {
            self.zabbix.request_timeout = timeout;
        }
        if let Some(timeout) = env_duration("ZBX_CONNECT_TIMEOUT")? {
            self.zabbix.connect_timeout = timeout;
        }
        if let Some(insecure) = env_bool("ZBX_INSECURE_HTTP")? {
            self.zabbix.insecure_http = insecure;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let url_str = self.zabbix.url.ok_or(ConfigError::MissingField {
            field: "zabbix.url",
        })?;
        let token = self.zabbix.token.ok_or(ConfigError::MissingField {
            field: "zabbix.token",
        })?;
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.token",
                message: "token cannot be empty".to_string(),
            }
            .into());
        }
        let base_url = Url::parse(&url_str).map_err(|err| ConfigError::InvalidField {
            field: "zabbix.url",
            message: err.to_string(),
        })?;

        if self.zabbix.request_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.request_timeout",
                message: "request timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.zabbix.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.connect_timeout",
                message: "connect timeout must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(Config {
            base_url,
            token: token.into(),
            http_request_timeout: self.zabbix.request_timeout,
            http_connect_timeout: self.zabbix.connect_timeout,
            insecure_http: self.zabbix.insecure_http,
        })
    }
}

impl Default for RawZabbix {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            insecure_http: false,
        }
    }
}
