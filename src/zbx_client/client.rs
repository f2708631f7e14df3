use std::fmt::Write as FmtWrite;
use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::Result;
use crate::config::Config;
use crate::error::{Error, ZbxError};

use super::rpc::{RpcEnvelope, RpcRequest, body_preview};

const CORRELATION_HEADER: &str = "x-correlation-id";

/// Handle on one Zabbix server's JSON-RPC endpoint.
///
/// Cloning is cheap; the underlying HTTP client is reference counted, so a
/// single handle can be shared across factories and entities.
#[derive(Clone)]
pub struct ZbxClient {
    http: reqwest::Client,
    base: Url,
    token: SecretString,
}

impl std::fmt::Debug for ZbxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZbxClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ZbxClient {
    /// Build a `ZbxClient` configured with the supplied parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTPS is required but the URL uses HTTP, or if
    /// the underlying HTTP client fails to build.
    pub fn new(
        base: Url,
        token: SecretString,
        timeout: Duration,
        connect_timeout: Duration,
        insecure_http: bool,
    ) -> Result<Self> {
        if base.scheme() != "https" && !insecure_http {
            return Err(Error::Config(crate::error::ConfigError::InvalidField {
                field: "zabbix.url",
                message: "only https URLs are accepted without insecure_http".to_string(),
            }));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json-rpc"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent(concat!("zabbix-objects/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(30));

        if !insecure_http {
            builder = builder.https_only(true);
        }

        let http = builder
            .build()
            .map_err(|err| ZbxError::Client { source: err })?;

        Ok(Self { http, base, token })
    }

    /// Build a `ZbxClient` from loaded configuration.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ZbxClient::new`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.token.clone(),
            config.http_request_timeout,
            config.http_connect_timeout,
            config.insecure_http,
        )
    }

    /// Invoke one remote API method and decode the `result` member.
    ///
    /// Every call is a single fresh round trip. Transport failures, HTTP
    /// error statuses, undecodable bodies, and JSON-RPC error envelopes
    /// all surface to the caller unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ZbxError`] variant describing the failing layer.
    pub async fn call<T>(&self, method: &str, params: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let correlation_id = Uuid::now_v7().to_string();
        let started = Instant::now();
        let payload = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
            auth: self.token.expose_secret(),
        };

        let response = self
            .http
            .post(self.base.clone())
            .header(CORRELATION_HEADER, &correlation_id)
            .json(&payload)
            .send()
            .await
            .map_err(ZbxError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZbxError::HttpStatus { status }.into());
        }

        let body = response.bytes().await.map_err(ZbxError::from)?;
        let envelope: RpcEnvelope<T> = serde_json::from_slice(&body).map_err(|err| {
            let preview = body_preview(&body);
            let mut message = format!("error decoding response body: {err}; body preview: ");
            let _ = FmtWrite::write_str(&mut message, &preview);
            ZbxError::Json { message }
        })?;

        if let Some(err) = envelope.error {
            let mut message = err.message;
            if let Some(data) = err.data {
                let _ = FmtWrite::write_fmt(&mut message, format_args!(" ({data})"));
            }
            return Err(ZbxError::Api {
                code: err.code,
                message,
            }
            .into());
        }

        let Some(result) = envelope.result else {
            return Err(ZbxError::MissingField { field: "result" }.into());
        };

        debug!(
            method,
            %correlation_id,
            latency_ms = started.elapsed().as_millis(),
            "zabbix call succeeded"
        );
        Ok(result)
    }
}
