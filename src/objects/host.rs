use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::Result;
use crate::error::{Error, LookupError, ZbxError};
use crate::record::Record;
use crate::zbx_client::ZbxClient;

use super::{exactly_one, require_name};

const ENTITY: &str = "host";

/// One monitored host, as returned by `host.get`.
///
/// The identifier is extracted and fixed at construction; [`Host::refresh`]
/// re-reads the remaining fields but never changes it.
#[derive(Clone, Debug)]
pub struct Host {
    client: ZbxClient,
    record: Record,
    hostid: u64,
}

impl Host {
    pub(crate) fn from_record(client: ZbxClient, record: Record) -> Result<Self> {
        let hostid = record.require_id("hostid")?;
        Ok(Self {
            client,
            record,
            hostid,
        })
    }

    #[must_use]
    pub fn hostid(&self) -> u64 {
        self.hostid
    }

    /// Technical host name (the `host` field).
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.record.str_field("host")
    }

    /// Visible display name (the `name` field).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.record.str_field("name")
    }

    #[must_use]
    pub fn status(&self) -> Option<i64> {
        self.record.i64_field("status")
    }

    /// True when the host status is 0 (monitored).
    #[must_use]
    pub fn is_monitored(&self) -> bool {
        self.status() == Some(0)
    }

    /// Any other field the server returned for this host.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Re-read this host's fields from the server. The identifier is
    /// immutable; only the snapshot is replaced.
    ///
    /// # Errors
    ///
    /// `NotFound` when the host no longer exists, or a remote error.
    pub async fn refresh(&mut self) -> Result<()> {
        let params = json!({
            "output": "extend",
            "hostids": [self.hostid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("host.get", params).await?;
        self.record = exactly_one(rows, ENTITY, format!("hostid {}", self.hostid))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreatedHosts {
    hostids: Vec<String>,
}

/// Looks up hosts and builds [`Host`] values.
#[derive(Clone, Debug)]
pub struct HostFactory {
    client: ZbxClient,
}

impl HostFactory {
    #[must_use]
    pub fn new(client: ZbxClient) -> Self {
        Self { client }
    }

    /// Build a [`Host`] from a raw record, validating its identifier.
    ///
    /// # Errors
    ///
    /// `MissingIdentifier`/`InvalidIdentifier` when the record has no
    /// usable `hostid`.
    pub fn make(&self, record: Record) -> Result<Host> {
        Host::from_record(self.client.clone(), record)
    }

    /// Look up the single host whose technical name equals `name`.
    ///
    /// # Errors
    ///
    /// `EmptyName` for blank input, `NotFound` when no host matches,
    /// `Ambiguous` when several do, or a remote error.
    pub async fn get_by_name(&self, name: &str) -> Result<Host> {
        require_name(name, ENTITY)?;
        let params = json!({
            "output": "extend",
            "filter": {"host": name},
        });
        let rows: Vec<Record> = self.client.call("host.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("name {name:?}"))?;
        self.make(record)
    }

    /// Look up one host by its identifier.
    pub async fn get_by_id(&self, hostid: u64) -> Result<Host> {
        let params = json!({
            "output": "extend",
            "hostids": [hostid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("host.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("hostid {hostid}"))?;
        self.make(record)
    }

    /// All hosts matching an arbitrary `host.get` filter object.
    pub async fn get_by_filter(&self, filter: Value) -> Result<Vec<Host>> {
        let params = json!({
            "output": "extend",
            "filter": filter,
        });
        let rows: Vec<Record> = self.client.call("host.get", params).await?;
        rows.into_iter().map(|row| self.make(row)).collect()
    }

    /// Wildcard search on technical host names.
    pub async fn search(&self, pattern: &str) -> Result<Vec<Host>> {
        require_name(pattern, ENTITY)?;
        let params = json!({
            "output": "extend",
            "search": {"host": pattern},
            "searchWildcardsEnabled": true,
        });
        let rows: Vec<Record> = self.client.call("host.get", params).await?;
        rows.into_iter().map(|row| self.make(row)).collect()
    }

    /// Create a host from a `host.create` definition object and return the
    /// entity built from the id the server assigned.
    ///
    /// # Errors
    ///
    /// `EmptyName` when the definition lacks a technical name, a remote
    /// error, or `MissingField` when the response carries no id.
    pub async fn create(&self, definition: Value) -> Result<Host> {
        let technical_name = definition.get("host").and_then(Value::as_str);
        if technical_name.is_none_or(|name| name.trim().is_empty()) {
            return Err(LookupError::EmptyName { entity: ENTITY }.into());
        }
        let created: CreatedHosts = self.client.call("host.create", definition).await?;
        let hostid = created
            .hostids
            .into_iter()
            .next()
            .ok_or(ZbxError::MissingField { field: "hostids" })?;
        let mut record = Record::new();
        record.insert("hostid", Value::String(hostid));
        self.make(record)
    }

    /// Resolve several names concurrently, at most `concurrency` lookups
    /// in flight. Results are positional; `None` marks names with no
    /// match. Ambiguous matches and remote failures still fail the call.
    pub async fn get_by_names(
        &self,
        names: &[String],
        concurrency: usize,
    ) -> Result<Vec<Option<Host>>> {
        let concurrency = concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks: JoinSet<(usize, Result<Option<Host>>)> = JoinSet::new();

        for (idx, name) in names.iter().cloned().enumerate() {
            let factory = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let permit = semaphore.acquire_owned().await;
                let _permit = match permit {
                    Ok(p) => p,
                    Err(_) => return (idx, Ok(None)),
                };
                let res = match factory.get_by_name(&name).await {
                    Ok(host) => Ok(Some(host)),
                    Err(Error::Lookup(LookupError::NotFound { .. })) => Ok(None),
                    Err(err) => Err(err),
                };
                (idx, res)
            });
        }

        let mut out: Vec<Option<Host>> = names.iter().map(|_| None).collect();
        while let Some(res) = tasks.join_next().await {
            match res {
                Ok((idx, host)) => {
                    out[idx] = host?;
                }
                Err(join_err) => {
                    warn!(error = %join_err, "host lookup task failed");
                }
            }
        }
        Ok(out)
    }
}
