use serde_json::{Value, json};

use crate::Result;
use crate::record::Record;
use crate::types::{Severity, TriggerState};
use crate::zbx_client::ZbxClient;

use super::{Host, embedded_record, exactly_one, first_embedded};

const ENTITY: &str = "trigger";

/// One trigger together with the host it fires for.
///
/// Trigger rows are fetched with `selectHosts`, so every trigger knows its
/// owning [`Host`].
#[derive(Clone, Debug)]
pub struct Trigger {
    client: ZbxClient,
    record: Record,
    triggerid: u64,
    host: Host,
}

impl Trigger {
    pub(crate) fn from_parts(client: ZbxClient, record: Record, host: Host) -> Result<Self> {
        let triggerid = record.require_id("triggerid")?;
        Ok(Self {
            client,
            record,
            triggerid,
            host,
        })
    }

    /// Build a trigger from a row that embeds its hosts.
    pub(crate) fn from_record(client: ZbxClient, record: Record) -> Result<Self> {
        let host_row = first_embedded(&record, "hosts")?;
        let host = Host::from_record(client.clone(), embedded_record(host_row, "hosts")?)?;
        Self::from_parts(client, record, host)
    }

    #[must_use]
    pub fn triggerid(&self) -> u64 {
        self.triggerid
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.record.str_field("description")
    }

    /// Current trigger value: OK or problem.
    #[must_use]
    pub fn state(&self) -> Option<TriggerState> {
        self.record
            .i64_field("value")
            .and_then(TriggerState::from_zabbix)
    }

    /// Severity, from the trigger `priority` code.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.record
            .i64_field("priority")
            .and_then(Severity::from_zabbix)
    }

    /// The host this trigger belongs to.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Re-read this trigger and its host embed; the identifier stays
    /// fixed.
    pub async fn refresh(&mut self) -> Result<()> {
        let params = json!({
            "output": "extend",
            "triggerids": [self.triggerid.to_string()],
            "expandDescription": true,
            "selectHosts": "extend",
        });
        let rows: Vec<Record> = self.client.call("trigger.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("triggerid {}", self.triggerid))?;
        let host_row = first_embedded(&record, "hosts")?;
        self.host = Host::from_record(self.client.clone(), embedded_record(host_row, "hosts")?)?;
        self.record = record;
        Ok(())
    }
}

/// Looks up triggers and builds [`Trigger`] values.
#[derive(Clone, Debug)]
pub struct TriggerFactory {
    client: ZbxClient,
}

impl TriggerFactory {
    #[must_use]
    pub fn new(client: ZbxClient) -> Self {
        Self { client }
    }

    /// Build a [`Trigger`] from a raw row carrying a `hosts` embed.
    ///
    /// # Errors
    ///
    /// Identifier validation errors, or `MissingField` when the row has no
    /// embedded host.
    pub fn make(&self, record: Record) -> Result<Trigger> {
        Trigger::from_record(self.client.clone(), record)
    }

    /// Look up one trigger by its identifier, resolving the owning host.
    pub async fn get_by_id(&self, triggerid: u64) -> Result<Trigger> {
        let params = json!({
            "output": "extend",
            "triggerids": [triggerid.to_string()],
            "expandDescription": true,
            "selectHosts": "extend",
        });
        let rows: Vec<Record> = self.client.call("trigger.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("triggerid {triggerid}"))?;
        self.make(record)
    }
}
