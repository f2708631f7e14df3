use serde_json::{Value, json};

use crate::Result;
use crate::record::Record;
use crate::types::InterfaceKind;
use crate::zbx_client::ZbxClient;

use super::exactly_one;

const ENTITY: &str = "host interface";

/// One host interface, as returned by `hostinterface.get`.
#[derive(Clone, Debug)]
pub struct HostInterface {
    client: ZbxClient,
    record: Record,
    interfaceid: u64,
}

impl HostInterface {
    pub(crate) fn from_record(client: ZbxClient, record: Record) -> Result<Self> {
        let interfaceid = record.require_id("interfaceid")?;
        Ok(Self {
            client,
            record,
            interfaceid,
        })
    }

    #[must_use]
    pub fn interfaceid(&self) -> u64 {
        self.interfaceid
    }

    #[must_use]
    pub fn hostid(&self) -> Option<u64> {
        self.record.u64_field("hostid")
    }

    #[must_use]
    pub fn ip(&self) -> Option<&str> {
        self.record.str_field("ip")
    }

    #[must_use]
    pub fn dns(&self) -> Option<&str> {
        self.record.str_field("dns")
    }

    #[must_use]
    pub fn port(&self) -> Option<u64> {
        self.record.u64_field("port")
    }

    #[must_use]
    pub fn kind(&self) -> Option<InterfaceKind> {
        self.record
            .i64_field("type")
            .and_then(InterfaceKind::from_zabbix)
    }

    /// True for the default interface of its host.
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.record.bool_field("main") == Some(true)
    }

    /// True when the interface connects by IP, false when by DNS name.
    #[must_use]
    pub fn use_ip(&self) -> Option<bool> {
        self.record.bool_field("useip")
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Re-read this interface's fields; the identifier stays fixed.
    pub async fn refresh(&mut self) -> Result<()> {
        let params = json!({
            "output": "extend",
            "interfaceids": [self.interfaceid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("hostinterface.get", params).await?;
        self.record = exactly_one(rows, ENTITY, format!("interfaceid {}", self.interfaceid))?;
        Ok(())
    }
}

/// Looks up host interfaces and builds [`HostInterface`] values.
#[derive(Clone, Debug)]
pub struct HostInterfaceFactory {
    client: ZbxClient,
}

impl HostInterfaceFactory {
    #[must_use]
    pub fn new(client: ZbxClient) -> Self {
        Self { client }
    }

    /// Build a [`HostInterface`] from a raw record, validating its
    /// identifier.
    pub fn make(&self, record: Record) -> Result<HostInterface> {
        HostInterface::from_record(self.client.clone(), record)
    }

    pub async fn get_by_id(&self, interfaceid: u64) -> Result<HostInterface> {
        let params = json!({
            "output": "extend",
            "interfaceids": [interfaceid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("hostinterface.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("interfaceid {interfaceid}"))?;
        self.make(record)
    }

    /// All interfaces attached to a host.
    pub async fn for_host(&self, hostid: u64) -> Result<Vec<HostInterface>> {
        let params = json!({
            "output": "extend",
            "hostids": [hostid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("hostinterface.get", params).await?;
        rows.into_iter().map(|row| self.make(row)).collect()
    }
}
