use serde::Deserialize;
use serde_json::{Value, json};

use crate::Result;
use crate::error::ZbxError;
use crate::record::Record;
use crate::zbx_client::ZbxClient;

use super::{exactly_one, require_name};

const ENTITY: &str = "host group";

/// One host group, as returned by `hostgroup.get`.
#[derive(Clone, Debug)]
pub struct HostGroup {
    client: ZbxClient,
    record: Record,
    groupid: u64,
}

impl HostGroup {
    pub(crate) fn from_record(client: ZbxClient, record: Record) -> Result<Self> {
        let groupid = record.require_id("groupid")?;
        Ok(Self {
            client,
            record,
            groupid,
        })
    }

    #[must_use]
    pub fn groupid(&self) -> u64 {
        self.groupid
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.record.str_field("name")
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Re-read this group's fields; the identifier stays fixed.
    pub async fn refresh(&mut self) -> Result<()> {
        let params = json!({
            "output": "extend",
            "groupids": [self.groupid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("hostgroup.get", params).await?;
        self.record = exactly_one(rows, ENTITY, format!("groupid {}", self.groupid))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreatedGroups {
    groupids: Vec<String>,
}

/// Looks up host groups and builds [`HostGroup`] values.
#[derive(Clone, Debug)]
pub struct HostGroupFactory {
    client: ZbxClient,
}

impl HostGroupFactory {
    #[must_use]
    pub fn new(client: ZbxClient) -> Self {
        Self { client }
    }

    /// Build a [`HostGroup`] from a raw record, validating its identifier.
    pub fn make(&self, record: Record) -> Result<HostGroup> {
        HostGroup::from_record(self.client.clone(), record)
    }

    /// Look up the single group with the given name.
    ///
    /// # Errors
    ///
    /// `EmptyName`, `NotFound`, `Ambiguous`, or a remote error.
    pub async fn get_by_name(&self, name: &str) -> Result<HostGroup> {
        require_name(name, ENTITY)?;
        let params = json!({
            "output": "extend",
            "filter": {"name": name},
        });
        let rows: Vec<Record> = self.client.call("hostgroup.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("name {name:?}"))?;
        self.make(record)
    }

    pub async fn get_by_id(&self, groupid: u64) -> Result<HostGroup> {
        let params = json!({
            "output": "extend",
            "groupids": [groupid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("hostgroup.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("groupid {groupid}"))?;
        self.make(record)
    }

    /// All groups matching an arbitrary `hostgroup.get` filter object.
    pub async fn get_by_filter(&self, filter: Value) -> Result<Vec<HostGroup>> {
        let params = json!({
            "output": "extend",
            "filter": filter,
        });
        let rows: Vec<Record> = self.client.call("hostgroup.get", params).await?;
        rows.into_iter().map(|row| self.make(row)).collect()
    }

    /// Create a host group and return the entity built from the assigned id.
    pub async fn create(&self, name: &str) -> Result<HostGroup> {
        require_name(name, ENTITY)?;
        let created: CreatedGroups = self
            .client
            .call("hostgroup.create", json!({"name": name}))
            .await?;
        let groupid = created
            .groupids
            .into_iter()
            .next()
            .ok_or(ZbxError::MissingField { field: "groupids" })?;
        let mut record = Record::new();
        record.insert("groupid", Value::String(groupid));
        record.insert("name", Value::String(name.to_string()));
        self.make(record)
    }
}
