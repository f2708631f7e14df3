use serde::Deserialize;
use serde_json::{Value, json};

use crate::Result;
use crate::error::ZbxError;
use crate::record::Record;
use crate::zbx_client::ZbxClient;

use super::{exactly_one, require_name};

const ENTITY: &str = "user macro";

/// One user macro attached to a host, as returned by `usermacro.get`.
#[derive(Clone, Debug)]
pub struct UserMacro {
    client: ZbxClient,
    record: Record,
    hostmacroid: u64,
}

impl UserMacro {
    pub(crate) fn from_record(client: ZbxClient, record: Record) -> Result<Self> {
        let hostmacroid = record.require_id("hostmacroid")?;
        Ok(Self {
            client,
            record,
            hostmacroid,
        })
    }

    #[must_use]
    pub fn hostmacroid(&self) -> u64 {
        self.hostmacroid
    }

    #[must_use]
    pub fn hostid(&self) -> Option<u64> {
        self.record.u64_field("hostid")
    }

    /// Macro name, including the `{$...}` braces.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.record.str_field("macro")
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.record.str_field("value")
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Re-read this macro's fields; the identifier stays fixed.
    pub async fn refresh(&mut self) -> Result<()> {
        let params = json!({
            "output": "extend",
            "hostmacroids": [self.hostmacroid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("usermacro.get", params).await?;
        self.record = exactly_one(rows, ENTITY, format!("hostmacroid {}", self.hostmacroid))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreatedMacros {
    hostmacroids: Vec<String>,
}

/// Looks up user macros and builds [`UserMacro`] values.
#[derive(Clone, Debug)]
pub struct UserMacroFactory {
    client: ZbxClient,
}

impl UserMacroFactory {
    #[must_use]
    pub fn new(client: ZbxClient) -> Self {
        Self { client }
    }

    /// Build a [`UserMacro`] from a raw record, validating its identifier.
    pub fn make(&self, record: Record) -> Result<UserMacro> {
        UserMacro::from_record(self.client.clone(), record)
    }

    /// All macros matching an arbitrary `usermacro.get` filter object.
    ///
    /// Macro names are unique per host, not globally, so filter lookups
    /// are list-shaped.
    pub async fn get_by_filter(&self, filter: Value) -> Result<Vec<UserMacro>> {
        let params = json!({
            "output": "extend",
            "filter": filter,
        });
        let rows: Vec<Record> = self.client.call("usermacro.get", params).await?;
        rows.into_iter().map(|row| self.make(row)).collect()
    }

    /// All macros with the given name and value.
    pub async fn get_by_macro(&self, name: &str, value: &str) -> Result<Vec<UserMacro>> {
        require_name(name, ENTITY)?;
        self.get_by_filter(json!({"macro": name, "value": value}))
            .await
    }

    /// Create a macro on a host and return the entity built from the
    /// assigned id.
    ///
    /// # Errors
    ///
    /// `EmptyName` when the macro name is blank, a remote error, or
    /// `MissingField` when the response carries no id.
    pub async fn create(&self, hostid: u64, name: &str, value: &str) -> Result<UserMacro> {
        require_name(name, ENTITY)?;
        let params = json!({
            "hostid": hostid.to_string(),
            "macro": name,
            "value": value,
        });
        let created: CreatedMacros = self.client.call("usermacro.create", params).await?;
        let hostmacroid = created
            .hostmacroids
            .into_iter()
            .next()
            .ok_or(ZbxError::MissingField {
                field: "hostmacroids",
            })?;
        let mut record = Record::new();
        record.insert("hostmacroid", Value::String(hostmacroid));
        record.insert("hostid", Value::String(hostid.to_string()));
        record.insert("macro", Value::String(name.to_string()));
        record.insert("value", Value::String(value.to_string()));
        self.make(record)
    }
}
