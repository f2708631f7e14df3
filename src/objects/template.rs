use serde_json::{Value, json};

use crate::Result;
use crate::record::Record;
use crate::zbx_client::ZbxClient;

use super::{exactly_one, require_name};

const ENTITY: &str = "template";

/// One monitoring template, as returned by `template.get`.
#[derive(Clone, Debug)]
pub struct Template {
    client: ZbxClient,
    record: Record,
    templateid: u64,
}

impl Template {
    pub(crate) fn from_record(client: ZbxClient, record: Record) -> Result<Self> {
        let templateid = record.require_id("templateid")?;
        Ok(Self {
            client,
            record,
            templateid,
        })
    }

    #[must_use]
    pub fn templateid(&self) -> u64 {
        self.templateid
    }

    /// Technical template name (the `host` field).
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.record.str_field("host")
    }

    /// Visible template name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.record.str_field("name")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.record.str_field("description")
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Re-read this template's fields; the identifier stays fixed.
    pub async fn refresh(&mut self) -> Result<()> {
        let params = json!({
            "output": "extend",
            "templateids": [self.templateid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("template.get", params).await?;
        self.record = exactly_one(rows, ENTITY, format!("templateid {}", self.templateid))?;
        Ok(())
    }
}

/// Looks up templates and builds [`Template`] values.
#[derive(Clone, Debug)]
pub struct TemplateFactory {
    client: ZbxClient,
}

impl TemplateFactory {
    #[must_use]
    pub fn new(client: ZbxClient) -> Self {
        Self { client }
    }

    /// Build a [`Template`] from a raw record, validating its identifier.
    pub fn make(&self, record: Record) -> Result<Template> {
        Template::from_record(self.client.clone(), record)
    }

    /// Look up the single template whose technical name equals `name`.
    ///
    /// Templates are addressed by their `host` field, the same convention
    /// the server uses for hosts.
    ///
    /// # Errors
    ///
    /// `EmptyName`, `NotFound`, `Ambiguous`, or a remote error.
    pub async fn get_by_name(&self, name: &str) -> Result<Template> {
        require_name(name, ENTITY)?;
        let params = json!({
            "output": "extend",
            "filter": {"host": name},
        });
        let rows: Vec<Record> = self.client.call("template.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("name {name:?}"))?;
        self.make(record)
    }

    /// All templates matching an arbitrary `template.get` filter object.
    pub async fn get_by_filter(&self, filter: Value) -> Result<Vec<Template>> {
        let params = json!({
            "output": "extend",
            "filter": filter,
        });
        let rows: Vec<Record> = self.client.call("template.get", params).await?;
        rows.into_iter().map(|row| self.make(row)).collect()
    }
}
