use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use crate::Result;
use crate::error::ZbxError;
use crate::record::Record;
use crate::types::Severity;
use crate::zbx_client::ZbxClient;

use super::{Host, Trigger, TriggerFactory, embedded_record, exactly_one, first_embedded};

const ENTITY: &str = "event";

/// One event, linked to the trigger that produced it.
#[derive(Clone, Debug)]
pub struct Event {
    client: ZbxClient,
    record: Record,
    eventid: u64,
    trigger: Trigger,
}

impl Event {
    pub(crate) fn from_parts(client: ZbxClient, record: Record, trigger: Trigger) -> Result<Self> {
        let eventid = record.require_id("eventid")?;
        Ok(Self {
            client,
            record,
            eventid,
            trigger,
        })
    }

    #[must_use]
    pub fn eventid(&self) -> u64 {
        self.eventid
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.record.str_field("name")
    }

    /// Event timestamp, from the epoch-seconds `clock` field.
    #[must_use]
    pub fn clock(&self) -> Option<DateTime<Utc>> {
        let secs = self.record.i64_field("clock")?;
        Utc.timestamp_opt(secs, 0).single()
    }

    #[must_use]
    pub fn acknowledged(&self) -> Option<bool> {
        self.record.bool_field("acknowledged")
    }

    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.record
            .i64_field("severity")
            .and_then(Severity::from_zabbix)
    }

    /// The trigger this event was generated by; it carries the host.
    #[must_use]
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.field(name)
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Re-read this event's own fields; the identifier and the linked
    /// trigger stay fixed.
    pub async fn refresh(&mut self) -> Result<()> {
        let params = json!({
            "output": "extend",
            "eventids": [self.eventid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("event.get", params).await?;
        self.record = exactly_one(rows, ENTITY, format!("eventid {}", self.eventid))?;
        Ok(())
    }
}

/// Looks up events and builds [`Event`] values.
#[derive(Clone, Debug)]
pub struct EventFactory {
    client: ZbxClient,
}

impl EventFactory {
    #[must_use]
    pub fn new(client: ZbxClient) -> Self {
        Self { client }
    }

    /// Build an [`Event`] from a row carrying `selectHosts` and
    /// `selectRelatedObject` embeds.
    ///
    /// # Errors
    ///
    /// Identifier validation errors, or `MissingField` when an embed is
    /// absent.
    pub fn make(&self, record: Record) -> Result<Event> {
        let host_row = first_embedded(&record, "hosts")?;
        let host = Host::from_record(self.client.clone(), embedded_record(host_row, "hosts")?)?;
        let related = record
            .field("relatedObject")
            .ok_or(ZbxError::MissingField {
                field: "relatedObject",
            })?;
        let trigger_record = embedded_record(related, "relatedObject")?;
        let trigger = Trigger::from_parts(self.client.clone(), trigger_record, host)?;
        Event::from_parts(self.client.clone(), record, trigger)
    }

    /// Look up one event by its identifier, resolving the related trigger
    /// (and through it the host) with follow-up queries.
    pub async fn get_by_id(&self, eventid: u64) -> Result<Event> {
        let params = json!({
            "output": "extend",
            "eventids": [eventid.to_string()],
        });
        let rows: Vec<Record> = self.client.call("event.get", params).await?;
        let record = exactly_one(rows, ENTITY, format!("eventid {eventid}"))?;
        let objectid = record
            .u64_field("objectid")
            .ok_or(ZbxError::MissingField { field: "objectid" })?;
        let trigger = TriggerFactory::new(self.client.clone())
            .get_by_id(objectid)
            .await?;
        Event::from_parts(self.client.clone(), record, trigger)
    }

    /// Unresolved, unacknowledged problem events for the given host groups
    /// since `since`, newest first as the server returns them. Each row's
    /// trigger and host come from the query embeds, so this issues exactly
    /// one remote call.
    pub async fn recent_for_groups(
        &self,
        groupids: &[u64],
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Event>> {
        let groupids: Vec<String> = groupids.iter().map(ToString::to_string).collect();
        let params = json!({
            "output": "extend",
            "groupids": groupids,
            "acknowledged": false,
            "suppressed": false,
            "time_from": since.timestamp(),
            "value": 1,
            "limit": limit,
            "selectHosts": ["hostid", "host", "name"],
            "selectRelatedObject": ["triggerid", "description", "value", "priority"],
            "filter": {"r_eventid": 0},
        });
        let rows: Vec<Record> = self.client.call("event.get", params).await?;
        rows.into_iter().map(|row| self.make(row)).collect()
    }
}
