//! Typed Zabbix entities and the factories that look them up.
//!
//! Each factory owns a [`ZbxClient`](crate::zbx_client::ZbxClient) handle
//! and turns raw API rows into entity values. Entities are read-only
//! snapshots; their identifier is fixed at construction.

mod event;
mod group;
mod host;
mod interface;
mod template;
mod trigger;
mod usermacro;

pub use event::{Event, EventFactory};
pub use group::{HostGroup, HostGroupFactory};
pub use host::{Host, HostFactory};
pub use interface::{HostInterface, HostInterfaceFactory};
pub use template::{Template, TemplateFactory};
pub use trigger::{Trigger, TriggerFactory};
pub use usermacro::{UserMacro, UserMacroFactory};

use serde_json::Value;

use crate::Result;
use crate::error::{LookupError, ZbxError};
use crate::record::Record;

/// Enforce the exactly-one contract shared by the `get_by_*` lookups.
fn exactly_one<T>(mut rows: Vec<T>, entity: &'static str, selector: impl Into<String>) -> Result<T> {
    match rows.len() {
        1 => Ok(rows.swap_remove(0)),
        0 => Err(LookupError::NotFound {
            entity,
            selector: selector.into(),
        }
        .into()),
        count => Err(LookupError::Ambiguous {
            entity,
            selector: selector.into(),
            count,
        }
        .into()),
    }
}

fn require_name(name: &str, entity: &'static str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LookupError::EmptyName { entity }.into());
    }
    Ok(())
}

/// Interpret one embedded row (a `selectHosts`/`selectRelatedObject`
/// member) as a record of its own.
fn embedded_record(value: &Value, field: &'static str) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(Record::from(map.clone())),
        _ => Err(ZbxError::Json {
            message: format!("embedded {field} row is not an object"),
        }
        .into()),
    }
}

/// First element of an embedded array field such as `hosts`.
fn first_embedded<'a>(record: &'a Record, field: &'static str) -> Result<&'a Value> {
    record
        .field(field)
        .and_then(Value::as_array)
        .and_then(|rows| rows.first())
        .ok_or_else(|| ZbxError::MissingField { field }.into())
}

#[cfg(test)]
mod tests {
    use super::{exactly_one, require_name};
    use crate::error::{Error, LookupError};

    #[test]
    fn exactly_one_accepts_single_row() {
        assert!(matches!(exactly_one(vec![7], "host", "name"), Ok(7)));
    }

    #[test]
    fn exactly_one_reports_zero_and_many() {
        let err = match exactly_one(Vec::<i32>::new(), "host", "ghost") {
            Err(err) => err,
            Ok(_) => panic!("expected not-found"),
        };
        assert!(matches!(
            err,
            Error::Lookup(LookupError::NotFound { entity: "host", .. })
        ));

        let err = match exactly_one(vec![1, 2], "host", "dup") {
            Err(err) => err,
            Ok(_) => panic!("expected ambiguous"),
        };
        assert!(matches!(
            err,
            Error::Lookup(LookupError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn require_name_rejects_blank_input() {
        assert!(require_name("zabbix", "host").is_ok());
        assert!(matches!(
            require_name("  ", "host"),
            Err(Error::Lookup(LookupError::EmptyName { entity: "host" }))
        ));
    }
}
