use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::EntityError;

/// One raw row returned by a Zabbix API query: an explicit field-name to
/// value mapping with typed accessors.
///
/// Zabbix serializes most scalars as strings ("101", "0"), so the numeric
/// and boolean accessors accept both the native JSON type and its
/// stringified form.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn u64_field(&self, name: &str) -> Option<u64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        match self.0.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            Value::String(s) => Some(matches!(s.as_str(), "1" | "true" | "TRUE")),
            _ => None,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract and validate the identifier field backing an entity.
    ///
    /// # Errors
    ///
    /// `MissingIdentifier` when the field is absent, null, or blank;
    /// `InvalidIdentifier` when it is present but not a decimal id.
    pub fn require_id(&self, field: &'static str) -> std::result::Result<u64, EntityError> {
        let value = match self.0.get(field) {
            None | Some(Value::Null) => {
                return Err(EntityError::MissingIdentifier { field });
            }
            Some(value) => value,
        };
        match value {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| EntityError::InvalidIdentifier {
                    field,
                    message: format!("expected unsigned integer, got {n}"),
                }),
            Value::String(s) if s.trim().is_empty() => {
                Err(EntityError::MissingIdentifier { field })
            }
            Value::String(s) => {
                s.trim()
                    .parse::<u64>()
                    .map_err(|err| EntityError::InvalidIdentifier {
                        field,
                        message: err.to_string(),
                    })
            }
            other => Err(EntityError::InvalidIdentifier {
                field,
                message: format!("expected string or integer, got {other}"),
            }),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Record;
    use crate::error::EntityError;

    fn record(value: serde_json::Value) -> Record {
        match serde_json::from_value(value) {
            Ok(record) => record,
            Err(err) => panic!("failed to build record: {err}"),
        }
    }

    #[test]
    fn accessors_tolerate_stringified_scalars() {
        let rec = record(json!({
            "hostid": "101",
            "status": 0,
            "acknowledged": "1",
            "name": "zabbix"
        }));
        assert_eq!(rec.u64_field("hostid"), Some(101));
        assert_eq!(rec.i64_field("status"), Some(0));
        assert_eq!(rec.bool_field("acknowledged"), Some(true));
        assert_eq!(rec.str_field("name"), Some("zabbix"));
        assert_eq!(rec.str_field("missing"), None);
    }

    #[test]
    fn require_id_accepts_string_and_number() {
        let rec = record(json!({"hostid": "101", "groupid": 7}));
        assert!(matches!(rec.require_id("hostid"), Ok(101)));
        assert!(matches!(rec.require_id("groupid"), Ok(7)));
    }

    #[test]
    fn require_id_rejects_missing_blank_and_malformed() {
        let rec = record(json!({"blank": "", "junk": "abc", "null": null}));
        assert!(matches!(
            rec.require_id("hostid"),
            Err(EntityError::MissingIdentifier { field: "hostid" })
        ));
        assert!(matches!(
            rec.require_id("blank"),
            Err(EntityError::MissingIdentifier { .. })
        ));
        assert!(matches!(
            rec.require_id("null"),
            Err(EntityError::MissingIdentifier { .. })
        ));
        assert!(matches!(
            rec.require_id("junk"),
            Err(EntityError::InvalidIdentifier { .. })
        ));
    }
}
