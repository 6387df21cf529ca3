//! Version history entries for versioned entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One snapshot in an entity's append-only history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityVersion {
    pub version_number: u32,
    /// Field values as they were at this version.
    #[serde(alias = "data")]
    pub snapshot: Value,
    pub created_at: DateTime<Utc>,
    /// Either a username or a nested user object, depending on the resource.
    #[serde(default)]
    pub created_by: Option<Value>,
    #[serde(default)]
    pub change_note: Option<String>,
}

impl EntityVersion {
    /// Author shown next to the version, if the server recorded one.
    pub fn author(&self) -> Option<String> {
        match self.created_by.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(format!("user #{n}")),
            Value::Object(map) => ["full_name", "username", "email"]
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }

    /// Snapshot fields sorted by name, for the inline detail view.
    pub fn fields(&self) -> Vec<(&str, &Value)> {
        let mut fields: Vec<_> = match &self.snapshot {
            Value::Object(map) => map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            _ => Vec::new(),
        };
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields
    }
}

/// Body of a restore request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestoreVersion {
    pub version_number: u32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn version(created_by: Value) -> EntityVersion {
        serde_json::from_value(json!({
            "version_number": 2,
            "data": {"name": "core-sw", "content": "vlan 10"},
            "created_at": "2025-03-01T10:00:00Z",
            "created_by": created_by,
        }))
        .unwrap()
    }

    #[test]
    fn author_from_nested_user() {
        let v = version(json!({"id": 4, "username": "alice"}));
        assert_eq!(v.author().as_deref(), Some("alice"));
    }

    #[test]
    fn author_from_plain_string() {
        assert_eq!(version(json!("bob")).author().as_deref(), Some("bob"));
        assert_eq!(version(Value::Null).author(), None);
    }

    #[test]
    fn snapshot_accepts_data_alias_and_sorts_fields() {
        let v = version(Value::Null);
        let names: Vec<_> = v.fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["content", "name"]);
    }
}
