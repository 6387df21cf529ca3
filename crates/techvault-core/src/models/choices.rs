//! Server-defined enumerations used by form dropdowns.
//!
//! The server publishes one document mapping category names to ordered
//! `{value, label}` lists. Categories are a closed set here; each one
//! carries an explicit fallback option so a form always has something
//! to select even when the document is missing or incomplete.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VaultError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceCategory {
    DocumentationCategory,
    PasswordCategory,
    ConfigurationType,
    NetworkDeviceType,
    ServerType,
    ServerRole,
    EndpointType,
    PeripheralType,
    SoftwareLicenseType,
    BackupType,
    BackupFrequency,
    VoipType,
    ContactType,
}

impl ChoiceCategory {
    pub const ALL: [ChoiceCategory; 13] = [
        ChoiceCategory::DocumentationCategory,
        ChoiceCategory::PasswordCategory,
        ChoiceCategory::ConfigurationType,
        ChoiceCategory::NetworkDeviceType,
        ChoiceCategory::ServerType,
        ChoiceCategory::ServerRole,
        ChoiceCategory::EndpointType,
        ChoiceCategory::PeripheralType,
        ChoiceCategory::SoftwareLicenseType,
        ChoiceCategory::BackupType,
        ChoiceCategory::BackupFrequency,
        ChoiceCategory::VoipType,
        ChoiceCategory::ContactType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceCategory::DocumentationCategory => "documentation_category",
            ChoiceCategory::PasswordCategory => "password_category",
            ChoiceCategory::ConfigurationType => "configuration_type",
            ChoiceCategory::NetworkDeviceType => "network_device_type",
            ChoiceCategory::ServerType => "server_type",
            ChoiceCategory::ServerRole => "server_role",
            ChoiceCategory::EndpointType => "endpoint_type",
            ChoiceCategory::PeripheralType => "peripheral_type",
            ChoiceCategory::SoftwareLicenseType => "software_license_type",
            ChoiceCategory::BackupType => "backup_type",
            ChoiceCategory::BackupFrequency => "backup_frequency",
            ChoiceCategory::VoipType => "voip_type",
            ChoiceCategory::ContactType => "contact_type",
        }
    }

    /// Option offered when the server did not provide this category.
    pub fn fallback(self) -> ChoiceOption {
        let (value, label) = match self {
            ChoiceCategory::DocumentationCategory => ("general", "General"),
            ChoiceCategory::ServerType => ("physical", "Physical"),
            ChoiceCategory::EndpointType => ("desktop", "Desktop"),
            ChoiceCategory::SoftwareLicenseType => ("perpetual", "Perpetual"),
            ChoiceCategory::BackupType => ("full", "Full"),
            ChoiceCategory::BackupFrequency => ("daily", "Daily"),
            ChoiceCategory::VoipType => ("extension", "Extension"),
            ChoiceCategory::ContactType => ("primary", "Primary"),
            ChoiceCategory::PasswordCategory
            | ChoiceCategory::ConfigurationType
            | ChoiceCategory::NetworkDeviceType
            | ChoiceCategory::ServerRole
            | ChoiceCategory::PeripheralType => ("other", "Other"),
        };
        ChoiceOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for ChoiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceCategory {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChoiceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| VaultError::validation(format!("unknown choice category: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// Parsed choices document. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    categories: BTreeMap<ChoiceCategory, Vec<ChoiceOption>>,
}

impl ChoiceSet {
    /// The set used when the server document could not be fetched:
    /// every category holds only its fallback option.
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn from_categories(categories: BTreeMap<ChoiceCategory, Vec<ChoiceOption>>) -> Self {
        Self { categories }
    }

    /// Build from the raw server document. Unknown categories and
    /// malformed entries are skipped; their names are returned so the
    /// caller can log them.
    pub fn from_document(doc: &Value) -> (Self, Vec<String>) {
        let mut categories = BTreeMap::new();
        let mut skipped = Vec::new();
        let Value::Object(map) = doc else {
            return (Self::default(), skipped);
        };
        for (name, entries) in map {
            let Ok(category) = name.parse::<ChoiceCategory>() else {
                skipped.push(name.clone());
                continue;
            };
            let options = match entries {
                Value::Array(items) => items.iter().filter_map(parse_option).collect(),
                _ => {
                    skipped.push(name.clone());
                    continue;
                }
            };
            categories.insert(category, options);
        }
        (Self { categories }, skipped)
    }

    /// Options for a category, in server order. Falls back to the
    /// category's explicit fallback when the server omitted it.
    pub fn options(&self, category: ChoiceCategory) -> Vec<ChoiceOption> {
        match self.categories.get(&category) {
            Some(options) => options.clone(),
            None => vec![category.fallback()],
        }
    }

    /// Display label for `value`; echoes `value` when it is unknown.
    pub fn label(&self, category: ChoiceCategory, value: &str) -> String {
        self.options(category)
            .into_iter()
            .find(|o| o.value == value)
            .map(|o| o.label)
            .unwrap_or_else(|| value.to_string())
    }

    /// Like [`ChoiceSet::label`] for a category given by name. Unknown
    /// category names also echo `value`.
    pub fn label_by_name(&self, category: &str, value: &str) -> String {
        match category.parse::<ChoiceCategory>() {
            Ok(category) => self.label(category, value),
            Err(_) => value.to_string(),
        }
    }

    /// Whether the server provided this category.
    pub fn has(&self, category: ChoiceCategory) -> bool {
        self.categories.contains_key(&category)
    }
}

/// Accepts `{"value": .., "label": ..}` objects and `[value, label]`
/// pairs, the two shapes Django choice serializers produce.
fn parse_option(item: &Value) -> Option<ChoiceOption> {
    match item {
        Value::Object(map) => {
            let value = scalar_to_string(map.get("value")?)?;
            let label = map
                .get("label")
                .and_then(scalar_to_string)
                .unwrap_or_else(|| value.clone());
            Some(ChoiceOption { value, label })
        }
        Value::Array(pair) if pair.len() == 2 => Some(ChoiceOption {
            value: scalar_to_string(&pair[0])?,
            label: scalar_to_string(&pair[1])?,
        }),
        _ => None,
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
