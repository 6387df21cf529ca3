//! Configuration record model (device configs, firewall rules, and so on).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Versioned};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    pub id: EntityId,
    pub organization: EntityId,
    pub name: String,
    /// Value from the `configuration_type` choice category.
    #[serde(default)]
    pub config_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version_number: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Configuration {
    const PATH: &'static str = "/api/configurations/";
    const NAME: &'static str = "configuration";

    type Create = CreateConfiguration;
    type Update = UpdateConfiguration;
}

impl Versioned for Configuration {
    fn version_number(&self) -> u32 {
        self.version_number
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConfiguration {
    pub organization: EntityId,
    pub name: String,
    #[serde(default)]
    pub config_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_note: Option<String>,
}
