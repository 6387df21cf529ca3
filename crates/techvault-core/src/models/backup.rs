//! Backup job model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    pub id: EntityId,
    pub organization: EntityId,
    #[serde(default)]
    pub server: Option<EntityId>,
    pub name: String,
    /// Value from the `backup_type` choice category.
    #[serde(default)]
    pub backup_type: String,
    /// Value from the `backup_frequency` choice category.
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub retention_days: Option<u32>,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_status: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Backup {
    const PATH: &'static str = "/api/backups/";
    const NAME: &'static str = "backup";

    type Create = CreateBackup;
    type Update = UpdateBackup;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBackup {
    pub organization: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub backup_type: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBackup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
