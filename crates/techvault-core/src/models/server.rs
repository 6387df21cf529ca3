//! Server model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
    pub id: EntityId,
    pub organization: EntityId,
    #[serde(default)]
    pub location: Option<EntityId>,
    pub name: String,
    /// Value from the `server_type` choice category.
    #[serde(default)]
    pub server_type: String,
    /// Value from the `server_role` choice category.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub cpu: Option<String>,
    #[serde(default)]
    pub ram_gb: Option<u32>,
    #[serde(default)]
    pub storage_gb: Option<u32>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Server {
    const PATH: &'static str = "/api/servers/";
    const NAME: &'static str = "server";

    type Create = CreateServer;
    type Update = UpdateServer;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServer {
    pub organization: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub server_type: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateServer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
