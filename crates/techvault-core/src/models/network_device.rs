//! Network device model (switches, routers, firewalls, access points).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDevice {
    pub id: EntityId,
    pub organization: EntityId,
    #[serde(default)]
    pub location: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for NetworkDevice {
    const PATH: &'static str = "/api/network-devices/";
    const NAME: &'static str = "network device";

    type Create = CreateNetworkDevice;
    type Update = UpdateNetworkDevice;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNetworkDevice {
    pub organization: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateNetworkDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
