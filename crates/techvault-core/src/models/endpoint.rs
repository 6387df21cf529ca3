//! End-user devices: workstations assigned to people, and peripherals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

/// A workstation or laptop and the person using it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointUser {
    pub id: EntityId,
    pub organization: EntityId,
    #[serde(default)]
    pub location: Option<EntityId>,
    #[serde(default)]
    pub contact: Option<EntityId>,
    pub hostname: String,
    /// Value from the `endpoint_type` choice category.
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for EndpointUser {
    const PATH: &'static str = "/api/endpoint-users/";
    const NAME: &'static str = "endpoint user";

    type Create = CreateEndpointUser;
    type Update = UpdateEndpointUser;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEndpointUser {
    pub organization: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<EntityId>,
    pub hostname: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub operating_system: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateEndpointUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Option<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Printers, docks, monitors, scanners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Peripheral {
    pub id: EntityId,
    pub organization: EntityId,
    #[serde(default)]
    pub endpoint: Option<EntityId>,
    pub name: String,
    /// Value from the `peripheral_type` choice category.
    #[serde(default)]
    pub peripheral_type: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Peripheral {
    const PATH: &'static str = "/api/peripherals/";
    const NAME: &'static str = "peripheral";

    type Create = CreatePeripheral;
    type Update = UpdatePeripheral;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePeripheral {
    pub organization: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub peripheral_type: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePeripheral {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Option<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
