//! VoIP assignment model (extensions and DIDs handed to contacts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoipAssignment {
    pub id: EntityId,
    pub organization: EntityId,
    #[serde(default)]
    pub contact: Option<EntityId>,
    #[serde(default)]
    pub location: Option<EntityId>,
    pub extension: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Value from the `voip_type` choice category.
    #[serde(default)]
    pub voip_type: String,
    #[serde(default)]
    pub device_model: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for VoipAssignment {
    const PATH: &'static str = "/api/voip/";
    const NAME: &'static str = "VoIP assignment";

    type Create = CreateVoipAssignment;
    type Update = UpdateVoipAssignment;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVoipAssignment {
    pub organization: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<EntityId>,
    pub extension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub voip_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateVoipAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Option<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
