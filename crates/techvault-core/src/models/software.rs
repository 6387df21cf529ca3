//! Software license model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Software {
    pub id: EntityId,
    pub organization: EntityId,
    pub name: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub version: String,
    /// Value from the `software_license_type` choice category.
    #[serde(default)]
    pub license_type: String,
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default)]
    pub seats: Option<u32>,
    #[serde(default)]
    pub seats_used: Option<u32>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Software {
    /// Whether the license has lapsed as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d < today)
    }

    /// Seats still available, if the license is seat-based.
    pub fn seats_available(&self) -> Option<u32> {
        self.seats
            .map(|total| total.saturating_sub(self.seats_used.unwrap_or(0)))
    }
}

impl std::fmt::Debug for Software {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Software")
            .field("id", &self.id)
            .field("organization", &self.organization)
            .field("name", &self.name)
            .field("vendor", &self.vendor)
            .field("license_type", &self.license_type)
            .field("license_key", &self.license_key.as_ref().map(|_| "********"))
            .field("seats", &self.seats)
            .field("expiry_date", &self.expiry_date)
            .finish_non_exhaustive()
    }
}

impl Entity for Software {
    const PATH: &'static str = "/api/software/";
    const NAME: &'static str = "software";

    type Create = CreateSoftware;
    type Update = UpdateSoftware;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSoftware {
    pub organization: EntityId,
    pub name: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub license_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSoftware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
