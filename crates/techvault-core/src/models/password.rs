//! Password vault entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Versioned};

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct PasswordEntry {
    pub id: EntityId,
    pub organization: EntityId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    /// Only present on detail responses.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Value from the `password_category` choice category.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub version_number: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("id", &self.id)
            .field("organization", &self.organization)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("url", &self.url)
            .field("category", &self.category)
            .field("version_number", &self.version_number)
            .finish_non_exhaustive()
    }
}

impl Entity for PasswordEntry {
    const PATH: &'static str = "/api/passwords/";
    const NAME: &'static str = "password";

    type Create = CreatePasswordEntry;
    type Update = UpdatePasswordEntry;
}

impl Versioned for PasswordEntry {
    fn version_number(&self) -> u32 {
        self.version_number
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CreatePasswordEntry {
    pub organization: EntityId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct UpdatePasswordEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_note: Option<String>,
}
