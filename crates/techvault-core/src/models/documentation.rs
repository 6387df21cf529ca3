//! Documentation (knowledge-base article) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Versioned};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Documentation {
    pub id: EntityId,
    pub organization: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Value from the `documentation_category` choice category.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub version_number: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Documentation {
    const PATH: &'static str = "/api/documentations/";
    const NAME: &'static str = "documentation";

    type Create = CreateDocumentation;
    type Update = UpdateDocumentation;
}

impl Versioned for Documentation {
    fn version_number(&self) -> u32 {
        self.version_number
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentation {
    pub organization: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDocumentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Stored alongside the version this edit creates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_note: Option<String>,
}
