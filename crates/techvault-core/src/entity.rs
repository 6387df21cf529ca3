//! REST resource metadata shared by every entity model.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Server-side primary key.
pub type EntityId = i64;

/// A model served by a standard list/detail REST resource.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Collection path, e.g. `/api/locations/`.
    const PATH: &'static str;
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    /// Payload submitted by the create form.
    type Create: Serialize + Send + Sync;
    /// Partial payload submitted by the edit form (PATCH).
    type Update: Serialize + Send + Sync;

    /// Detail path for a single record.
    fn detail_path(id: EntityId) -> String {
        format!("{}{id}/", Self::PATH)
    }

    /// Path of a collection-level action such as `by_organization/`.
    fn action_path(action: &str) -> String {
        format!("{}{action}/", Self::PATH)
    }

    /// Path of a record-level action such as `publish/`.
    fn detail_action_path(id: EntityId, action: &str) -> String {
        format!("{}{id}/{action}/", Self::PATH)
    }
}

/// Entities whose server keeps an append-only version history.
pub trait Versioned: Entity {
    /// Current version of the live record.
    fn version_number(&self) -> u32;
}

/// Filters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub organization: Option<EntityId>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl ListQuery {
    pub fn for_organization(organization: EntityId) -> Self {
        Self {
            organization: Some(organization),
            ..Default::default()
        }
    }

    /// Query-string pairs in a stable order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(org) = self.organization {
            pairs.push(("organization".to_string(), org.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs
    }
}
