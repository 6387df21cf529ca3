//! Organization sub-resources.

use techvault_core::error::VaultResult;
use techvault_core::http::{HttpRequest, Transport};
use techvault_core::models::organization::{Organization, OrganizationStats};
use techvault_core::storage::KeyValueStore;
use techvault_core::{Entity, EntityId};

use super::entity::{EntityService, not_found};

impl<T: Transport, S: KeyValueStore> EntityService<T, S, Organization> {
    /// Name search across organizations visible to the user.
    pub async fn search(&self, query: &str) -> VaultResult<Vec<Organization>> {
        let request = HttpRequest::get(Organization::action_path("search")).with_query("q", query);
        self.fetch_list(request).await
    }

    /// Record counts per entity type for the dashboard.
    pub async fn stats(&self, id: EntityId) -> VaultResult<OrganizationStats> {
        self.client
            .get(&Organization::detail_action_path(id, "stats"))
            .await
            .map_err(|e| not_found::<Organization>(e, id))
    }
}
