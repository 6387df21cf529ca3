//! Documentation sub-resources: organization filter and publishing.

use techvault_core::error::VaultResult;
use techvault_core::http::{HttpRequest, Transport};
use techvault_core::models::documentation::Documentation;
use techvault_core::storage::KeyValueStore;
use techvault_core::{Entity, EntityId};

use super::entity::{EntityService, not_found};

impl<T: Transport, S: KeyValueStore> EntityService<T, S, Documentation> {
    pub async fn by_organization(&self, organization: EntityId) -> VaultResult<Vec<Documentation>> {
        self.list_action("by_organization", "organization", organization)
            .await
    }

    pub async fn publish(&self, id: EntityId) -> VaultResult<Documentation> {
        self.set_published(id, "publish").await
    }

    pub async fn unpublish(&self, id: EntityId) -> VaultResult<Documentation> {
        self.set_published(id, "unpublish").await
    }

    async fn set_published(&self, id: EntityId, action: &str) -> VaultResult<Documentation> {
        let request = HttpRequest::post(Documentation::detail_action_path(id, action));
        self.client
            .send_json(request)
            .await
            .map_err(|e| not_found::<Documentation>(e, id))
    }
}
