//! Location sub-resources.

use techvault_core::EntityId;
use techvault_core::error::VaultResult;
use techvault_core::http::Transport;
use techvault_core::models::location::Location;
use techvault_core::storage::KeyValueStore;

use super::entity::EntityService;

impl<T: Transport, S: KeyValueStore> EntityService<T, S, Location> {
    pub async fn by_organization(&self, organization: EntityId) -> VaultResult<Vec<Location>> {
        self.list_action("by_organization", "organization", organization)
            .await
    }
}
