//! Contact sub-resources.

use techvault_core::EntityId;
use techvault_core::error::VaultResult;
use techvault_core::http::Transport;
use techvault_core::models::contact::Contact;
use techvault_core::storage::KeyValueStore;

use super::entity::EntityService;

impl<T: Transport, S: KeyValueStore> EntityService<T, S, Contact> {
    pub async fn by_organization(&self, organization: EntityId) -> VaultResult<Vec<Contact>> {
        self.list_action("by_organization", "organization", organization)
            .await
    }

    pub async fn by_location(&self, location: EntityId) -> VaultResult<Vec<Contact>> {
        self.list_action("by_location", "location", location).await
    }
}
