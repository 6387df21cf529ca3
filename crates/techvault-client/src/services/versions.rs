//! Version history sub-resources shared by every [`Versioned`] entity.

use serde::de::IgnoredAny;
use techvault_core::error::VaultResult;
use techvault_core::http::{HttpRequest, Transport};
use techvault_core::models::version::{EntityVersion, RestoreVersion};
use techvault_core::storage::KeyValueStore;
use techvault_core::{EntityId, Versioned};

use super::entity::{EntityService, not_found};

/// The two calls the restore flow needs. Implemented by every versioned
/// entity service; test code can supply its own.
pub trait VersionSource: Send + Sync {
    /// All versions of `id`, in the order the server returns them.
    fn list_versions(
        &self,
        id: EntityId,
    ) -> impl Future<Output = VaultResult<Vec<EntityVersion>>> + Send;

    /// Ask the server to append a new version equal to `version_number`.
    fn restore_version(
        &self,
        id: EntityId,
        version_number: u32,
    ) -> impl Future<Output = VaultResult<()>> + Send;
}

impl<T: Transport, S: KeyValueStore, E: Versioned> VersionSource for EntityService<T, S, E> {
    async fn list_versions(&self, id: EntityId) -> VaultResult<Vec<EntityVersion>> {
        self.fetch_list(HttpRequest::get(E::detail_action_path(id, "versions")))
            .await
            .map_err(|e| not_found::<E>(e, id))
    }

    async fn restore_version(&self, id: EntityId, version_number: u32) -> VaultResult<()> {
        let _: IgnoredAny = self
            .client
            .post(
                &E::detail_action_path(id, "restore_version"),
                &RestoreVersion { version_number },
            )
            .await
            .map_err(|e| not_found::<E>(e, id))?;
        Ok(())
    }
}

impl<V: VersionSource> VersionSource for &V {
    fn list_versions(
        &self,
        id: EntityId,
    ) -> impl Future<Output = VaultResult<Vec<EntityVersion>>> + Send {
        (**self).list_versions(id)
    }

    fn restore_version(
        &self,
        id: EntityId,
        version_number: u32,
    ) -> impl Future<Output = VaultResult<()>> + Send {
        (**self).restore_version(id, version_number)
    }
}
