//! Organization scope store: which tenant the user is working in.

use std::sync::{PoisonError, RwLock};

use techvault_client::ApiClient;
use techvault_client::services::EntityService;
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::http::Transport;
use techvault_core::models::organization::Organization;
use techvault_core::storage::{KeyValueStore, SELECTED_ORGANIZATION_KEY};
use techvault_core::{EntityId, ListQuery};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
struct ScopeState {
    organizations: Vec<Organization>,
    /// Always an element of `organizations` when set.
    selected: Option<Organization>,
}

/// Holds the organization list and the selected organization.
///
/// The selected id is persisted so it survives restarts, and re-validated
/// against a fresh list every time the user authenticates. Once the client
/// reports the session as ended, the accessors see an empty scope.
pub struct OrganizationScope<T: Transport, S: KeyValueStore> {
    client: ApiClient<T, S>,
    organizations: EntityService<T, S, Organization>,
    state: RwLock<ScopeState>,
}

impl<T: Transport, S: KeyValueStore> OrganizationScope<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self {
            organizations: EntityService::new(client.clone()),
            client,
            state: RwLock::new(ScopeState::default()),
        }
    }

    /// React to an authentication transition: load on login, drop
    /// in-memory state (without a server call) on logout.
    pub async fn on_auth_changed(&self, authenticated: bool) -> VaultResult<()> {
        if authenticated {
            self.reload().await
        } else {
            self.clear();
            Ok(())
        }
    }

    /// Fetch the organization list and restore the persisted selection.
    ///
    /// A persisted id that no longer matches any organization is removed
    /// from storage and the selection is left empty.
    pub async fn reload(&self) -> VaultResult<()> {
        let organizations = self.organizations.list(&ListQuery::default()).await?;

        let store = self.client.store();
        let selected = match store.get(SELECTED_ORGANIZATION_KEY)? {
            None => None,
            Some(raw) => {
                let found = raw
                    .trim()
                    .parse::<EntityId>()
                    .ok()
                    .and_then(|id| organizations.iter().find(|o| o.id == id).cloned());
                if found.is_none() {
                    warn!(stored = %raw, "Stored organization no longer exists, dropping selection");
                    store.remove(SELECTED_ORGANIZATION_KEY)?;
                }
                found
            }
        };

        debug!(
            count = organizations.len(),
            selected = ?selected.as_ref().map(|o| o.id),
            "Loaded organizations"
        );

        *self.write() = ScopeState {
            organizations,
            selected,
        };
        Ok(())
    }

    /// Select an organization by id, or clear the selection with `None`.
    ///
    /// Only organizations from the loaded list can be selected.
    pub fn set_selected(&self, id: Option<EntityId>) -> VaultResult<Option<Organization>> {
        self.drop_if_ended();
        let store = self.client.store();
        let mut state = self.write();
        match id {
            None => {
                store.remove(SELECTED_ORGANIZATION_KEY)?;
                state.selected = None;
                info!("Cleared organization selection");
                Ok(None)
            }
            Some(id) => {
                let org = state
                    .organizations
                    .iter()
                    .find(|o| o.id == id)
                    .cloned()
                    .ok_or_else(|| VaultError::NotFound {
                        entity: "organization".into(),
                        id: id.to_string(),
                    })?;
                store.set(SELECTED_ORGANIZATION_KEY, &id.to_string())?;
                info!(organization = %org.name, id, "Selected organization");
                state.selected = Some(org.clone());
                Ok(Some(org))
            }
        }
    }

    pub fn selected(&self) -> Option<Organization> {
        self.read().selected.clone()
    }

    pub fn selected_id(&self) -> Option<EntityId> {
        self.read().selected.as_ref().map(|o| o.id)
    }

    pub fn organizations(&self) -> Vec<Organization> {
        self.read().organizations.clone()
    }

    /// Drop the list and selection from memory. Storage is untouched.
    pub fn clear(&self) {
        *self.write() = ScopeState::default();
    }

    /// Drop the selection from memory and storage (explicit logout).
    pub fn forget(&self) -> VaultResult<()> {
        self.clear();
        self.client.store().remove(SELECTED_ORGANIZATION_KEY)
    }

    /// Clear the in-memory scope if the session ended elsewhere, e.g. a
    /// failed refresh inside the client. The persisted id is kept.
    fn drop_if_ended(&self) {
        let status = self.client.status();
        if status.is_authenticated() {
            return;
        }
        let mut state = self.write();
        if !state.organizations.is_empty() || state.selected.is_some() {
            info!(?status, "Session ended, clearing organization scope");
            *state = ScopeState::default();
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ScopeState> {
        self.drop_if_ended();
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ScopeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
