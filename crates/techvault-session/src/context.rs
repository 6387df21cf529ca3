//! Application context: one client, the entity services, and the session
//! stores, wired together and reset together.

use techvault_client::services::{EntityService, Services};
use techvault_client::{ApiClient, FileStore, ReqwestTransport};
use techvault_core::error::VaultResult;
use techvault_core::http::Transport;
use techvault_core::models::session::SessionStatus;
use techvault_core::models::user::{Credentials, Registration, User};
use techvault_core::storage::KeyValueStore;
use techvault_core::{EntityId, Versioned};
use tracing::warn;

use crate::auth::{AuthStore, LoginOutcome};
use crate::choices::ChoicesCache;
use crate::config::TechVaultConfig;
use crate::history::VersionHistory;
use crate::scope::OrganizationScope;

/// Everything a page or command needs, built once per process.
pub struct TechVault<T: Transport, S: KeyValueStore> {
    client: ApiClient<T, S>,
    pub services: Services<T, S>,
    pub auth: AuthStore<T, S>,
    pub scope: OrganizationScope<T, S>,
    pub choices: ChoicesCache<T, S>,
}

impl TechVault<ReqwestTransport, FileStore> {
    /// Build the production context: reqwest transport and the on-disk
    /// session file.
    pub fn connect(config: &TechVaultConfig) -> VaultResult<Self> {
        let transport = ReqwestTransport::new(&config.client)?;
        let path = match &config.client.storage_path {
            Some(path) => path.clone(),
            None => FileStore::default_path()?,
        };
        let store = FileStore::open(path)?;
        Ok(Self::new(transport, store, config))
    }
}

impl<T: Transport, S: KeyValueStore> TechVault<T, S> {
    pub fn new(transport: T, store: S, config: &TechVaultConfig) -> Self {
        let client = ApiClient::new(transport, store, config.client.refresh);
        Self {
            services: Services::new(&client),
            auth: AuthStore::new(client.clone(), config.auth.clone()),
            scope: OrganizationScope::new(client.clone()),
            choices: ChoicesCache::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient<T, S> {
        &self.client
    }

    pub fn status(&self) -> SessionStatus {
        self.client.status()
    }

    /// Resume the stored session, if any, and load the organization scope.
    pub async fn start(&self) -> VaultResult<Option<User>> {
        let user = self.auth.restore().await?;
        if user.is_some() {
            self.guard(self.scope.on_auth_changed(true).await)?;
        }
        Ok(user)
    }

    pub async fn login(&self, credentials: &Credentials) -> VaultResult<LoginOutcome> {
        let outcome = self.auth.login(credentials).await?;
        if let LoginOutcome::Authenticated(_) = &outcome {
            self.guard(self.scope.on_auth_changed(true).await)?;
        }
        Ok(outcome)
    }

    pub async fn register(&self, registration: &Registration) -> VaultResult<User> {
        let user = self.auth.register(registration).await?;
        self.guard(self.scope.on_auth_changed(true).await)?;
        Ok(user)
    }

    /// Log out and reset every store, including the persisted organization.
    pub async fn logout(&self) -> VaultResult<()> {
        self.auth.logout().await?;
        self.scope.forget()?;
        self.choices.invalidate().await;
        Ok(())
    }

    /// Version history for one record of a versioned entity type.
    pub fn versions<E: Versioned>(&self, id: EntityId) -> VersionHistory<EntityService<T, S, E>> {
        VersionHistory::new(EntityService::new(self.client.clone()), id)
    }

    /// Drop in-memory session state if the client has expired the session
    /// behind our back (failed refresh). Returns the current status.
    ///
    /// The scope accessors do this on their own; calling it eagerly frees
    /// the state without waiting for the next read.
    pub fn sync_session(&self) -> SessionStatus {
        let status = self.client.status();
        if !status.is_authenticated() {
            self.scope.clear();
        }
        status
    }

    /// Pass a result through, resetting session state when it carries an
    /// authentication failure.
    pub fn guard<R>(&self, result: VaultResult<R>) -> VaultResult<R> {
        if let Err(e) = &result {
            if e.is_auth() {
                warn!(error = %e, "Request rejected for authentication");
                self.sync_session();
            }
        }
        result
    }
}
