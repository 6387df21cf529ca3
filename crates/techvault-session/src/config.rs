//! Session configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use techvault_client::ClientConfig;
use techvault_client::config::load_layered;
use techvault_core::error::VaultResult;

/// When to fetch `/api/user/profile/` after login or registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRefetch {
    /// Always fetch the profile before the session counts as established.
    #[default]
    Always,
    /// Only fetch when the auth response lacks the user or its full name.
    WhenIncomplete,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub profile_refetch: ProfileRefetch,
}

/// Everything needed to build a [`crate::TechVault`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechVaultConfig {
    pub client: ClientConfig,
    pub auth: AuthConfig,
}

impl TechVaultConfig {
    /// Defaults < TOML file < `TECHVAULT_*` environment.
    pub fn load(file: Option<&Path>) -> VaultResult<Self> {
        load_layered(file)
    }
}
