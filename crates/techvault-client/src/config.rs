//! Client configuration.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use techvault_core::error::VaultResult;

use crate::client::RefreshPolicy;
use crate::error::ClientError;

/// Prefix for environment overrides, e.g. `TECHVAULT_BASE_URL`.
pub const ENV_PREFIX: &str = "TECHVAULT_";

/// Configuration for talking to a TechVault server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API origin, e.g. `https://vault.example.com`. Paths start with `/api/`.
    pub base_url: String,
    /// TCP connect timeout in seconds (default: 10).
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds (default: 30).
    pub request_timeout_secs: u64,
    /// Token refresh behaviour on 401 responses.
    pub refresh: RefreshPolicy,
    /// Session file location. `None` uses the platform data directory.
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            refresh: RefreshPolicy::default(),
            storage_path: None,
        }
    }
}

/// Load a configuration struct from layered sources:
/// defaults < TOML file (if given and present) < `TECHVAULT_*` env vars.
///
/// Nested keys use a double underscore in the environment, e.g.
/// `TECHVAULT_REFRESH__MAX_RETRIES=0` for a field nested under `refresh`.
pub fn load_layered<T>(file: Option<&Path>) -> VaultResult<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let mut figment = Figment::from(Serialized::defaults(T::default()));
    if let Some(path) = file {
        figment = figment.merge(Toml::file(path));
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
    Ok(figment.extract().map_err(ClientError::from)?)
}
