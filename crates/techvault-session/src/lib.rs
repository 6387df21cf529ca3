//! TechVault Session: the client-side state that pages and commands
//! share: who is logged in, which organization is selected, the cached
//! dropdown choices, and the version-restore flow.
//!
//! Each store is an explicit service object owned by [`TechVault`],
//! constructed once per process and reset on logout.

pub mod auth;
pub mod choices;
pub mod config;
pub mod context;
pub mod history;
pub mod scope;

pub use auth::{AuthStore, LoginOutcome};
pub use choices::ChoicesCache;
pub use config::{AuthConfig, ProfileRefetch, TechVaultConfig};
pub use context::TechVault;
pub use history::{RestoreOutcome, VersionHistory};
pub use scope::OrganizationScope;
