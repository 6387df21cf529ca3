//! TechVault Core: domain models, the error taxonomy, and the traits
//! the client is built on ([`http::Transport`], [`storage::KeyValueStore`]).

pub mod entity;
pub mod error;
pub mod http;
pub mod models;
pub mod storage;

pub use entity::{Entity, EntityId, ListQuery, Versioned};
pub use error::{VaultError, VaultResult};
