//! TechVault Client: talks to the TechVault REST API.
//!
//! This crate provides:
//! - The reqwest-backed [`ReqwestTransport`]
//! - Durable session storage ([`MemoryStore`], [`FileStore`])
//! - [`ApiClient`], which attaches the bearer token and runs the
//!   refresh-and-retry policy
//! - Typed CRUD services for every entity ([`services`])
//! - Client configuration ([`ClientConfig`])

pub mod client;
pub mod config;
pub mod error;
pub mod paths;
pub mod services;
pub mod storage;
pub mod token;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{ApiClient, RefreshPolicy};
pub use config::ClientConfig;
pub use error::ClientError;
pub use services::Services;
pub use storage::{FileStore, MemoryStore};
pub use transport::ReqwestTransport;
