//! Domain models for TechVault.
//!
//! Each entity module holds the record type returned by the server plus
//! the create and patch payloads the forms submit.

pub mod backup;
pub mod choices;
pub mod configuration;
pub mod contact;
pub mod documentation;
pub mod endpoint;
pub mod location;
pub mod network_device;
pub mod organization;
pub mod password;
pub mod report;
pub mod server;
pub mod session;
pub mod software;
pub mod user;
pub mod version;
pub mod voip;
