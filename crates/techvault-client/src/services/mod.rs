//! Per-entity REST services.
//!
//! Every entity gets the generic [`EntityService`]; sub-resources such as
//! `by_organization/` or `publish/` are added by the sibling modules, and
//! versioned entities implement [`VersionSource`].

mod contact;
mod documentation;
mod entity;
mod location;
mod organization;
mod reports;
mod versions;

pub use entity::EntityService;
pub use reports::ReportService;
pub use versions::VersionSource;

use techvault_core::http::Transport;
use techvault_core::models::{
    backup::Backup, configuration::Configuration, contact::Contact, documentation::Documentation,
    endpoint::{EndpointUser, Peripheral}, location::Location, network_device::NetworkDevice,
    organization::Organization, password::PasswordEntry, server::Server, software::Software,
    voip::VoipAssignment,
};
use techvault_core::storage::KeyValueStore;

use crate::client::ApiClient;

pub type Organizations<T, S> = EntityService<T, S, Organization>;
pub type Locations<T, S> = EntityService<T, S, Location>;
pub type Contacts<T, S> = EntityService<T, S, Contact>;
pub type Documentations<T, S> = EntityService<T, S, Documentation>;
pub type Passwords<T, S> = EntityService<T, S, PasswordEntry>;
pub type Configurations<T, S> = EntityService<T, S, Configuration>;

/// One handle per resource, all sharing the same [`ApiClient`].
pub struct Services<T: Transport, S: KeyValueStore> {
    pub organizations: Organizations<T, S>,
    pub locations: Locations<T, S>,
    pub contacts: Contacts<T, S>,
    pub documentations: Documentations<T, S>,
    pub passwords: Passwords<T, S>,
    pub configurations: Configurations<T, S>,
    pub network_devices: EntityService<T, S, NetworkDevice>,
    pub servers: EntityService<T, S, Server>,
    pub endpoint_users: EntityService<T, S, EndpointUser>,
    pub peripherals: EntityService<T, S, Peripheral>,
    pub software: EntityService<T, S, Software>,
    pub backups: EntityService<T, S, Backup>,
    pub voip: EntityService<T, S, VoipAssignment>,
    pub reports: ReportService<T, S>,
}

impl<T: Transport, S: KeyValueStore> Services<T, S> {
    pub fn new(client: &ApiClient<T, S>) -> Self {
        Self {
            organizations: EntityService::new(client.clone()),
            locations: EntityService::new(client.clone()),
            contacts: EntityService::new(client.clone()),
            documentations: EntityService::new(client.clone()),
            passwords: EntityService::new(client.clone()),
            configurations: EntityService::new(client.clone()),
            network_devices: EntityService::new(client.clone()),
            servers: EntityService::new(client.clone()),
            endpoint_users: EntityService::new(client.clone()),
            peripherals: EntityService::new(client.clone()),
            software: EntityService::new(client.clone()),
            backups: EntityService::new(client.clone()),
            voip: EntityService::new(client.clone()),
            reports: ReportService::new(client.clone()),
        }
    }
}
