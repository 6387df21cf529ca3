//! Report and export downloads from `/api/reports/*`.

use techvault_core::EntityId;
use techvault_core::error::VaultResult;
use techvault_core::http::{HttpRequest, Transport};
use techvault_core::models::report::{Report, ReportFormat, ReportKind};
use techvault_core::storage::KeyValueStore;
use tracing::info;

use crate::client::ApiClient;
use crate::paths;

pub struct ReportService<T: Transport, S: KeyValueStore> {
    client: ApiClient<T, S>,
}

impl<T: Transport, S: KeyValueStore> ReportService<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// Generate a report, optionally limited to one organization.
    pub async fn generate(
        &self,
        kind: ReportKind,
        format: ReportFormat,
        organization: Option<EntityId>,
    ) -> VaultResult<Report> {
        let mut request = HttpRequest::get(paths::report(kind.as_str())).with_query("format", format.as_str());
        if let Some(org) = organization {
            request = request.with_query("organization", org);
        }

        let response = self.client.execute(request).await?;
        let scope = organization.map_or_else(|| "all".to_string(), |id| format!("org{id}"));
        let file_name = format!("{kind}-{scope}.{}", format.as_str());

        info!(report = %kind, format = format.as_str(), bytes = response.body.len(), "Report generated");

        Ok(Report {
            file_name,
            content_type: response
                .content_type
                .unwrap_or_else(|| format.content_type().to_string()),
            bytes: response.body,
        })
    }
}
