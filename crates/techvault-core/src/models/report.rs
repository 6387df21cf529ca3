//! Report/export descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    OrganizationSummary,
    AssetInventory,
    SoftwareLicenses,
    BackupStatus,
    PasswordAudit,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::OrganizationSummary,
        ReportKind::AssetInventory,
        ReportKind::SoftwareLicenses,
        ReportKind::BackupStatus,
        ReportKind::PasswordAudit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::OrganizationSummary => "organization_summary",
            ReportKind::AssetInventory => "asset_inventory",
            ReportKind::SoftwareLicenses => "software_licenses",
            ReportKind::BackupStatus => "backup_status",
            ReportKind::PasswordAudit => "password_audit",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| VaultError::validation(format!("unknown report kind: {s}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Csv,
    Xlsx,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
            ReportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Csv => "text/csv",
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl FromStr for ReportFormat {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ReportFormat::Pdf),
            "csv" => Ok(ReportFormat::Csv),
            "xlsx" => Ok(ReportFormat::Xlsx),
            other => Err(VaultError::validation(format!(
                "unknown report format: {other}"
            ))),
        }
    }
}

/// A generated export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
