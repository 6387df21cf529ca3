//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use techvault_core::EntityId;
use techvault_core::models::choices::ChoiceCategory;
use techvault_core::models::report::{ReportFormat, ReportKind};

/// Work with a TechVault server from the terminal.
#[derive(Debug, Parser)]
#[command(name = "techvault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML). `TECHVAULT_*` variables override it.
    #[arg(short, long, global = true, env = "TECHVAULT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session
    Login(LoginArgs),
    /// End the stored session
    Logout,
    /// Show the logged-in user and token lifetime
    Whoami,
    /// List or select organizations
    #[command(subcommand)]
    Orgs(OrgsCommand),
    /// List records of one resource as JSON
    List(ListArgs),
    /// Show the options of a choice category, or the label of one value
    Choices(ChoicesArgs),
    /// Inspect or restore the version history of a record
    #[command(subcommand)]
    Versions(VersionsCommand),
    /// Download a report
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(short, long, env = "TECHVAULT_USERNAME")]
    pub username: String,

    /// Read from stdin when not given
    #[arg(long, env = "TECHVAULT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// One-time code; prompted for when the server requires it
    #[arg(long, value_name = "CODE")]
    pub otp: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum OrgsCommand {
    /// List the organizations visible to the user
    List,
    /// Show the selected organization
    Current,
    /// Select an organization by id
    Select { id: EntityId },
    /// Clear the selection
    Clear,
}

/// Resources that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Organizations,
    Locations,
    Contacts,
    Documentations,
    Passwords,
    Configurations,
    NetworkDevices,
    Servers,
    EndpointUsers,
    Peripherals,
    Software,
    Backups,
    Voip,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    /// Organization filter; defaults to the selected organization
    #[arg(long)]
    pub org: Option<EntityId>,

    /// List across all organizations even when one is selected
    #[arg(long, conflicts_with = "org")]
    pub all: bool,

    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChoicesArgs {
    /// Category name, e.g. `server_type`
    pub category: ChoiceCategory,

    /// Print only the label of this value
    pub value: Option<String>,
}

/// Resources with a version history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VersionedResource {
    Documentation,
    Password,
    Configuration,
}

#[derive(Debug, Subcommand)]
pub enum VersionsCommand {
    /// List the versions of a record
    List {
        #[arg(value_enum)]
        resource: VersionedResource,
        id: EntityId,
    },
    /// Print the fields stored in one version
    Show {
        #[arg(value_enum)]
        resource: VersionedResource,
        id: EntityId,
        #[arg(id = "version_number", value_name = "VERSION")]
        version: u32,
    },
    /// Restore a record to an earlier version
    Restore {
        #[arg(value_enum)]
        resource: VersionedResource,
        id: EntityId,
        #[arg(id = "version_number", value_name = "VERSION")]
        version: u32,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report kind, e.g. `asset_inventory`
    pub kind: ReportKind,

    #[arg(short, long, default_value = "pdf")]
    pub format: ReportFormat,

    /// Limit to one organization; defaults to the selected organization
    #[arg(long)]
    pub org: Option<EntityId>,

    /// Output file or directory; defaults to the server-suggested name
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}
