//! Command handlers. Output goes to the given writer; prompts and logs go
//! to stderr.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Serialize;
use techvault_client::services::EntityService;
use techvault_client::token;
use techvault_core::http::Transport;
use techvault_core::models::configuration::Configuration;
use techvault_core::models::documentation::Documentation;
use techvault_core::models::password::PasswordEntry;
use techvault_core::models::user::{Credentials, User};
use techvault_core::storage::KeyValueStore;
use techvault_core::{Entity, EntityId, ListQuery, Versioned};
use techvault_session::{LoginOutcome, TechVault};

use crate::cli::{
    ChoicesArgs, Command, ListArgs, LoginArgs, OrgsCommand, ReportArgs, Resource,
    VersionedResource, VersionsCommand,
};

pub async fn run<T, S, W>(vault: &TechVault<T, S>, command: Command, out: &mut W) -> anyhow::Result<()>
where
    T: Transport,
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Login(args) => login(vault, args, out).await,
        Command::Logout => {
            vault.logout().await?;
            writeln!(out, "Logged out")?;
            Ok(())
        }
        Command::Whoami => whoami(vault, out).await,
        Command::Orgs(cmd) => orgs(vault, cmd, out).await,
        Command::List(args) => list(vault, args, out).await,
        Command::Choices(args) => choices(vault, args, out).await,
        Command::Versions(cmd) => versions(vault, cmd, out).await,
        Command::Report(args) => report(vault, args, out).await,
    }
}

async fn login<T: Transport, S: KeyValueStore, W: Write>(
    vault: &TechVault<T, S>,
    args: LoginArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let credentials = Credentials::new(args.username, password);

    let user = match vault.login(&credentials).await? {
        LoginOutcome::Authenticated(user) => user,
        LoginOutcome::TwoFactorRequired => {
            let code = match args.otp {
                Some(code) => code,
                None => prompt("Two-factor code: ")?,
            };
            match vault.login(&credentials.with_otp(code)).await? {
                LoginOutcome::Authenticated(user) => user,
                LoginOutcome::TwoFactorRequired => bail!("server asked for a second two-factor code"),
            }
        }
    };

    writeln!(out, "Logged in as {}", user.display_name())?;
    Ok(())
}

async fn whoami<T: Transport, S: KeyValueStore, W: Write>(
    vault: &TechVault<T, S>,
    out: &mut W,
) -> anyhow::Result<()> {
    let user = require_session(vault).await?;
    writeln!(out, "{} <{}>", user.display_name(), user.email)?;
    writeln!(out, "username: {}", user.username)?;
    writeln!(
        out,
        "two-factor: {}",
        if user.two_factor_enabled { "enabled" } else { "disabled" }
    )?;
    if let Some(access) = vault.client().access_token()? {
        match token::access_token_expiry(&access) {
            Some(at) if token::is_expired(&access) => {
                writeln!(out, "access token expired: {}", at.to_rfc3339())?
            }
            Some(at) => writeln!(out, "access token expires: {}", at.to_rfc3339())?,
            None => writeln!(out, "access token expires: unknown")?,
        }
    }
    if let Some(org) = vault.scope.selected() {
        writeln!(out, "organization: {} ({})", org.name, org.id)?;
    }
    Ok(())
}

async fn orgs<T: Transport, S: KeyValueStore, W: Write>(
    vault: &TechVault<T, S>,
    command: OrgsCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    require_session(vault).await?;
    match command {
        OrgsCommand::List => {
            let selected = vault.scope.selected_id();
            for org in vault.scope.organizations() {
                let marker = if Some(org.id) == selected { "*" } else { " " };
                writeln!(out, "{marker} {:>5}  {}", org.id, org.name)?;
            }
        }
        OrgsCommand::Current => match vault.scope.selected() {
            Some(org) => writeln!(out, "{} ({})", org.name, org.id)?,
            None => writeln!(out, "No organization selected")?,
        },
        OrgsCommand::Select { id } => {
            if let Some(org) = vault.scope.set_selected(Some(id))? {
                writeln!(out, "Selected {} ({})", org.name, org.id)?;
            }
        }
        OrgsCommand::Clear => {
            vault.scope.set_selected(None)?;
            writeln!(out, "Cleared organization selection")?;
        }
    }
    Ok(())
}

async fn list<T: Transport, S: KeyValueStore, W: Write>(
    vault: &TechVault<T, S>,
    args: ListArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    require_session(vault).await?;
    let query = ListQuery {
        organization: if args.all {
            None
        } else {
            args.org.or_else(|| vault.scope.selected_id())
        },
        search: args.search,
        page: None,
    };

    let svc = &vault.services;
    match args.resource {
        Resource::Organizations => print_list(vault, &svc.organizations, &query, out).await,
        Resource::Locations => print_list(vault, &svc.locations, &query, out).await,
        Resource::Contacts => print_list(vault, &svc.contacts, &query, out).await,
        Resource::Documentations => print_list(vault, &svc.documentations, &query, out).await,
        Resource::Passwords => print_list(vault, &svc.passwords, &query, out).await,
        Resource::Configurations => print_list(vault, &svc.configurations, &query, out).await,
        Resource::NetworkDevices => print_list(vault, &svc.network_devices, &query, out).await,
        Resource::Servers => print_list(vault, &svc.servers, &query, out).await,
        Resource::EndpointUsers => print_list(vault, &svc.endpoint_users, &query, out).await,
        Resource::Peripherals => print_list(vault, &svc.peripherals, &query, out).await,
        Resource::Software => print_list(vault, &svc.software, &query, out).await,
        Resource::Backups => print_list(vault, &svc.backups, &query, out).await,
        Resource::Voip => print_list(vault, &svc.voip, &query, out).await,
    }
}

async fn print_list<T, S, E, W>(
    vault: &TechVault<T, S>,
    service: &EntityService<T, S, E>,
    query: &ListQuery,
    out: &mut W,
) -> anyhow::Result<()>
where
    T: Transport,
    S: KeyValueStore,
    E: Entity + Serialize,
    W: Write,
{
    let records = vault.guard(service.list(query).await)?;
    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

async fn choices<T: Transport, S: KeyValueStore, W: Write>(
    vault: &TechVault<T, S>,
    args: ChoicesArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    require_session(vault).await?;
    match args.value {
        Some(value) => writeln!(out, "{}", vault.choices.label(args.category, &value).await)?,
        None => {
            for option in vault.choices.options(args.category).await {
                writeln!(out, "{}\t{}", option.value, option.label)?;
            }
        }
    }
    Ok(())
}

async fn versions<T: Transport, S: KeyValueStore, W: Write>(
    vault: &TechVault<T, S>,
    command: VersionsCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    require_session(vault).await?;
    let resource = match &command {
        VersionsCommand::List { resource, .. }
        | VersionsCommand::Show { resource, .. }
        | VersionsCommand::Restore { resource, .. } => *resource,
    };
    match resource {
        VersionedResource::Documentation => run_versions::<_, _, Documentation, _>(vault, command, out).await,
        VersionedResource::Password => run_versions::<_, _, PasswordEntry, _>(vault, command, out).await,
        VersionedResource::Configuration => run_versions::<_, _, Configuration, _>(vault, command, out).await,
    }
}

async fn run_versions<T, S, E, W>(
    vault: &TechVault<T, S>,
    command: VersionsCommand,
    out: &mut W,
) -> anyhow::Result<()>
where
    T: Transport,
    S: KeyValueStore,
    E: Versioned,
    W: Write,
{
    match command {
        VersionsCommand::List { id, .. } => {
            let mut history = vault.versions::<E>(id);
            for v in vault.guard(history.load().await.map(<[_]>::to_vec))? {
                writeln!(
                    out,
                    "v{}\t{}\t{}\t{}",
                    v.version_number,
                    v.created_at.format("%Y-%m-%d %H:%M"),
                    v.author().unwrap_or_else(|| "-".into()),
                    v.change_note.as_deref().unwrap_or("")
                )?;
            }
        }
        VersionsCommand::Show { id, version, .. } => {
            let mut history = vault.versions::<E>(id);
            vault.guard(history.load().await.map(|_| ()))?;
            let Some(v) = history.version(version) else {
                bail!("{} {id} has no version {version}", E::NAME);
            };
            for (field, value) in v.fields() {
                writeln!(out, "{field}: {value}")?;
            }
        }
        VersionsCommand::Restore {
            id, version, yes, ..
        } => {
            let mut history = vault.versions::<E>(id);
            vault.guard(history.load().await.map(|_| ()))?;
            let outcome = vault.guard(
                history
                    .restore(version, |v| {
                        yes || confirm(&format!(
                            "Restore {} {id} to version {} from {}?",
                            E::NAME,
                            v.version_number,
                            v.created_at.format("%Y-%m-%d %H:%M")
                        ))
                    })
                    .await,
            )?;
            match outcome.restored_version() {
                None => writeln!(out, "Restore cancelled")?,
                Some(version_number) => {
                    // The history may be stale; the record itself is authoritative.
                    let service = EntityService::<T, S, E>::new(vault.client().clone());
                    let live = vault.guard(service.get(id).await)?;
                    writeln!(
                        out,
                        "Restored {} {id} to version {version_number} (now version {})",
                        E::NAME,
                        live.version_number()
                    )?;
                }
            }
        }
    }
    Ok(())
}

async fn report<T: Transport, S: KeyValueStore, W: Write>(
    vault: &TechVault<T, S>,
    args: ReportArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    require_session(vault).await?;
    let organization = args.org.or_else(|| vault.scope.selected_id());
    let report = vault.guard(
        vault
            .services
            .reports
            .generate(args.kind, args.format, organization)
            .await,
    )?;

    let path = output_path(args.out.as_deref(), &report.file_name);
    std::fs::write(&path, &report.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    writeln!(out, "Wrote {} ({} bytes)", path.display(), report.bytes.len())?;
    Ok(())
}

/// `out` may name a file or an existing directory.
fn output_path(out: Option<&Path>, file_name: &str) -> PathBuf {
    match out {
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

async fn require_session<T: Transport, S: KeyValueStore>(
    vault: &TechVault<T, S>,
) -> anyhow::Result<User> {
    match vault.start().await? {
        Some(user) => Ok(user),
        None => bail!("not logged in; run `techvault login` first"),
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> bool {
    match prompt(&format!("{question} [y/N] ")) {
        Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
