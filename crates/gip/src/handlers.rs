// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command handlers
//!
//! This module maps each parsed subcommand onto registry operations or a
//! view, and writes the result to the given output.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use console::Term;
use gip_log::{LogEntry, LogError, LogSource, discover_workdir};
use thiserror::Error;
use tracing::{debug, info};

use crate::collect::CollectOptions;
use crate::config::{Command, Config, GroupCommand, RepoCommand, ViewArgs};
use crate::registry::{Registry, RegistryError};
use crate::render::{entries_json, entries_table, groups_table, repos_table};
use crate::view::{ViewError, ViewRequest, ViewScope, run_view};

// ============================================================================
// Error Types
// ============================================================================

/// Handler errors
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Registry error
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// View error
    #[error("{0}. Use 'gip group list' or 'gip repo list' to see what is registered.")]
    View(#[from] ViewError),

    /// Path given to `repo add` is not a usable repository
    #[error("Not a git working tree: {0}")]
    Repository(#[from] LogError),

    /// Output error
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run the configured command, writing results to `out`
///
/// `width` limits table lines, normally the terminal width when stdout is
/// a terminal.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or saved, a name is
/// unknown, or output fails.
pub async fn run(
    config: &Config,
    out: &mut dyn Write,
    width: Option<usize>,
) -> Result<(), HandlerError> {
    let Some(command) = &config.command else {
        return Ok(());
    };

    let path = config.registry_path();
    let mut registry = Registry::load(&path)?;
    debug!(
        path = %path.display(),
        groups = registry.groups.len(),
        repos = registry.repos.len(),
        "Loaded registry"
    );

    match command {
        Command::Group(cmd) => handle_group(&mut registry, &path, cmd, out),
        Command::Repo(cmd) => handle_repo(&mut registry, &path, cmd, out),
        Command::View { group, options } => {
            handle_view(
                config,
                &registry,
                ViewScope::Group(group.clone()),
                options,
                out,
                width,
            )
            .await
        }
        Command::ViewRepo { repo, options } => {
            handle_view(
                config,
                &registry,
                ViewScope::Repo(repo.clone()),
                options,
                out,
                width,
            )
            .await
        }
    }
}

// ============================================================================
// Registry Commands
// ============================================================================

fn handle_group(
    registry: &mut Registry,
    path: &Path,
    cmd: &GroupCommand,
    out: &mut dyn Write,
) -> Result<(), HandlerError> {
    match cmd {
        GroupCommand::List => {
            write!(out, "{}", groups_table(registry).render())?;
            return Ok(());
        }
        GroupCommand::Create { name } => {
            registry.create_group(name)?;
            info!(group = %name, "Created group");
        }
        GroupCommand::Add { repo, group } => {
            registry.add_to_group(repo, group)?;
            info!(repo = %repo, group = %group, "Added repository to group");
        }
        GroupCommand::Rename { group, name } => {
            registry.rename_group(group, name)?;
            info!(group = %group, name = %name, "Renamed group");
        }
        GroupCommand::Remove { group } => {
            let removed = registry.remove_group(group)?;
            info!(group = %group, members = removed.repos.len(), "Removed group");
        }
    }
    registry.save(path)?;
    Ok(())
}

fn handle_repo(
    registry: &mut Registry,
    path: &Path,
    cmd: &RepoCommand,
    out: &mut dyn Write,
) -> Result<(), HandlerError> {
    match cmd {
        RepoCommand::List { group: None } => {
            write!(out, "{}", repos_table(&registry.repos).render())?;
            return Ok(());
        }
        RepoCommand::List { group: Some(group) } => {
            if registry.resolve_group(group).is_none() {
                return Err(RegistryError::GroupNotFound(group.clone()).into());
            }
            write!(out, "{}", repos_table(registry.group_members(group)).render())?;
            return Ok(());
        }
        RepoCommand::Add { name, path: repo_path, groups } => {
            let workdir = discover_workdir(repo_path)?;
            registry.add_repo(name, &workdir, groups)?;
            info!(repo = %name, path = %workdir.display(), "Registered repository");
        }
        RepoCommand::Remove { name } => {
            let removed = registry.remove_repo(name)?;
            info!(repo = %name, groups = removed.groups.len(), "Removed repository");
        }
    }
    registry.save(path)?;
    Ok(())
}

// ============================================================================
// Views
// ============================================================================

async fn handle_view(
    config: &Config,
    registry: &Registry,
    scope: ViewScope,
    options: &ViewArgs,
    out: &mut dyn Write,
    width: Option<usize>,
) -> Result<(), HandlerError> {
    let request = ViewRequest {
        scope,
        window: options.window(),
        limit: options.limit(),
    };
    let source: Arc<dyn LogSource> = Arc::new(config.log_source(options.fetch));
    let collect_options = CollectOptions {
        timeout: config.task_timeout(),
        ..Default::default()
    };

    if !options.watch {
        let entries = run_view(registry, source, &request, &collect_options).await?;
        return write_entries(&entries, options.json, out, width);
    }

    let term = Term::stdout();
    let stop = tokio::signal::ctrl_c();
    tokio::pin!(stop);

    loop {
        let entries = tokio::select! {
            result = run_view(registry, Arc::clone(&source), &request, &collect_options) => result?,
            _ = &mut stop => break,
        };

        if term.is_term() {
            term.clear_screen()?;
        }
        let updated_at = Local::now().format("%a %H:%M:%S").to_string();
        write_refresh(&entries, options.json, out, width, &updated_at)?;
        out.flush()?;

        tokio::select! {
            () = tokio::time::sleep(options.interval()) => {}
            _ = &mut stop => break,
        }
    }

    info!("Stopped watching");
    Ok(())
}

/// Write one watch refresh
///
/// JSON output stays a bare document per refresh; the timestamp goes to the
/// log instead.
fn write_refresh(
    entries: &[LogEntry],
    json: bool,
    out: &mut dyn Write,
    width: Option<usize>,
    updated_at: &str,
) -> Result<(), HandlerError> {
    if json {
        info!(updated_at, "Refreshed");
    } else {
        writeln!(out, "Updated at {updated_at}")?;
    }
    write_entries(entries, json, out, width)
}

/// Write entries as a table or JSON
fn write_entries(
    entries: &[LogEntry],
    json: bool,
    out: &mut dyn Write,
    width: Option<usize>,
) -> Result<(), HandlerError> {
    if entries.is_empty() {
        info!("No commits found");
    }

    if json {
        writeln!(out, "{}", entries_json(entries)?)?;
    } else {
        write!(out, "{}", entries_table(entries, width).render())?;
    }
    Ok(())
}
