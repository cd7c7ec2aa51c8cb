// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Group and repository views
//!
//! A view resolves its scope against the registry, collects entries from
//! every target, then merges and bounds them.

use std::sync::Arc;

use gip_log::{LogEntry, LogSource, RepoTarget, TimeWindow};
use thiserror::Error;
use tracing::{debug, info};

use crate::collect::{CollectOptions, collect};
use crate::merge::merge_and_bound;
use crate::registry::Registry;

/// View errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// Group not found
    #[error("Could not find group: {0}")]
    UnknownGroup(String),

    /// Repository not found
    #[error("Could not find repo: {0}")]
    UnknownRepo(String),
}

/// What a view covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewScope {
    /// Every listed member of a group
    Group(String),
    /// A single registered repository
    Repo(String),
}

impl ViewScope {
    /// Resolve the scope to extraction targets
    ///
    /// # Errors
    ///
    /// Returns an error if the group or repository is not registered.
    pub fn targets(&self, registry: &Registry) -> Result<Vec<RepoTarget>, ViewError> {
        match self {
            Self::Group(group) => registry
                .group_targets(group)
                .ok_or_else(|| ViewError::UnknownGroup(group.clone())),
            Self::Repo(repo) => registry
                .resolve_repo_path(repo)
                .map(|path| vec![RepoTarget::new(repo.as_str(), path)])
                .ok_or_else(|| ViewError::UnknownRepo(repo.clone())),
        }
    }
}

/// A fully specified view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    /// Group or repository
    pub scope: ViewScope,
    /// Commit time bounds
    pub window: TimeWindow,
    /// Keep only this many most recent entries
    pub limit: Option<usize>,
}

/// Build a view: resolve, collect, merge, bound
///
/// # Errors
///
/// Returns an error only when the scope is not registered. Unreachable
/// repositories are logged and contribute nothing.
pub async fn run_view(
    registry: &Registry,
    source: Arc<dyn LogSource>,
    request: &ViewRequest,
    options: &CollectOptions,
) -> Result<Vec<LogEntry>, ViewError> {
    let targets = request.scope.targets(registry)?;
    if targets.is_empty() {
        info!(scope = ?request.scope, "Nothing to view");
        return Ok(Vec::new());
    }

    debug!(
        scope = ?request.scope,
        repos = targets.len(),
        after = ?request.window.after,
        before = ?request.window.before,
        "Collecting"
    );
    let entries = collect(source, targets, &request.window, options).await;
    let entries = merge_and_bound(entries, request.limit);

    if let (Some(first), Some(last)) = (entries.first(), entries.last()) {
        info!(
            entries = entries.len(),
            oldest = ?first.committed_at(),
            newest = ?last.committed_at(),
            "View ready"
        );
    }
    Ok(entries)
}
