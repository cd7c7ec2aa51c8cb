// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Concurrent collection of log entries across repositories
//!
//! Every target gets its own task. Tasks push entries into one bounded
//! channel while the caller drains it; the channel closes once the last
//! task has dropped its sender, which is the completion barrier.

use std::sync::Arc;
use std::time::Duration;

use gip_log::{LogEntry, LogSource, RepoTarget, TimeWindow, extract};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::DEFAULT_TIMEOUT_SECS;

/// Capacity of the shared entry channel
pub const CHANNEL_CAPACITY: usize = 500;

/// Collection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Per-repository time limit; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Entry channel capacity
    pub capacity: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            capacity: CHANNEL_CAPACITY,
        }
    }
}

/// Extract every target concurrently and gather all entries
///
/// Each task first runs [`LogSource::prepare`] and then reads the log; the
/// time limit applies to each step separately, so a stalled fetch only costs
/// the fetch. Ordering across repositories is arbitrary; entries from one repository
/// keep their relative order. A repository that fails, times out or panics
/// contributes whatever it sent before stopping.
pub async fn collect(
    source: Arc<dyn LogSource>,
    targets: Vec<RepoTarget>,
    window: &TimeWindow,
    options: &CollectOptions,
) -> Vec<LogEntry> {
    let task_count = targets.len();
    let (tx, mut rx) = mpsc::channel(options.capacity.max(1));
    let mut tasks = JoinSet::new();

    for target in targets {
        let source = Arc::clone(&source);
        let tx = tx.clone();
        let window = window.clone();
        let limit = options.timeout;

        tasks.spawn(async move {
            let prepare = source.prepare(&target);
            match limit {
                Some(limit) => {
                    if tokio::time::timeout(limit, prepare).await.is_err() {
                        warn!(
                            repo = %target.name,
                            timeout_secs = limit.as_secs_f64(),
                            "Fetch timed out, reading log anyway"
                        );
                    }
                }
                None => prepare.await,
            }

            let run = extract(source.as_ref(), &target, &window, &tx);
            match limit {
                Some(limit) => match tokio::time::timeout(limit, run).await {
                    Ok(sent) => sent,
                    Err(_) => {
                        warn!(
                            repo = %target.name,
                            timeout_secs = limit.as_secs_f64(),
                            "Repository timed out"
                        );
                        0
                    }
                },
                None => run.await,
            }
        });
    }
    drop(tx);

    let mut entries = Vec::new();
    while let Some(entry) = rx.recv().await {
        entries.push(entry);
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            warn!(error = %e, "Extraction task failed");
        }
    }

    debug!(
        repos = task_count,
        entries = entries.len(),
        "Collection complete"
    );
    entries
}
