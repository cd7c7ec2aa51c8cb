// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Chronological merge and truncation of collected entries

use gip_log::LogEntry;

/// Sort entries oldest first
///
/// Equal timestamps are ordered by repository name; entries equal on both
/// keep their collected order.
pub fn sort_entries(entries: &mut [LogEntry]) {
    entries.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.repo.cmp(&b.repo))
    });
}

/// Keep only the `limit` most recent entries of a sorted list
///
/// `None` and `Some(0)` keep everything.
#[must_use]
pub fn keep_most_recent(mut entries: Vec<LogEntry>, limit: Option<usize>) -> Vec<LogEntry> {
    if let Some(limit) = limit
        && limit > 0
        && entries.len() > limit
    {
        entries.drain(..entries.len() - limit);
    }
    entries
}

/// Sort then truncate
#[must_use]
pub fn merge_and_bound(mut entries: Vec<LogEntry>, limit: Option<usize>) -> Vec<LogEntry> {
    sort_entries(&mut entries);
    keep_most_recent(entries, limit)
}
