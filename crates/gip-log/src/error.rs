// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gip-log

use thiserror::Error;

/// Errors that can occur while extracting a repository's log
#[derive(Debug, Error)]
pub enum LogError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error while talking to a child process
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository not found at the specified path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// Repository has no working tree
    #[error("Repository has no working tree: {path}")]
    BareRepository {
        /// The path of the bare repository
        path: String,
    },

    /// Repository name has no registered path
    #[error("Repository is not registered: {repo}")]
    Unregistered {
        /// The repository name
        repo: String,
    },

    /// A child process could not be started
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        /// The program that failed to start
        program: String,
        /// The underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// A child process was spawned without the expected pipe
    #[error("No {stream} pipe for `{program}`")]
    MissingPipe {
        /// The program whose pipe is missing
        program: String,
        /// Which stream was expected
        stream: &'static str,
    },

    /// A log line could not be parsed into an entry
    #[error("Malformed log record: {reason}")]
    MalformedRecord {
        /// Why the record was rejected
        reason: String,
    },

    /// The receiving side of the entry channel went away
    #[error("Entry channel closed")]
    ChannelClosed,
}
