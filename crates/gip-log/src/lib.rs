// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gip-log: Git log extraction for gip
//!
//! This library crate runs `git log` over a repository, pipes the output
//! through an emoji filter, and parses each line into a [`LogEntry`].

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gip_log::{GitLogSource, LogSource, RepoTarget, TimeWindow};
//!
//! # async fn run() {
//! let (tx, mut rx) = tokio::sync::mpsc::channel(64);
//! let source = GitLogSource::new().with_filter(None);
//! let target = RepoTarget::new("gip", ".");
//! source
//!     .stream(&target, &TimeWindow::new(Some("1 week ago"), None), &tx)
//!     .await
//!     .expect("stream log");
//! drop(tx);
//!
//! while let Some(entry) = rx.recv().await {
//!     println!("{} {} {}", entry.display_time, entry.author, entry.message);
//! }
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod extractor;
pub mod parser;

pub use entry::{LogEntry, SignatureStatus};
pub use error::LogError;
pub use extractor::{
    FilterCommand, GitLogSource, LogSource, RepoTarget, TimeWindow, discover_workdir, extract,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::entry::{LogEntry, SignatureStatus};
    pub use crate::error::LogError;
    pub use crate::extractor::{GitLogSource, LogSource, RepoTarget, TimeWindow};
}
