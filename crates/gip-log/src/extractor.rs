// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-repository log extraction
//!
//! [`GitLogSource`] runs `git log` in a repository, streams its stdout
//! through an emoji filter process, and sends each parsed [`LogEntry`] on a
//! channel as soon as its line is read. Anything that implements
//! [`LogSource`] can stand in for it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use git2::{ErrorCode, Repository};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

use crate::entry::LogEntry;
use crate::error::LogError;
use crate::parser::{self, DISPLAY_DATE_FORMAT, RECORD_FORMAT};

/// Default emoji substitution filter
pub const DEFAULT_EMOJI_FILTER: &str = "emojify";

/// Optional `--after` / `--before` bounds in git's date grammar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    /// Only include commits after this date
    pub after: Option<String>,
    /// Only include commits before this date
    pub before: Option<String>,
}

impl TimeWindow {
    /// Build a window, treating empty strings as unbounded
    #[must_use]
    pub fn new(after: Option<&str>, before: Option<&str>) -> Self {
        let bound = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };
        Self {
            after: bound(after),
            before: bound(before),
        }
    }

    /// Window with no bounds
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// A repository to extract, as resolved from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    /// Registry name, stamped on every entry
    pub name: String,
    /// Working tree path; `None` when the name is not registered
    pub path: Option<PathBuf>,
}

impl RepoTarget {
    /// Target with a known path
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
        }
    }

    /// Target whose name has no registered path
    #[must_use]
    pub fn unregistered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }
}

/// A producer of log entries for one repository at a time
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Send the repository's entries, oldest first, on `tx`
    ///
    /// Returns the number of entries sent.
    ///
    /// # Errors
    ///
    /// Returns `LogError` if the repository cannot be read at all.
    async fn stream(
        &self,
        target: &RepoTarget,
        window: &TimeWindow,
        tx: &Sender<LogEntry>,
    ) -> Result<usize, LogError>;

    /// Bring the repository up to date before `stream` reads it
    ///
    /// Failures are logged, never returned; the log is read regardless.
    async fn prepare(&self, _target: &RepoTarget) {}
}

/// Run `source` for one repository, absorbing any failure
///
/// Failures are logged and count as "no further entries"; the caller never
/// sees an error.
pub async fn extract(
    source: &dyn LogSource,
    target: &RepoTarget,
    window: &TimeWindow,
    tx: &Sender<LogEntry>,
) -> usize {
    match source.stream(target, window, tx).await {
        Ok(sent) => {
            debug!(repo = %target.name, entries = sent, "Extraction complete");
            sent
        }
        Err(LogError::ChannelClosed) => {
            debug!(repo = %target.name, "Receiver gone, stopping extraction");
            0
        }
        Err(e) => {
            warn!(repo = %target.name, error = %e, "Repository unreachable");
            0
        }
    }
}

/// An external command line, e.g. `emojify` or `sed -e s/a/b/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommand {
    /// Program to run
    pub program: String,
    /// Arguments passed to it
    pub args: Vec<String>,
}

impl FilterCommand {
    /// Split a command line on whitespace; `None` if it is blank
    #[must_use]
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(ToString::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Log source backed by the `git` binary and an optional emoji filter
#[derive(Debug, Clone)]
pub struct GitLogSource {
    git: String,
    filter: Option<FilterCommand>,
    fetch: bool,
}

impl Default for GitLogSource {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            filter: FilterCommand::parse(DEFAULT_EMOJI_FILTER),
            fetch: false,
        }
    }
}

impl GitLogSource {
    /// Source using `git` from `PATH` and the default emoji filter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different emoji filter, or none
    #[must_use]
    pub fn with_filter(mut self, filter: Option<FilterCommand>) -> Self {
        self.filter = filter;
        self
    }

    /// Run `git fetch --all` in each repository before reading its log
    #[must_use]
    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    /// Use a specific git executable
    #[must_use]
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    /// The configured emoji filter
    #[must_use]
    pub fn filter(&self) -> Option<&FilterCommand> {
        self.filter.as_ref()
    }

    fn log_command(&self, path: &Path, window: &TimeWindow) -> Command {
        let mut cmd = Command::new(&self.git);
        cmd.current_dir(path)
            .args(log_args(window))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_filter(&self, repo: &str) -> Option<Child> {
        let filter = self.filter.as_ref()?;
        let spawned = Command::new(&filter.program)
            .args(&filter.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => Some(child),
            Err(e) => {
                warn!(
                    repo = %repo,
                    filter = %filter.program,
                    error = %e,
                    "Emoji filter unavailable, parsing unfiltered output"
                );
                None
            }
        }
    }

    async fn fetch_remotes(&self, repo: &str, path: &Path) {
        let output = Command::new(&self.git)
            .current_dir(path)
            .args(["fetch", "--all", "--quiet"])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                debug!(repo = %repo, "Fetched remotes");
            }
            Ok(output) => {
                warn!(
                    repo = %repo,
                    status = ?output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "git fetch failed"
                );
            }
            Err(e) => warn!(repo = %repo, error = %e, "git fetch could not start"),
        }
    }
}

#[async_trait]
impl LogSource for GitLogSource {
    async fn prepare(&self, target: &RepoTarget) {
        if !self.fetch {
            return;
        }
        if let Some(path) = target.path.as_deref().filter(|p| p.is_dir()) {
            self.fetch_remotes(&target.name, path).await;
        }
    }

    async fn stream(
        &self,
        target: &RepoTarget,
        window: &TimeWindow,
        tx: &Sender<LogEntry>,
    ) -> Result<usize, LogError> {
        let repo = target.name.as_str();
        let path = target
            .path
            .as_deref()
            .ok_or_else(|| LogError::Unregistered {
                repo: repo.to_string(),
            })?;
        if !path.is_dir() {
            return Err(LogError::RepositoryNotFound {
                path: path.display().to_string(),
            });
        }

        let mut git = self
            .log_command(path, window)
            .spawn()
            .map_err(|source| LogError::Spawn {
                program: self.git.clone(),
                source,
            })?;
        let mut stdout = git.stdout.take().ok_or_else(|| LogError::MissingPipe {
            program: self.git.clone(),
            stream: "stdout",
        })?;
        let stderr = git.stderr.take().ok_or_else(|| LogError::MissingPipe {
            program: self.git.clone(),
            stream: "stderr",
        })?;

        let (forwarded, stderr) = match self.spawn_filter(repo) {
            Some(mut filter) => {
                let program = self.filter.as_ref().map_or("", |f| f.program.as_str());
                let mut filter_stdin = filter.stdin.take().ok_or_else(|| LogError::MissingPipe {
                    program: program.to_string(),
                    stream: "stdin",
                })?;
                let filter_stdout = filter.stdout.take().ok_or_else(|| LogError::MissingPipe {
                    program: program.to_string(),
                    stream: "stdout",
                })?;

                let pump = async move {
                    let copied = tokio::io::copy(&mut stdout, &mut filter_stdin).await;
                    // Closing stdin lets the filter see EOF
                    let _ = filter_stdin.shutdown().await;
                    drop(filter_stdin);
                    copied
                };
                let (copied, forwarded, stderr) = tokio::join!(
                    pump,
                    forward_entries(filter_stdout, repo, tx),
                    read_all(stderr)
                );
                if let Err(e) = copied {
                    warn!(repo = %repo, error = %e, "Failed to pipe git output into emoji filter");
                }
                match filter.wait().await {
                    Ok(status) if !status.success() => {
                        warn!(repo = %repo, status = ?status.code(), "Emoji filter exited unsuccessfully");
                    }
                    Ok(_) => {}
                    Err(e) => warn!(repo = %repo, error = %e, "Failed to wait for emoji filter"),
                }
                (forwarded, stderr)
            }
            None => tokio::join!(forward_entries(stdout, repo, tx), read_all(stderr)),
        };

        let status = git.wait().await?;
        let sent = forwarded?;

        if !status.success() {
            warn!(
                repo = %repo,
                status = ?status.code(),
                stderr = %stderr.trim(),
                "git log exited unsuccessfully"
            );
        } else if sent == 0 {
            debug!(repo = %repo, "No commits in window");
        }

        Ok(sent)
    }
}

/// Arguments for the `git log` query over `window`
#[must_use]
pub fn log_args(window: &TimeWindow) -> Vec<String> {
    let mut args = vec![
        "--no-pager".to_string(),
        "-c".to_string(),
        "log.showSignature=false".to_string(),
        "log".to_string(),
        "--all".to_string(),
        "--reverse".to_string(),
        format!("--date={DISPLAY_DATE_FORMAT}"),
        format!("--pretty={RECORD_FORMAT}"),
    ];
    if let Some(after) = &window.after {
        args.push(format!("--after={after}"));
    }
    if let Some(before) = &window.before {
        args.push(format!("--before={before}"));
    }
    args
}

/// Parse records from `reader` line by line and send them on `tx`
///
/// Lines are decoded lossily so a commit in a foreign encoding cannot stop
/// the rest of the log from being read.
///
/// # Errors
///
/// Returns `LogError::Io` on a read failure and `LogError::ChannelClosed`
/// if the receiver has been dropped.
pub async fn forward_entries<R>(
    reader: R,
    repo: &str,
    tx: &Sender<LogEntry>,
) -> Result<usize, LogError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).split(b'\n');
    let mut sent = 0;

    while let Some(raw) = lines.next_segment().await? {
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches('\r');
        match parser::parse_line(line, repo) {
            Ok(entry) => {
                tx.send(entry).await.map_err(|_| LogError::ChannelClosed)?;
                sent += 1;
            }
            Err(e) => debug!(repo = %repo, error = %e, "Dropping log line"),
        }
    }

    Ok(sent)
}

async fn read_all<R>(mut reader: R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).into_owned()
}

/// Resolve `path` to the working tree root of the repository containing it
///
/// This walks up the directory tree to find a `.git` directory.
///
/// # Errors
///
/// Returns `LogError::RepositoryNotFound` if no repository is found,
/// `LogError::BareRepository` if it has no working tree, and
/// `LogError::Git2` if libgit2 fails otherwise.
pub fn discover_workdir(path: impl AsRef<Path>) -> Result<PathBuf, LogError> {
    let path = path.as_ref();
    let repo = Repository::discover(path).map_err(|e| match e.code() {
        ErrorCode::NotFound => LogError::RepositoryNotFound {
            path: path.display().to_string(),
        },
        _ => LogError::Git2(e),
    })?;
    let workdir = repo.workdir().ok_or_else(|| LogError::BareRepository {
        path: repo.path().display().to_string(),
    })?;
    Ok(workdir
        .canonicalize()
        .unwrap_or_else(|_| workdir.to_path_buf()))
}
