// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command-line configuration for gip
//!
//! This module provides the clap definitions for every subcommand together
//! with the derived settings (registry location, log level, per-repository
//! timeout, emoji filter).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use gip_log::extractor::DEFAULT_EMOJI_FILTER;
use gip_log::{FilterCommand, GitLogSource, TimeWindow};

/// Default per-repository extraction timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `--after` bound: commits since midnight
pub const DEFAULT_AFTER: &str = "12am";

/// Default refresh interval for `--watch`, in seconds
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 5;

/// gip - list git commits across grouped repositories within a given time period
#[derive(Parser, Debug, Clone)]
#[command(name = "gip")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (prints help when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the registry file
    ///
    /// Defaults to gip/gip.json under the platform config directory.
    #[arg(short, long, env = "GIP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,

    /// Seconds to wait for one repository before giving up on it (0 = no limit)
    #[arg(long, env = "GIP_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Command that substitutes emoji shortcodes in git output
    #[arg(long, env = "GIP_EMOJI_FILTER", default_value = DEFAULT_EMOJI_FILTER, global = true)]
    pub emoji_filter: String,

    /// Parse git output directly, without the emoji filter
    #[arg(long, default_value = "false", global = true)]
    pub no_emoji: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            config: None,
            verbose: false,
            quiet: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            emoji_filter: DEFAULT_EMOJI_FILTER.to_string(),
            no_emoji: false,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage repository groups
    #[command(alias = "g", subcommand)]
    Group(GroupCommand),

    /// Manage repositories
    #[command(alias = "r", subcommand)]
    Repo(RepoCommand),

    /// List commits within a group
    #[command(alias = "v")]
    View {
        /// Group to view
        group: String,

        #[command(flatten)]
        options: ViewArgs,
    },

    /// List commits within a repository
    #[command(name = "viewrepo", alias = "vr")]
    ViewRepo {
        /// Repository to view
        repo: String,

        #[command(flatten)]
        options: ViewArgs,
    },
}

/// Group management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum GroupCommand {
    /// Create a new group
    Create {
        /// Name of the new group
        name: String,
    },
    /// List groups
    List,
    /// Add a repository to a group
    Add {
        /// Repository to add
        repo: String,
        /// Group to add it to
        group: String,
    },
    /// Rename a group
    Rename {
        /// Current group name
        group: String,
        /// New group name
        name: String,
    },
    /// Delete a group
    Remove {
        /// Group to delete
        group: String,
    },
}

/// Repository management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RepoCommand {
    /// Register a repository
    Add {
        /// Name to register the repository under
        name: String,
        /// Path inside the repository's working tree
        path: PathBuf,
        /// Groups to add the repository to (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,
    },
    /// List repositories
    List {
        /// Only list members of this group
        group: Option<String>,
    },
    /// Delete a repository
    Remove {
        /// Repository to delete
        name: String,
    },
}

/// Options shared by `view` and `viewrepo`
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// A git-log compatible date to list commits since (empty for no bound)
    #[arg(short, long, default_value = DEFAULT_AFTER)]
    pub after: String,

    /// A git-log compatible date to list commits until
    #[arg(short, long)]
    pub before: Option<String>,

    /// Maximum number of commits to show, most recent kept (0 = all)
    #[arg(short = 'n', long = "max", default_value_t = 0)]
    pub max: usize,

    /// Fetch remotes in each repository before reading its log
    #[arg(long, default_value = "false")]
    pub fetch: bool,

    /// Persistently refresh the results to get a live feed of updates
    #[arg(short, long, default_value = "false")]
    pub watch: bool,

    /// Seconds between refreshes in watch mode
    #[arg(long, default_value_t = DEFAULT_WATCH_INTERVAL_SECS)]
    pub interval: u64,

    /// Print entries as JSON instead of a table
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            after: DEFAULT_AFTER.to_string(),
            before: None,
            max: 0,
            fetch: false,
            watch: false,
            interval: DEFAULT_WATCH_INTERVAL_SECS,
            json: false,
        }
    }
}

impl ViewArgs {
    /// The `--after` / `--before` window
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(Some(&self.after), self.before.as_deref())
    }

    /// The truncation limit, `None` when every entry is kept
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        (self.max > 0).then_some(self.max)
    }

    /// Delay between refreshes in watch mode
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

impl Config {
    /// Get the registry path, using a default if not specified
    ///
    /// Default location is platform-specific:
    /// - macOS: ~/Library/Application Support/gip/gip.json
    /// - Linux: ~/.config/gip/gip.json
    /// - Windows: %APPDATA%\gip\gip.json
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gip")
                .join("gip.json")
        })
    }

    /// Per-repository extraction timeout, `None` when disabled
    #[must_use]
    pub fn task_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// The emoji filter command, `None` when disabled or blank
    #[must_use]
    pub fn emoji_filter(&self) -> Option<FilterCommand> {
        if self.no_emoji {
            None
        } else {
            FilterCommand::parse(&self.emoji_filter)
        }
    }

    /// Build the git log source for a view
    #[must_use]
    pub fn log_source(&self, fetch: bool) -> GitLogSource {
        GitLogSource::new()
            .with_filter(self.emoji_filter())
            .with_fetch(fetch)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The registry path points at a directory
    /// - Watch mode is requested with a zero interval
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registry = self.registry_path();
        if registry.is_dir() {
            return Err(ConfigError::RegistryIsDirectory(registry));
        }

        if let Some(Command::View { options, .. } | Command::ViewRepo { options, .. }) =
            &self.command
            && options.watch
            && options.interval == 0
        {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Registry path is a directory
    #[error("Registry path is a directory: {0}")]
    RegistryIsDirectory(PathBuf),

    /// Watch interval of zero
    #[error("--interval must be at least 1 second in watch mode")]
    InvalidInterval,
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.command.is_none());
        assert!(config.config.is_none());
        assert!(!config.verbose);
        assert!(!config.quiet);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(!config.no_emoji);
    }

    #[test]
    fn test_default_matches_parsed_defaults() {
        let parsed = Config::try_parse_from(["gip"]).expect("parse should succeed");
        let default = Config::default();
        assert_eq!(parsed.timeout, default.timeout);
        assert_eq!(parsed.emoji_filter, default.emoji_filter);
        assert_eq!(parsed.no_emoji, default.no_emoji);
    }

    #[test]
    fn test_registry_path_default() {
        let config = Config::default();
        let path = config.registry_path();
        assert!(path.ends_with("gip/gip.json"));
    }

    #[test]
    fn test_registry_path_custom() {
        let custom = PathBuf::from("/custom/path/registry.json");
        let config = Config {
            config: Some(custom.clone()),
            ..Default::default()
        };
        assert_eq!(config.registry_path(), custom);
    }

    #[test]
    fn test_task_timeout() {
        let config = Config::default();
        assert_eq!(config.task_timeout(), Some(Duration::from_secs(30)));

        let config = Config {
            timeout: 0,
            ..Default::default()
        };
        assert_eq!(config.task_timeout(), None);
    }

    #[test]
    fn test_emoji_filter_default() {
        let config = Config::default();
        let filter = config.emoji_filter().expect("filter");
        assert_eq!(filter.program, "emojify");
    }

    #[test]
    fn test_emoji_filter_disabled() {
        let config = Config {
            no_emoji: true,
            ..Default::default()
        };
        assert!(config.emoji_filter().is_none());

        let config = Config {
            emoji_filter: " ".to_string(),
            ..Default::default()
        };
        assert!(config.emoji_filter().is_none());
    }

    #[test]
    fn test_log_level_default() {
        let config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_view_args_window() {
        let args = ViewArgs::default();
        assert_eq!(args.window().after.as_deref(), Some("12am"));
        assert!(args.window().before.is_none());

        let args = ViewArgs {
            after: String::new(),
            ..Default::default()
        };
        assert_eq!(args.window(), TimeWindow::unbounded());
    }

    #[test]
    fn test_view_args_limit() {
        assert_eq!(ViewArgs::default().limit(), None);
        let args = ViewArgs {
            max: 10,
            ..Default::default()
        };
        assert_eq!(args.limit(), Some(10));
    }

    #[test]
    fn test_validate_registry_directory() {
        let config = Config {
            config: Some(std::env::temp_dir()),
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::RegistryIsDirectory(_))));
    }

    #[test]
    fn test_validate_zero_interval_watch() {
        let config = Config {
            config: Some(PathBuf::from("/nonexistent/gip.json")),
            command: Some(Command::View {
                group: "work".to_string(),
                options: ViewArgs {
                    watch: true,
                    interval: 0,
                    ..Default::default()
                },
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval)
        ));
    }

    #[test]
    fn test_validate_ok() {
        let config = Config {
            config: Some(PathBuf::from("/nonexistent/gip.json")),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
