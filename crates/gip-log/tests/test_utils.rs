// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test utilities for gip integration tests
//!
//! This module provides utilities for:
//! - Temporary directory management
//! - Git repository scaffolding with fixed commit dates

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Temporary Directory Management
// ============================================================================

/// Counter for generating unique test directory names
static TEST_DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A temporary directory that is automatically cleaned up when dropped
///
/// This provides a unique, isolated directory for each test to avoid
/// interference between concurrent tests.
pub struct TempTestDir {
    path: PathBuf,
}

impl TempTestDir {
    /// Create a new temporary test directory
    pub fn new(test_name: &str) -> Self {
        let counter = TEST_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir_name = format!("gip-test-{}-{}-{}", test_name, std::process::id(), counter);
        let path = std::env::temp_dir().join(dir_name);

        fs::create_dir_all(&path).expect("Failed to create temp test directory");

        Self { path }
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempTestDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

// ============================================================================
// Git Repository Scaffolding
// ============================================================================

/// A temporary git repository whose commits carry chosen timestamps
pub struct TestGitRepo {
    temp_dir: TempTestDir,
}

impl TestGitRepo {
    /// Create and initialize a new test git repository
    pub fn new(test_name: &str) -> Self {
        let temp_dir = TempTestDir::new(test_name);
        run_git(temp_dir.path(), &["init", "--quiet"], &[]);
        run_git(
            temp_dir.path(),
            &["config", "user.email", "test@example.com"],
            &[],
        );
        run_git(temp_dir.path(), &["config", "user.name", "Test Author"], &[]);
        run_git(temp_dir.path(), &["config", "commit.gpgsign", "false"], &[]);
        run_git(temp_dir.path(), &["config", "tag.gpgsign", "false"], &[]);
        Self { temp_dir }
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create an empty commit whose author and committer dates are `epoch`
    pub fn commit_at(&self, message: &str, epoch: i64) -> &Self {
        let date = format!("@{epoch} +0000");
        run_git(
            self.path(),
            &["commit", "--quiet", "--allow-empty", "-m", message],
            &[("GIT_AUTHOR_DATE", &date), ("GIT_COMMITTER_DATE", &date)],
        );
        self
    }

    /// Create an empty commit as a different author
    pub fn commit_as(&self, message: &str, epoch: i64, author: &str) -> &Self {
        let date = format!("@{epoch} +0000");
        run_git(
            self.path(),
            &[
                "-c",
                &format!("user.name={author}"),
                "commit",
                "--quiet",
                "--allow-empty",
                "-m",
                message,
            ],
            &[("GIT_AUTHOR_DATE", &date), ("GIT_COMMITTER_DATE", &date)],
        );
        self
    }

    /// Tag HEAD with a lightweight tag
    #[allow(dead_code)]
    pub fn tag(&self, name: &str) -> &Self {
        run_git(self.path(), &["tag", name], &[]);
        self
    }
}

/// Run a git command in the given directory
fn run_git(dir: &Path, args: &[&str], envs: &[(&str, &str)]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .envs(envs.iter().copied())
        .output()
        .expect("Failed to run git command");

    if !output.status.success() {
        panic!(
            "Git command failed: git {}\nstderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}
