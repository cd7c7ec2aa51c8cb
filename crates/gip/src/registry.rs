// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository registry
//!
//! The registry maps repository names to working-tree paths and groups
//! repositories into named collections. It is stored as JSON:
//!
//! ```json
//! {
//!   "groups": { "work": { "repos": ["api", "web"] } },
//!   "repos": {
//!     "api": { "path": "/src/api", "groups": ["work"] },
//!     "web": { "path": "/src/web", "groups": ["work"] }
//!   }
//! }
//! ```
//!
//! A group's member list is the source of truth for membership; each
//! repository's `groups` set is a back-reference kept in step by every
//! mutating operation here.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use gip_log::RepoTarget;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registry file could not be read or written
    #[error("Registry IO error at {path}: {source}")]
    Io {
        /// The registry file path
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not valid JSON
    #[error("Invalid registry file {path}: {source}")]
    Json {
        /// The registry file path
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Group not found
    #[error("Could not find group: {0}")]
    GroupNotFound(String),

    /// Group already exists
    #[error("Group already exists: {0}")]
    GroupExists(String),

    /// Repository not found
    #[error("Could not find repo: {0}")]
    RepoNotFound(String),

    /// Repository already exists
    #[error("Repo already exists: {0}")]
    RepoExists(String),

    /// Repository is already a member of the group
    #[error("Repo {repo} is already in group {group}")]
    AlreadyMember {
        /// The repository name
        repo: String,
        /// The group name
        group: String,
    },

    /// Name is empty or contains only whitespace
    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

/// A named, ordered collection of repository names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Member repository names; duplicates are tolerated on load
    #[serde(default, alias = "Repos")]
    pub repos: Vec<String>,
}

/// A registered working copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Working tree path
    #[serde(alias = "Path")]
    pub path: PathBuf,
    /// Groups listing this repository
    #[serde(default, alias = "Groups")]
    pub groups: BTreeSet<String>,
}

/// The persisted repository registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Groups by name
    #[serde(default, alias = "Groups")]
    pub groups: BTreeMap<String, Group>,
    /// Repositories by name
    #[serde(default, alias = "Repos")]
    pub repos: BTreeMap<String, Repo>,
}

fn check_name(name: &str) -> Result<(), RegistryError> {
    if name.trim().is_empty() {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl Registry {
    /// Load the registry from `path`; a missing file is an empty registry
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No registry file, starting empty");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&text).map_err(|source| RegistryError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the registry to `path`, creating parent directories
    ///
    /// The file is written beside its destination and renamed into place.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        let io_err = |source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut json = serde_json::to_string_pretty(self).map_err(|source| RegistryError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        json.push('\n');

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        debug!(path = %path.display(), "Saved registry");
        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Member repository names of a group, in registry order
    #[must_use]
    pub fn resolve_group(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(|g| g.repos.as_slice())
    }

    /// Working tree path of a repository
    #[must_use]
    pub fn resolve_repo_path(&self, repo: &str) -> Option<&Path> {
        self.repos.get(repo).map(|r| r.path.as_path())
    }

    /// Extraction target for a repository name, registered or not
    #[must_use]
    pub fn target(&self, repo: &str) -> RepoTarget {
        match self.resolve_repo_path(repo) {
            Some(path) => RepoTarget::new(repo, path),
            None => RepoTarget::unregistered(repo),
        }
    }

    /// One target per listed member of `group`, duplicates included
    #[must_use]
    pub fn group_targets(&self, group: &str) -> Option<Vec<RepoTarget>> {
        self.resolve_group(group)
            .map(|members| members.iter().map(|name| self.target(name)).collect())
    }

    /// Registered repositories that are members of `group`
    pub fn group_members<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Repo)> + 'a {
        self.repos
            .iter()
            .filter(move |(name, _)| {
                self.resolve_group(group)
                    .is_some_and(|members| members.contains(name))
            })
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// Create an empty group
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or already taken.
    pub fn create_group(&mut self, name: &str) -> Result<(), RegistryError> {
        check_name(name)?;
        if self.groups.contains_key(name) {
            return Err(RegistryError::GroupExists(name.to_string()));
        }
        self.groups.insert(name.to_string(), Group::default());
        Ok(())
    }

    /// Add a registered repository to an existing group
    ///
    /// # Errors
    ///
    /// Returns an error if either name is unknown or the repository is
    /// already a member.
    pub fn add_to_group(&mut self, repo: &str, group: &str) -> Result<(), RegistryError> {
        let record = self
            .repos
            .get_mut(repo)
            .ok_or_else(|| RegistryError::RepoNotFound(repo.to_string()))?;
        let members = self
            .groups
            .get_mut(group)
            .ok_or_else(|| RegistryError::GroupNotFound(group.to_string()))?;

        if members.repos.iter().any(|r| r == repo) {
            return Err(RegistryError::AlreadyMember {
                repo: repo.to_string(),
                group: group.to_string(),
            });
        }

        members.repos.push(repo.to_string());
        record.groups.insert(group.to_string());
        Ok(())
    }

    /// Rename a group, updating its members' back-references
    ///
    /// # Errors
    ///
    /// Returns an error if the group is unknown or the new name is blank or
    /// taken.
    pub fn rename_group(&mut self, group: &str, new_name: &str) -> Result<(), RegistryError> {
        check_name(new_name)?;
        if !self.groups.contains_key(group) {
            return Err(RegistryError::GroupNotFound(group.to_string()));
        }
        if self.groups.contains_key(new_name) {
            return Err(RegistryError::GroupExists(new_name.to_string()));
        }

        if let Some(record) = self.groups.remove(group) {
            for repo in self.repos.values_mut() {
                if repo.groups.remove(group) {
                    repo.groups.insert(new_name.to_string());
                }
            }
            self.groups.insert(new_name.to_string(), record);
        }
        Ok(())
    }

    /// Delete a group and its members' back-references
    ///
    /// # Errors
    ///
    /// Returns an error if the group is unknown.
    pub fn remove_group(&mut self, group: &str) -> Result<Group, RegistryError> {
        let removed = self
            .groups
            .remove(group)
            .ok_or_else(|| RegistryError::GroupNotFound(group.to_string()))?;
        for repo in self.repos.values_mut() {
            repo.groups.remove(group);
        }
        Ok(removed)
    }

    // ========================================================================
    // Repositories
    // ========================================================================

    /// Register a repository, optionally adding it to existing groups
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or taken, or a group is
    /// unknown. Nothing is changed on error.
    pub fn add_repo(
        &mut self,
        name: &str,
        path: impl Into<PathBuf>,
        groups: &[String],
    ) -> Result<(), RegistryError> {
        check_name(name)?;
        if self.repos.contains_key(name) {
            return Err(RegistryError::RepoExists(name.to_string()));
        }
        if let Some(missing) = groups.iter().find(|g| !self.groups.contains_key(*g)) {
            return Err(RegistryError::GroupNotFound(missing.clone()));
        }

        self.repos.insert(
            name.to_string(),
            Repo {
                path: path.into(),
                groups: BTreeSet::new(),
            },
        );
        for group in groups {
            match self.add_to_group(name, group) {
                Ok(()) | Err(RegistryError::AlreadyMember { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Delete a repository and every group listing of it
    ///
    /// # Errors
    ///
    /// Returns an error if the repository is unknown.
    pub fn remove_repo(&mut self, name: &str) -> Result<Repo, RegistryError> {
        let removed = self
            .repos
            .remove(name)
            .ok_or_else(|| RegistryError::RepoNotFound(name.to_string()))?;
        for group in self.groups.values_mut() {
            group.repos.retain(|r| r != name);
        }
        Ok(removed)
    }
}
