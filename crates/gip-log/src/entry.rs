// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Log entry types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signature verification state of a commit, as reported by git's `%G?`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SignatureStatus {
    /// `G`: good (valid) signature
    Good,
    /// `B`: bad signature
    Bad,
    /// `U`: good signature with unknown validity
    UnknownValidity,
    /// `X`: good signature that has expired
    Expired,
    /// `Y`: good signature made by an expired key
    ExpiredKey,
    /// `R`: good signature made by a revoked key
    RevokedKey,
    /// `E`: signature cannot be checked (e.g. missing key)
    CannotCheck,
    /// `N`: no signature
    Unsigned,
    /// The record did not report a status
    #[default]
    Unknown,
    /// A code outside git's documented vocabulary, kept verbatim
    Other(String),
}

impl SignatureStatus {
    /// Map a `%G?` code to a status
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "G" => Self::Good,
            "B" => Self::Bad,
            "U" => Self::UnknownValidity,
            "X" => Self::Expired,
            "Y" => Self::ExpiredKey,
            "R" => Self::RevokedKey,
            "E" => Self::CannotCheck,
            "N" => Self::Unsigned,
            "" | "?" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// The `%G?` code for this status (`?` when unknown)
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Good => "G",
            Self::Bad => "B",
            Self::UnknownValidity => "U",
            Self::Expired => "X",
            Self::ExpiredKey => "Y",
            Self::RevokedKey => "R",
            Self::CannotCheck => "E",
            Self::Unsigned => "N",
            Self::Unknown => "?",
            Self::Other(code) => code.as_str(),
        }
    }

    /// Whether the commit carries a signature at all
    #[must_use]
    pub fn is_signed(&self) -> bool {
        !matches!(self, Self::Unsigned | Self::Unknown)
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<SignatureStatus> for String {
    fn from(status: SignatureStatus) -> Self {
        status.code().to_string()
    }
}

impl From<String> for SignatureStatus {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

/// One normalized commit record from a repository's log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Commit time in epoch seconds; the ordering key
    pub timestamp: i64,
    /// Commit time for display (e.g. `Mon 09:00`)
    pub display_time: String,
    /// Name of the repository the commit came from
    pub repo: String,
    /// First line of the commit message
    pub message: String,
    /// Author name
    pub author: String,
    /// Signature verification state
    pub signature: SignatureStatus,
    /// Ref names pointing at the commit, empty when none
    pub decoration: String,
}

impl LogEntry {
    /// Commit time as a UTC datetime, if the timestamp is in range
    #[must_use]
    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Whether any refs point at this commit
    #[must_use]
    pub fn has_decoration(&self) -> bool {
        !self.decoration.is_empty()
    }

    /// Author with the signature code, e.g. `Alice (G)`
    #[must_use]
    pub fn author_label(&self) -> String {
        format!("{} ({})", self.author, self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn sample_entry() -> LogEntry {
        LogEntry {
            timestamp: 1_700_000_000,
            display_time: "Tue 22:13".to_string(),
            repo: "api".to_string(),
            message: "fix bug".to_string(),
            author: "Alice".to_string(),
            signature: SignatureStatus::Good,
            decoration: "HEAD -> main".to_string(),
        }
    }

    #[test]
    fn test_signature_codes() {
        for (code, status) in [
            ("G", SignatureStatus::Good),
            ("B", SignatureStatus::Bad),
            ("U", SignatureStatus::UnknownValidity),
            ("X", SignatureStatus::Expired),
            ("Y", SignatureStatus::ExpiredKey),
            ("R", SignatureStatus::RevokedKey),
            ("E", SignatureStatus::CannotCheck),
            ("N", SignatureStatus::Unsigned),
        ] {
            assert_eq!(SignatureStatus::from_code(code), status);
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn test_signature_empty_code_is_unknown() {
        assert_eq!(SignatureStatus::from_code(""), SignatureStatus::Unknown);
        assert_eq!(SignatureStatus::from_code(" "), SignatureStatus::Unknown);
        assert_eq!(SignatureStatus::Unknown.code(), "?");
    }

    #[test]
    fn test_signature_unrecognized_code_is_kept() {
        let status = SignatureStatus::from_code("Z");
        assert_eq!(status, SignatureStatus::Other("Z".to_string()));
        assert_eq!(status.to_string(), "Z");
    }

    #[test]
    fn test_is_signed() {
        assert!(SignatureStatus::Good.is_signed());
        assert!(SignatureStatus::Bad.is_signed());
        assert!(!SignatureStatus::Unsigned.is_signed());
        assert!(!SignatureStatus::Unknown.is_signed());
    }

    #[test]
    fn test_signature_serializes_as_code() {
        let json = serde_json::to_string(&SignatureStatus::ExpiredKey).expect("serialize");
        assert_eq!(json, "\"Y\"");
        let status: SignatureStatus = serde_json::from_str("\"N\"").expect("deserialize");
        assert_eq!(status, SignatureStatus::Unsigned);
    }

    #[test]
    fn test_entry_json_format() {
        let json = serde_json::to_string_pretty(&sample_entry()).expect("serialize");
        assert!(json.contains("\"timestamp\": 1700000000"));
        assert!(json.contains("\"signature\": \"G\""));
        assert!(json.contains("\"decoration\": \"HEAD -> main\""));
    }

    #[test]
    fn test_committed_at() {
        let entry = sample_entry();
        let at = entry.committed_at().expect("in range");
        assert_eq!(at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_committed_at_out_of_range() {
        let mut entry = sample_entry();
        entry.timestamp = i64::MAX;
        assert!(entry.committed_at().is_none());
    }

    #[test]
    fn test_has_decoration() {
        let mut entry = sample_entry();
        assert!(entry.has_decoration());
        entry.decoration.clear();
        assert!(!entry.has_decoration());
    }

    #[test]
    fn test_author_label() {
        let mut entry = sample_entry();
        assert_eq!(entry.author_label(), "Alice (G)");
        entry.signature = SignatureStatus::Unknown;
        assert_eq!(entry.author_label(), "Alice (?)");
    }
}
