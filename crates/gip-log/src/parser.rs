// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Git log record parsing
//!
//! Each commit is printed by `git log` as one line of fields joined by
//! [`FIELD_DELIMITER`] padded with spaces, in the order given by
//! [`RECORD_FORMAT`]. The padding keeps a `|` at the edge of a subject from
//! merging into a delimiter; fields are trimmed after splitting.
//!
//! 1. commit time (epoch seconds)
//! 2. display time (`%a %R`, e.g. `Mon 09:00`)
//! 3. subject
//! 4. author name
//! 5. signature code (`%G?`)
//! 6. ref decoration

use tracing::debug;

use crate::entry::{LogEntry, SignatureStatus};
use crate::error::LogError;

/// Separator between fields of one record
pub const FIELD_DELIMITER: &str = "|||";

/// `--pretty` format producing one record per commit
pub const RECORD_FORMAT: &str = "%ct ||| %cd ||| %s ||| %an ||| %G? ||| %D";

/// `--date` format used for the display time field
pub const DISPLAY_DATE_FORMAT: &str = "format:%a %R";

/// Fewest fields a line may have and still be a record
pub const MIN_FIELDS: usize = 4;

/// Field count of a complete record
pub const FULL_FIELDS: usize = 6;

/// Parse one line of log output into an entry for `repo`
///
/// Lines with fewer than [`MIN_FIELDS`] fields, or whose first field is not
/// an integer timestamp, are rejected. A line with more than
/// [`FULL_FIELDS`] fields has a delimiter inside its subject; the leading
/// two and trailing three fields stay positional and the rest is rejoined
/// into the subject.
///
/// # Errors
///
/// Returns `LogError::MalformedRecord` if the line is not a record.
pub fn parse_line(line: &str, repo: &str) -> Result<LogEntry, LogError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

    if fields.len() < MIN_FIELDS {
        return Err(LogError::MalformedRecord {
            reason: format!(
                "expected at least {MIN_FIELDS} fields, got {}",
                fields.len()
            ),
        });
    }

    let timestamp = fields[0]
        .trim()
        .parse::<i64>()
        .map_err(|_| LogError::MalformedRecord {
            reason: format!("invalid timestamp {:?}", fields[0].trim()),
        })?;

    let (message, author, signature, decoration) = if fields.len() > FULL_FIELDS {
        let tail = fields.len() - 3;
        (
            fields[2..tail].join(FIELD_DELIMITER),
            fields[tail],
            SignatureStatus::from_code(fields[tail + 1]),
            fields[tail + 2],
        )
    } else {
        (
            fields[2].to_string(),
            fields[3],
            fields
                .get(4)
                .map_or(SignatureStatus::Unknown, |code| SignatureStatus::from_code(code)),
            fields.get(5).copied().unwrap_or(""),
        )
    };

    Ok(LogEntry {
        timestamp,
        display_time: fields[1].trim().to_string(),
        repo: repo.to_string(),
        message: message.trim().to_string(),
        author: author.trim().to_string(),
        signature,
        decoration: decoration.trim().to_string(),
    })
}

/// Parse a whole block of log output, dropping lines that are not records
#[must_use]
pub fn parse_output(output: &str, repo: &str) -> Vec<LogEntry> {
    output
        .lines()
        .filter_map(|line| match parse_line(line, repo) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(repo = %repo, error = %e, "Dropping log line");
                None
            }
        })
        .collect()
}
