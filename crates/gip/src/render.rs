// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Plain-text tables and JSON output

use console::{Alignment, Term, measure_text_width, pad_str, truncate_str};
use gip_log::LogEntry;

use crate::registry::{Registry, Repo};

/// Column separator
const SEPARATOR: &str = " | ";

/// A borderless table padded by display width
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: Option<usize>,
}

impl Table {
    /// Create a table with the given column headings
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            max_width: None,
        }
    }

    /// Truncate the last column so lines fit `width` columns
    #[must_use]
    pub fn with_max_width(mut self, width: Option<usize>) -> Self {
        self.max_width = width;
        self
    }

    /// Append a row; missing cells render empty
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(measure_text_width(cell));
            }
        }
        widths
    }

    /// Room left for the last column, if the table is width-limited
    fn last_column_budget(&self, widths: &[usize]) -> Option<usize> {
        let max = self.max_width?;
        let (_, leading) = widths.split_last()?;
        let used: usize = leading.iter().sum::<usize>() + leading.len() * SEPARATOR.len();
        Some(max.saturating_sub(used).max(1))
    }

    fn render_line(&self, cells: &[String], widths: &[usize], budget: Option<usize>) -> String {
        let last = widths.len().saturating_sub(1);
        let parts: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = cells.get(i).map_or("", String::as_str);
                if i < last {
                    pad_str(cell, width, Alignment::Left, None).into_owned()
                } else {
                    match budget {
                        Some(budget) => truncate_str(cell, budget, "…").into_owned(),
                        None => cell.to_string(),
                    }
                }
            })
            .collect();
        parts.join(SEPARATOR).trim_end().to_string()
    }

    /// Render header, rule and rows, one line each
    #[must_use]
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let budget = self.last_column_budget(&widths);

        let rule: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let w = if i + 1 == widths.len() {
                    budget.map_or(w, |b| w.min(b))
                } else {
                    w
                };
                "-".repeat(w)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&self.render_line(&self.header, &widths, budget));
        out.push('\n');
        out.push_str(&rule.join("-|-"));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&self.render_line(row, &widths, budget));
            out.push('\n');
        }
        out
    }
}

/// Width of stdout when it is a terminal
#[must_use]
pub fn terminal_width() -> Option<usize> {
    let term = Term::stdout();
    if !term.is_term() {
        return None;
    }
    term.size_checked().map(|(_, cols)| usize::from(cols))
}

/// Message cell text: subject plus refs in parentheses
fn message_cell(entry: &LogEntry) -> String {
    if entry.has_decoration() {
        format!("{} ({})", entry.message, entry.decoration)
    } else {
        entry.message.clone()
    }
}

/// Table of commits: TIME, REPO, AUTHOR (SIG), MESSAGE
#[must_use]
pub fn entries_table(entries: &[LogEntry], max_width: Option<usize>) -> Table {
    let mut table = Table::new(["TIME", "REPO", "AUTHOR (SIG)", "MESSAGE"]).with_max_width(max_width);
    for entry in entries {
        table.add_row([
            entry.display_time.clone(),
            entry.repo.clone(),
            entry.author_label(),
            message_cell(entry),
        ]);
    }
    table
}

/// Table of groups and their member counts
#[must_use]
pub fn groups_table(registry: &Registry) -> Table {
    let mut table = Table::new(["NAME", "REPOS"]);
    for (name, group) in &registry.groups {
        table.add_row([name.clone(), group.repos.len().to_string()]);
    }
    table
}

/// Table of repositories: NAME, GROUPS, PATH
#[must_use]
pub fn repos_table<'a>(repos: impl IntoIterator<Item = (&'a String, &'a Repo)>) -> Table {
    let mut table = Table::new(["NAME", "GROUPS", "PATH"]);
    for (name, repo) in repos {
        let groups: Vec<&str> = repo.groups.iter().map(String::as_str).collect();
        table.add_row([
            name.clone(),
            groups.join(", "),
            repo.path.display().to_string(),
        ]);
    }
    table
}

/// Entries as a pretty-printed JSON array
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn entries_json(entries: &[LogEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}
