// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for gip
//!
//! These tests use proptest to check that registry membership stays
//! consistent under arbitrary edits and that rendering and merging hold
//! their shape for arbitrary entries.

use proptest::prelude::*;

use gip::merge::merge_and_bound;
use gip::registry::Registry;
use gip::render::entries_table;
use gip_log::LogEntry;
use gip_log::parser::parse_line;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    CreateGroup(usize),
    AddRepo(usize, Vec<usize>),
    AddToGroup(usize, usize),
    RenameGroup(usize, usize),
    RemoveGroup(usize),
    RemoveRepo(usize),
}

const GROUPS: [&str; 4] = ["work", "oss", "home", "misc"];
const REPOS: [&str; 4] = ["api", "web", "cli", "docs"];

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..GROUPS.len()).prop_map(Op::CreateGroup),
        (0..REPOS.len(), prop::collection::vec(0..GROUPS.len(), 0..3))
            .prop_map(|(r, gs)| Op::AddRepo(r, gs)),
        (0..REPOS.len(), 0..GROUPS.len()).prop_map(|(r, g)| Op::AddToGroup(r, g)),
        (0..GROUPS.len(), 0..GROUPS.len()).prop_map(|(a, b)| Op::RenameGroup(a, b)),
        (0..GROUPS.len()).prop_map(Op::RemoveGroup),
        (0..REPOS.len()).prop_map(Op::RemoveRepo),
    ]
}

fn apply(registry: &mut Registry, op: &Op) {
    // Errors are expected for many sequences; only the resulting state matters
    let _ = match op {
        Op::CreateGroup(g) => registry.create_group(GROUPS[*g]),
        Op::AddRepo(r, gs) => {
            let groups: Vec<String> = gs.iter().map(|g| GROUPS[*g].to_string()).collect();
            registry.add_repo(REPOS[*r], format!("/src/{}", REPOS[*r]), &groups)
        }
        Op::AddToGroup(r, g) => registry.add_to_group(REPOS[*r], GROUPS[*g]),
        Op::RenameGroup(a, b) => registry.rename_group(GROUPS[*a], GROUPS[*b]),
        Op::RemoveGroup(g) => registry.remove_group(GROUPS[*g]).map(|_| ()),
        Op::RemoveRepo(r) => registry.remove_repo(REPOS[*r]).map(|_| ()),
    };
}

fn arbitrary_line() -> impl Strategy<Value = String> {
    (
        0i64..10_000,
        "[a-zA-Z0-9 :🐛✨]{0,40}",
        "[a-zA-Z ]{1,12}",
        prop::sample::select(vec!["G", "N", "B", "E", "?"]),
        prop::sample::select(vec!["", "tag: v1.0", "HEAD -> main, origin/main"]),
    )
        .prop_map(|(ts, msg, author, sig, deco)| {
            format!("{ts}|||Mon 09:00|||{msg}|||{author}|||{sig}|||{deco}")
        })
}

fn arbitrary_entries() -> impl Strategy<Value = Vec<LogEntry>> {
    prop::collection::vec(
        (arbitrary_line(), prop::sample::select(vec!["api", "web"])),
        0..40,
    )
    .prop_map(|lines| {
        lines
            .iter()
            .filter_map(|(line, repo)| parse_line(line, repo).ok())
            .collect()
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_membership_stays_consistent(ops in prop::collection::vec(op(), 0..40)) {
        let mut registry = Registry::default();
        for op in &ops {
            apply(&mut registry, op);
        }

        for (group_name, group) in &registry.groups {
            for member in &group.repos {
                let repo = registry.repos.get(member);
                prop_assert!(repo.is_some(), "{} lists unknown repo {}", group_name, member);
                prop_assert!(repo.is_some_and(|r| r.groups.contains(group_name)));
            }
        }
        for (repo_name, repo) in &registry.repos {
            for group_name in &repo.groups {
                let group = registry.groups.get(group_name);
                prop_assert!(group.is_some_and(|g| g.repos.contains(repo_name)));
            }
        }
    }

    #[test]
    fn prop_registry_json_roundtrip_after_edits(ops in prop::collection::vec(op(), 0..20)) {
        let mut registry = Registry::default();
        for op in &ops {
            apply(&mut registry, op);
        }
        let json = serde_json::to_string(&registry).expect("serialize");
        let loaded: Registry = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(loaded, registry);
    }

    #[test]
    fn prop_table_has_one_line_per_entry(entries in arbitrary_entries()) {
        let merged = merge_and_bound(entries, None);
        let rendered = entries_table(&merged, None).render();
        prop_assert_eq!(rendered.lines().count(), merged.len() + 2);
    }

    #[test]
    fn prop_table_respects_max_width(entries in arbitrary_entries(), width in 60usize..200) {
        let rendered = entries_table(&entries, Some(width)).render();
        for line in rendered.lines() {
            let fixed: usize = line.rsplit_once(" | ").map_or(0, |(head, _)| console::measure_text_width(head) + 3);
            // Leading columns are never truncated; only the message may shrink
            if fixed < width {
                prop_assert!(console::measure_text_width(line) <= width, "line too wide: {:?}", line);
            }
        }
    }

    #[test]
    fn prop_limit_bounds_length(entries in arbitrary_entries(), limit in 0usize..50) {
        let total = entries.len();
        let bounded = merge_and_bound(entries, Some(limit));
        let expected = if limit == 0 { total } else { total.min(limit) };
        prop_assert_eq!(bounded.len(), expected);
    }
}
