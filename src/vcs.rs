// src/vcs.rs
//! Version-control status oracle.
//!
//! The engine never asks git per file; `GitStatusOracle` snapshots the whole
//! repository once and answers lookups from memory. Any failure along the way
//! (no git binary, not a repository, unparsable output) degrades to
//! `Untracked` — the conservative default, since untracked nudges a file
//! toward "more suspect" rather than hiding it.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsStatus {
    Tracked,
    Untracked,
    Ignored,
}

impl VcsStatus {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tracked => "tracked",
            Self::Untracked => "untracked",
            Self::Ignored => "ignored",
        }
    }
}

/// Collaborator interface for version-control status lookups.
/// Paths are repo-relative, matching `FileRecord::path`.
pub trait StatusOracle {
    fn status(&self, path: &Path) -> VcsStatus;
}

/// Batch git-backed oracle. Runs `git ls-files` and
/// `git status --porcelain --ignored` once at construction.
pub struct GitStatusOracle {
    statuses: HashMap<PathBuf, VcsStatus>,
}

impl GitStatusOracle {
    /// Snapshots git status for the repository at `root`. Never fails: if git
    /// is unavailable the snapshot is simply empty and every lookup defaults
    /// to `Untracked`.
    #[must_use]
    pub fn snapshot(root: &Path) -> Self {
        let mut statuses = HashMap::new();

        if let Some(tracked) = run_git(root, &["ls-files", "-z"]) {
            for path in tracked.split('\0').filter(|s| !s.is_empty()) {
                statuses.insert(PathBuf::from(path), VcsStatus::Tracked);
            }
        }

        if let Some(porcelain) = run_git(root, &["status", "--porcelain", "--ignored", "-z"]) {
            parse_porcelain(&porcelain, &mut statuses);
        }

        Self { statuses }
    }
}

/// Parses NUL-terminated porcelain records. Records that do not split on a
/// char boundary at the status-code width are skipped, never panicked on.
fn parse_porcelain(porcelain: &str, statuses: &mut HashMap<PathBuf, VcsStatus>) {
    let mut entries = porcelain.split('\0').filter(|s| !s.is_empty());
    while let Some(entry) = entries.next() {
        let (Some(code), Some(path)) = (entry.get(..3), entry.get(3..)) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }
        let status = match code.trim_end() {
            "!!" => VcsStatus::Ignored,
            "??" => VcsStatus::Untracked,
            // Modified/staged entries are still tracked content.
            _ => VcsStatus::Tracked,
        };
        statuses.insert(PathBuf::from(path), status);
        // Rename and copy entries carry the origin path as a separate
        // NUL-terminated record; it is not a status entry of its own.
        if code.contains('R') || code.contains('C') {
            entries.next();
        }
    }
}

impl StatusOracle for GitStatusOracle {
    fn status(&self, path: &Path) -> VcsStatus {
        self.statuses
            .get(path)
            .copied()
            .unwrap_or(VcsStatus::Untracked)
    }
}

fn run_git(root: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

/// Map-backed oracle for tests and for callers without a repository.
#[derive(Debug, Default)]
pub struct FixedOracle {
    statuses: HashMap<PathBuf, VcsStatus>,
}

impl FixedOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<PathBuf>, status: VcsStatus) -> Self {
        self.statuses.insert(path.into(), status);
        self
    }
}

impl StatusOracle for FixedOracle {
    fn status(&self, path: &Path) -> VcsStatus {
        self.statuses
            .get(path)
            .copied()
            .unwrap_or(VcsStatus::Untracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_oracle_defaults_to_untracked() {
        let oracle = FixedOracle::new().with("src/a.ts", VcsStatus::Tracked);
        assert_eq!(oracle.status(Path::new("src/a.ts")), VcsStatus::Tracked);
        assert_eq!(
            oracle.status(Path::new("src/unknown.ts")),
            VcsStatus::Untracked
        );
    }

    #[test]
    fn git_oracle_outside_repo_defaults_to_untracked() {
        let oracle = GitStatusOracle::snapshot(Path::new("/"));
        assert_eq!(
            oracle.status(Path::new("anything.ts")),
            VcsStatus::Untracked
        );
    }

    #[test]
    fn porcelain_rename_entries_consume_the_origin_record() {
        let mut statuses = HashMap::new();
        parse_porcelain(
            "R  src/new.ts\0src/ééé.ts\0?? src/other.ts\0!! dist/a.js\0",
            &mut statuses,
        );
        assert_eq!(
            statuses.get(Path::new("src/new.ts")),
            Some(&VcsStatus::Tracked)
        );
        // The origin path is part of the rename record, not a file of its own.
        assert!(statuses.get(Path::new("src/ééé.ts")).is_none());
        assert_eq!(
            statuses.get(Path::new("src/other.ts")),
            Some(&VcsStatus::Untracked)
        );
        assert_eq!(
            statuses.get(Path::new("dist/a.js")),
            Some(&VcsStatus::Ignored)
        );
    }

    #[test]
    fn porcelain_short_or_misaligned_records_are_skipped() {
        let mut statuses = HashMap::new();
        // A record whose third byte is not a char boundary must not panic.
        parse_porcelain("ééé\0??\0 M src/mod.ts\0", &mut statuses);
        assert_eq!(statuses.len(), 1);
        assert_eq!(
            statuses.get(Path::new("src/mod.ts")),
            Some(&VcsStatus::Tracked)
        );
    }

    #[test]
    fn snapshot_survives_staged_rename_of_non_ascii_filename() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let root = dir.path();
        let git = |args: &[&str]| {
            Command::new("git")
                .args(args)
                .current_dir(root)
                .output()
                .map_or(false, |o| o.status.success())
        };
        // Skip quietly when git is unavailable in the test environment.
        if !git(&["init", "-q"]) {
            return;
        }
        git(&["config", "user.email", "dev@example.com"]);
        git(&["config", "user.name", "dev"]);
        std::fs::write(root.join("ééé.ts"), "export const e = 1;\n").expect("write");
        if !git(&["add", "."]) || !git(&["commit", "-qm", "init"]) || !git(&["mv", "ééé.ts", "renamed.ts"]) {
            return;
        }

        let oracle = GitStatusOracle::snapshot(root);
        assert_eq!(oracle.status(Path::new("renamed.ts")), VcsStatus::Tracked);
    }
}
