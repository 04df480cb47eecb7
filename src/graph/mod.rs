// src/graph/mod.rs
//! Cross-file reference graph: which files statically import which other files.
//!
//! Reachability is deliberately loose: a file counts as referenced if any
//! other file's resolved imports hit it by full path *or* if any import
//! specifier's base name matches its own. The base-name match tolerates path
//! aliasing schemes the resolver does not model; it trades false negatives in
//! "unused file" detection for never flagging a file that something does
//! import through a rewritten path.

pub mod imports;
pub mod resolver;

use crate::config::ENTRY_POINT_NAMES;
use crate::loader::FileRecord;
use self::resolver::ImportTarget;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Directed reference graph plus its transpose. Read-only after construction.
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    forward: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    reverse: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    /// Base names (extension-stripped last segments) of every repo-internal
    /// specifier, keyed to the importer so self-reference does not count.
    referenced_names: BTreeMap<String, BTreeSet<PathBuf>>,
    externals: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl ReferenceGraph {
    /// Builds forward and reverse maps over the whole corpus. Files whose text
    /// yields no specifiers are still present as nodes with empty edge sets.
    #[must_use]
    pub fn build(records: &[FileRecord]) -> Self {
        let corpus_paths: BTreeSet<PathBuf> =
            records.iter().map(|r| r.path.clone()).collect();

        let mut graph = Self::default();
        for record in records {
            graph.forward.entry(record.path.clone()).or_default();
            graph.reverse.entry(record.path.clone()).or_default();
        }

        for record in records {
            for specifier in imports::extract(&record.content) {
                match resolver::resolve(&record.path, &specifier, &corpus_paths) {
                    ImportTarget::Internal(target) => {
                        graph.note_name(&specifier, &record.path);
                        if target != record.path {
                            graph
                                .reverse
                                .entry(target.clone())
                                .or_default()
                                .insert(record.path.clone());
                            graph
                                .forward
                                .entry(record.path.clone())
                                .or_default()
                                .insert(target);
                        }
                    }
                    ImportTarget::Unresolved(_) => {
                        // No edge, but the base name still feeds the loose match.
                        graph.note_name(&specifier, &record.path);
                    }
                    ImportTarget::External(name) => {
                        graph
                            .externals
                            .entry(record.path.clone())
                            .or_default()
                            .insert(name);
                    }
                }
            }
        }

        graph
    }

    fn note_name(&mut self, specifier: &str, importer: &Path) {
        if let Some(name) = resolver::base_name(specifier) {
            self.referenced_names
                .entry(name)
                .or_default()
                .insert(importer.to_path_buf());
        }
    }

    /// Normalized outbound references of `file`.
    #[must_use]
    pub fn imports_of(&self, file: &Path) -> BTreeSet<PathBuf> {
        self.forward.get(file).cloned().unwrap_or_default()
    }

    /// External package specifiers seen in `file`, excluded from resolution.
    #[must_use]
    pub fn externals_of(&self, file: &Path) -> BTreeSet<String> {
        self.externals.get(file).cloned().unwrap_or_default()
    }

    /// True if any other file references this one (by resolved path or by
    /// base name), or if it matches a framework entry-point filename.
    #[must_use]
    pub fn is_referenced_anywhere(&self, file: &Path) -> bool {
        if self.is_entry_point(file) {
            return true;
        }
        if self.reverse.get(file).is_some_and(|s| !s.is_empty()) {
            return true;
        }
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };
        self.referenced_names
            .get(stem)
            .is_some_and(|importers| importers.iter().any(|p| p != file))
    }

    #[must_use]
    pub fn is_entry_point(&self, file: &Path) -> bool {
        file.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| ENTRY_POINT_NAMES.contains(&name))
    }
}
