// src/graph/resolver.rs
//! Normalizes raw import specifiers into canonical repo-relative paths.
//!
//! Three specifier schemes are treated distinctly:
//! - root-aliased (`@/...`) rewrites to the fixed source directory,
//! - relative (`./`, `../`) resolves lexically against the importer's directory,
//! - bare specifiers are external packages, recorded but never resolved.

use crate::config::{SOURCE_ALIAS, SOURCE_DIR};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Candidate extensions probed when a specifier omits one.
const COMPLETION_EXTS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "json"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// Resolved to a file present in the loaded corpus.
    Internal(PathBuf),
    /// Repo-internal by scheme, but no corpus file matched.
    Unresolved(PathBuf),
    /// Bare specifier: an external package, excluded from the graph.
    External(String),
}

/// Resolves one specifier relative to `importer` against the set of loaded
/// corpus paths.
#[must_use]
pub fn resolve(importer: &Path, specifier: &str, corpus_paths: &BTreeSet<PathBuf>) -> ImportTarget {
    let candidate = if let Some(rest) = specifier.strip_prefix(SOURCE_ALIAS) {
        Path::new(SOURCE_DIR).join(rest)
    } else if specifier.starts_with("./") || specifier.starts_with("../") {
        let base = importer.parent().unwrap_or_else(|| Path::new(""));
        normalize(&base.join(specifier))
    } else {
        return ImportTarget::External(specifier.to_string());
    };

    match complete(&candidate, corpus_paths) {
        Some(path) => ImportTarget::Internal(path),
        None => ImportTarget::Unresolved(candidate),
    }
}

/// Lexical normalization: collapses `.` and `..` components without touching
/// the filesystem. `..` escaping the repo root is clamped at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Probes the corpus for the candidate itself, extension completions, and
/// directory index files.
fn complete(candidate: &Path, corpus_paths: &BTreeSet<PathBuf>) -> Option<PathBuf> {
    if corpus_paths.contains(candidate) {
        return Some(candidate.to_path_buf());
    }

    let name = candidate.file_name()?.to_str()?;
    for ext in COMPLETION_EXTS {
        let probe = candidate.with_file_name(format!("{name}.{ext}"));
        if corpus_paths.contains(&probe) {
            return Some(probe);
        }
    }

    for ext in COMPLETION_EXTS {
        let probe = candidate.join(format!("index.{ext}"));
        if corpus_paths.contains(&probe) {
            return Some(probe);
        }
    }

    None
}

/// Last path segment of a specifier or path, with any extension stripped.
/// Used for the loose base-name reference match.
#[must_use]
pub fn base_name(specifier: &str) -> Option<String> {
    let segment = specifier.rsplit('/').next()?.trim();
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    let stem = segment.rsplit_once('.').map_or(segment, |(s, _)| s);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
