// src/loader.rs
//! Corpus loader: enumerates eligible files under the configured roots and
//! materializes one immutable `FileRecord` per file.
//!
//! Per-file read failures never abort the scan; the file is skipped and
//! recorded as a `LoadFailure` so it can surface in the final report as an
//! `error` entry. An unreadable root, by contrast, is a fatal configuration
//! error caught in `ScanConfig::validate` before loading starts.

use crate::config::ScanConfig;
use crate::error::Result;
use crate::vcs::{StatusOracle, VcsStatus};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// One discovered file. Immutable after the loader pass; content is read
/// exactly once and never re-read downstream.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Primary key within one scan: root-relative for a single-root scan,
    /// root-prefixed when several roots are scanned so colliding relative
    /// paths stay distinct.
    pub path: PathBuf,
    pub content: String,
    /// SHA-256 hex digest, used for the exact-duplicate short-circuit.
    pub digest: String,
    pub modified_at: SystemTime,
    pub vcs_status: VcsStatus,
}

impl FileRecord {
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or("")
    }
}

/// A file that was enumerated but could not be analyzed.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Loader output: records plus the skip-and-warn failures.
#[derive(Debug, Default)]
pub struct Corpus {
    pub records: Vec<FileRecord>,
    pub failures: Vec<LoadFailure>,
}

impl Corpus {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Runs the load pass over every configured root.
///
/// # Errors
/// Returns an error only for walk-level failures; individual unreadable files
/// are recorded in `Corpus::failures` instead.
pub fn load(config: &ScanConfig, oracle: &dyn StatusOracle) -> Result<Corpus> {
    let mut corpus = Corpus::default();

    // With one root, paths are root-relative. With several, two roots may
    // contain the same relative path, so the root prefix stays on to keep the
    // primary key unique.
    let strip_root = config.roots.len() == 1;
    for root in &config.roots {
        load_root(root, config, oracle, &mut corpus, strip_root);
    }

    // Deterministic downstream behavior regardless of directory iteration order.
    corpus.records.sort_by(|a, b| a.path.cmp(&b.path));
    corpus.failures.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(corpus)
}

fn load_root(
    root: &Path,
    config: &ScanConfig,
    oracle: &dyn StatusOracle,
    corpus: &mut Corpus,
    strip_root: bool,
) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && config.is_excluded_dir(&e.file_name().to_string_lossy()))
        });

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                // Walk errors carry through to the report like read failures;
                // only pathless ones have nowhere to attach.
                match e.path() {
                    Some(abs) => {
                        let path = if strip_root {
                            abs.strip_prefix(root).unwrap_or(abs).to_path_buf()
                        } else {
                            abs.to_path_buf()
                        };
                        corpus.failures.push(LoadFailure {
                            path,
                            message: e.to_string(),
                        });
                    }
                    None => eprintln!("WARN: walk error under {}: {e}", root.display()),
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = if strip_root {
            entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf()
        } else {
            entry.path().to_path_buf()
        };
        if !config.matches_extension(&rel) {
            continue;
        }

        match read_record(entry.path(), rel.clone(), oracle) {
            Ok(record) => corpus.records.push(record),
            Err(message) => {
                if config.verbose {
                    eprintln!("WARN: skipping {}: {message}", rel.display());
                }
                corpus.failures.push(LoadFailure { path: rel, message });
            }
        }
    }
}

fn read_record(
    abs: &Path,
    path: PathBuf,
    oracle: &dyn StatusOracle,
) -> std::result::Result<FileRecord, String> {
    let content = fs::read_to_string(abs).map_err(|e| e.to_string())?;
    let modified_at = fs::metadata(abs)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let digest = digest_hex(&content);
    let vcs_status = oracle.status(&path);

    Ok(FileRecord {
        path,
        content,
        digest,
        modified_at,
        vcs_status,
    })
}

/// SHA-256 hex digest of the content as loaded.
#[must_use]
pub fn digest_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let bytes = hasher.finalize();
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
