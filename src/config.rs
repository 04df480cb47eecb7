// src/config.rs
use crate::error::{DeadwoodError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directories that are never descended into: version control, build output,
/// dependency caches.
pub const PRUNE_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "dist",
    "build",
    "out",
    "target",
    ".next",
    ".nuxt",
    ".cache",
    "coverage",
    "vendor",
    "third_party",
    ".venv",
    "venv",
];

/// Extensions analyzed by default. The inclusion filter is extension-based,
/// not content-sniffed; anything else is skipped outright.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "css", "scss", "html", "json", "md",
];

/// Alias prefix rewritten to the fixed source directory during import resolution.
pub const SOURCE_ALIAS: &str = "@/";
pub const SOURCE_DIR: &str = "src";

/// Filenames treated as always-referenced framework entry points.
pub const ENTRY_POINT_NAMES: &[&str] = &[
    "index.ts",
    "index.tsx",
    "index.js",
    "index.jsx",
    "main.ts",
    "main.tsx",
    "main.js",
    "app.ts",
    "app.tsx",
    "App.tsx",
    "App.jsx",
    "_app.tsx",
    "vite.config.ts",
    "vite.config.js",
    "next.config.js",
    "next.config.mjs",
];

/// Minimum Jaccard score retained as a similarity edge.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;
/// Scores above this band are near-identical.
pub const NEAR_IDENTICAL_THRESHOLD: f64 = 0.95;
/// Edges above this score join duplicate groups in the report.
pub const DUPLICATE_GROUP_THRESHOLD: f64 = 0.9;

/// Days after which a file starts counting as stale.
pub const STALE_DAYS: u64 = 90;
/// Days after which an unreferenced file is promoted to abandoned.
pub const ABANDONED_DAYS: u64 = 365;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    /// Best-effort deadline for the whole scan; similarity pairs past the
    /// deadline are skipped rather than computed.
    pub deadline: Option<Duration>,
    pub verbose: bool,
}

impl ScanConfig {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            exclude_dirs: PRUNE_DIRS.iter().map(ToString::to_string).collect(),
            deadline: None,
            verbose: false,
        }
    }

    /// Validates the configuration before any output is produced.
    ///
    /// # Errors
    /// Returns `DeadwoodError::RootUnreadable` if any root is missing or not a
    /// directory, and `DeadwoodError::Config` if no roots were given.
    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            return Err(DeadwoodError::Config("no scan roots given".into()));
        }
        for root in &self.roots {
            match fs::metadata(root) {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => {
                    return Err(DeadwoodError::RootUnreadable {
                        source: std::io::Error::other("not a directory"),
                        path: root.clone(),
                    })
                }
                Err(source) => {
                    return Err(DeadwoodError::RootUnreadable {
                        source,
                        path: root.clone(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Overlays filter settings from `deadwood.toml` in the first root, when
    /// present. Missing file is not an error; a malformed file is.
    ///
    /// # Errors
    /// Returns `DeadwoodError::Config` if the file exists but does not parse.
    pub fn load_overlay(&mut self) -> Result<()> {
        let Some(root) = self.roots.first() else {
            return Ok(());
        };
        let path = root.join("deadwood.toml");
        if !path.is_file() {
            return Ok(());
        }
        let text = fs::read_to_string(&path).map_err(|source| DeadwoodError::Io {
            source,
            path: path.clone(),
        })?;
        let overlay: ConfigOverlay = toml::from_str(&text)
            .map_err(|e| DeadwoodError::Config(format!("{}: {e}", path.display())))?;
        self.apply(overlay);
        Ok(())
    }

    fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(scan) = overlay.scan {
            if let Some(exts) = scan.extensions {
                self.extensions = exts;
            }
            for dir in scan.extra_exclude_dirs.unwrap_or_default() {
                if !self.exclude_dirs.contains(&dir) {
                    self.exclude_dirs.push(dir);
                }
            }
        }
    }

    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }

    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| e == &ext)
            })
    }
}

/// On-disk shape of `deadwood.toml`. Only scan filters are configurable;
/// thresholds and signal weights are fixed.
#[derive(Debug, Deserialize)]
struct ConfigOverlay {
    scan: Option<ScanOverlay>,
}

#[derive(Debug, Deserialize)]
struct ScanOverlay {
    extensions: Option<Vec<String>>,
    extra_exclude_dirs: Option<Vec<String>>,
}
