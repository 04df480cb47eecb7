// src/classify/signals.rs
//! Ordered signal evaluators.
//!
//! Each evaluator inspects one kind of evidence and returns zero or more
//! `SignalOutcome`s: an optional type override, a confidence delta, and a
//! human-readable reason. The fold in `classify::run` applies them in the
//! fixed order name-pattern, similarity, vcs status, recency, template
//! keywords, content markers. Order matters: a later signal may overwrite the
//! type, but confidence only accumulates (clamped at the very end).

use super::patterns::{self, NameFamily};
use super::FileType;
use crate::config::{ABANDONED_DAYS, STALE_DAYS};
use crate::graph::ReferenceGraph;
use crate::loader::FileRecord;
use crate::similarity::SimilarityEdge;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Weight each signal contributes when it fires.
pub mod weight {
    pub const NAME_PATTERN: i32 = 80;
    pub const DUPLICATE_OF_ORIGINAL: i32 = 90;
    pub const OLDER_TWIN: i32 = 70;
    pub const UNTRACKED: i32 = 20;
    pub const STALE: i32 = 30;
    pub const VERY_STALE: i32 = 40;
    pub const TEMPLATE_NAME: i32 = 60;
    pub const BACKUP_MARKER: i32 = 70;
    pub const DEPRECATION_MARKER: i32 = 80;
}

/// Partial result of one signal evaluation.
#[derive(Debug, Clone)]
pub struct SignalOutcome {
    pub type_override: Option<FileType>,
    pub confidence_delta: i32,
    pub reason: String,
    pub related: Option<PathBuf>,
}

impl SignalOutcome {
    fn note(reason: String) -> Self {
        Self {
            type_override: None,
            confidence_delta: 0,
            reason,
            related: None,
        }
    }

    fn typed(file_type: FileType, delta: i32, reason: String) -> Self {
        Self {
            type_override: Some(file_type),
            confidence_delta: delta,
            reason,
            related: None,
        }
    }

    fn with_related(mut self, related: PathBuf) -> Self {
        self.related = Some(related);
        self
    }
}

/// Everything a signal may consult. All references are to stage outputs that
/// are immutable during classification.
pub struct SignalContext<'a> {
    pub record: &'a FileRecord,
    pub best_edge: Option<&'a SimilarityEdge>,
    pub graph: &'a ReferenceGraph,
    pub corpus_paths: &'a BTreeSet<PathBuf>,
    /// mtime of the counterpart in `best_edge`, for the tie-break.
    pub counterpart_mtime: Option<SystemTime>,
    pub now: SystemTime,
}

impl SignalContext<'_> {
    fn age_days(&self) -> u64 {
        self.now
            .duration_since(self.record.modified_at)
            .map_or(0, |d| d.as_secs() / SECONDS_PER_DAY)
    }
}

/// Signal 1: backup/copy filename pattern. Derives the probable original by
/// suffix stripping and records it when it exists in the corpus.
#[must_use]
pub fn name_pattern(ctx: &SignalContext<'_>, _current: FileType) -> Vec<SignalOutcome> {
    let Some((family, original)) = patterns::match_duplicate_name(ctx.record.file_name()) else {
        return Vec::new();
    };

    let (file_type, label) = match family {
        NameFamily::SavedAside => (FileType::Backup, "backup"),
        NameFamily::OsDuplicate => (FileType::Copy, "copy"),
    };

    let sibling = ctx.record.path.with_file_name(&original);
    let mut outcome = SignalOutcome::typed(
        file_type,
        weight::NAME_PATTERN,
        format!("filename matches {label} pattern (probable original: {original})"),
    );
    if ctx.corpus_paths.contains(&sibling) {
        outcome = outcome.with_related(sibling);
    }
    vec![outcome]
}

/// Signal 2: similarity correlation on the file's highest-scoring edge.
#[must_use]
pub fn similarity(ctx: &SignalContext<'_>, current: FileType) -> Vec<SignalOutcome> {
    let Some(edge) = ctx.best_edge else {
        return Vec::new();
    };
    let Some(other) = edge.other_side(&ctx.record.path) else {
        return Vec::new();
    };

    if edge.score > crate::config::NEAR_IDENTICAL_THRESHOLD {
        return near_identical_outcome(ctx, current, edge, other);
    }
    if edge.score > 0.8 {
        return vec![SignalOutcome::note(format!(
            "similar to {} (score {:.2})",
            other.display(),
            edge.score
        ))];
    }
    Vec::new()
}

fn near_identical_outcome(
    ctx: &SignalContext<'_>,
    current: FileType,
    edge: &SimilarityEdge,
    other: &Path,
) -> Vec<SignalOutcome> {
    let self_named = patterns::is_duplicate_named(ctx.record.file_name());
    let other_named = other
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(patterns::is_duplicate_named);

    if self_named && !other_named {
        // The duplicate-named side of the pair. A name already typed Backup
        // stays Backup (it is an exact saved-aside); everything else is a copy.
        let file_type = if current == FileType::Backup {
            FileType::Backup
        } else {
            FileType::Copy
        };
        return vec![SignalOutcome::typed(
            file_type,
            weight::DUPLICATE_OF_ORIGINAL,
            format!(
                "near-identical to {} (score {:.2}), duplicate-named side",
                other.display(),
                edge.score
            ),
        )
        .with_related(other.to_path_buf())];
    }

    if !self_named && other_named {
        return vec![SignalOutcome::note(format!(
            "{} appears to be a duplicate of this file (score {:.2})",
            other.display(),
            edge.score
        ))];
    }

    // Neither (or both) sides duplicate-named: tie-break by modification time.
    tie_break_by_mtime(ctx, edge, other)
}

fn tie_break_by_mtime(
    ctx: &SignalContext<'_>,
    edge: &SimilarityEdge,
    other: &Path,
) -> Vec<SignalOutcome> {
    let Some(other_mtime) = ctx.counterpart_mtime else {
        return vec![SignalOutcome::note(format!(
            "near-identical to {} (score {:.2})",
            other.display(),
            edge.score
        ))];
    };

    let self_is_older = match ctx.record.modified_at.cmp(&other_mtime) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        // Equal mtimes: deterministic tie-break on path order.
        std::cmp::Ordering::Equal => ctx.record.path > *other,
    };

    if self_is_older {
        vec![SignalOutcome::typed(
            FileType::Copy,
            weight::OLDER_TWIN,
            format!(
                "near-identical to newer {} (score {:.2})",
                other.display(),
                edge.score
            ),
        )
        .with_related(other.to_path_buf())]
    } else {
        vec![SignalOutcome::note(format!(
            "near-identical to older {} (score {:.2})",
            other.display(),
            edge.score
        ))]
    }
}

/// Signal 3: version-control status. Untracked files are inherently more
/// suspect whatever their current type.
#[must_use]
pub fn vcs_status(ctx: &SignalContext<'_>, _current: FileType) -> Vec<SignalOutcome> {
    if ctx.record.vcs_status == crate::vcs::VcsStatus::Untracked {
        vec![SignalOutcome {
            type_override: None,
            confidence_delta: weight::UNTRACKED,
            reason: "not tracked by version control".to_string(),
            related: None,
        }]
    } else {
        Vec::new()
    }
}

/// Signal 4: modification recency. Past the abandonment horizon, a still-
/// active file is promoted to abandoned when nothing in the graph references
/// it.
#[must_use]
pub fn recency(ctx: &SignalContext<'_>, current: FileType) -> Vec<SignalOutcome> {
    let days = ctx.age_days();
    let mut outcomes = Vec::new();

    if days > STALE_DAYS {
        outcomes.push(SignalOutcome {
            type_override: None,
            confidence_delta: weight::STALE,
            reason: format!("not modified in {days} days"),
            related: None,
        });
    }

    if days > ABANDONED_DAYS {
        let unreferenced = !ctx.graph.is_referenced_anywhere(&ctx.record.path);
        let promote = current == FileType::Active && unreferenced;
        let reason = if promote {
            format!("unreferenced and untouched for {days} days")
        } else {
            format!("untouched for over {ABANDONED_DAYS} days")
        };
        outcomes.push(SignalOutcome {
            type_override: promote.then_some(FileType::Abandoned),
            confidence_delta: weight::VERY_STALE,
            reason,
            related: None,
        });
    }

    outcomes
}

/// Signal 5: template/example/sample filename keywords.
#[must_use]
pub fn template_name(ctx: &SignalContext<'_>, _current: FileType) -> Vec<SignalOutcome> {
    if patterns::is_template_named(ctx.record.file_name()) {
        vec![SignalOutcome::typed(
            FileType::Template,
            weight::TEMPLATE_NAME,
            "filename contains template/example keyword".to_string(),
        )]
    } else {
        Vec::new()
    }
}

/// Signal 6: explicit content markers. Evaluated last, so an explicit marker
/// wins over every inference.
#[must_use]
pub fn content_markers(ctx: &SignalContext<'_>, _current: FileType) -> Vec<SignalOutcome> {
    let mut outcomes = Vec::new();
    if patterns::has_backup_marker(&ctx.record.content) {
        outcomes.push(SignalOutcome::typed(
            FileType::Backup,
            weight::BACKUP_MARKER,
            "content carries an explicit BACKUP marker".to_string(),
        ));
    }
    if patterns::has_deprecation_marker(&ctx.record.content) {
        outcomes.push(SignalOutcome::typed(
            FileType::Abandoned,
            weight::DEPRECATION_MARKER,
            "content carries a deprecation marker".to_string(),
        ));
    }
    outcomes
}
