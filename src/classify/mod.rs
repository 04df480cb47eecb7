// src/classify/mod.rs
//! Classification: folds ordered signals into one typed verdict per file.

pub mod patterns;
pub mod recommend;
pub mod signals;

use crate::graph::ReferenceGraph;
use crate::loader::{FileRecord, LoadFailure};
use crate::similarity::{best_edge_for, SimilarityEdge};
use crate::vcs::VcsStatus;
use serde::Serialize;
use self::signals::{SignalContext, SignalOutcome};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Backup,
    Copy,
    Abandoned,
    Template,
    Active,
    /// The file was enumerated but could not be analyzed. Distinct from the
    /// five classification types so callers can tell "found active" apart
    /// from "could not look".
    Error,
}

impl FileType {
    /// Sort rank: most actionable first, error entries last.
    #[must_use]
    pub fn priority(&self) -> u8 {
        match self {
            Self::Backup => 0,
            Self::Copy => 1,
            Self::Abandoned => 2,
            Self::Template => 3,
            Self::Active => 4,
            Self::Error => 5,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Copy => "copy",
            Self::Abandoned => "abandoned",
            Self::Template => "template",
            Self::Active => "active",
            Self::Error => "error",
        }
    }
}

/// Final verdict for one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub path: PathBuf,
    pub file_type: FileType,
    /// Clamped to [0, 100].
    pub confidence: u8,
    /// Append-only, in signal evaluation order, for auditability.
    pub reasons: Vec<String>,
    /// Best-match counterpart: the original if this is a copy/backup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_file: Option<PathBuf>,
    /// Highest-scoring similarity counterpart, whatever the final type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_to: Option<PathBuf>,
    pub recommendations: Vec<String>,
    pub vcs_status: VcsStatus,
}

/// Classifies every loaded record plus one `Error` entry per load failure,
/// sorted by `(type priority, -confidence, path)` so the most actionable
/// items surface first.
#[must_use]
pub fn run(
    records: &[FileRecord],
    edges: &[SimilarityEdge],
    graph: &ReferenceGraph,
    failures: &[LoadFailure],
    now: SystemTime,
) -> Vec<Classification> {
    let corpus_paths: BTreeSet<PathBuf> = records.iter().map(|r| r.path.clone()).collect();
    let mtimes: HashMap<&std::path::Path, SystemTime> = records
        .iter()
        .map(|r| (r.path.as_path(), r.modified_at))
        .collect();

    let mut out: Vec<Classification> = records
        .iter()
        .map(|record| {
            let best_edge = best_edge_for(edges, &record.path);
            let counterpart_mtime = best_edge
                .and_then(|e| e.other_side(&record.path))
                .and_then(|p| mtimes.get(p).copied());
            let ctx = SignalContext {
                record,
                best_edge,
                graph,
                corpus_paths: &corpus_paths,
                counterpart_mtime,
                now,
            };
            classify_one(&ctx)
        })
        .collect();

    for failure in failures {
        out.push(error_entry(failure));
    }

    out.sort_by(|a, b| {
        (a.file_type.priority(), std::cmp::Reverse(a.confidence), &a.path).cmp(&(
            b.file_type.priority(),
            std::cmp::Reverse(b.confidence),
            &b.path,
        ))
    });
    out
}

/// The fixed evaluation order. A later signal may overwrite the type
/// (last-writer-wins); confidence only accumulates.
type Evaluator = fn(&SignalContext<'_>, FileType) -> Vec<SignalOutcome>;

const EVALUATORS: &[Evaluator] = &[
    signals::name_pattern,
    signals::similarity,
    signals::vcs_status,
    signals::recency,
    signals::template_name,
    signals::content_markers,
];

fn classify_one(ctx: &SignalContext<'_>) -> Classification {
    let mut file_type = FileType::Active;
    let mut confidence: i32 = 0;
    let mut reasons = Vec::new();
    let mut related_file = None;

    for evaluator in EVALUATORS {
        for outcome in evaluator(ctx, file_type) {
            if let Some(new_type) = outcome.type_override {
                file_type = new_type;
            }
            confidence += outcome.confidence_delta;
            reasons.push(outcome.reason);
            if outcome.related.is_some() {
                related_file = outcome.related;
            }
        }
    }

    let similar_to = ctx
        .best_edge
        .and_then(|e| e.other_side(&ctx.record.path))
        .map(std::path::Path::to_path_buf);

    let confidence = u8::try_from(confidence.clamp(0, 100)).unwrap_or(100);

    let mut classification = Classification {
        path: ctx.record.path.clone(),
        file_type,
        confidence,
        reasons,
        related_file,
        similar_to,
        recommendations: Vec::new(),
        vcs_status: ctx.record.vcs_status,
    };
    recommend::fill(&mut classification);
    classification
}

fn error_entry(failure: &LoadFailure) -> Classification {
    let mut classification = Classification {
        path: failure.path.clone(),
        file_type: FileType::Error,
        confidence: 0,
        reasons: vec![format!("could not analyze: {}", failure.message)],
        related_file: None,
        similar_to: None,
        recommendations: Vec::new(),
        vcs_status: VcsStatus::Untracked,
    };
    recommend::fill(&mut classification);
    classification
}
