// src/similarity.rs
//! Pairwise near-duplicate detection over the loaded corpus.
//!
//! The metric is line-set Jaccard similarity: trimmed, non-empty lines form a
//! set per file and the score is |A∩B| / |A∪B|. Equal digests short-circuit
//! to 1.0 without touching line sets.
//!
//! Comparison is O(n²) in file count. That is an accepted property of an
//! offline analysis pass, not a defect; callers with very large trees should
//! pre-filter by extension or directory. A locality-sensitive-hashing
//! pre-filter is possible future work if that ever stops being enough.

use crate::config::{NEAR_IDENTICAL_THRESHOLD, SIMILARITY_THRESHOLD};
use crate::loader::FileRecord;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    Exact,
    NearIdentical,
    Similar,
}

impl MatchKind {
    fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            Self::Exact
        } else if score > NEAR_IDENTICAL_THRESHOLD {
            Self::NearIdentical
        } else {
            Self::Similar
        }
    }
}

/// One unordered pair above the retention threshold. `file_a` < `file_b`
/// lexicographically, so the edge set never stores both directions.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityEdge {
    pub file_a: PathBuf,
    pub file_b: PathBuf,
    pub score: f64,
    pub kind: MatchKind,
}

impl SimilarityEdge {
    /// The counterpart of `path` in this edge, if `path` is a member.
    #[must_use]
    pub fn other_side(&self, path: &Path) -> Option<&Path> {
        if self.file_a == path {
            Some(&self.file_b)
        } else if self.file_b == path {
            Some(&self.file_a)
        } else {
            None
        }
    }
}

/// Computes all retained similarity edges. Embarrassingly parallel across
/// pairs; the post-sort keeps output deterministic regardless of which worker
/// finished first. Pairs evaluated after `deadline` are skipped, leaving a
/// valid partial edge set.
#[must_use]
pub fn detect(records: &[FileRecord], deadline: Option<Instant>) -> Vec<SimilarityEdge> {
    let line_sets: Vec<HashSet<&str>> = records.iter().map(|r| line_set(&r.content)).collect();

    let pairs: Vec<(usize, usize)> = (0..records.len())
        .flat_map(|i| (i + 1..records.len()).map(move |j| (i, j)))
        .collect();

    let mut edges: Vec<SimilarityEdge> = pairs
        .par_iter()
        .filter(|_| deadline.map_or(true, |d| Instant::now() < d))
        .filter_map(|&(i, j)| {
            let score = score_pair(&records[i], &records[j], &line_sets[i], &line_sets[j]);
            if score > SIMILARITY_THRESHOLD {
                Some(edge(&records[i].path, &records[j].path, score))
            } else {
                None
            }
        })
        .collect();

    edges.sort_by(|a, b| (&a.file_a, &a.file_b).cmp(&(&b.file_a, &b.file_b)));
    edges
}

fn edge(a: &Path, b: &Path, score: f64) -> SimilarityEdge {
    let (file_a, file_b) = if a <= b { (a, b) } else { (b, a) };
    SimilarityEdge {
        file_a: file_a.to_path_buf(),
        file_b: file_b.to_path_buf(),
        score,
        kind: MatchKind::from_score(score),
    }
}

fn score_pair<'s>(
    a: &FileRecord,
    b: &FileRecord,
    set_a: &HashSet<&'s str>,
    set_b: &HashSet<&'s str>,
) -> f64 {
    if a.digest == b.digest {
        return 1.0;
    }
    jaccard(set_a, set_b)
}

/// Normalized line set: trimmed lines, empties discarded.
fn line_set(content: &str) -> HashSet<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// |A∩B| / |A∪B|, 0.0 when both sets are empty.
#[must_use]
pub fn jaccard<'s>(a: &HashSet<&'s str>, b: &HashSet<&'s str>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    #[allow(clippy::cast_precision_loss)]
    {
        intersection as f64 / union as f64
    }
}

/// Scores one pair directly. Exposed for property tests.
#[must_use]
pub fn similarity(a: &FileRecord, b: &FileRecord) -> f64 {
    score_pair(a, b, &line_set(&a.content), &line_set(&b.content))
}

/// Index over edges keyed by member path.
#[must_use]
pub fn best_edge_for<'a>(edges: &'a [SimilarityEdge], path: &Path) -> Option<&'a SimilarityEdge> {
    edges
        .iter()
        .filter(|e| e.file_a == path || e.file_b == path)
        .max_by(|x, y| x.score.total_cmp(&y.score))
}
