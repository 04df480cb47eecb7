// src/report.rs
//! Structured report assembly. Read-only over the classification list; no
//! reclassification happens here.

use crate::classify::Classification;
use crate::config::DUPLICATE_GROUP_THRESHOLD;
use crate::error::Result;
use crate::similarity::SimilarityEdge;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub summary: Summary,
    pub classifications: Vec<Classification>,
    pub duplicate_groups: Vec<DuplicateGroup>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_files: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_confidence_band: BTreeMap<String, usize>,
    pub by_vcs_status: BTreeMap<String, usize>,
}

/// A connected component of near-duplicates: `related_file` back-references
/// plus similarity edges above the duplicate-group threshold.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub members: Vec<PathBuf>,
}

/// Confidence bands for the summary: high > 80, medium 50-80, low < 50.
#[must_use]
pub fn confidence_band(confidence: u8) -> &'static str {
    if confidence > 80 {
        "high"
    } else if confidence >= 50 {
        "medium"
    } else {
        "low"
    }
}

/// Aggregates classifications and similarity edges into the final report.
#[must_use]
pub fn build(
    classifications: Vec<Classification>,
    edges: &[SimilarityEdge],
    timestamp: DateTime<Utc>,
) -> Report {
    let summary = summarize(&classifications);
    let duplicate_groups = duplicate_groups(&classifications, edges);
    Report {
        timestamp,
        summary,
        classifications,
        duplicate_groups,
    }
}

fn summarize(classifications: &[Classification]) -> Summary {
    let mut by_type = BTreeMap::new();
    let mut by_confidence_band = BTreeMap::new();
    let mut by_vcs_status = BTreeMap::new();

    for c in classifications {
        *by_type.entry(c.file_type.label().to_string()).or_insert(0) += 1;
        *by_confidence_band
            .entry(confidence_band(c.confidence).to_string())
            .or_insert(0) += 1;
        *by_vcs_status
            .entry(c.vcs_status.label().to_string())
            .or_insert(0) += 1;
    }

    Summary {
        total_files: classifications.len(),
        by_type,
        by_confidence_band,
        by_vcs_status,
    }
}

fn duplicate_groups(
    classifications: &[Classification],
    edges: &[SimilarityEdge],
) -> Vec<DuplicateGroup> {
    let mut components = Components::default();

    for c in classifications {
        if let Some(related) = &c.related_file {
            components.join(&c.path, related);
        }
    }
    for edge in edges {
        if edge.score > DUPLICATE_GROUP_THRESHOLD {
            components.join(&edge.file_a, &edge.file_b);
        }
    }

    components.into_groups()
}

/// Small union-find over paths; path-compressed on find.
#[derive(Default)]
struct Components {
    parents: HashMap<PathBuf, PathBuf>,
}

impl Components {
    fn join(&mut self, a: &Path, b: &Path) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parents.insert(ra, rb);
        }
    }

    fn find(&mut self, path: &Path) -> PathBuf {
        let mut current = path.to_path_buf();
        loop {
            let next = match self.parents.get(&current) {
                Some(parent) if *parent != current => parent.clone(),
                _ => break,
            };
            current = next;
        }
        self.parents.insert(path.to_path_buf(), current.clone());
        current
    }

    fn into_groups(mut self) -> Vec<DuplicateGroup> {
        let paths: Vec<PathBuf> = self.parents.keys().cloned().collect();
        let mut by_root: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for path in paths {
            let root = self.find(&path);
            by_root.entry(root).or_default().push(path);
        }

        let mut groups: Vec<DuplicateGroup> = by_root
            .into_values()
            .filter(|members| members.len() >= 2)
            .map(|mut members| {
                members.sort();
                DuplicateGroup { members }
            })
            .collect();
        groups.sort_by(|a, b| a.members.cmp(&b.members));
        groups
    }
}

/// Serializes the report as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(confidence_band(100), "high");
        assert_eq!(confidence_band(81), "high");
        assert_eq!(confidence_band(80), "medium");
        assert_eq!(confidence_band(50), "medium");
        assert_eq!(confidence_band(49), "low");
        assert_eq!(confidence_band(0), "low");
    }

    #[test]
    fn union_find_merges_chains() {
        let mut components = Components::default();
        components.join(Path::new("a.ts"), Path::new("b.ts"));
        components.join(Path::new("b.ts"), Path::new("c.ts"));
        components.join(Path::new("x.ts"), Path::new("y.ts"));
        let groups = components.into_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members.len(), 3);
        assert_eq!(groups[1].members.len(), 2);
    }
}
