// src/classify/recommend.rs
//! Remediation suggestions, generated purely from the final file type.

use super::{Classification, FileType};
use crate::vcs::VcsStatus;

/// Fills in `classification.recommendations` from its final state. Never
/// consults intermediate scoring state; the engine itself never deletes
/// anything, it only suggests.
pub fn fill(classification: &mut Classification) {
    let mut recs = Vec::new();

    match classification.file_type {
        FileType::Backup => {
            if let Some(related) = &classification.related_file {
                recs.push(format!(
                    "Verify {} is the current version, then delete this backup",
                    related.display()
                ));
                recs.push("Archive instead of deleting if the history matters".to_string());
            } else {
                recs.push("Review manually: no original counterpart was found".to_string());
            }
        }
        FileType::Copy => {
            if let Some(related) = &classification.related_file {
                recs.push(format!(
                    "Merge any unique changes into {}, then delete this copy",
                    related.display()
                ));
            } else {
                recs.push("Merge unique changes into the original, then delete".to_string());
            }
        }
        FileType::Abandoned => {
            recs.push("Review for salvageable code, then archive or remove".to_string());
        }
        FileType::Template => {
            recs.push("Relocate to a templates/examples area and document it".to_string());
        }
        FileType::Active => {
            if classification.vcs_status == VcsStatus::Untracked {
                recs.push("Add to version control".to_string());
            }
            if classification.similar_to.is_some() {
                recs.push("Review near-duplicate files for consolidation".to_string());
            }
        }
        FileType::Error => {
            recs.push("Re-run the scan or inspect the file's encoding".to_string());
        }
    }

    classification.recommendations = recs;
}
