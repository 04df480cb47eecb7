//! `deadwood` — codebase duplication and dead-code detection.
//!
//! Scans a source tree, builds a cross-file reference graph, measures
//! pairwise content similarity, and classifies every file as backup, copy,
//! abandoned, template, or active with a confidence score and remediation
//! recommendations. The engine only reports; it never deletes anything.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod loader;
pub mod report;
pub mod similarity;
pub mod summary;
pub mod vcs;
