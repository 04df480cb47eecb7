// src/engine.rs
//! Stage orchestration: Loader -> {Graph, Similarity} -> Classifier -> Report.
//!
//! Each stage returns a new, separately-owned value; no stage mutates another
//! stage's output. The scan clock is held here so recency math is injectable
//! for tests.

use crate::classify;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::graph::ReferenceGraph;
use crate::loader;
use crate::report::{self, Report};
use crate::similarity;
use crate::vcs::StatusOracle;
use std::time::{Instant, SystemTime};

pub struct Engine {
    config: ScanConfig,
    now: SystemTime,
}

impl Engine {
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            now: SystemTime::now(),
        }
    }

    /// Pins the scan clock. Tests use this to make recency signals
    /// deterministic.
    #[must_use]
    pub fn with_clock(mut self, now: SystemTime) -> Self {
        self.now = now;
        self
    }

    /// Runs the full pipeline over the configured roots.
    ///
    /// # Errors
    /// Fails fast on configuration errors (missing root, malformed overlay);
    /// per-file problems are carried through as `error` classifications
    /// instead of failing the run.
    pub fn run(&self, oracle: &dyn StatusOracle) -> Result<Report> {
        self.config.validate()?;
        let deadline = self.config.deadline.map(|d| Instant::now() + d);

        let corpus = loader::load(&self.config, oracle)?;
        if self.config.verbose {
            eprintln!(
                "loaded {} files ({} unreadable)",
                corpus.records.len(),
                corpus.failures.len()
            );
        }

        let graph = ReferenceGraph::build(&corpus.records);
        let edges = similarity::detect(&corpus.records, deadline);

        let classifications =
            classify::run(&corpus.records, &edges, &graph, &corpus.failures, self.now);

        Ok(report::build(classifications, &edges, chrono::Utc::now()))
    }
}
