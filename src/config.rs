use std::path::PathBuf;

use crate::metric::Metric;
use crate::normalize::{Normalizer, SubwordScheme, DEFAULT_SUBWORD_MARKER};

pub const DEFAULT_WORKERS: usize = 16;

/// The files one evaluation run reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalFiles {
    pub reference: PathBuf,
    pub candidate: PathBuf,
    /// Tab-separated training corpus, only read for entropy.
    pub train_corpus: Option<PathBuf>,
}

impl EvalFiles {
    pub fn new(reference: impl Into<PathBuf>, candidate: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            candidate: candidate.into(),
            train_corpus: None,
        }
    }

    pub fn with_train_corpus(mut self, path: impl Into<PathBuf>) -> Self {
        self.train_corpus = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub subword_marker: String,
    pub subword_scheme: Option<SubwordScheme>,
    pub metrics: Vec<Metric>,
    pub workers: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            subword_marker: DEFAULT_SUBWORD_MARKER.to_string(),
            subword_scheme: None,
            metrics: Metric::DEFAULTS.to_vec(),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subword_marker(mut self, marker: impl Into<String>) -> Self {
        self.subword_marker = marker.into();
        self
    }

    pub fn with_subword_scheme(mut self, scheme: Option<SubwordScheme>) -> Self {
        self.subword_scheme = scheme;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// At least one worker is always used.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.subword_marker.clone(), self.subword_scheme)
    }
}
