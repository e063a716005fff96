use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use tokio::runtime::Builder;

use crate::bleu::bleu;
use crate::config::{EvalConfig, EvalFiles};
use crate::distinct::distinct;
use crate::entropy::{entropy, FrequencyModel};
use crate::error::{Error, Result};
use crate::metric::Metric;
use crate::normalize::Normalizer;
use crate::precision::{CorpusBleu, PrecisionScorer};
use crate::utils::{LineReader, LocalFiles};

/// A corpus-level score plus one score per input line, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub aggregate: f64,
    pub per_example: Vec<f64>,
}

impl ScoreResult {
    pub fn new(aggregate: f64, per_example: Vec<f64>) -> Self {
        ScoreResult {
            aggregate,
            per_example,
        }
    }
}

/// Routes a metric to its scorer. Holds no mutable state, so one evaluator
/// can serve any number of concurrent calls.
pub struct Evaluator {
    normalizer: Normalizer,
    reader: Arc<dyn LineReader>,
    scorer: Arc<dyn PrecisionScorer>,
}

impl Evaluator {
    pub fn new(normalizer: Normalizer) -> Self {
        Evaluator {
            normalizer,
            reader: Arc::new(LocalFiles),
            scorer: Arc::new(CorpusBleu),
        }
    }

    pub fn from_config(config: &EvalConfig) -> Self {
        Self::new(config.normalizer())
    }

    pub fn with_reader(mut self, reader: Arc<dyn LineReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn PrecisionScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn evaluate(
        &self,
        reference_file: &Path,
        candidate_file: &Path,
        ref_src_file: Option<&Path>,
        metric: Metric,
    ) -> Result<ScoreResult> {
        debug!("{}: scoring {}", metric, candidate_file.display());
        let result = match metric {
            Metric::Bleu(max_order) => {
                let references = self.reader.read_lines(reference_file)?;
                let candidates = self.reader.read_lines(candidate_file)?;
                bleu(
                    &references,
                    &candidates,
                    max_order,
                    &self.normalizer,
                    self.scorer.as_ref(),
                )?
            }
            Metric::Distinct(max_order) => {
                let candidates = self.reader.read_lines(candidate_file)?;
                distinct(&candidates, max_order, &self.normalizer)
            }
            Metric::Entropy => {
                let corpus = ref_src_file.ok_or(Error::MissingCorpus)?;
                let model =
                    FrequencyModel::from_files(self.reader.as_ref(), &[corpus], &self.normalizer)?;
                let candidates = self.reader.read_lines(candidate_file)?;
                entropy(&model, &candidates, &self.normalizer)
            }
        };
        info!("{} -> {:.4}", metric, result.aggregate);
        Ok(result)
    }

    /// Parses `metric` before touching any file.
    pub fn evaluate_named(
        &self,
        reference_file: &Path,
        candidate_file: &Path,
        ref_src_file: Option<&Path>,
        metric: &str,
    ) -> Result<ScoreResult> {
        let metric: Metric = metric.parse()?;
        self.evaluate(reference_file, candidate_file, ref_src_file, metric)
    }
}

/// Scores one metric against local files.
pub fn evaluate(
    reference_file: &Path,
    candidate_file: &Path,
    ref_src_file: Option<&Path>,
    metric: &str,
    subword_marker: &str,
) -> Result<ScoreResult> {
    Evaluator::new(Normalizer::new(subword_marker, None)).evaluate_named(
        reference_file,
        candidate_file,
        ref_src_file,
        metric,
    )
}

/// Runs every metric on its own blocking task and returns results in
/// `metrics` order. Only entropy is handed the training corpus.
pub async fn evaluate_all(
    evaluator: Arc<Evaluator>,
    files: &EvalFiles,
    metrics: &[Metric],
) -> Vec<(Metric, Result<ScoreResult>)> {
    let tasks = metrics.iter().map(|&metric| {
        let evaluator = Arc::clone(&evaluator);
        let files = files.clone();
        async move {
            let handle = tokio::task::spawn_blocking(move || {
                let ref_src = if metric.needs_corpus() {
                    files.train_corpus.as_deref()
                } else {
                    None
                };
                evaluator.evaluate(&files.reference, &files.candidate, ref_src, metric)
            });
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(Error::Join(e.to_string())),
            };
            (metric, result)
        }
    });
    futures::future::join_all(tasks).await
}

/// Blocking wrapper over [`evaluate_all`] with a runtime sized by
/// `config.workers`.
pub fn evaluate_all_blocking(
    config: &EvalConfig,
    files: &EvalFiles,
    reader: Arc<dyn LineReader>,
) -> Result<Vec<(Metric, Result<ScoreResult>)>> {
    let rt = Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(config.workers.max(1))
        .build()
        .map_err(Error::Runtime)?;
    let evaluator = Arc::new(Evaluator::from_config(config).with_reader(reader));
    Ok(rt.block_on(evaluate_all(evaluator, files, &config.metrics)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::BleuStats;
    use crate::utils::InMemoryFiles;
    use std::path::PathBuf;
    use tokio::runtime::Runtime;

    fn close_enough(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn fixture() -> Arc<InMemoryFiles> {
        Arc::new(
            InMemoryFiles::new()
                .with_file("ref.txt", "a b c\nd e\n")
                .with_file("hyp.txt", "a b c\nd e\n")
                .with_file("short.txt", "a b c\n")
                .with_file("train.tsv", "a\tb\n"),
        )
    }

    fn evaluator() -> Evaluator {
        Evaluator::new(Normalizer::default()).with_reader(fixture())
    }

    fn run(metric: &str, ref_src: Option<&str>) -> Result<ScoreResult> {
        evaluator().evaluate_named(
            Path::new("ref.txt"),
            Path::new("hyp.txt"),
            ref_src.map(Path::new),
            metric,
        )
    }

    #[test]
    fn test_bleu_identical_files() {
        let result = run("bleu-1", None).unwrap();
        assert!(close_enough(result.aggregate, 100.0, 1e-9));
        assert_eq!(result.per_example.len(), 2);
        assert!(result.per_example.iter().all(|s| close_enough(*s, 100.0, 1e-9)));
    }

    #[test]
    fn test_distinct_identical_files() {
        let result = run("distinct-1", None).unwrap();
        assert_eq!(result.per_example, vec![100.0, 100.0]);
        assert_eq!(result.aggregate, 100.0);
    }

    #[test]
    fn test_entropy_uses_ref_src() {
        let result = evaluator()
            .evaluate_named(
                Path::new("ref.txt"),
                Path::new("train_hyp.txt"),
                Some(Path::new("train.tsv")),
                "entropy",
            )
            .unwrap_err();
        // candidate missing from the fixture
        assert!(matches!(result, Error::Io { .. }));

        let files = Arc::new(
            InMemoryFiles::new()
                .with_file("train.tsv", "a\tb\n")
                .with_file("hyp.txt", "a b\n"),
        );
        let result = Evaluator::new(Normalizer::default())
            .with_reader(files)
            .evaluate(
                Path::new("unused.txt"),
                Path::new("hyp.txt"),
                Some(Path::new("train.tsv")),
                Metric::Entropy,
            )
            .unwrap();
        assert!(close_enough(result.aggregate, 1.0, 1e-12));
        assert_eq!(result.per_example, vec![1.0]);
    }

    #[test]
    fn test_entropy_without_corpus() {
        let err = run("entropy", None).unwrap_err();
        assert!(matches!(err, Error::MissingCorpus), "got {:?}", err);
    }

    #[test]
    fn test_unknown_metric_fails_before_io() {
        let err = Evaluator::new(Normalizer::default())
            .with_reader(Arc::new(InMemoryFiles::new()))
            .evaluate_named(Path::new("nope"), Path::new("nope"), None, "rouge-l")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMetric(_)), "got {:?}", err);
    }

    struct FixedScorer;

    impl PrecisionScorer for FixedScorer {
        fn compute(
            &self,
            _references: &[Vec<Vec<String>>],
            candidates: &[Vec<String>],
            max_order: usize,
            _smooth: bool,
        ) -> BleuStats {
            BleuStats {
                bleu: 0.5,
                precisions: vec![0.5; max_order],
                brevity_penalty: 1.0,
                ratio: 1.0,
                translation_length: candidates.len(),
                reference_length: candidates.len(),
            }
        }
    }

    #[test]
    fn test_injected_scorer_is_scaled() {
        let result = evaluator()
            .with_scorer(Arc::new(FixedScorer))
            .evaluate(Path::new("ref.txt"), Path::new("hyp.txt"), None, Metric::Bleu(2))
            .unwrap();
        assert_eq!(result.aggregate, 50.0);
        assert_eq!(result.per_example, vec![50.0, 50.0]);
    }

    #[test]
    fn test_misaligned_files() {
        let err = evaluator()
            .evaluate(
                Path::new("ref.txt"),
                Path::new("short.txt"),
                None,
                Metric::Bleu(1),
            )
            .unwrap_err();
        assert!(matches!(err, Error::AlignmentMismatch { .. }), "got {:?}", err);
    }

    #[test]
    fn test_evaluate_local_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let reference = dir.path().join("ref.txt");
        let candidate = dir.path().join("hyp.txt");
        std::fs::write(&reference, "Ġa b c\nd e\n").expect("write");
        std::fs::write(&candidate, "a b c\nd Ġe\n").expect("write");

        let result = evaluate(&reference, &candidate, None, "BLEU-2", "Ġ").unwrap();
        assert!(close_enough(result.aggregate, 100.0, 1e-9));
        assert_eq!(result.per_example.len(), 2);
    }

    #[test]
    fn test_evaluate_all_keeps_metric_order() {
        let files = EvalFiles::new("ref.txt", "hyp.txt").with_train_corpus("train.tsv");
        let metrics = Metric::DEFAULTS.to_vec();

        let rt = Runtime::new().expect("Failed to create async runtime");
        let results = rt.block_on(evaluate_all(Arc::new(evaluator()), &files, &metrics));

        assert_eq!(results.len(), metrics.len());
        for ((metric, result), expected) in results.iter().zip(metrics.iter()) {
            assert_eq!(metric, expected);
            let result = result.as_ref().expect("metric failed");
            assert_eq!(result.per_example.len(), 2);
        }
        let (_, bleu1) = &results[0];
        assert!(close_enough(bleu1.as_ref().unwrap().aggregate, 100.0, 1e-9));
    }

    #[test]
    fn test_evaluate_all_reports_failures_per_metric() {
        let files = EvalFiles {
            reference: PathBuf::from("ref.txt"),
            candidate: PathBuf::from("hyp.txt"),
            train_corpus: None,
        };
        let config = EvalConfig::new()
            .with_metrics(vec![Metric::Distinct(1), Metric::Entropy])
            .with_workers(2);

        let results = evaluate_all_blocking(&config, &files, fixture()).unwrap();
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(Error::MissingCorpus)));
    }
}
