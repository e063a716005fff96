use std::path::PathBuf;
use std::sync::Arc;

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::{EvalConfig, EvalFiles};
use crate::error::Error;
use crate::metric::Metric;
use crate::normalize::{Normalizer, SubwordScheme, DEFAULT_SUBWORD_MARKER};
use crate::score::{evaluate_all_blocking, Evaluator};
use crate::utils::LocalFiles;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::Io { .. } => PyIOError::new_err(err.to_string()),
            Error::Runtime(_) | Error::Join(_) => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

fn parse_scheme(option: Option<&str>) -> Result<Option<SubwordScheme>, Error> {
    option.map(str::parse).transpose()
}

#[pyfunction]
#[pyo3(signature = (reference_file, candidate_file, ref_src_file, metric, subword_token=DEFAULT_SUBWORD_MARKER, subword_option=None))]
fn evaluate(
    py: Python,
    reference_file: PathBuf,
    candidate_file: PathBuf,
    ref_src_file: Option<PathBuf>,
    metric: &str,
    subword_token: &str,
    subword_option: Option<&str>,
) -> PyResult<(f64, Vec<f64>)> {
    let metric: Metric = metric.parse()?;
    let evaluator = Evaluator::new(Normalizer::new(subword_token, parse_scheme(subword_option)?));

    let result = py.allow_threads(|| {
        evaluator.evaluate(
            &reference_file,
            &candidate_file,
            ref_src_file.as_deref(),
            metric,
        )
    })?;

    Ok((result.aggregate, result.per_example))
}

#[pyfunction]
#[pyo3(signature = (reference_file, candidate_file, train_corpus_file=None, metrics=None, subword_token=DEFAULT_SUBWORD_MARKER, subword_option=None, threads=16))]
#[allow(clippy::too_many_arguments)]
fn evaluate_all(
    py: Python,
    reference_file: PathBuf,
    candidate_file: PathBuf,
    train_corpus_file: Option<PathBuf>,
    metrics: Option<Vec<String>>,
    subword_token: &str,
    subword_option: Option<&str>,
    threads: usize,
) -> PyResult<Vec<(String, f64, Vec<f64>)>> {
    let mut config = EvalConfig::new()
        .with_subword_marker(subword_token)
        .with_subword_scheme(parse_scheme(subword_option)?)
        .with_workers(threads);
    if let Some(names) = metrics {
        let parsed = names
            .iter()
            .map(|n| n.parse::<Metric>())
            .collect::<Result<Vec<Metric>, Error>>()?;
        config = config.with_metrics(parsed);
    }
    let files = EvalFiles {
        reference: reference_file,
        candidate: candidate_file,
        train_corpus: train_corpus_file,
    };

    let results = py.allow_threads(|| evaluate_all_blocking(&config, &files, Arc::new(LocalFiles)))?;

    results
        .into_iter()
        .map(|(metric, result)| -> PyResult<(String, f64, Vec<f64>)> {
            let result = result?;
            Ok((metric.to_string(), result.aggregate, result.per_example))
        })
        .collect()
}

/// Parses and echoes a metric name, for checking identifiers from Python.
#[pyfunction]
fn canonical_metric(metric: &str) -> PyResult<String> {
    Ok(metric.parse::<Metric>()?.to_string())
}

#[pymodule]
fn textmetrics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(evaluate, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_all, m)?)?;
    m.add_function(wrap_pyfunction!(canonical_metric, m)?)?;
    Ok(())
}
