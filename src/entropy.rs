use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::normalize::Normalizer;
use crate::score::ScoreResult;
use crate::utils::LineReader;

/// Unigram counts over a parallel training corpus.
#[derive(Debug, Clone, Default)]
pub struct FrequencyModel {
    counts: HashMap<String, usize>,
    num_tokens: usize,
}

impl FrequencyModel {
    /// Builds the model from `source<TAB>target` files. Both sides count.
    pub fn from_files<P: AsRef<Path>>(
        reader: &dyn LineReader,
        paths: &[P],
        normalizer: &Normalizer,
    ) -> Result<Self> {
        let mut model = Self::default();
        for path in paths {
            let path = path.as_ref();
            for (idx, line) in reader.read_lines(path)?.iter().enumerate() {
                let fields: Vec<&str> = line.split('\t').collect();
                let [src, tgt] = fields.as_slice() else {
                    return Err(Error::MalformedCorpusLine {
                        path: path.to_path_buf(),
                        line_no: idx + 1,
                        fields: fields.len(),
                    });
                };
                model.add_pair(src, tgt, normalizer);
            }
        }
        debug!(
            "frequency model: {} types, {} tokens",
            model.counts.len(),
            model.num_tokens
        );
        Ok(model)
    }

    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, S)], normalizer: &Normalizer) -> Self {
        let mut model = Self::default();
        for (src, tgt) in pairs {
            model.add_pair(src.as_ref(), tgt.as_ref(), normalizer);
        }
        model
    }

    fn add_pair(&mut self, src: &str, tgt: &str, normalizer: &Normalizer) {
        let line = format!("{} {}", src.trim(), tgt.trim());
        let seq = normalizer.sequence(&line);
        self.num_tokens += seq.n_words;
        for token in seq.word_vector {
            *self.counts.entry(token).or_insert(0) += 1;
        }
    }

    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    /// Unseen tokens count as seen once so no probability is ever zero.
    pub fn frequency(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0).max(1)
    }

    /// Surprisal in bits. An empty model uses a denominator of 1.
    pub fn surprisal(&self, token: &str) -> f64 {
        let p = self.frequency(token) as f64 / self.num_tokens.max(1) as f64;
        -p.log2()
    }
}

/// Mean surprisal of candidate tokens under `model`.
///
/// Per line this is the mean over that line's tokens; the aggregate is the
/// mean over every token in the file. A line with no tokens scores 0.0 and
/// adds nothing to the aggregate.
pub fn entropy<S: AsRef<str>>(
    model: &FrequencyModel,
    candidate_lines: &[S],
    normalizer: &Normalizer,
) -> ScoreResult {
    let mut total_surprisal = 0.0;
    let mut num_infer_tokens: usize = 0;
    let mut scores: Vec<f64> = Vec::with_capacity(candidate_lines.len());

    for (idx, line) in candidate_lines.iter().enumerate() {
        let seq = normalizer.sequence(line.as_ref());
        if seq.is_empty() {
            warn!("entropy: candidate line {} is empty, scoring 0", idx + 1);
            scores.push(0.0);
            continue;
        }
        let local: f64 = seq.word_vector.iter().map(|t| model.surprisal(t)).sum();
        total_surprisal += local;
        num_infer_tokens += seq.n_words;
        scores.push(local / seq.n_words as f64);
    }

    let aggregate = if num_infer_tokens == 0 {
        0.0
    } else {
        total_surprisal / num_infer_tokens as f64
    };
    ScoreResult::new(aggregate, scores)
}
