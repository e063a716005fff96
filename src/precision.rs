use std::collections::HashMap;

use crate::utils::get_ngrams_from_word_vec;

/// Everything a corpus BLEU computation reports.
#[derive(Debug, Clone, PartialEq)]
pub struct BleuStats {
    /// BLEU as a ratio in [0, 1].
    pub bleu: f64,
    pub precisions: Vec<f64>,
    pub brevity_penalty: f64,
    pub ratio: f64,
    pub translation_length: usize,
    pub reference_length: usize,
}

/// Computes n-gram precision and brevity penalty over an aligned corpus.
///
/// `references[i]` holds every reference token sequence for `candidates[i]`.
pub trait PrecisionScorer: Send + Sync {
    fn compute(
        &self,
        references: &[Vec<Vec<String>>],
        candidates: &[Vec<String>],
        max_order: usize,
        smooth: bool,
    ) -> BleuStats;
}

/// Corpus BLEU with clipped counts, the shortest reference as the
/// effective reference length, and optional add-one smoothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusBleu;

/// Counts every n-gram of order 1 through `max_order`, keyed by order.
fn get_ngram_counts(word_vec: &[String], max_order: usize) -> HashMap<(usize, String), usize> {
    let mut hashmap: HashMap<(usize, String), usize> = HashMap::new();
    for order in 1..=max_order {
        for ngram in get_ngrams_from_word_vec(word_vec, order) {
            *hashmap.entry((order, ngram)).or_insert(0) += 1;
        }
    }
    hashmap
}

fn merge_max(
    merged: &mut HashMap<(usize, String), usize>,
    counts: HashMap<(usize, String), usize>,
) {
    for (ng, count) in counts {
        let slot = merged.entry(ng).or_insert(0);
        *slot = (*slot).max(count);
    }
}

fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|&v| v <= 0.0) {
        return 0.0;
    }

    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

impl PrecisionScorer for CorpusBleu {
    fn compute(
        &self,
        references: &[Vec<Vec<String>>],
        candidates: &[Vec<String>],
        max_order: usize,
        smooth: bool,
    ) -> BleuStats {
        let mut matches_by_order = vec![0usize; max_order];
        let mut possible_by_order = vec![0usize; max_order];
        let mut reference_length = 0;
        let mut translation_length = 0;

        for (refs, candidate) in references.iter().zip(candidates.iter()) {
            reference_length += refs.iter().map(|r| r.len()).min().unwrap_or(0);
            translation_length += candidate.len();

            let mut merged_ref_counts = HashMap::new();
            for reference in refs {
                merge_max(&mut merged_ref_counts, get_ngram_counts(reference, max_order));
            }

            for ((order, ng), pred_count) in get_ngram_counts(candidate, max_order) {
                if let Some(gold_count) = merged_ref_counts.get(&(order, ng)) {
                    matches_by_order[order - 1] += pred_count.min(*gold_count);
                }
            }
            for order in 1..=max_order {
                if candidate.len() >= order {
                    possible_by_order[order - 1] += candidate.len() - order + 1;
                }
            }
        }

        let precisions: Vec<f64> = matches_by_order
            .iter()
            .zip(possible_by_order.iter())
            .map(|(&matches, &possible)| {
                if smooth {
                    (matches as f64 + 1.0) / (possible as f64 + 1.0)
                } else if possible > 0 {
                    matches as f64 / possible as f64
                } else {
                    0.0
                }
            })
            .collect();

        let geo_mean = geometric_mean(&precisions);

        let ratio = if reference_length > 0 {
            translation_length as f64 / reference_length as f64
        } else if translation_length > 0 {
            f64::INFINITY
        } else {
            0.0
        };

        // ratio == 0 drives the exponent to -inf, giving a penalty of 0
        let brevity_penalty = if ratio > 1.0 {
            1.0
        } else if ratio > 0.0 {
            (1.0 - 1.0 / ratio).exp()
        } else {
            0.0
        };

        BleuStats {
            bleu: geo_mean * brevity_penalty,
            precisions,
            brevity_penalty,
            ratio,
            translation_length,
            reference_length,
        }
    }
}
