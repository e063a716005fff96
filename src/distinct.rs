use std::collections::HashSet;

use crate::normalize::Normalizer;
use crate::score::ScoreResult;

/// Distinct-n over candidate lines, as percentages.
///
/// The corpus ratio pools unique n-grams across every line, so an n-gram
/// repeated on two different lines counts once. Lines shorter than
/// `max_order` have no windows and score 0.
pub fn distinct<S: AsRef<str>>(
    candidate_lines: &[S],
    max_order: usize,
    normalizer: &Normalizer,
) -> ScoreResult {
    let mut num_windows: usize = 0;
    let mut unique_ngrams: HashSet<String> = HashSet::new();
    let mut scores: Vec<f64> = Vec::with_capacity(candidate_lines.len());

    for line in candidate_lines {
        let seq = normalizer.sequence(line.as_ref());
        let ngrams = seq.ngrams(max_order);
        if ngrams.is_empty() {
            scores.push(0.0);
            continue;
        }

        let local_count = ngrams.len();
        let local_unique: HashSet<&str> = ngrams.iter().map(|s| s.as_str()).collect();
        scores.push(100.0 * local_unique.len() as f64 / local_count as f64);

        num_windows += local_count;
        unique_ngrams.extend(ngrams);
    }

    let ratio = if num_windows == 0 {
        0.0
    } else {
        unique_ngrams.len() as f64 / num_windows as f64
    };

    ScoreResult::new(100.0 * ratio, scores)
}
