use crate::error::{Error, Result};
use crate::normalize::Normalizer;
use crate::precision::PrecisionScorer;
use crate::score::ScoreResult;

/// Corpus and per-line BLEU against a single reference set, as percentages.
///
/// Each per-line score comes from running `scorer` on a one-line corpus, so
/// per-line and corpus scores share the same arithmetic. Smoothing is off.
pub fn bleu<R: AsRef<str>, C: AsRef<str>>(
    reference_lines: &[R],
    candidate_lines: &[C],
    max_order: usize,
    normalizer: &Normalizer,
    scorer: &dyn PrecisionScorer,
) -> Result<ScoreResult> {
    if reference_lines.len() != candidate_lines.len() {
        return Err(Error::AlignmentMismatch {
            references: reference_lines.len(),
            candidates: candidate_lines.len(),
        });
    }

    let per_segment_references: Vec<Vec<Vec<String>>> = normalizer
        .sequences(reference_lines)
        .into_iter()
        .map(|seq| vec![seq.word_vector])
        .collect();
    let translations: Vec<Vec<String>> = normalizer
        .sequences(candidate_lines)
        .into_iter()
        .map(|seq| seq.word_vector)
        .collect();

    let corpus = scorer.compute(&per_segment_references, &translations, max_order, false);

    let scores = per_segment_references
        .iter()
        .zip(translations.iter())
        .map(|(refs, trans)| {
            let stats = scorer.compute(
                std::slice::from_ref(refs),
                std::slice::from_ref(trans),
                max_order,
                false,
            );
            100.0 * stats.bleu
        })
        .collect();

    Ok(ScoreResult::new(100.0 * corpus.bleu, scores))
}
