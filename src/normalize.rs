//! Line normalization shared by every metric.
//!
//! A line first has its subword segmentation reverted, then every occurrence
//! of the subword marker is deleted. Marker removal is plain substring
//! removal and runs whether or not a subword scheme was chosen.

use std::str::FromStr;

use crate::error::Error;
use crate::utils::Sequence;

/// Continuation marker emitted by byte-level BPE vocabularies.
pub const DEFAULT_SUBWORD_MARKER: &str = "Ġ";

const BPE_JOINER: &str = "@@";
const SPM_SPACE: char = '\u{2581}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubwordScheme {
    /// `low@@ er` style joiners.
    Bpe,
    /// SentencePiece `▁low er` style word starts.
    Spm,
}

impl SubwordScheme {
    /// Reverts a segmented line to word level.
    pub fn revert(&self, line: &str) -> String {
        match self {
            Self::Bpe => {
                let joined = line.replace("@@ ", "");
                let joined = joined.trim();
                joined
                    .strip_suffix(BPE_JOINER)
                    .unwrap_or(joined)
                    .trim()
                    .to_string()
            }
            Self::Spm => line
                .chars()
                .filter(|c| *c != ' ')
                .map(|c| if c == SPM_SPACE { ' ' } else { c })
                .collect::<String>()
                .trim()
                .to_string(),
        }
    }
}

impl FromStr for SubwordScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bpe" => Ok(Self::Bpe),
            "spm" => Ok(Self::Spm),
            _ => Err(Error::UnknownSubwordScheme(s.to_string())),
        }
    }
}

/// Reverts subword segmentation with an optional scheme. `None` passes the
/// line through with only its surrounding whitespace trimmed.
pub fn revert_subwords(line: &str, scheme: Option<SubwordScheme>) -> String {
    match scheme {
        Some(scheme) => scheme.revert(line),
        None => line.trim().to_string(),
    }
}

/// Holds the marker and scheme explicitly so concurrent evaluations never
/// share normalization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    marker: String,
    scheme: Option<SubwordScheme>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SUBWORD_MARKER, None)
    }
}

impl Normalizer {
    pub fn new(marker: impl Into<String>, scheme: Option<SubwordScheme>) -> Self {
        Self {
            marker: marker.into(),
            scheme,
        }
    }

    pub fn normalize(&self, line: &str) -> String {
        let reverted = revert_subwords(line, self.scheme);
        // An empty marker would otherwise match between every character.
        if self.marker.is_empty() {
            return reverted;
        }
        reverted.replace(self.marker.as_str(), "")
    }

    pub fn sequence(&self, line: &str) -> Sequence {
        Sequence::new(&self.normalize(line))
    }

    pub fn sequences<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Sequence> {
        lines.iter().map(|l| self.sequence(l.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_stripped_without_scheme() {
        let norm = Normalizer::default();
        assert_eq!(norm.normalize("Ġthe Ġcat sat"), "the cat sat");
    }

    #[test]
    fn test_marker_stripped_mid_word() {
        let norm = Normalizer::default();
        assert_eq!(norm.normalize("caĠt"), "cat");
    }

    #[test]
    fn test_marker_stripped_after_scheme() {
        let norm = Normalizer::new("Ġ", Some(SubwordScheme::Bpe));
        assert_eq!(norm.normalize("Ġlow@@ er Ġcase"), "lower case");
    }

    #[test]
    fn test_custom_marker() {
        let norm = Normalizer::new("##", None);
        assert_eq!(norm.normalize("play ##ing"), "play ing");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let norm = Normalizer::default();
        let once = norm.normalize("the quick brown fox");
        assert_eq!(once, "the quick brown fox");
        assert_eq!(norm.normalize(&once), once);
    }

    #[test]
    fn test_no_marker_is_noop() {
        let norm = Normalizer::new("", None);
        assert_eq!(norm.normalize("a b c\n"), "a b c");
    }

    #[test]
    fn test_bpe_revert() {
        assert_eq!(SubwordScheme::Bpe.revert("the low@@ est tow@@ er"), "the lowest tower");
        assert_eq!(SubwordScheme::Bpe.revert("dangling@@"), "dangling");
    }

    #[test]
    fn test_spm_revert() {
        assert_eq!(
            SubwordScheme::Spm.revert("\u{2581}the \u{2581}low est"),
            "the lowest"
        );
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("BPE".parse::<SubwordScheme>().unwrap(), SubwordScheme::Bpe);
        assert_eq!("spm".parse::<SubwordScheme>().unwrap(), SubwordScheme::Spm);
        assert!("wordpiece".parse::<SubwordScheme>().is_err());
    }

    #[test]
    fn test_sequence_tokenizes_normalized_line() {
        let norm = Normalizer::default();
        let seq = norm.sequence("Ġa Ġb  c");
        assert_eq!(seq.word_vector, vec!["a", "b", "c"]);
    }
}
