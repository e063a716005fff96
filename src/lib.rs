pub mod bleu;
pub mod config;
pub mod distinct;
pub mod entropy;
pub mod error;
pub mod metric;
pub mod normalize;
pub mod precision;
pub mod score;
pub mod utils;
#[cfg(feature = "python")]
mod python;
// TODO: bleu() takes one reference file. PrecisionScorer already accepts several
//       references per line, so reading reference0, reference1, ... is only plumbing.

pub use crate::config::{EvalConfig, EvalFiles};
pub use crate::error::{Error, Result};
pub use crate::metric::Metric;
pub use crate::normalize::{Normalizer, SubwordScheme, DEFAULT_SUBWORD_MARKER};
pub use crate::precision::{BleuStats, CorpusBleu, PrecisionScorer};
pub use crate::score::{evaluate, evaluate_all, evaluate_all_blocking, Evaluator, ScoreResult};
pub use crate::utils::{LineReader, LocalFiles, Sequence};
