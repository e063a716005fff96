use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown metric {0:?}")]
    UnknownMetric(String),

    /// The metric named an n-gram order that is zero or not a number.
    #[error("invalid n-gram order {order:?} in metric {metric:?}")]
    InvalidOrder { metric: String, order: String },

    #[error("unknown subword option {0:?} (expected \"bpe\" or \"spm\")")]
    UnknownSubwordScheme(String),

    /// Training corpus lines must be exactly `source<TAB>target`.
    #[error("{}:{line_no}: expected 2 tab-separated fields, found {fields}", path.display())]
    MalformedCorpusLine {
        path: PathBuf,
        line_no: usize,
        fields: usize,
    },

    #[error("reference has {references} lines but candidate has {candidates}")]
    AlignmentMismatch {
        references: usize,
        candidates: usize,
    },

    #[error("entropy needs a training corpus file")]
    MissingCorpus,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start metric workers: {0}")]
    Runtime(#[source] std::io::Error),

    /// A metric worker died before it could report back.
    #[error("metric worker failed: {0}")]
    Join(String),
}
