use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A normalized line split into whitespace tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub text: String,
    pub word_vector: Vec<String>,
    pub n_words: usize,
}

impl Sequence {
    pub fn new(text: &str) -> Self {
        let word_vec = str_to_word_vec(text);
        let word_vec_len = word_vec.len();
        Sequence {
            text: text.to_string(),
            word_vector: word_vec,
            n_words: word_vec_len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n_words == 0
    }

    /// Every contiguous window of `order` words, joined by a single space.
    pub fn ngrams(&self, order: usize) -> Vec<String> {
        get_ngrams_from_word_vec(&self.word_vector, order)
    }
}

pub fn str_to_word_vec(string: &str) -> Vec<String> {
    string.split_whitespace().map(|s| s.to_string()).collect()
}

/// Empty when the vector is shorter than `ngrams` or `ngrams` is zero.
pub fn get_ngrams_from_word_vec(word_vec: &[String], ngrams: usize) -> Vec<String> {
    if ngrams == 0 || word_vec.len() < ngrams {
        return vec![];
    }
    word_vec.windows(ngrams).map(|w| w.join(" ")).collect()
}

/// Source of line-oriented UTF-8 text. Lines come back without terminators.
pub trait LineReader: Send + Sync {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl LineReader for LocalFiles {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(io_err)
    }
}

/// Serves fixed contents keyed by path, for callers that already hold the text.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFiles {
    files: HashMap<PathBuf, Vec<String>>,
}

impl InMemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(
            path.into(),
            contents.lines().map(|l| l.to_string()).collect(),
        );
        self
    }
}

impl LineReader for InMemoryFiles {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        self.files.get(path).cloned().ok_or_else(|| Error::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}
