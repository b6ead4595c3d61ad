use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a collocation run.
///
/// Numeric domain problems (log of a non-positive count, zero divisors) are
/// not errors: they surface as `None` on the affected measure. Per-word export
/// failures are not errors either; they are collected in
/// [`CollocationReport::failed_words`](crate::CollocationReport).
#[derive(Debug, Error)]
pub enum CollocationError {
    #[error("use either a plain text corpus or a VRT corpus, not both")]
    ConflictingInputs,

    #[error("no corpus given: pass a plain text corpus or a VRT corpus")]
    MissingInput,

    #[error("{} is not a valid output directory: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },

    #[error("failed to read corpus {}: {source}", path.display())]
    Corpus { path: PathBuf, source: io::Error },

    #[error("failed to read lemma table {}: {source}", path.display())]
    Lemmas { path: PathBuf, source: csv::Error },
}

pub type Result<T> = std::result::Result<T, CollocationError>;
