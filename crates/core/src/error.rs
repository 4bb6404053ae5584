//! Error types for engine construction, query parsing, and corpus loading.

use thiserror::Error;

/// Errors produced by the core engine and the corpus loader.
///
/// All failures are immediate and local — there is no I/O inside query
/// paths, so nothing here is retryable.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The corpus contained zero documents after loading.
    #[error("corpus is empty")]
    EmptyCorpus,

    /// No corpus file was found at the given path.
    #[error("no corpus found at {0}")]
    NoCorpus(String),

    /// A boolean operator string outside AND/OR/NOT.
    #[error("invalid boolean operator: {0:?} (expected AND, OR or NOT)")]
    InvalidOperator(String),

    /// A field selector string outside ti/ab/tiab.
    #[error("invalid field selector: {0:?} (expected ti, ab or tiab)")]
    InvalidFields(String),

    /// A facet dimension string outside journal/year/author.
    #[error("invalid facet dimension: {0:?} (expected journal, year or author)")]
    InvalidFacet(String),

    /// Corpus file could not be read.
    #[error("corpus read failed: {0}")]
    Io(#[from] std::io::Error),
}
