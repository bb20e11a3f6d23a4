//! Error types for chart construction, categories, and lexicons
//!
//! "No derivation" and "no segmentation" are not errors: enumerators
//! return empty collections for a chart without a complete analysis.

use thiserror::Error;

/// Failures while building a chart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Grammar parsing needs at least one token
    #[error("cannot parse an empty token sequence")]
    EmptyInput,

    /// A token has no lexicon entry in a mode where every token must be known
    #[error("unknown lexical item `{token}` at position {position}")]
    UnknownToken {
        /// Surface form of the token
        token: String,
        /// Token offset in the input
        position: usize,
    },
}

/// Failures while reading a category string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// Nothing left after removing whitespace and outer parentheses
    #[error("empty category")]
    Empty,

    /// Parentheses do not balance
    #[error("unbalanced parentheses in category `{0}`")]
    Unbalanced(String),

    /// A slash without a result or argument category
    #[error("missing operand in category `{0}`")]
    MissingOperand(String),
}

/// Failures while loading a lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// I/O error from the underlying reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed category on a lexicon line
    #[error("line {line}: {source}")]
    Category {
        /// 1-based line number
        line: usize,
        /// Category parsing failure
        #[source]
        source: CategoryError,
    },

    /// Frequency field is not a positive integer
    #[error("line {line}: invalid frequency `{value}`")]
    InvalidFrequency {
        /// 1-based line number
        line: usize,
        /// Offending field text
        value: String,
    },

    /// Entry with an empty surface form
    #[error("line {line}: missing surface form")]
    MissingSurface {
        /// 1-based line number
        line: usize,
    },
}

/// Failures while building a segmentation from boundary offsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentationError {
    /// Boundary at or beyond the ends of the utterance
    #[error("boundary {offset} outside (0, {length})")]
    OutOfRange {
        /// Offending offset
        offset: usize,
        /// Utterance length in tokens
        length: usize,
    },

    /// Boundaries must be strictly increasing
    #[error("boundary {offset} does not follow the previous one")]
    NotIncreasing {
        /// Offending offset
        offset: usize,
    },

    /// Tentative flags do not match the number of segments
    #[error("expected {expected} segment flags, got {actual}")]
    FlagCount {
        /// Number of segments
        expected: usize,
        /// Number of flags given
        actual: usize,
    },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// Chart construction error
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Category error
    #[error(transparent)]
    Category(#[from] CategoryError),

    /// Lexicon loading error
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    /// Segmentation error
    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, Error>;
