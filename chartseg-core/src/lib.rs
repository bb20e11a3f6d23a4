//! Packed-chart span parsing and lexicon-driven word segmentation
//!
//! This crate builds a CYK-style chart over a token sequence and reads
//! analyses back out of it. Cells keep one node per category and record the
//! different ways a category was derived as backlink pairs, so ambiguity is
//! stored once and only expanded when derivations are enumerated.
//!
//! The same dynamic-programming fill serves two tasks:
//! - **Grammar parsing**: tokens are looked up in a categorial grammar
//!   lexicon and combined by forward and backward application.
//! - **Segmentation**: every substring of an unsegmented utterance is looked
//!   up in a word list, and the resulting lattice is tiled into words.
//!
//! # Example
//!
//! ```rust
//! use chartseg_core::{Lexicon, LexiconSegmenter};
//!
//! let lexicon = Lexicon::from_words(["a", "b", "c", "ab", "bc"]);
//! let segmenter = LexiconSegmenter::new(lexicon);
//!
//! let output = segmenter.segment("abc");
//! assert_eq!(output.texts(), vec!["a bc", "a b c", "ab c"]);
//! ```
//!
//! Grammar parsing works on whitespace-separated tokens:
//!
//! ```rust
//! use chartseg_core::{GrammarParser, Lexicon};
//!
//! let lexicon: Lexicon = "john := NP\nruns := NP\\S".parse().unwrap();
//! let output = GrammarParser::new(&lexicon).parse_sentence("john runs").unwrap();
//!
//! let derivations = output.derivations();
//! let first = derivations.get(0).unwrap();
//! assert_eq!(first.bracketed(lexicon.categories()), "(S (NP john) (NP\\S runs))");
//! ```

pub mod category;
pub mod chart;
pub mod combinator;
pub mod derivation;
pub mod error;
pub mod lexicon;
pub mod parser;
pub mod segmenter;
pub mod simple;
pub mod tiling;

pub use category::{CatId, Category, CategoryKind, CategoryTable, Slash};
pub use chart::{Backlink, Chart, ChartNode, NodeId, Span};
pub use combinator::{Application, Combinator, SpanCombinator};
pub use derivation::{count_derivations, enumerate_full, Derivation, Derivations, Production, Rhs};
pub use error::{CategoryError, ChartError, Error, LexiconError, Result, SegmentationError};
pub use lexicon::{LexicalEntry, Lexicon, SpanLexicon};
pub use parser::{parse, parse_segments, segment_lattice, tokenize};
pub use segmenter::{
    GrammarParser, LexiconSegmenter, ParseOutput, SegmentationOutput, SegmenterConfig,
    SegmenterConfigBuilder,
};
pub use simple::{parse_simple, SimpleChart};
pub use tiling::{
    enumerate_full_tilings, enumerate_tilings, SegmentBoundary, Segmentation, TilingPolicy,
};
