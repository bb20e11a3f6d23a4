//! High-level entry points: lexicon-driven segmentation and grammar parsing

use crate::chart::Chart;
use crate::combinator::{Application, SpanCombinator};
use crate::derivation::{count_derivations, enumerate_full, Derivations};
use crate::error::{ChartError, Error};
use crate::lexicon::{Lexicon, SpanLexicon};
use crate::parser::{parse, parse_segments, tokenize};
use crate::tiling::{enumerate_full_tilings, enumerate_tilings, Segmentation, TilingPolicy};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Segmentation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmenterConfig {
    pub(crate) policy: Option<TilingPolicy>, // None = lexical spans only
    pub(crate) max_segmentations: Option<usize>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            policy: Some(TilingPolicy::default()),
            max_segmentations: None,
        }
    }
}

impl SegmenterConfig {
    /// Create a configuration builder
    pub fn builder() -> SegmenterConfigBuilder {
        SegmenterConfigBuilder::default()
    }

    /// Gap policy, `None` when only lexical tilings are wanted
    pub fn policy(&self) -> Option<TilingPolicy> {
        self.policy
    }

    /// Cap on the segmentations reported per utterance
    pub fn max_segmentations(&self) -> Option<usize> {
        self.max_segmentations
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.max_segmentations == Some(0) {
            return Err(Error::Config(
                "max_segmentations must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for [`SegmenterConfig`]
#[derive(Debug, Default)]
pub struct SegmenterConfigBuilder {
    policy: Option<Option<TilingPolicy>>,
    max_segmentations: Option<usize>,
}

impl SegmenterConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap policy; `None` keeps lexical tilings only
    pub fn policy(mut self, policy: Option<TilingPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the gap policy by name, `none` meaning lexical tilings only
    pub fn policy_name(self, name: &str) -> Result<Self, Error> {
        if name.eq_ignore_ascii_case("none") {
            return Ok(self.policy(None));
        }
        let policy = TilingPolicy::from_str(name)?;
        Ok(self.policy(Some(policy)))
    }

    /// Report at most `count` segmentations per utterance
    pub fn max_segmentations(mut self, count: usize) -> Self {
        self.max_segmentations = Some(count);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SegmenterConfig, Error> {
        let mut config = SegmenterConfig::default();

        if let Some(policy) = self.policy {
            config.policy = policy;
        }

        if self.max_segmentations.is_some() {
            config.max_segmentations = self.max_segmentations;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Result of segmenting one utterance
#[derive(Debug, Clone)]
pub struct SegmentationOutput {
    /// Tokens of the utterance
    pub tokens: Vec<String>,
    /// Tilings found, sorted by boundaries
    pub segmentations: Vec<Segmentation>,
    /// Nodes in the lattice that was built
    pub chart_nodes: usize,
    /// True when the list was cut at the configured maximum
    pub truncated: bool,
    /// Time spent building and enumerating
    pub duration: Duration,
}

impl SegmentationOutput {
    /// Space-separated words of every segmentation
    pub fn texts(&self) -> Vec<String> {
        self.segmentations
            .iter()
            .map(|s| s.text(&self.tokens))
            .collect()
    }

    /// True when no segmentation was found
    pub fn is_empty(&self) -> bool {
        self.segmentations.is_empty()
    }
}

/// Segments utterances into words known to a lexicon
#[derive(Debug, Clone)]
pub struct LexiconSegmenter<L> {
    lexicon: L,
    config: SegmenterConfig,
    combinator: SpanCombinator,
}

impl<L: SpanLexicon> LexiconSegmenter<L> {
    /// Create a segmenter with the default configuration
    pub fn new(lexicon: L) -> Self {
        Self::with_config(lexicon, SegmenterConfig::default())
    }

    /// Create a segmenter with a custom configuration
    pub fn with_config(lexicon: L, config: SegmenterConfig) -> Self {
        Self {
            lexicon,
            config,
            combinator: SpanCombinator::default(),
        }
    }

    /// Get the current configuration
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Lexicon the segmenter looks words up in
    pub fn lexicon(&self) -> &L {
        &self.lexicon
    }

    /// Segment an utterance, one token per non-whitespace character
    pub fn segment(&self, utterance: &str) -> SegmentationOutput {
        self.segment_tokens(tokenize(utterance))
    }

    /// Segment an already tokenized utterance
    pub fn segment_tokens(&self, tokens: Vec<String>) -> SegmentationOutput {
        let start = Instant::now();
        let chart = parse_segments(&self.lexicon, &tokens, &self.combinator);

        let mut segmentations = match self.config.policy {
            Some(policy) => enumerate_tilings(&chart, policy),
            None => enumerate_full_tilings(&chart),
        };

        let mut truncated = false;
        if let Some(max) = self.config.max_segmentations {
            if segmentations.len() > max {
                segmentations.truncate(max);
                truncated = true;
            }
        }

        SegmentationOutput {
            chart_nodes: chart.node_count(),
            tokens,
            segmentations,
            truncated,
            duration: start.elapsed(),
        }
    }
}

/// Result of parsing one sentence with a grammar
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Packed chart of the sentence
    pub chart: Chart,
    /// Number of complete derivations
    pub derivation_count: u128,
}

impl ParseOutput {
    /// Enumerate the complete derivations
    pub fn derivations(&self) -> Derivations<'_> {
        enumerate_full(&self.chart)
    }

    /// True when the sentence has at least one complete derivation
    pub fn is_parsed(&self) -> bool {
        self.derivation_count > 0
    }
}

/// Parses token sequences with a categorial grammar lexicon
#[derive(Debug, Clone, Copy)]
pub struct GrammarParser<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> GrammarParser<'a> {
    /// Parse with the categories and entries of `lexicon`
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Lexicon in use
    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Parse a token sequence
    pub fn parse<T: AsRef<str>>(&self, tokens: &[T]) -> Result<ParseOutput, ChartError> {
        let combinator = Application::new(self.lexicon.categories());
        let chart = parse(self.lexicon, tokens, &combinator)?;
        let derivation_count = count_derivations(&chart);
        Ok(ParseOutput {
            chart,
            derivation_count,
        })
    }

    /// Parse a sentence of whitespace-separated tokens
    pub fn parse_sentence(&self, sentence: &str) -> Result<ParseOutput, ChartError> {
        let tokens: Vec<&str> = sentence.split_whitespace().collect();
        self.parse(&tokens)
    }
}
