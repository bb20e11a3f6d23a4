//! Output formatting module

use anyhow::Result;
use chartseg_core::SegmentationOutput;
use serde::{Deserialize, Serialize};

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output the segmentations of one utterance
    fn format_utterance(&mut self, record: &UtteranceRecord) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Segmentations of one utterance, ready for output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UtteranceRecord {
    /// File the utterance was read from
    pub source: String,
    /// Line number in that file
    pub line: usize,
    /// The utterance as read
    pub utterance: String,
    /// Every segmentation found
    pub segmentations: Vec<SegmentationRecord>,
    /// True when segmentations were dropped over the configured maximum
    pub truncated: bool,
}

/// One segmentation in output form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentationRecord {
    /// Words left to right
    pub words: Vec<String>,
    /// Token offsets of the cuts between words
    pub boundaries: Vec<usize>,
    /// Indices of words that are not in the lexicon
    pub tentative: Vec<usize>,
}

impl SegmentationRecord {
    /// Words joined by spaces, tentative words in brackets when `mark` is set
    pub fn text(&self, mark: bool) -> String {
        self.words
            .iter()
            .enumerate()
            .map(|(k, w)| {
                if mark && self.tentative.contains(&k) {
                    format!("[{w}]")
                } else {
                    w.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl UtteranceRecord {
    /// Build a record from a segmenter result
    pub fn new(source: &str, line: usize, utterance: &str, output: &SegmentationOutput) -> Self {
        let segmentations = output
            .segmentations
            .iter()
            .map(|seg| SegmentationRecord {
                words: seg.words(&output.tokens),
                boundaries: seg.boundaries().to_vec(),
                tentative: (0..seg.segment_count())
                    .filter(|&k| seg.is_tentative(k))
                    .collect(),
            })
            .collect();
        Self {
            source: source.to_string(),
            line,
            utterance: utterance.to_string(),
            segmentations,
            truncated: output.truncated,
        }
    }
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chartseg_core::{Lexicon, LexiconSegmenter};

    /// Record for "abc" over the words a, b, c, ab, bc
    pub fn abc_record() -> UtteranceRecord {
        let lexicon = Lexicon::from_words(["a", "b", "c", "ab", "bc"]);
        let output = LexiconSegmenter::new(lexicon).segment("abc");
        UtteranceRecord::new("corpus.txt", 1, "abc", &output)
    }

    /// Shared buffer the formatters write into
    #[derive(Clone, Default)]
    pub struct SharedBuffer(pub std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }
}
