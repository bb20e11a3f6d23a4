//! Plain text output formatter

use super::{OutputFormatter, UtteranceRecord};
use anyhow::Result;
use std::io::Write;

/// Separator between alternative segmentations on one line
pub const ALTERNATIVE_SEPARATOR: &str = " | ";

/// Plain text formatter - one line per utterance, alternatives separated
/// by ` | `
pub struct TextFormatter<W: Write> {
    writer: W,
    mark_tentative: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            mark_tentative: false,
        }
    }

    /// Bracket words that are not in the lexicon
    pub fn with_tentative_marks(mut self, mark: bool) -> Self {
        self.mark_tentative = mark;
        self
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_utterance(&mut self, record: &UtteranceRecord) -> Result<()> {
        let line = record
            .segmentations
            .iter()
            .map(|s| s.text(self.mark_tentative))
            .collect::<Vec<_>>()
            .join(ALTERNATIVE_SEPARATOR);
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{abc_record, SharedBuffer};

    #[test]
    fn test_alternatives_on_one_line() {
        let buffer = SharedBuffer::default();
        let mut formatter = TextFormatter::new(buffer.clone());
        formatter.format_utterance(&abc_record()).unwrap();
        formatter.finish().unwrap();
        assert_eq!(buffer.contents(), "a bc | a b c | ab c\n");
    }

    #[test]
    fn test_no_segmentation_is_empty_line() {
        let buffer = SharedBuffer::default();
        let mut formatter = TextFormatter::new(buffer.clone());
        let mut record = abc_record();
        record.segmentations.clear();
        formatter.format_utterance(&record).unwrap();
        assert_eq!(buffer.contents(), "\n");
    }
}
