//! Markdown output formatter

use super::{OutputFormatter, UtteranceRecord};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - one section per utterance with a numbered list of
/// segmentations
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    utterance_count: usize,
    segmentation_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            utterance_count: 0,
            segmentation_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_utterance(&mut self, record: &UtteranceRecord) -> Result<()> {
        self.utterance_count += 1;
        self.segmentation_count += record.segmentations.len();

        writeln!(
            self.writer,
            "### {}:{} `{}`",
            record.source, record.line, record.utterance
        )?;
        writeln!(self.writer)?;
        if record.segmentations.is_empty() {
            writeln!(self.writer, "*No segmentation*")?;
        }
        for (idx, seg) in record.segmentations.iter().enumerate() {
            writeln!(self.writer, "{}. {}", idx + 1, seg.text(true))?;
        }
        if record.truncated {
            writeln!(self.writer, "\n*More segmentations omitted*")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(
            self.writer,
            "*Total utterances: {}, segmentations: {}*",
            self.utterance_count, self.segmentation_count
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
