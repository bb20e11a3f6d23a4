//! JSON output formatter

use super::{OutputFormatter, UtteranceRecord};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs all utterance records as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    records: Vec<UtteranceRecord>,
    pretty: bool,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
            pretty: true,
        }
    }

    /// Choose between pretty and compact output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_utterance(&mut self, record: &UtteranceRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.records)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
