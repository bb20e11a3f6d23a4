//! Reading corpus files: one utterance or sentence per line

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Line prefix for comments in corpus files
pub const COMMENT_PREFIX: char = '#';

/// One non-comment line of a corpus file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// 1-based line number in the source file
    pub line: usize,
    /// Line text with surrounding whitespace trimmed
    pub text: String,
}

/// Reader for corpus files
pub struct UtteranceReader;

impl UtteranceReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Read the utterances of a file, skipping blank and comment lines
    pub fn read_utterances(path: &Path) -> Result<Vec<Utterance>> {
        Ok(Self::parse_utterances(&Self::read_text(path)?))
    }

    /// Split corpus text into utterances
    pub fn parse_utterances(text: &str) -> Vec<Utterance> {
        text.lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                let line = line.trim();
                if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                    return None;
                }
                Some(Utterance {
                    line: idx + 1,
                    text: line.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let utterances = UtteranceReader::parse_utterances("# corpus\nabc\n\n  d e  \n#x\n");
        assert_eq!(
            utterances,
            vec![
                Utterance {
                    line: 2,
                    text: "abc".to_string()
                },
                Utterance {
                    line: 4,
                    text: "d e".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.txt");
        fs::write(&path, "yuwant\nðəbʊk\n").unwrap();

        let utterances = UtteranceReader::read_utterances(&path).unwrap();
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[1].text, "ðəbʊk");
    }

    #[test]
    fn test_read_missing_file() {
        let err = UtteranceReader::read_utterances(Path::new("/nonexistent/corpus.txt"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
