//! Lexicon source management for CLI

use crate::error::CliError;
use anyhow::Result;
use chartseg_core::Lexicon;
use std::path::PathBuf;

/// Where the lexicon comes from
#[derive(Debug, Clone)]
pub enum LexiconSource {
    /// Lexicon file in the `surface := category : lf : freq` line format
    File(PathBuf),
    /// Bare words given on the command line
    Inline(Vec<String>),
}

impl LexiconSource {
    /// Pick the source from the command-line options; a file wins over
    /// inline words
    pub fn from_args(path: Option<&PathBuf>, words: &[String]) -> Result<Self> {
        match path {
            Some(path) => Ok(LexiconSource::File(path.clone())),
            None if !words.is_empty() => Ok(LexiconSource::Inline(words.to_vec())),
            None => Err(CliError::ConfigError(
                "either --lexicon or --words is required".to_string(),
            )
            .into()),
        }
    }

    /// Get the display name for the lexicon source
    pub fn display_name(&self) -> String {
        match self {
            LexiconSource::File(path) => format!("File: {}", path.display()),
            LexiconSource::Inline(words) => format!("Inline: {} words", words.len()),
        }
    }

    /// Load the lexicon
    pub fn load(&self) -> Result<Lexicon> {
        let lexicon = match self {
            LexiconSource::File(path) => {
                if !path.is_file() {
                    return Err(CliError::FileNotFound(path.display().to_string()).into());
                }
                Lexicon::load(path).map_err(|e| {
                    CliError::LexiconError(format!("{}: {e}", path.display()))
                })?
            }
            LexiconSource::Inline(words) => Lexicon::from_words(words),
        };
        log::info!(
            "Loaded lexicon ({}): {} entries, {} categories",
            self.display_name(),
            lexicon.len(),
            lexicon.categories().len()
        );
        Ok(lexicon)
    }
}
