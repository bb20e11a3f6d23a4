//! Validate command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::lexicon_source::LexiconSource;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the lexicon file to validate
    #[arg(short = 'x', long, value_name = "FILE", required = true)]
    pub lexicon: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating lexicon: {}", self.lexicon.display());

        match LexiconSource::File(self.lexicon.clone()).load() {
            Ok(lexicon) => {
                println!("✓ Lexicon is valid!");
                println!("  Entries: {}", lexicon.len());
                println!("  Surface forms: {}", lexicon.surface_count());
                println!("  Categories: {}", lexicon.categories().len());
                Ok(())
            }
            Err(e) => {
                println!("✗ Lexicon is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}
