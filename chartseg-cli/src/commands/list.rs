//! List command implementation

use anyhow::Result;
use chartseg_core::TilingPolicy;

use super::{ListCommands, OutputFormat};

/// Print the requested listing to stdout
pub fn execute(subcommand: &ListCommands) -> Result<()> {
    for line in lines(subcommand) {
        println!("{line}");
    }
    Ok(())
}

fn lines(subcommand: &ListCommands) -> Vec<String> {
    match subcommand {
        ListCommands::Policies => {
            let mut lines: Vec<String> = TilingPolicy::VARIANTS
                .iter()
                .map(|p| format!("  {:<10} {}", p.as_str(), p.description()))
                .collect();
            lines.insert(0, "Available gap policies:".to_string());
            lines.push(format!("  {:<10} lexicon words only", "none"));
            lines
        }
        ListCommands::Formats => {
            let mut lines = vec!["Available output formats:".to_string()];
            lines.extend(OutputFormat::ALL.iter().map(|f| format!("  {}", f.as_str())));
            lines
        }
    }
}
