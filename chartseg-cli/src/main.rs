//! chartseg command-line entry point

use anyhow::Result;
use chartseg_cli::commands::Commands;
use clap::Parser;

/// Lexicon-driven word segmentation and categorial grammar parsing over
/// packed charts
#[derive(Debug, Parser)]
#[command(name = "chartseg", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
