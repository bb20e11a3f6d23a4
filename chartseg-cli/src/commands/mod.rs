//! CLI command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};

pub mod list;
pub mod parse;
pub mod segment;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment unsegmented utterances into lexicon words
    Segment(segment::SegmentArgs),

    /// Parse sentences with a categorial grammar lexicon
    Parse(parse::ParseArgs),

    /// Check that a lexicon file loads
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Segment(args) => args.execute(),
            Commands::Parse(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::List { subcommand } => list::execute(subcommand),
        }
    }
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List available gap policies
    Policies,

    /// List available output formats
    Formats,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per utterance, alternatives separated by ` | `
    Text,
    /// JSON array of utterance records
    Json,
    /// Markdown sections with numbered segmentations
    Markdown,
}

impl OutputFormat {
    /// All formats in listing order
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown];

    /// Name accepted on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }

    /// Parse a format name from a config file
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
    }
}

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // a second initialization in the same process keeps the first logger
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .try_init();
    }
}

/// Open the output destination, stdout when no path is given
pub(crate) fn create_writer(path: Option<&Path>) -> Result<Box<dyn Write + Send + Sync>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Build the formatter for `format` over `writer`
pub(crate) fn create_formatter(
    format: OutputFormat,
    writer: Box<dyn Write + Send + Sync>,
    pretty_json: bool,
    mark_tentative: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => {
            Box::new(TextFormatter::new(writer).with_tentative_marks(mark_tentative))
        }
        OutputFormat::Json => Box::new(JsonFormatter::new(writer).pretty(pretty_json)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        for format in OutputFormat::ALL {
            assert_eq!(OutputFormat::from_name(format.as_str()), Some(format));
        }
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("html"), None);
    }

    #[test]
    fn test_list_commands_debug_format() {
        let list_cmd = Commands::List {
            subcommand: ListCommands::Policies,
        };
        let debug_str = format!("{:?}", list_cmd);
        assert!(debug_str.contains("List"));
        assert!(debug_str.contains("Policies"));
    }

    #[test]
    fn test_create_writer_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        {
            let mut writer = create_writer(Some(&path)).unwrap();
            writeln!(writer, "hello").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");

        assert!(create_writer(Some(Path::new("/nonexistent/dir/out.txt"))).is_err());
    }
}
