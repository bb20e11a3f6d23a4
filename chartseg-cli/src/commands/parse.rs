//! Parse command implementation

use anyhow::Result;
use chartseg_core::{GrammarParser, Lexicon};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use super::{create_writer, init_logging};
use crate::error::CliError;
use crate::input::{resolve_patterns, Utterance, UtteranceReader};
use crate::lexicon_source::LexiconSource;

/// Arguments for the parse command
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Grammar lexicon file
    #[arg(short = 'x', long, value_name = "FILE", required = true)]
    pub lexicon: PathBuf,

    /// Input files or patterns, one whitespace-tokenized sentence per line
    #[arg(short, long, value_name = "FILE/PATTERN")]
    pub input: Vec<String>,

    /// Tokens of a single sentence to parse
    #[arg(value_name = "TOKENS")]
    pub tokens: Vec<String>,

    /// Print the packed chart of every sentence
    #[arg(long)]
    pub chart: bool,

    /// Print only the number of derivations
    #[arg(long)]
    pub count_only: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// A sentence and where it came from
struct Sentence {
    source: String,
    line: usize,
    text: String,
}

impl ParseArgs {
    /// Execute the parse command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        let sentences = self.collect_sentences()?;
        let lexicon = LexiconSource::File(self.lexicon.clone()).load()?;

        let mut writer = create_writer(self.output.as_deref())?;
        let mut parsed = 0usize;
        for sentence in &sentences {
            if self.write_sentence(&mut writer, &lexicon, sentence)? {
                parsed += 1;
            }
        }
        writer.flush()?;

        log::info!("Parsed {} of {} sentences", parsed, sentences.len());
        Ok(())
    }

    fn collect_sentences(&self) -> Result<Vec<Sentence>> {
        let mut sentences = Vec::new();
        if !self.tokens.is_empty() {
            sentences.push(Sentence {
                source: "<args>".to_string(),
                line: 1,
                text: self.tokens.join(" "),
            });
        }
        if !self.input.is_empty() {
            for path in resolve_patterns(&self.input)? {
                let source = path.display().to_string();
                for Utterance { line, text } in UtteranceReader::read_utterances(&path)? {
                    sentences.push(Sentence {
                        source: source.clone(),
                        line,
                        text,
                    });
                }
            }
        }
        if sentences.is_empty() && self.input.is_empty() {
            return Err(CliError::ConfigError(
                "nothing to parse: give --input files or tokens".to_string(),
            )
            .into());
        }
        Ok(sentences)
    }

    /// Write the analyses of one sentence; returns whether it had a
    /// complete derivation
    fn write_sentence<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        lexicon: &Lexicon,
        sentence: &Sentence,
    ) -> Result<bool> {
        let parser = GrammarParser::new(lexicon);
        let categories = lexicon.categories();

        writeln!(writer, "# {}", sentence.text)?;
        let output = match parser.parse_sentence(&sentence.text) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("{}:{}: {}", sentence.source, sentence.line, e);
                writeln!(writer, "# skipped: {e}")?;
                writeln!(writer)?;
                return Ok(false);
            }
        };

        if self.chart {
            write!(writer, "{}", output.chart.display(categories))?;
        }

        writeln!(writer, "# derivations: {}", output.derivation_count)?;
        if !self.count_only {
            for (idx, derivation) in output.derivations().iter().enumerate() {
                let mut listing = String::new();
                derivation.write_productions(&mut listing, categories)?;
                writeln!(
                    writer,
                    "## derivation {} ({})",
                    idx + 1,
                    categories.name(derivation.category())
                )?;
                write!(writer, "{listing}")?;
            }
        }
        writeln!(writer)?;

        Ok(output.is_parsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> ParseArgs {
        ParseArgs {
            lexicon: PathBuf::from("grammar.lex"),
            input: Vec::new(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            chart: false,
            count_only: false,
            output: None,
            quiet: true,
            verbose: 0,
        }
    }

    fn render(args: &ParseArgs, text: &str) -> (bool, String) {
        let lexicon: Lexicon = "john := NP\nruns := NP\\S".parse().unwrap();
        let sentence = Sentence {
            source: "<test>".to_string(),
            line: 1,
            text: text.to_string(),
        };
        let mut out = Vec::new();
        let parsed = args.write_sentence(&mut out, &lexicon, &sentence).unwrap();
        (parsed, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_derivation_listing() {
        let (parsed, text) = render(&args(&[]), "john runs");
        assert!(parsed);
        assert_eq!(
            text,
            "# john runs\n# derivations: 1\n## derivation 1 (S)\nS -> NP NP\\S\nNP -> john\nNP\\S -> runs\n\n"
        );
    }

    #[test]
    fn test_count_only_and_chart() {
        let mut a = args(&[]);
        a.count_only = true;
        a.chart = true;
        let (_, text) = render(&a, "john runs");
        assert!(text.contains("------ Chart:"));
        assert!(text.contains("# derivations: 1\n"));
        assert!(!text.contains("## derivation"));
    }

    #[test]
    fn test_unknown_token_is_skipped() {
        let (parsed, text) = render(&args(&[]), "john sleeps");
        assert!(!parsed);
        assert!(text.contains("# skipped: unknown lexical item `sleeps` at position 1"));
    }

    #[test]
    fn test_sentences_from_tokens() {
        let sentences = args(&["john", "runs"]).collect_sentences().unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "john runs");

        assert!(args(&[]).collect_sentences().is_err());
    }
}
