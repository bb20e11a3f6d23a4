//! Segment command implementation

use anyhow::{Context, Result};
use chartseg_core::{Lexicon, LexiconSegmenter, SegmenterConfig};
use clap::Args;
use rayon::prelude::*;
use std::path::PathBuf;

use super::{create_formatter, create_writer, init_logging, OutputFormat};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, Utterance, UtteranceReader};
use crate::lexicon_source::LexiconSource;
use crate::output::UtteranceRecord;
use crate::progress::ProgressReporter;

/// Arguments for the segment command
#[derive(Debug, Args)]
pub struct SegmentArgs {
    /// Input files or patterns (supports glob), one utterance per line
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Lexicon file
    #[arg(short = 'x', long, value_name = "FILE")]
    pub lexicon: Option<PathBuf>,

    /// Comma-separated words to use instead of a lexicon file
    #[arg(short, long, value_name = "WORDS", value_delimiter = ',')]
    pub words: Vec<String>,

    /// Gap policy: all, one, begin, end, beginend, or none
    #[arg(short, long, value_name = "POLICY")]
    pub policy: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Report at most N segmentations per utterance
    #[arg(short, long, value_name = "N")]
    pub max: Option<usize>,

    /// Segment the utterances of each file in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Number of worker threads for parallel processing
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Bracket words that are not in the lexicon in text output
    #[arg(long)]
    pub mark_tentative: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl SegmentArgs {
    /// Execute the segment command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting segmentation");
        log::debug!("Arguments: {:?}", self);

        let config = CliConfig::load_or_default(self.config.as_deref())?;
        let segmenter_config = self.segmenter_config(&config)?;
        let format = self.output_format(&config)?;

        let lexicon = LexiconSource::from_args(self.lexicon.as_ref(), &self.words)?.load()?;
        let segmenter = LexiconSegmenter::with_config(lexicon, segmenter_config);

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} files to process", files.len());

        let parallel = self.parallel || config.performance.parallel;
        let pool = if parallel {
            Some(self.thread_pool(&config)?)
        } else {
            None
        };

        let writer = create_writer(self.output.as_deref())?;
        let mut formatter = create_formatter(
            format,
            writer,
            config.output.pretty_json,
            self.mark_tentative || config.output.mark_tentative,
        );

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let mut total = 0usize;
        for path in &files {
            let utterances = UtteranceReader::read_utterances(path)?;
            let source = path.display().to_string();

            let records = match &pool {
                Some(pool) => pool.install(|| {
                    utterances
                        .par_iter()
                        .map(|u| segment_one(&segmenter, &source, u))
                        .collect::<Vec<_>>()
                }),
                None => utterances
                    .iter()
                    .map(|u| segment_one(&segmenter, &source, u))
                    .collect(),
            };

            for record in &records {
                formatter.format_utterance(record)?;
            }
            total += records.len();
            progress.file_completed(&source, records.len());
        }

        formatter.finish()?;
        progress.finish();
        log::info!("Segmented {} utterances from {} files", total, files.len());

        Ok(())
    }

    /// Merge command-line flags over the configuration file
    fn segmenter_config(&self, config: &CliConfig) -> Result<SegmenterConfig> {
        let policy = self
            .policy
            .as_deref()
            .unwrap_or(config.segmentation.policy.as_str());
        let max = self.max.or(match config.segmentation.max_segmentations {
            0 => None,
            n => Some(n),
        });

        let mut builder = SegmenterConfig::builder()
            .policy_name(policy)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        if let Some(max) = max {
            builder = builder.max_segmentations(max);
        }
        let segmenter_config = builder
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        log::debug!("Segmenter configuration: {:?}", segmenter_config);
        Ok(segmenter_config)
    }

    fn output_format(&self, config: &CliConfig) -> Result<OutputFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => OutputFormat::from_name(&config.output.default_format).ok_or_else(|| {
                CliError::ConfigError(format!(
                    "unknown output format `{}`",
                    config.output.default_format
                ))
                .into()
            }),
        }
    }

    fn thread_pool(&self, config: &CliConfig) -> Result<rayon::ThreadPool> {
        let threads = self
            .threads
            .or(match config.performance.worker_threads {
                0 => None,
                n => Some(n),
            })
            .unwrap_or_else(num_cpus::get);
        log::info!("Segmenting in parallel with {} threads", threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build thread pool")
    }
}

fn segment_one(
    segmenter: &LexiconSegmenter<Lexicon>,
    source: &str,
    utterance: &Utterance,
) -> UtteranceRecord {
    let output = segmenter.segment(&utterance.text);
    if output.is_empty() {
        log::warn!(
            "{}:{}: no segmentation for `{}`",
            source,
            utterance.line,
            utterance.text
        );
    }
    log::debug!(
        "{}:{}: {} segmentations, {} chart nodes, {:?}",
        source,
        utterance.line,
        output.segmentations.len(),
        output.chart_nodes,
        output.duration
    );
    UtteranceRecord::new(source, utterance.line, &utterance.text, &output)
}
