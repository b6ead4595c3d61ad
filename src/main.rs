#![forbid(unsafe_code)]
//! # Collocations CLI
//!
//! This is the command-line interface for the `collocations` crate.
//! It counts a plain text or VRT corpus and writes one table of ranked
//! collocates per frequent word.
//!
//! ## Output
//! `<output>/<bucket>/'<word>'_collocates.tsv`, where the bucket is the
//! uppercased first letter of the word (`$punct$` for punctuation).
//!
//! ## Example
//! ```bash
//! cargo run --release -- --text corpus.txt --output collocates --span 3 --mincount 5
//! ```
//!
//! See `--help` for all available options.

use clap::Parser;
use collocations::{
    CollocationOptions, Columns, CorpusInput, ExportFormat, ExportOptions, RankingOptions,
    print_failed_words, run,
};
use log::error;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Output directory (created if missing)
    #[arg(short, long)]
    output: PathBuf,

    /// Corpus as plain text, one sentence per line ("-" reads stdin)
    #[arg(short, long)]
    text: Option<PathBuf>,

    /// Corpus as VRT file ("-" reads stdin)
    #[arg(short, long)]
    vrt: Option<PathBuf>,

    /// Optional lemma table (surface form<TAB>lemma, one pair per line)
    #[arg(short, long)]
    lemmas: Option<PathBuf>,

    /// Span of the collocate window: tokens counted on either side of a word
    #[arg(short, long, default_value = "3")]
    span: NonZeroUsize,

    /// Minimum count of source words and collocates to be in the output
    #[arg(short = 'm', long = "mincount", default_value_t = 5)]
    min_count: u64,

    /// Maximum number of collocates per word
    #[arg(long, default_value_t = 1000)]
    limit: usize,

    /// Output format for the tables (tsv, json)
    #[arg(long, default_value = "tsv")]
    export_format: ExportFormat,

    /// Only export log-likelihood, joint count and frequency (no mi, mi3, zscore, oe, loglog)
    #[arg(long, default_value_t = false)]
    ll_only: bool,
}

impl Cli {
    fn into_options(self) -> collocations::Result<CollocationOptions> {
        Ok(CollocationOptions {
            input: CorpusInput::from_paths(self.text, self.vrt)?,
            lemmas: self.lemmas,
            output: self.output,
            span: self.span,
            export: ExportOptions {
                ranking: RankingOptions {
                    min_count: self.min_count,
                    limit: self.limit,
                },
                format: self.export_format,
                columns: if self.ll_only {
                    Columns::LogLikelihood
                } else {
                    Columns::AllMeasures
                },
            },
        })
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = match cli.into_options() {
        Ok(options) => options,
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    };

    match run(&options) {
        Ok(report) => {
            println!("{}", report);
            if !report.failed_words.is_empty() {
                print_failed_words(&report.failed_words);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
