//! Per-word collocate tables on disk.
//!
//! Layout: `<output>/<bucket>/'<word>'_collocates.<ext>`, where the bucket is
//! the uppercased first character of the word and every word starting with
//! ASCII punctuation shares the `$punct$` bucket.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{debug, error};
use rayon::prelude::*;
use serde::Serialize;

use crate::counts::CorpusCounts;
use crate::ranking::{Collocate, RankingOptions, rank_collocates};

/// Bucket of words that start with punctuation.
pub const PUNCTUATION_BUCKET: &str = "$punct$";

/// Replacement for `/` in file names.
pub const SLASH_ESCAPE: &str = "<slash>";

/// Output file format.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    /// Tab separated table with a `WORD`/`FREQUENCY` header line.
    #[default]
    Tsv,
    /// One JSON object per word.
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// Which columns a table carries.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Columns {
    /// Collocate, log-likelihood, joint count and collocate frequency.
    LogLikelihood,
    /// The above plus mi, mi3, z-score, observed/expected and log-log.
    #[default]
    AllMeasures,
}

impl Columns {
    fn header(self) -> &'static [&'static str] {
        match self {
            Columns::LogLikelihood => &["word", "LL", "coll_count", "word_count"],
            Columns::AllMeasures => &[
                "word",
                "LL",
                "coll_count",
                "word_count",
                "mi",
                "mi3",
                "zscore",
                "oe",
                "loglog",
            ],
        }
    }
}

/// Everything that shapes the exported tables.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ExportOptions {
    pub ranking: RankingOptions,
    pub format: ExportFormat,
    pub columns: Columns,
}

/// Outcome of exporting every qualifying word.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub tables_written: usize,
    /// `(word, error message)` for every table that could not be written.
    pub failed_words: Vec<(String, String)>,
}

/// Bucket directory name of `word`.
pub fn bucket(word: &str) -> String {
    match word.chars().next() {
        Some(first) if !first.is_ascii_punctuation() => first.to_uppercase().collect(),
        _ => PUNCTUATION_BUCKET.to_string(),
    }
}

/// File name of the table of `word`.
pub fn file_name(word: &str, format: ExportFormat) -> String {
    format!(
        "'{}'_collocates.{}",
        word.replace('/', SLASH_ESCAPE),
        format.extension()
    )
}

/// Rank and write the table of every word with at least `min_count`
/// occurrences, in parallel.
///
/// A table that fails to write does not stop the others; it is logged and
/// listed in the summary.
pub fn export_all(output: &Path, counts: &CorpusCounts, options: &ExportOptions) -> ExportSummary {
    let min_count = options.ranking.min_count;
    let mut words: Vec<&str> = counts
        .frequencies()
        .iter()
        .filter(|&(_, &frequency)| frequency >= min_count)
        .map(|(word, _)| word.as_str())
        .collect();
    words.sort_unstable();

    let results: Vec<(&str, io::Result<PathBuf>)> = words
        .par_iter()
        .map(|&word| {
            let collocates = rank_collocates(counts, word, &options.ranking);
            let written = write_table(
                output,
                word,
                counts.frequency(word),
                &collocates,
                options.format,
                options.columns,
            );
            (word, written)
        })
        .collect();

    let mut summary = ExportSummary::default();
    for (word, result) in results {
        match result {
            Ok(path) => {
                debug!("Wrote {}", path.display());
                summary.tables_written += 1;
            }
            Err(e) => {
                error!("Failed to write collocates of {word:?}: {e}");
                summary.failed_words.push((word.to_string(), e.to_string()));
            }
        }
    }
    summary
}

/// Write one word's table below `output`, creating its bucket directory if
/// needed. Returns the path of the written file.
pub fn write_table(
    output: &Path,
    word: &str,
    frequency: u64,
    collocates: &[Collocate],
    format: ExportFormat,
    columns: Columns,
) -> io::Result<PathBuf> {
    let dir = output.join(bucket(word));
    fs::create_dir_all(&dir)?;
    let path = dir.join(file_name(word, format));
    let mut writer = BufWriter::new(File::create(&path)?);
    match format {
        ExportFormat::Tsv => write_tsv(&mut writer, word, frequency, collocates, columns)?,
        ExportFormat::Json => write_json(&mut writer, word, frequency, collocates, columns)?,
    }
    writer.flush()?;
    Ok(path)
}

/// The `WORD`/`FREQUENCY` line is written as is; the table below it is quoted
/// by `csv` where a cell needs it.
fn write_tsv<W: Write>(
    mut writer: W,
    word: &str,
    frequency: u64,
    collocates: &[Collocate],
    columns: Columns,
) -> io::Result<()> {
    writeln!(writer, "WORD\t{word}\tFREQUENCY\t{frequency}")?;
    let mut tsv = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    tsv.write_record(columns.header())?;
    for collocate in collocates {
        tsv.write_record(tsv_row(collocate, columns))?;
    }
    tsv.flush()
}

fn tsv_row(collocate: &Collocate, columns: Columns) -> Vec<String> {
    let mut row = vec![
        collocate.word.clone(),
        collocate.log_likelihood.to_string(),
        collocate.joint.to_string(),
        collocate.frequency.to_string(),
    ];
    if columns == Columns::AllMeasures {
        let m = &collocate.measures;
        row.extend(
            [m.mi, m.mi3, m.zscore, m.observed_expected, m.log_log]
                .into_iter()
                .map(|value| value.map(|v| v.to_string()).unwrap_or_default()),
        );
    }
    row
}

#[derive(Serialize)]
struct WordTable<'a> {
    word: &'a str,
    frequency: u64,
    collocates: Rows<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Rows<'a> {
    AllMeasures(&'a [Collocate]),
    LogLikelihood(Vec<LogLikelihoodRow<'a>>),
}

#[derive(Serialize)]
struct LogLikelihoodRow<'a> {
    word: &'a str,
    #[serde(rename = "LL")]
    log_likelihood: f64,
    coll_count: u64,
    word_count: u64,
}

fn write_json<W: Write>(
    writer: W,
    word: &str,
    frequency: u64,
    collocates: &[Collocate],
    columns: Columns,
) -> io::Result<()> {
    let collocates = match columns {
        Columns::AllMeasures => Rows::AllMeasures(collocates),
        Columns::LogLikelihood => Rows::LogLikelihood(
            collocates
                .iter()
                .map(|c| LogLikelihoodRow {
                    word: &c.word,
                    log_likelihood: c.log_likelihood,
                    coll_count: c.joint,
                    word_count: c.frequency,
                })
                .collect(),
        ),
    };
    let table = WordTable {
        word,
        frequency,
        collocates,
    };
    serde_json::to_writer_pretty(writer, &table)?;
    Ok(())
}
