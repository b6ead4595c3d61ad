//! # collocations
//!
//! Collocation tables for a tokenized corpus.
//!
//! The corpus is read once, sentence by sentence, into two aggregates: how
//! often each token occurs, and how often each token is seen within a window
//! of `span` tokens around every other token. Once the whole corpus is
//! counted, every word with enough occurrences gets its collocates ranked by
//! log-likelihood and written out with a set of association measures
//! (mutual information, MI³, z-score, observed/expected, log-log).
//!
//! Input is either plain text (one sentence per line, whitespace separated
//! tokens) or VRT (one token per line between `<s>` and `</s>`), optionally
//! mapped through a lemma table before counting.

pub mod corpus;
pub mod counts;
mod error;
pub mod export;
pub mod lemma;
pub mod measures;
pub mod ranking;

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::info;

pub use corpus::{CorpusFormat, Sentence};
pub use counts::{CorpusCounts, CountsBuilder};
pub use error::{CollocationError, Result};
pub use export::{Columns, ExportFormat, ExportOptions, export_all};
pub use lemma::LemmaLookup;
pub use measures::{AssociationMeasures, ContingencyTable};
pub use ranking::{Collocate, RankingOptions, rank_collocates};

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// The corpus to read and how it is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusInput {
    Plain(PathBuf),
    Tagged(PathBuf),
}

impl CorpusInput {
    /// Pick the corpus from the optional plain text and VRT paths.
    ///
    /// Exactly one of them must be given.
    /// # Example
    /// ```
    /// use collocations::{CollocationError, CorpusInput};
    /// let input = CorpusInput::from_paths(Some("corpus.txt".into()), None).unwrap();
    /// assert_eq!(input, CorpusInput::Plain("corpus.txt".into()));
    /// let both = CorpusInput::from_paths(Some("a.txt".into()), Some("b.vrt".into()));
    /// assert!(matches!(both, Err(CollocationError::ConflictingInputs)));
    /// ```
    pub fn from_paths(text: Option<PathBuf>, vrt: Option<PathBuf>) -> Result<Self> {
        match (text, vrt) {
            (Some(_), Some(_)) => Err(CollocationError::ConflictingInputs),
            (Some(text), None) => Ok(CorpusInput::Plain(text)),
            (None, Some(vrt)) => Ok(CorpusInput::Tagged(vrt)),
            (None, None) => Err(CollocationError::MissingInput),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            CorpusInput::Plain(path) | CorpusInput::Tagged(path) => path,
        }
    }

    pub fn format(&self) -> CorpusFormat {
        match self {
            CorpusInput::Plain(_) => CorpusFormat::Plain,
            CorpusInput::Tagged(_) => CorpusFormat::Tagged,
        }
    }

    /// Open the corpus, `-` being standard input.
    fn open(&self) -> Result<Box<dyn BufRead>> {
        let path = self.path();
        if path == Path::new(STDIN_PATH) {
            return Ok(Box::new(io::stdin().lock()));
        }
        let file = File::open(path).map_err(|source| CollocationError::Corpus {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Options of a collocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollocationOptions {
    pub input: CorpusInput,
    /// Optional `surface<TAB>lemma` table applied before counting.
    pub lemmas: Option<PathBuf>,
    /// Root of the output tree, created if missing.
    pub output: PathBuf,
    /// Window radius.
    pub span: NonZeroUsize,
    pub export: ExportOptions,
}

/// What a run did.
#[derive(Debug)]
pub struct CollocationReport {
    pub output: PathBuf,
    pub sentences: u64,
    pub tokens: u64,
    pub types: usize,
    pub tables_written: usize,
    /// `(word, error message)` of every table that could not be written.
    pub failed_words: Vec<(String, String)>,
}

impl fmt::Display for CollocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Counted {} tokens ({} types) in {} sentences, wrote {} collocate tables to {}",
            self.tokens,
            self.types,
            self.sentences,
            self.tables_written,
            self.output.display()
        )
    }
}

/// Count a corpus read from `reader`.
///
/// Every sentence goes through `lemmas`, when given, before it is counted.
/// # Example
/// ```
/// use std::num::NonZeroUsize;
/// use collocations::{CorpusFormat, count_corpus};
///
/// let corpus = "a b a c\na b\n";
/// let span = NonZeroUsize::new(1).unwrap();
/// let counts = count_corpus(corpus.as_bytes(), CorpusFormat::Plain, None, span).unwrap();
/// assert_eq!(counts.frequency("a"), 3);
/// assert_eq!(counts.total(), 6);
/// assert_eq!(counts.cooccurrence("a", "c"), 1);
/// ```
pub fn count_corpus<R: BufRead>(
    reader: R,
    format: CorpusFormat,
    lemmas: Option<&LemmaLookup>,
    span: NonZeroUsize,
) -> io::Result<CorpusCounts> {
    let mut builder = CountsBuilder::new(span);
    for sentence in format.sentences(reader) {
        let sentence = sentence?;
        match lemmas {
            Some(lemmas) => builder.add_sentence(&lemmas.normalize(sentence)),
            None => builder.add_sentence(&sentence),
        }
    }
    Ok(builder.finish())
}

/// Create the output directory (and its parents) unless it exists.
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| CollocationError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the corpus, count it, and write one collocate table per word.
///
/// Configuration problems (unreadable corpus or lemma table, unusable output
/// directory) are reported before anything is written. Tables that fail to
/// write are listed in [`CollocationReport::failed_words`].
pub fn run(options: &CollocationOptions) -> Result<CollocationReport> {
    let reader = options.input.open()?;
    let lemmas = options
        .lemmas
        .as_deref()
        .map(LemmaLookup::from_path)
        .transpose()?;
    prepare_output_dir(&options.output)?;

    info!(
        "Counting {:?} corpus {} with span {}",
        options.input.format(),
        options.input.path().display(),
        options.span
    );
    let counts = count_corpus(reader, options.input.format(), lemmas.as_ref(), options.span)
        .map_err(|source| CollocationError::Corpus {
            path: options.input.path().to_path_buf(),
            source,
        })?;
    info!(
        "Counted {} tokens of {} types in {} sentences",
        counts.total(),
        counts.types(),
        counts.sentences()
    );

    let summary = export_all(&options.output, &counts, &options.export);
    info!(
        "Wrote {} collocate tables to {}",
        summary.tables_written,
        options.output.display()
    );

    Ok(CollocationReport {
        output: options.output.clone(),
        sentences: counts.sentences(),
        tokens: counts.total(),
        types: counts.types(),
        tables_written: summary.tables_written,
        failed_words: summary.failed_words,
    })
}

/// Print the words whose table could not be written.
pub fn print_failed_words(failed: &[(String, String)]) {
    eprintln!("Failed to write the collocates of {} words:", failed.len());
    for (word, err) in failed {
        eprintln!("  {word}: {err}");
    }
}
