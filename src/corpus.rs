//! Corpus readers.
//!
//! Both readers are lazy, single-pass iterators over sentences. They never
//! hold more than one sentence in memory, so counting has to happen while the
//! corpus is being traversed.

use std::io::{self, BufRead, Lines};
use std::mem;

/// One sentence: the tokens between two sentence boundaries.
pub type Sentence = Vec<String>;

/// How the corpus is encoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CorpusFormat {
    /// One sentence per line, tokens separated by whitespace.
    Plain,
    /// VRT: `<s>`/`</s>` sentence markers, other `<...>` markup lines, and
    /// one token per line with the surface form in the first tab-separated column.
    Tagged,
}

impl CorpusFormat {
    /// Wrap `reader` in the sentence iterator for this format.
    pub fn sentences<R: BufRead>(self, reader: R) -> Sentences<R> {
        match self {
            CorpusFormat::Plain => Sentences::Plain(PlainSentences::new(reader)),
            CorpusFormat::Tagged => Sentences::Tagged(TaggedSentences::new(reader)),
        }
    }
}

/// Sentence iterator over either corpus format.
pub enum Sentences<R> {
    Plain(PlainSentences<R>),
    Tagged(TaggedSentences<R>),
}

impl<R: BufRead> Iterator for Sentences<R> {
    type Item = io::Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Sentences::Plain(inner) => inner.next(),
            Sentences::Tagged(inner) => inner.next(),
        }
    }
}

/// Plain text corpus: every line is a sentence.
pub struct PlainSentences<R> {
    lines: Lines<R>,
}

impl<R: BufRead> PlainSentences<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for PlainSentences<R> {
    type Item = io::Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(line.map(|line| line.split_whitespace().map(String::from).collect()))
    }
}

/// Tagged (VRT) corpus.
///
/// Both `<s ...>` and `</s>` close the sentence collected so far, so tokens
/// that stray between two sentences still end up in a sentence of their own.
/// Tokens left over at end of input are emitted as a last sentence.
///
/// Only the `s` element marks sentences: `<s>`, `<s attr="...">` and `</s>`.
/// Other tags that merely start with `<s`, such as `<sentence>` or `<span>`,
/// are markup like any other and do not split the sentence.
pub struct TaggedSentences<R> {
    lines: Lines<R>,
    buffer: Sentence,
}

impl<R: BufRead> TaggedSentences<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            buffer: Sentence::new(),
        }
    }

    fn flush(&mut self) -> Option<Sentence> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(mem::take(&mut self.buffer))
        }
    }
}

impl<R: BufRead> Iterator for TaggedSentences<R> {
    type Item = io::Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(e)),
                None => return self.flush().map(Ok),
            };
            match VrtLine::classify(&line) {
                VrtLine::SentenceStart | VrtLine::SentenceEnd => {
                    if let Some(sentence) = self.flush() {
                        return Some(Ok(sentence));
                    }
                }
                VrtLine::Markup | VrtLine::Blank => {}
                VrtLine::Token(token) => self.buffer.push(token.to_owned()),
            }
        }
    }
}

/// What a single VRT line means.
#[derive(Debug, Eq, PartialEq)]
enum VrtLine<'a> {
    SentenceStart,
    SentenceEnd,
    Markup,
    Blank,
    Token(&'a str),
}

impl<'a> VrtLine<'a> {
    fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            VrtLine::Blank
        } else if opens_tag(line, "<s") {
            VrtLine::SentenceStart
        } else if opens_tag(line, "</s") {
            VrtLine::SentenceEnd
        } else if line.starts_with('<') {
            VrtLine::Markup
        } else {
            // split always yields at least one field
            VrtLine::Token(line.split('\t').next().unwrap_or(line))
        }
    }
}

/// `<s>` and `<s id="1">` open the tag `<s`, `<sentence>` does not.
fn opens_tag(line: &str, tag: &str) -> bool {
    line.strip_prefix(tag)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c == '>' || c.is_whitespace())
}
