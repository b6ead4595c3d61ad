//! Corpus-wide counts: unigram frequencies and windowed co-occurrences.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::corpus::Sentence;

/// Token -> number of occurrences in the corpus.
pub type FrequencyTable = HashMap<String, u64>;

/// Sparse co-occurrence matrix.
///
/// `matrix[w1][w2]` counts how often `w2` was seen within the window around
/// an occurrence of `w1`. Only observed pairs are stored.
pub type CooccurrenceMatrix = HashMap<String, HashMap<String, u64>>;

/// Accumulates counts one sentence at a time.
///
/// Each row of the matrix is filled from the occurrences of its own word, so
/// `matrix[w1][w2]` and `matrix[w2][w1]` are counted separately.
#[derive(Debug)]
pub struct CountsBuilder {
    span: NonZeroUsize,
    frequencies: FrequencyTable,
    cooccurrences: CooccurrenceMatrix,
    sentences: u64,
}

impl CountsBuilder {
    /// `span` is the window radius: neighbours up to `span` tokens away on
    /// either side are counted.
    pub fn new(span: NonZeroUsize) -> Self {
        Self {
            span,
            frequencies: FrequencyTable::new(),
            cooccurrences: CooccurrenceMatrix::new(),
            sentences: 0,
        }
    }

    /// Count the tokens of one sentence and the pairs inside its windows.
    pub fn add_sentence(&mut self, sentence: &[String]) {
        let span = self.span.get();
        for (position, word) in sentence.iter().enumerate() {
            let start = position.saturating_sub(span);
            let end = position.saturating_add(span).saturating_add(1).min(sentence.len());

            let row = self.cooccurrences.entry(word.to_owned()).or_default();
            for (neighbour_position, neighbour) in sentence.iter().enumerate().take(end).skip(start) {
                if neighbour_position != position {
                    bump(row, neighbour);
                }
            }
            *self.frequencies.entry(word.to_owned()).or_insert(0) += 1;
        }
        self.sentences += 1;
    }

    /// Freeze the counts.
    pub fn finish(self) -> CorpusCounts {
        let total = self.frequencies.values().sum();
        CorpusCounts {
            span: self.span,
            frequencies: self.frequencies,
            cooccurrences: self.cooccurrences,
            total,
            sentences: self.sentences,
        }
    }
}

impl Extend<Sentence> for CountsBuilder {
    fn extend<I: IntoIterator<Item = Sentence>>(&mut self, sentences: I) {
        for sentence in sentences {
            self.add_sentence(&sentence);
        }
    }
}

fn bump(counter: &mut HashMap<String, u64>, token: &str) {
    if let Some(count) = counter.get_mut(token) {
        *count += 1;
    } else {
        counter.insert(token.to_owned(), 1);
    }
}

/// Read-only corpus counts, the input of every statistic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CorpusCounts {
    span: NonZeroUsize,
    frequencies: FrequencyTable,
    cooccurrences: CooccurrenceMatrix,
    total: u64,
    sentences: u64,
}

impl CorpusCounts {
    /// Window radius the co-occurrences were counted with.
    pub fn span(&self) -> NonZeroUsize {
        self.span
    }

    /// Total number of tokens (`N`).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of sentences seen, empty ones included.
    pub fn sentences(&self) -> u64 {
        self.sentences
    }

    /// Number of distinct tokens.
    pub fn types(&self) -> usize {
        self.frequencies.len()
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Occurrences of `word`, zero if it never occurred.
    pub fn frequency(&self, word: &str) -> u64 {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    /// Times `w2` was seen within the window around `w1`.
    pub fn cooccurrence(&self, w1: &str, w2: &str) -> u64 {
        self.cooccurrences
            .get(w1)
            .and_then(|row| row.get(w2))
            .copied()
            .unwrap_or(0)
    }

    /// Every word seen within the window around `word`, with its joint count.
    pub fn neighbours<'a>(&'a self, word: &str) -> impl Iterator<Item = (&'a str, u64)> + use<'a> {
        self.cooccurrences
            .get(word)
            .into_iter()
            .flat_map(|row| row.iter().map(|(w, &count)| (w.as_str(), count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn count_lines(lines: &[&str], radius: usize) -> CorpusCounts {
        let mut builder = CountsBuilder::new(span(radius));
        builder.extend(
            lines
                .iter()
                .map(|l| l.split_whitespace().map(String::from).collect::<Sentence>()),
        );
        builder.finish()
    }

    #[test]
    fn round_trip_counts() {
        let counts = count_lines(&["a b a c", "a b"], 1);
        assert_eq!(counts.frequency("a"), 3);
        assert_eq!(counts.frequency("b"), 2);
        assert_eq!(counts.frequency("c"), 1);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.sentences(), 2);
        // "a b a c" has two a/b adjacencies, "a b" one more
        assert_eq!(counts.cooccurrence("a", "b"), 3);
        assert_eq!(counts.cooccurrence("b", "a"), 3);
        assert_eq!(counts.cooccurrence("a", "c"), 1);
        assert_eq!(counts.cooccurrence("c", "a"), 1);
        assert_eq!(counts.cooccurrence("b", "c"), 0);
    }

    #[test]
    fn frequency_sum_is_token_count_for_any_span() {
        let lines = ["the cat sat on the mat", "", "the", "dog dog dog"];
        let tokens: u64 = lines.iter().map(|l| l.split_whitespace().count() as u64).sum();
        for radius in 1..6 {
            let counts = count_lines(&lines, radius);
            assert_eq!(counts.frequencies().values().sum::<u64>(), tokens);
            assert_eq!(counts.total(), tokens);
        }
    }

    #[test]
    fn increments_per_sentence_match_window_sizes() {
        for radius in 1..5 {
            for len in 0..9 {
                let line = (0..len).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
                let counts = count_lines(&[line.as_str()], radius);
                let increments: u64 = (0..len)
                    .map(|i| counts.neighbours(&format!("w{i}")).map(|(_, c)| c).sum::<u64>())
                    .sum();
                let expected: usize = (0..len)
                    .map(|p| p.min(radius) + (len - 1 - p).min(radius))
                    .sum();
                assert_eq!(increments, expected as u64, "radius {radius}, length {len}");
            }
        }
    }

    #[test]
    fn no_pair_with_own_position() {
        let counts = count_lines(&["a b c d e"], 3);
        for word in ["a", "b", "c", "d", "e"] {
            assert_eq!(counts.cooccurrence(word, word), 0);
        }
        // repeated tokens do pair with their other occurrences
        let counts = count_lines(&["x x"], 1);
        assert_eq!(counts.cooccurrence("x", "x"), 2);
    }

    #[test]
    fn single_token_sentence_counts_frequency_only() {
        let counts = count_lines(&["alone"], 3);
        assert_eq!(counts.frequency("alone"), 1);
        assert_eq!(counts.neighbours("alone").count(), 0);
    }

    #[test]
    fn window_does_not_cross_sentences() {
        let counts = count_lines(&["a b", "c d"], 3);
        assert_eq!(counts.cooccurrence("b", "c"), 0);
        assert_eq!(counts.cooccurrence("a", "b"), 1);
    }

    #[test]
    fn rows_are_counted_from_their_own_occurrences() {
        let counts = count_lines(&["a x x x b a", "b y a"], 2);
        assert_eq!(counts.cooccurrence("a", "b"), 2);
        assert_eq!(counts.cooccurrence("b", "a"), 2);
        assert_eq!(counts.cooccurrence("x", "x"), 6);
        assert_eq!(counts.cooccurrence("a", "x"), 3);
        assert_eq!(counts.cooccurrence("x", "a"), 3);
    }
}
