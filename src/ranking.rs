use std::cmp::Ordering;

use serde::Serialize;

use crate::counts::CorpusCounts;
use crate::measures::{AssociationMeasures, ContingencyTable};

/// One row of a word's collocate table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Collocate {
    /// The collocate token.
    pub word: String,
    #[serde(rename = "LL")]
    pub log_likelihood: f64,
    /// Times the collocate was seen in the source word's windows.
    #[serde(rename = "coll_count")]
    pub joint: u64,
    /// Corpus frequency of the collocate.
    #[serde(rename = "word_count")]
    pub frequency: u64,
    #[serde(flatten)]
    pub measures: AssociationMeasures,
}

/// Thresholds applied while ranking.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RankingOptions {
    /// Both words of a pair need at least this frequency.
    pub min_count: u64,
    /// Maximum number of collocates kept per word.
    pub limit: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            min_count: 5,
            limit: 1000,
        }
    }
}

/// Log-likelihood of `w2` as a collocate of `w1`.
///
/// `None` when either word is below `min_count` or the statistic is undefined
/// for the pair.
pub fn log_likelihood(counts: &CorpusCounts, w1: &str, w2: &str, min_count: u64) -> Option<f64> {
    let (f1, f2) = (counts.frequency(w1), counts.frequency(w2));
    if f1 < min_count || f2 < min_count {
        return None;
    }
    ContingencyTable::new(counts.cooccurrence(w1, w2), f1, f2, counts.total()).log_likelihood()
}

/// Ranked collocates of `word`.
///
/// Candidates are sorted by decreasing log-likelihood, equal scores by
/// decreasing token (code point order), and pairs without a score last. The
/// list is cut to `limit` first; then every pair whose score is missing or not
/// positive is dropped. What remains gets the full set of measures.
pub fn rank_collocates(counts: &CorpusCounts, word: &str, options: &RankingOptions) -> Vec<Collocate> {
    let mut scored: Vec<(Option<f64>, &str, u64)> = counts
        .neighbours(word)
        .map(|(collocate, joint)| {
            let score = log_likelihood(counts, word, collocate, options.min_count);
            (score, collocate, joint)
        })
        .collect();
    scored.sort_by(|x, y| by_score((y.0, y.1), (x.0, x.1)));
    scored.truncate(options.limit);

    let f1 = counts.frequency(word);
    let span = counts.span().get() as u64;
    scored
        .into_iter()
        .filter_map(|(score, collocate, joint)| {
            let log_likelihood = score.filter(|&ll| ll > 0.0)?;
            let frequency = counts.frequency(collocate);
            Some(Collocate {
                word: collocate.to_string(),
                log_likelihood,
                joint,
                frequency,
                measures: AssociationMeasures::compute(joint, f1, frequency, counts.total(), span),
            })
        })
        .collect()
}

/// Ascending order on `(score, token)`, missing scores first.
fn by_score(x: (Option<f64>, &str), y: (Option<f64>, &str)) -> Ordering {
    let scores = match (x.0, y.0) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    scores.then_with(|| x.1.cmp(y.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::CountsBuilder;
    use std::num::NonZeroUsize;

    fn counts(lines: &[&str], span: usize) -> CorpusCounts {
        let mut builder = CountsBuilder::new(NonZeroUsize::new(span).unwrap());
        for line in lines {
            let sentence: Vec<String> = line.split_whitespace().map(String::from).collect();
            builder.add_sentence(&sentence);
        }
        builder.finish()
    }

    fn words(ranked: &[Collocate]) -> Vec<&str> {
        ranked.iter().map(|c| c.word.as_str()).collect()
    }

    /// "salt" and "pepper" mostly occur together, "the" is everywhere and
    /// "sea" only ever precedes "salt".
    fn kitchen() -> CorpusCounts {
        let mut lines = Vec::new();
        for _ in 0..6 {
            lines.push("salt pepper the soup");
            lines.push("the bread the oven the table");
            lines.push("pass the salt pepper");
            lines.push("pepper mill");
            lines.push("sea salt");
        }
        counts(&lines, 1)
    }

    #[test]
    fn strongest_collocate_first() {
        let counts = kitchen();
        let ranked = rank_collocates(&counts, "salt", &RankingOptions { min_count: 1, limit: 10 });
        assert_eq!(words(&ranked), vec!["pepper", "the"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].log_likelihood >= pair[1].log_likelihood);
        }
        let pepper = &ranked[0];
        assert_eq!(pepper.joint, counts.cooccurrence("salt", "pepper"));
        assert_eq!(pepper.frequency, counts.frequency("pepper"));
        assert!(pepper.measures.mi.is_some());
    }

    #[test]
    fn limit_and_positive_scores() {
        let counts = kitchen();
        for limit in 0..4 {
            let options = RankingOptions { min_count: 1, limit };
            for word in counts.frequencies().keys() {
                let ranked = rank_collocates(&counts, word, &options);
                assert!(ranked.len() <= limit);
                assert!(ranked.iter().all(|c| c.log_likelihood > 0.0));
            }
        }
    }

    #[test]
    fn min_count_gate() {
        let counts = counts(&["rare common", "common other", "common other", "other common"], 1);
        let options = RankingOptions { min_count: 2, limit: 10 };
        assert_eq!(log_likelihood(&counts, "rare", "common", 2), None);
        assert_eq!(log_likelihood(&counts, "common", "rare", 2), None);
        assert!(!words(&rank_collocates(&counts, "common", &options)).contains(&"rare"));
        assert!(rank_collocates(&counts, "rare", &options).is_empty());
    }

    #[test]
    fn undefined_scores_are_dropped() {
        // a/b joint count exceeds the frequency of b, see the counts tests
        let counts = counts(&["a b a c", "a b"], 1);
        assert_eq!(log_likelihood(&counts, "a", "b", 1), None);
        let ranked = rank_collocates(&counts, "a", &RankingOptions { min_count: 1, limit: 10 });
        assert!(!words(&ranked).contains(&"b"));
    }

    #[test]
    fn pairs_with_an_empty_cell_are_dropped() {
        let counts = kitchen();
        // every "sea" is followed by "salt": b = 0
        assert_eq!(log_likelihood(&counts, "salt", "sea", 1), None);
        // "sea" is never seen without "salt": c = 0
        assert_eq!(log_likelihood(&counts, "sea", "salt", 1), None);
        assert!(rank_collocates(&counts, "sea", &RankingOptions { min_count: 1, limit: 10 }).is_empty());
    }

    #[test]
    fn equal_scores_sort_by_descending_token() {
        // "hub" sees four collocates with identical statistics
        let mut lines = vec!["w hub x", "y hub z", "hub", "w", "x", "y", "z"];
        lines.extend(["filler filler filler filler"; 10]);
        let counts = counts(&lines, 1);
        let ranked = rank_collocates(&counts, "hub", &RankingOptions { min_count: 1, limit: 10 });
        assert_eq!(words(&ranked), vec!["z", "y", "x", "w"]);

        let ranked = rank_collocates(&counts, "hub", &RankingOptions { min_count: 1, limit: 2 });
        assert_eq!(words(&ranked), vec!["z", "y"]);
    }

    #[test]
    fn missing_scores_sort_last() {
        assert_eq!(by_score((None, "z"), (Some(0.0), "a")), Ordering::Less);
        assert_eq!(by_score((Some(1.0), "a"), (Some(1.0), "b")), Ordering::Less);
        assert_eq!(by_score((Some(2.0), "a"), (Some(1.0), "b")), Ordering::Greater);
    }
}
