use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::corpus::Sentence;
use crate::error::{CollocationError, Result};

/// Surface form to lemma table, applied to every token before counting.
///
/// Tokens without an entry pass through unchanged.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LemmaLookup {
    lemmas: HashMap<String, String>,
}

impl LemmaLookup {
    /// Load a `surface<TAB>lemma` table from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| CollocationError::Lemmas {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let lookup = Self::from_reader(file).map_err(|source| CollocationError::Lemmas {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded {} lemma entries from {}", lookup.len(), path.display());
        Ok(lookup)
    }

    /// Parse a `surface<TAB>lemma` table.
    ///
    /// No header and no quoting. Lines with a single column are skipped,
    /// columns past the second are ignored, and later entries override
    /// earlier ones.
    pub fn from_reader<R: Read>(reader: R) -> csv::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut lemmas = HashMap::new();
        for record in reader.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(surface), Some(lemma)) if !surface.is_empty() && !lemma.is_empty() => {
                    lemmas.insert(surface.to_string(), lemma.to_string());
                }
                _ => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    warn!("Skipping malformed lemma entry on line {line}: {record:?}");
                }
            }
        }
        Ok(Self { lemmas })
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// Lemma of `token`, or `token` itself when it has no entry.
    pub fn lemma<'a>(&'a self, token: &'a str) -> &'a str {
        self.lemmas.get(token).map(String::as_str).unwrap_or(token)
    }

    /// Replace every token of `sentence` by its lemma.
    pub fn normalize(&self, mut sentence: Sentence) -> Sentence {
        for token in sentence.iter_mut() {
            if let Some(lemma) = self.lemmas.get(token.as_str()) {
                token.clone_from(lemma);
            }
        }
        sentence
    }
}

impl FromIterator<(String, String)> for LemmaLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            lemmas: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_two_column_table() {
        let table = "running\trun\nran\trun\ncars\tcar\textra column\n";
        let lookup = LemmaLookup::from_reader(table.as_bytes()).unwrap();
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup.lemma("running"), "run");
        assert_eq!(lookup.lemma("cars"), "car");
        assert_eq!(lookup.lemma("fast"), "fast");
    }

    #[test]
    fn skips_malformed_lines_and_keeps_last_duplicate() {
        let table = "lonely\n\"quoted\"\t\"x\"\nwent\tgo\nwent\twend\n";
        let lookup = LemmaLookup::from_reader(table.as_bytes()).unwrap();
        assert_eq!(lookup.lemma("lonely"), "lonely");
        // quotes are plain characters in the table
        assert_eq!(lookup.lemma("\"quoted\""), "\"x\"");
        assert_eq!(lookup.lemma("went"), "wend");
    }

    #[test]
    fn normalizes_every_token() {
        let lookup: LemmaLookup = [("running".to_string(), "run".to_string())]
            .into_iter()
            .collect();
        let sentence = vec!["running".to_string(), "fast".to_string(), "running".to_string()];
        assert_eq!(lookup.normalize(sentence), vec!["run", "fast", "run"]);
    }
}
