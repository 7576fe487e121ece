// Keyword sentiment weights used to adjust rating scores from comments

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_KEYWORD_WEIGHTS, SENTIMENT_SUM_LIMIT};
use crate::error::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LexiconDocument {
    #[serde(default)]
    keywords: BTreeMap<String, f64>,
    #[serde(default)]
    last_updated: String,
}

/// Keyword → signed weight table. Positive weights mark keep signals,
/// negative weights mark delete signals.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    weights: BTreeMap<String, f64>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        let weights = DEFAULT_KEYWORD_WEIGHTS
            .iter()
            .map(|(token, weight)| (token.to_string(), *weight))
            .collect();
        Self { weights }
    }
}

impl SentimentLexicon {
    /// The built-in keyword table.
    pub fn new() -> Self {
        Self::default()
    }

    /// No keywords at all; every comment scores 0.
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Load from disk, falling back to the built-in table when the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<LexiconDocument>(&raw) {
                Ok(doc) => Self {
                    weights: doc.keywords,
                },
                Err(e) => {
                    log::warn!("Ignoring malformed keyword file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read keyword file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let doc = LexiconDocument {
            keywords: self.weights.clone(),
            last_updated: Local::now().to_rfc3339(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing keyword file {}", path.display()))?;
        Ok(())
    }

    /// Add or replace one keyword weight.
    pub fn set(&mut self, token: &str, weight: f64) {
        self.weights.insert(token.to_string(), weight);
    }

    pub fn remove(&mut self, token: &str) -> bool {
        self.weights.remove(token).is_some()
    }

    /// Restore the built-in table, discarding edits.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum the weights of every keyword appearing in the comment, clamped
    /// so a pile of keywords cannot drown out the star rating.
    pub fn score_comment(&self, comment: &str) -> f64 {
        if comment.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .weights
            .iter()
            .filter(|(token, _)| comment.contains(token.as_str()))
            .map(|(_, weight)| weight)
            .sum();
        sum.clamp(-SENTIMENT_SUM_LIMIT, SENTIMENT_SUM_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::KEYWORDS_FILE;

    #[test]
    fn test_default_table_loaded() {
        let lexicon = SentimentLexicon::new();
        assert_eq!(lexicon.len(), DEFAULT_KEYWORD_WEIGHTS.len());
        assert_eq!(lexicon.weights().get("GOAT"), Some(&1.5));
        assert_eq!(lexicon.weights().get("계륵"), Some(&-1.3));
    }

    #[test]
    fn test_score_sums_matching_keywords() {
        let mut lexicon = SentimentLexicon::empty();
        lexicon.set("good", 0.5);
        lexicon.set("bad", -0.3);
        assert_eq!(lexicon.score_comment("good but bad"), 0.2);
        assert_eq!(lexicon.score_comment("good"), 0.5);
        assert_eq!(lexicon.score_comment("nothing matches"), 0.0);
        assert_eq!(lexicon.score_comment(""), 0.0);
    }

    #[test]
    fn test_score_clamped() {
        let mut lexicon = SentimentLexicon::empty();
        lexicon.set("a", 1.5);
        lexicon.set("b", 1.5);
        assert_eq!(lexicon.score_comment("a b"), SENTIMENT_SUM_LIMIT);
        lexicon.set("a", -1.5);
        lexicon.set("b", -1.5);
        assert_eq!(lexicon.score_comment("a b"), -SENTIMENT_SUM_LIMIT);
    }

    #[test]
    fn test_set_remove_reset() {
        let mut lexicon = SentimentLexicon::new();
        lexicon.set("custom", 0.9);
        assert_eq!(lexicon.weights().get("custom"), Some(&0.9));
        assert!(lexicon.remove("custom"));
        assert!(!lexicon.remove("custom"));
        lexicon.set("GOAT", -2.0);
        lexicon.reset();
        assert_eq!(lexicon.weights().get("GOAT"), Some(&1.5));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(KEYWORDS_FILE);

        let mut lexicon = SentimentLexicon::empty();
        lexicon.set("육덕", 0.2);
        lexicon.set("추적중지", -1.2);
        lexicon.save(&path).unwrap();

        let loaded = SentimentLexicon::load(&path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.weights().get("육덕"), Some(&0.2));
        assert_eq!(loaded.weights().get("추적중지"), Some(&-1.2));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let lexicon = SentimentLexicon::load(&dir.path().join(KEYWORDS_FILE));
        assert_eq!(lexicon.len(), DEFAULT_KEYWORD_WEIGHTS.len());
    }
}
