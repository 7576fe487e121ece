// Per-identity rating store backed by a small JSON document

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::constants::RATINGS_FORMAT_VERSION;
use crate::error::Result;

/// One historical rating event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Current rating for one identity plus its history.
/// `rating == 0` means unrated; `rating_count >= history.len()` always
/// holds because the count bumps on every upsert while history only grows
/// when there was a previous rated entry to demote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub last_rating: String,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub history: Vec<RatingEvent>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RatingsDocument {
    #[serde(default)]
    ratings: BTreeMap<String, RatingRecord>,
    #[serde(default)]
    last_updated: String,
    #[serde(default)]
    version: String,
}

/// In-memory view of the ratings document. Scoring passes load it once and
/// read from memory; writes go back through `save`.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: BTreeMap<String, RatingRecord>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from disk. Missing and malformed documents degrade to an empty
    /// store with a warning; ratings are advisory and must never block an
    /// analysis.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<RatingsDocument>(&raw) {
                Ok(doc) => Self {
                    ratings: doc.ratings,
                },
                Err(e) => {
                    log::warn!("Ignoring malformed ratings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read ratings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let doc = RatingsDocument {
            ratings: self.ratings.clone(),
            last_updated: today(),
            version: RATINGS_FORMAT_VERSION.to_string(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing ratings file {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, identity: &str) -> Option<&RatingRecord> {
        self.ratings.get(identity)
    }

    pub fn ratings(&self) -> &BTreeMap<String, RatingRecord> {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Record a new rating, pushing the previous one into history first.
    pub fn upsert(&mut self, identity: &str, rating: u8, comment: &str) {
        self.upsert_dated(identity, rating, comment, &today());
    }

    /// `upsert` with an explicit `YYYY-MM-DD` date.
    pub fn upsert_dated(&mut self, identity: &str, rating: u8, comment: &str, date: &str) {
        let rating = rating.min(5);
        let prev = self.ratings.remove(identity);

        let mut history = prev
            .as_ref()
            .map(|p| p.history.clone())
            .unwrap_or_default();
        let rating_count = prev.as_ref().map(|p| p.rating_count).unwrap_or(0) + 1;

        if let Some(p) = prev {
            if p.rating > 0 {
                history.push(RatingEvent {
                    date: p.last_rating,
                    rating: p.rating,
                    comment: p.comment,
                });
            }
        }

        self.ratings.insert(
            identity.to_string(),
            RatingRecord {
                rating,
                comment: comment.to_string(),
                last_rating: date.to_string(),
                rating_count,
                history,
            },
        );
    }

    /// Drop an identity's rating entirely, history included.
    pub fn remove(&mut self, identity: &str) -> bool {
        self.ratings.remove(identity).is_some()
    }
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RATINGS_FILE;

    #[test]
    fn test_upsert_pushes_previous_into_history() {
        let mut store = RatingStore::new();
        store.upsert_dated("alice", 3, "fine", "2025-01-01");
        store.upsert_dated("alice", 5, "GOAT", "2025-02-01");

        let record = store.get("alice").unwrap();
        assert_eq!(record.rating, 5);
        assert_eq!(record.comment, "GOAT");
        assert_eq!(record.last_rating, "2025-02-01");
        assert_eq!(record.rating_count, 2);
        assert_eq!(record.history.len(), 1);
        assert_eq!(record.history[0].date, "2025-01-01");
        assert_eq!(record.history[0].rating, 3);
        assert_eq!(record.history[0].comment, "fine");
    }

    #[test]
    fn test_rating_count_never_below_history() {
        let mut store = RatingStore::new();
        for (i, rating) in [2u8, 4, 1, 5].iter().enumerate() {
            store.upsert_dated("bob", *rating, "", &format!("2025-01-0{}", i + 1));
            let record = store.get("bob").unwrap();
            assert!(record.rating_count as usize >= record.history.len());
        }
        assert_eq!(store.get("bob").unwrap().rating_count, 4);
        assert_eq!(store.get("bob").unwrap().history.len(), 3);
    }

    #[test]
    fn test_rating_clamped_to_five() {
        let mut store = RatingStore::new();
        store.upsert_dated("carol", 9, "", "2025-01-01");
        assert_eq!(store.get("carol").unwrap().rating, 5);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RatingStore::load(&dir.path().join(RATINGS_FILE));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RATINGS_FILE);
        std::fs::write(&path, "{not json").unwrap();
        let store = RatingStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RATINGS_FILE);

        let mut store = RatingStore::new();
        store.upsert_dated("alice", 4, "귀여움", "2025-03-01");
        store.upsert_dated("bob", 1, "계륵", "2025-03-02");
        store.save(&path).unwrap();

        let loaded = RatingStore::load(&path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("alice"), store.get("alice"));
        assert_eq!(loaded.get("bob"), store.get("bob"));
    }

    #[test]
    fn test_remove() {
        let mut store = RatingStore::new();
        store.upsert_dated("alice", 4, "", "2025-03-01");
        assert!(store.remove("alice"));
        assert!(!store.remove("alice"));
        assert!(store.get("alice").is_none());
    }
}
