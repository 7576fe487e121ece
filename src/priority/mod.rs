// Deletion priority: global ranking plus selection and report passes

pub mod report;
pub mod selection;

use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::constants::{BALANCED_BONUS_CAP, SCORE_CEILING_DEFAULT};
use crate::parse::IdentityParser;
use crate::rating::lexicon::SentimentLexicon;
use crate::rating::store::RatingStore;
use crate::scoring::composite::CompositeScorer;
use crate::scoring::intrinsic::SiblingContext;
use crate::scoring::ScoreBreakdown;

/// Knobs for the selection passes.
#[derive(Debug, Clone, Copy)]
pub struct SelectionConfig {
    /// Budget selection stops suggesting once scores rise past this; files
    /// above it are considered worth keeping even with budget left.
    pub score_ceiling: f64,
    /// Extra slots one identity may absorb in balanced mode.
    pub bonus_cap: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            score_ceiling: SCORE_CEILING_DEFAULT,
            bonus_cap: BALANCED_BONUS_CAP,
        }
    }
}

/// Scores every cataloged file and derives deletion suggestions from the
/// resulting ranking. Holds no catalog state; every pass takes the catalog
/// and rating inputs by reference.
#[derive(Debug, Clone, Default)]
pub struct PriorityEngine {
    parser: IdentityParser,
    scorer: CompositeScorer,
    config: SelectionConfig,
}

impl PriorityEngine {
    pub fn new(parser: IdentityParser, scorer: CompositeScorer, config: SelectionConfig) -> Self {
        Self {
            parser,
            scorer,
            config,
        }
    }

    pub fn parser(&self) -> &IdentityParser {
        &self.parser
    }

    /// Every file in the catalog scored and sorted, lowest composite score
    /// (best deletion candidate) first. Rating and sibling statistics are
    /// computed once per identity.
    pub fn global_list(
        &self,
        catalog: &Catalog,
        store: &RatingStore,
        lexicon: &SentimentLexicon,
    ) -> Vec<ScoreBreakdown> {
        let mut list = Vec::with_capacity(catalog.file_count());
        for bucket in catalog.buckets() {
            let rating = self.scorer.rating_score(&bucket.identity, store, lexicon);
            let ctx = SiblingContext::build(&bucket.files, &self.parser);
            for file in &bucket.files {
                list.push(
                    self.scorer
                        .composite_in_context(&bucket.identity, file, &ctx, rating),
                );
            }
        }
        sort_breakdowns(&mut list);
        list
    }
}

/// Ascending composite score with a total tie-break on identity then file
/// name. Equal scores keep one stable order across runs and machines.
pub(crate) fn sort_breakdowns(list: &mut [ScoreBreakdown]) {
    list.sort_by(|a, b| {
        a.composite_score
            .partial_cmp(&b.composite_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.identity.cmp(&b.identity))
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileRecord;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for (identity, stamp, size) in [
            ("alice", "2025-03-10T12_00_00+09_00", 10.0),
            ("alice", "2025-03-11T12_00_00+09_00", 500.0),
            ("bob", "2025-03-09T12_00_00+09_00", 80.0),
            ("bob", "2025-03-12T12_00_00+09_00", 80.0),
            ("bob", "2025-03-13T12_00_00+09_00", 300.0),
        ] {
            catalog.add(
                identity,
                FileRecord {
                    name: format!("{identity}-twitch-{stamp}.mp4"),
                    size_mb: size,
                },
            );
        }
        catalog
    }

    #[test]
    fn test_global_list_sorted_ascending() {
        let engine = PriorityEngine::default();
        let list = engine.global_list(
            &sample_catalog(),
            &RatingStore::new(),
            &SentimentLexicon::empty(),
        );
        assert_eq!(list.len(), 5);
        for pair in list.windows(2) {
            assert!(pair[0].composite_score <= pair[1].composite_score);
        }
    }

    #[test]
    fn test_global_list_deterministic() {
        let engine = PriorityEngine::default();
        let catalog = sample_catalog();
        let store = RatingStore::new();
        let lexicon = SentimentLexicon::empty();
        let first = engine.global_list(&catalog, &store, &lexicon);
        let second = engine.global_list(&catalog, &store, &lexicon);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tie_break_is_total() {
        let mut list = vec![
            ScoreBreakdown {
                identity: "zoe".to_string(),
                file_name: "z.mp4".to_string(),
                size_mb: 1.0,
                intrinsic_score: 0.5,
                rating_score: 0.5,
                composite_score: 0.5,
            },
            ScoreBreakdown {
                identity: "alice".to_string(),
                file_name: "b.mp4".to_string(),
                size_mb: 1.0,
                intrinsic_score: 0.5,
                rating_score: 0.5,
                composite_score: 0.5,
            },
            ScoreBreakdown {
                identity: "alice".to_string(),
                file_name: "a.mp4".to_string(),
                size_mb: 1.0,
                intrinsic_score: 0.5,
                rating_score: 0.5,
                composite_score: 0.5,
            },
        ];
        sort_breakdowns(&mut list);
        assert_eq!(list[0].file_name, "a.mp4");
        assert_eq!(list[1].file_name, "b.mp4");
        assert_eq!(list[2].identity, "zoe");
    }
}
