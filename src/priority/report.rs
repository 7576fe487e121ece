// Analysis reports assembled from the global ranking

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::constants::{
    MB_PER_GB, PRIORITY_CRITICAL_MAX, PRIORITY_HIGH_MAX, PRIORITY_LOW_MAX, PRIORITY_NORMAL_MAX,
    PRIORITY_VERY_HIGH_MAX, QUALITY_HIGH_MIN, QUALITY_LOW_MAX, STRATEGY_KEEP_RATIOS,
};
use crate::error::{CapsweepError, Result};
use crate::rating::lexicon::SentimentLexicon;
use crate::rating::protected::ProtectedFiles;
use crate::rating::store::{RatingRecord, RatingStore};
use crate::scoring::intrinsic::SiblingContext;
use crate::scoring::ScoreBreakdown;

use super::selection::{exclude_protected, BudgetSelection};
use super::{sort_breakdowns, PriorityEngine};

/// Catalog-wide totals alongside what the suggestion pass picked.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStatistics {
    pub total_files: usize,
    pub identity_count: usize,
    pub total_size_mb: f64,
    pub suggested_files: usize,
    pub suggested_savings_gb: f64,
}

/// Per-identity cleanup stance derived from its rating.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupStrategy {
    pub rating: u8,
    pub strategy: String,
    /// Fraction of the identity's files worth keeping under this stance.
    pub keep_ratio: f64,
    pub comment: String,
}

/// Full deletion analysis: totals, suggested files for the size target,
/// and a cleanup stance per identity.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionAnalysis {
    pub statistics: AnalysisStatistics,
    pub suggestions: BudgetSelection,
    pub criteria: String,
    pub strategies: BTreeMap<String, CleanupStrategy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QualityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Everything known about one identity, files scored and ordered best
/// first.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityReport {
    pub identity: String,
    pub file_count: usize,
    pub total_size_mb: f64,
    pub quality: QualityBreakdown,
    pub files: Vec<ScoreBreakdown>,
    pub strategy: CleanupStrategy,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IdentityShare {
    pub count: usize,
    pub size_mb: f64,
}

/// A sized deletion list plus how it spreads across identities.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityReport {
    pub files: Vec<ScoreBreakdown>,
    pub file_count: usize,
    pub total_savings_gb: f64,
    pub breakdown: BTreeMap<String, IdentityShare>,
    pub balanced: bool,
}

/// One file worth keeping, ranked best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeepCandidate {
    pub rank: usize,
    pub name: String,
    pub size_mb: f64,
    pub composite_score: f64,
}

/// Best-to-keep shortlist for one identity. Protected files are listed
/// separately since they are kept no matter what.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionCandidates {
    pub identity: String,
    pub total_files: usize,
    pub candidates: Vec<KeepCandidate>,
    pub excluded: Vec<String>,
}

impl PriorityEngine {
    /// Analyze the whole catalog against a size target.
    pub fn deletion_analysis(
        &self,
        catalog: &Catalog,
        store: &RatingStore,
        lexicon: &SentimentLexicon,
        protected: &ProtectedFiles,
        target_gb: f64,
    ) -> Result<DeletionAnalysis> {
        if catalog.is_empty() {
            return Err(CapsweepError::EmptyCatalog);
        }

        let list = self.global_list(catalog, store, lexicon);
        let list = exclude_protected(&list, protected);
        let suggestions = self.budget_selection(&list, target_gb);

        let statistics = AnalysisStatistics {
            total_files: catalog.file_count(),
            identity_count: catalog.identity_count(),
            total_size_mb: catalog.total_size_mb(),
            suggested_files: suggestions.files.len(),
            suggested_savings_gb: suggestions.total_savings_mb / MB_PER_GB,
        };

        let strategies = catalog
            .identities()
            .into_iter()
            .map(|identity| {
                let strategy = strategy_for(store.get(&identity));
                (identity, strategy)
            })
            .collect();

        Ok(DeletionAnalysis {
            statistics,
            suggestions,
            criteria: "files ranked by composite score, lowest first; protected files excluded"
                .to_string(),
            strategies,
        })
    }

    /// Score one identity's files and bucket them by quality.
    pub fn identity_report(
        &self,
        catalog: &Catalog,
        store: &RatingStore,
        lexicon: &SentimentLexicon,
        identity: &str,
    ) -> Result<IdentityReport> {
        let bucket = catalog
            .bucket(identity)
            .ok_or_else(|| CapsweepError::IdentityNotFound(identity.to_string()))?;

        let rating = self.scorer.rating_score(identity, store, lexicon);
        let ctx = SiblingContext::build(&bucket.files, &self.parser);
        let mut files: Vec<ScoreBreakdown> = bucket
            .files
            .iter()
            .map(|f| self.scorer.composite_in_context(identity, f, &ctx, rating))
            .collect();
        // Best material first in this report
        sort_breakdowns(&mut files);
        files.reverse();

        let mut quality = QualityBreakdown::default();
        for file in &files {
            if file.composite_score >= QUALITY_HIGH_MIN {
                quality.high += 1;
            } else if file.composite_score >= QUALITY_LOW_MAX {
                quality.medium += 1;
            } else {
                quality.low += 1;
            }
        }

        Ok(IdentityReport {
            identity: identity.to_string(),
            file_count: bucket.files.len(),
            total_size_mb: bucket.total_size_mb,
            quality,
            files,
            strategy: strategy_for(store.get(identity)),
        })
    }

    /// A deletion list of up to `count` files, balanced across identities
    /// on request.
    pub fn priority_report(
        &self,
        catalog: &Catalog,
        store: &RatingStore,
        lexicon: &SentimentLexicon,
        protected: &ProtectedFiles,
        count: usize,
        balanced: bool,
    ) -> Result<PriorityReport> {
        if catalog.is_empty() {
            return Err(CapsweepError::EmptyCatalog);
        }

        let list = self.global_list(catalog, store, lexicon);
        let list = exclude_protected(&list, protected);
        let files = if balanced {
            self.balanced_selection(&list, count)
        } else {
            self.unbalanced_selection(&list, count)
        };

        let mut breakdown: BTreeMap<String, IdentityShare> = BTreeMap::new();
        for file in &files {
            let share = breakdown.entry(file.identity.clone()).or_default();
            share.count += 1;
            share.size_mb += file.size_mb;
        }
        let total_savings_gb = files.iter().map(|f| f.size_mb).sum::<f64>() / MB_PER_GB;

        Ok(PriorityReport {
            file_count: files.len(),
            files,
            total_savings_gb,
            breakdown,
            balanced,
        })
    }

    /// The `count` best files to keep for one identity, protected files
    /// set aside.
    pub fn keep_candidates(
        &self,
        catalog: &Catalog,
        store: &RatingStore,
        lexicon: &SentimentLexicon,
        protected: &ProtectedFiles,
        identity: &str,
        count: usize,
    ) -> Result<SelectionCandidates> {
        let bucket = catalog
            .bucket(identity)
            .ok_or_else(|| CapsweepError::IdentityNotFound(identity.to_string()))?;

        let rating = self.scorer.rating_score(identity, store, lexicon);
        let ctx = SiblingContext::build(&bucket.files, &self.parser);
        let mut scored: Vec<ScoreBreakdown> = bucket
            .files
            .iter()
            .map(|f| self.scorer.composite_in_context(identity, f, &ctx, rating))
            .collect();
        sort_breakdowns(&mut scored);
        scored.reverse();

        let excluded: Vec<String> = scored
            .iter()
            .filter(|f| protected.is_protected(&f.file_name))
            .map(|f| f.file_name.clone())
            .collect();
        let candidates = scored
            .iter()
            .filter(|f| !protected.is_protected(&f.file_name))
            .take(count)
            .enumerate()
            .map(|(i, f)| KeepCandidate {
                rank: i + 1,
                name: f.file_name.clone(),
                size_mb: f.size_mb,
                composite_score: f.composite_score,
            })
            .collect();

        Ok(SelectionCandidates {
            identity: identity.to_string(),
            total_files: bucket.files.len(),
            candidates,
            excluded,
        })
    }
}

/// Deletion urgency for a ranked score, critical at the bottom of the
/// ranking.
pub fn priority_label(score: f64) -> &'static str {
    if score <= PRIORITY_CRITICAL_MAX {
        "critical"
    } else if score <= PRIORITY_VERY_HIGH_MAX {
        "very high"
    } else if score <= PRIORITY_HIGH_MAX {
        "high"
    } else if score <= PRIORITY_NORMAL_MAX {
        "normal"
    } else if score <= PRIORITY_LOW_MAX {
        "low"
    } else {
        "very low"
    }
}

pub fn quality_label(score: f64) -> &'static str {
    if score >= QUALITY_HIGH_MIN {
        "high"
    } else if score >= QUALITY_LOW_MAX {
        "medium"
    } else {
        "low"
    }
}

/// Rating-driven cleanup stance. Higher ratings keep more.
pub fn strategy_for(record: Option<&RatingRecord>) -> CleanupStrategy {
    let rating = record.map(|r| r.rating).unwrap_or(0).min(5);
    let comment = record.map(|r| r.comment.clone()).unwrap_or_default();
    let strategy = match rating {
        5 => "keep nearly everything",
        4 => "keep most",
        3 => "standard cleanup",
        2 => "aggressive cleanup",
        1 => "minimal retention",
        _ => "neutral cleanup",
    };
    CleanupStrategy {
        rating,
        strategy: strategy.to_string(),
        keep_ratio: STRATEGY_KEEP_RATIOS[rating as usize],
        comment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileRecord;

    fn catalog_with_alice() -> Catalog {
        let mut catalog = Catalog::new();
        for (stamp, size) in [
            ("2025-03-10T12_00_00+09_00", 10.0),
            ("2025-03-11T12_00_00+09_00", 50.0),
            ("2025-03-12T12_00_00+09_00", 100.0),
        ] {
            catalog.add(
                "alice",
                FileRecord {
                    name: format!("alice-twitch-{stamp}.mp4"),
                    size_mb: size,
                },
            );
        }
        catalog
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(priority_label(0.05), "critical");
        assert_eq!(priority_label(0.1), "critical");
        assert_eq!(priority_label(0.15), "very high");
        assert_eq!(priority_label(0.25), "high");
        assert_eq!(priority_label(0.45), "normal");
        assert_eq!(priority_label(0.6), "low");
        assert_eq!(priority_label(0.9), "very low");
    }

    #[test]
    fn test_quality_labels() {
        assert_eq!(quality_label(0.85), "high");
        assert_eq!(quality_label(0.5), "medium");
        assert_eq!(quality_label(0.19), "low");
    }

    #[test]
    fn test_strategy_ladder() {
        let mut record = RatingRecord::default();
        record.rating = 5;
        let top = strategy_for(Some(&record));
        assert_eq!(top.keep_ratio, 0.9);
        assert_eq!(top.strategy, "keep nearly everything");

        record.rating = 1;
        let bottom = strategy_for(Some(&record));
        assert_eq!(bottom.keep_ratio, 0.2);

        let unrated = strategy_for(None);
        assert_eq!(unrated.rating, 0);
        assert_eq!(unrated.keep_ratio, 0.5);
        assert_eq!(unrated.strategy, "neutral cleanup");
    }

    #[test]
    fn test_deletion_analysis_rejects_empty_catalog() {
        let engine = PriorityEngine::default();
        let result = engine.deletion_analysis(
            &Catalog::new(),
            &RatingStore::new(),
            &SentimentLexicon::empty(),
            &ProtectedFiles::new(),
            1.0,
        );
        assert!(matches!(result, Err(CapsweepError::EmptyCatalog)));
    }

    #[test]
    fn test_deletion_analysis_statistics() {
        let engine = PriorityEngine::default();
        let analysis = engine
            .deletion_analysis(
                &catalog_with_alice(),
                &RatingStore::new(),
                &SentimentLexicon::empty(),
                &ProtectedFiles::new(),
                0.005,
            )
            .unwrap();

        assert_eq!(analysis.statistics.total_files, 3);
        assert_eq!(analysis.statistics.identity_count, 1);
        assert!((analysis.statistics.total_size_mb - 160.0).abs() < 1e-9);
        assert_eq!(
            analysis.statistics.suggested_files,
            analysis.suggestions.files.len()
        );
        assert!(analysis.statistics.suggested_files >= 1);
        assert!(!analysis.suggestions.ceiling_limited);
        assert_eq!(analysis.strategies["alice"].rating, 0);
    }

    #[test]
    fn test_identity_report_unknown_identity() {
        let engine = PriorityEngine::default();
        let result = engine.identity_report(
            &catalog_with_alice(),
            &RatingStore::new(),
            &SentimentLexicon::empty(),
            "nobody",
        );
        assert!(matches!(result, Err(CapsweepError::IdentityNotFound(_))));
    }

    #[test]
    fn test_identity_report_orders_best_first() {
        let engine = PriorityEngine::default();
        let report = engine
            .identity_report(
                &catalog_with_alice(),
                &RatingStore::new(),
                &SentimentLexicon::empty(),
                "alice",
            )
            .unwrap();

        assert_eq!(report.file_count, 3);
        for pair in report.files.windows(2) {
            assert!(pair[0].composite_score >= pair[1].composite_score);
        }
        let counted = report.quality.high + report.quality.medium + report.quality.low;
        assert_eq!(counted, 3);
        assert!(report.quality.high >= 1);
    }

    #[test]
    fn test_priority_report_breakdown_sums() {
        let mut catalog = catalog_with_alice();
        catalog.add(
            "bob",
            FileRecord {
                name: "bob-twitch-2025-03-10T12_00_00+09_00.mp4".to_string(),
                size_mb: 40.0,
            },
        );

        let engine = PriorityEngine::default();
        let report = engine
            .priority_report(
                &catalog,
                &RatingStore::new(),
                &SentimentLexicon::empty(),
                &ProtectedFiles::new(),
                10,
                false,
            )
            .unwrap();

        assert_eq!(report.file_count, report.files.len());
        let counted: usize = report.breakdown.values().map(|s| s.count).sum();
        assert_eq!(counted, report.file_count);
        assert!(!report.balanced);
    }

    #[test]
    fn test_keep_candidates_sets_protected_aside() {
        let engine = PriorityEngine::default();
        let mut protected = ProtectedFiles::new();
        protected.add("alice-twitch-2025-03-12T12_00_00+09_00.mp4");

        let candidates = engine
            .keep_candidates(
                &catalog_with_alice(),
                &RatingStore::new(),
                &SentimentLexicon::empty(),
                &protected,
                "alice",
                5,
            )
            .unwrap();

        assert_eq!(candidates.total_files, 3);
        assert_eq!(candidates.candidates.len(), 2);
        assert_eq!(candidates.excluded.len(), 1);
        assert!(candidates
            .candidates
            .iter()
            .all(|c| !c.name.contains("2025-03-12")));
        for (i, candidate) in candidates.candidates.iter().enumerate() {
            assert_eq!(candidate.rank, i + 1);
        }
    }
}
