// Composite scoring: intrinsic file score blended with identity ratings

use crate::catalog::FileRecord;
use crate::constants::{RATING_MAX, SENTIMENT_SCALE};
use crate::parse::IdentityParser;
use crate::rating::lexicon::SentimentLexicon;
use crate::rating::store::RatingStore;
use crate::scoring::intrinsic::{FileIntrinsicScorer, SiblingContext};
use crate::scoring::{CompositeConfig, IntrinsicConfig, ScoreBreakdown};

/// Logistic remap that pushes blended scores away from the center so near
/// ties still get a usable ordering. Strictly increasing, so it never
/// reorders two scores; output stays inside (0, 1).
pub fn diversity_remap(x: f64, center: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + (-(steepness * (x - center))).exp())
}

/// Blends per-file intrinsic scores with per-identity rating scores into
/// the composite used for ranking.
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    intrinsic: FileIntrinsicScorer,
    config: CompositeConfig,
}

impl CompositeScorer {
    pub fn new(intrinsic: IntrinsicConfig, config: CompositeConfig) -> Self {
        Self {
            intrinsic: FileIntrinsicScorer::new(intrinsic),
            config,
        }
    }

    /// Identity-level rating score in [0, 1]. Unrated identities (no record,
    /// or a zero-star record) sit at the neutral baseline so rated ones can
    /// land on either side of them.
    pub fn rating_score(
        &self,
        identity: &str,
        store: &RatingStore,
        lexicon: &SentimentLexicon,
    ) -> f64 {
        let record = match store.get(identity) {
            Some(r) if r.rating > 0 => r,
            _ => return self.config.unrated_baseline,
        };
        let stars = f64::from(record.rating) / RATING_MAX;
        let sentiment = lexicon.score_comment(&record.comment) * SENTIMENT_SCALE;
        (stars + sentiment).clamp(0.0, 1.0)
    }

    /// Score one file against a prebuilt sibling context and an already
    /// computed rating score. Batch callers use this so the per-identity
    /// work happens once per bucket instead of once per file.
    pub fn composite_in_context(
        &self,
        identity: &str,
        file: &FileRecord,
        ctx: &SiblingContext,
        rating_score: f64,
    ) -> ScoreBreakdown {
        let intrinsic_score = self.intrinsic.score_in_context(ctx, file);
        let raw =
            intrinsic_score * self.config.file_weight + rating_score * self.config.rating_weight;
        let composite_score =
            diversity_remap(raw, self.config.remap_center, self.config.remap_steepness);
        ScoreBreakdown {
            identity: identity.to_string(),
            file_name: file.name.clone(),
            size_mb: file.size_mb,
            intrinsic_score,
            rating_score,
            composite_score,
        }
    }

    /// One-shot convenience for a single file.
    pub fn composite(
        &self,
        identity: &str,
        file: &FileRecord,
        siblings: &[FileRecord],
        parser: &IdentityParser,
        store: &RatingStore,
        lexicon: &SentimentLexicon,
    ) -> ScoreBreakdown {
        let ctx = SiblingContext::build(siblings, parser);
        let rating = self.rating_score(identity, store, lexicon);
        self.composite_in_context(identity, file, &ctx, rating)
    }
}
