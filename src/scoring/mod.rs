// Scoring engine: intrinsic file scores blended with human ratings

pub mod composite;
pub mod intrinsic;


use serde::{Deserialize, Serialize};

use crate::constants::{
    COMPOSITE_WEIGHT_FILE, COMPOSITE_WEIGHT_RATING, INTRINSIC_WEIGHT_RARITY,
    INTRINSIC_WEIGHT_RECENCY, INTRINSIC_WEIGHT_SIZE, REMAP_CENTER, REMAP_STEEPNESS,
    SIZE_CURVE_EXPONENT, UNRATED_BASELINE,
};

/// Derived scores for one file. Never persisted; recomputed whenever the
/// catalog or the ratings change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub identity: String,
    pub file_name: String,
    pub size_mb: f64,
    pub intrinsic_score: f64,
    pub rating_score: f64,
    pub composite_score: f64,
}

/// Sub-score weights for intrinsic scoring. The three weights must sum
/// to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct IntrinsicConfig {
    pub size_weight: f64,
    pub rarity_weight: f64,
    pub recency_weight: f64,
    pub size_exponent: f64,
}

impl Default for IntrinsicConfig {
    fn default() -> Self {
        Self {
            size_weight: INTRINSIC_WEIGHT_SIZE,
            rarity_weight: INTRINSIC_WEIGHT_RARITY,
            recency_weight: INTRINSIC_WEIGHT_RECENCY,
            size_exponent: SIZE_CURVE_EXPONENT,
        }
    }
}

/// File/rating blend plus the diversity-remap shape. The two blend weights
/// must sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct CompositeConfig {
    pub file_weight: f64,
    pub rating_weight: f64,
    pub unrated_baseline: f64,
    pub remap_center: f64,
    pub remap_steepness: f64,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            file_weight: COMPOSITE_WEIGHT_FILE,
            rating_weight: COMPOSITE_WEIGHT_RATING,
            unrated_baseline: UNRATED_BASELINE,
            remap_center: REMAP_CENTER,
            remap_steepness: REMAP_STEEPNESS,
        }
    }
}
