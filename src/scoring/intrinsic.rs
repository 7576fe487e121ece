// Intrinsic file scoring: size, same-day rarity, recency position
// Pure functions of the file list; no wall clock, no I/O.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::catalog::FileRecord;
use crate::constants::{
    NEUTRAL_SCORE, RARITY_FEW, RARITY_MANY, RARITY_PAIR, RARITY_SEVERAL, RARITY_UNIQUE,
    SIZE_FLAT_SCORE,
};
use crate::parse::IdentityParser;
use crate::scoring::IntrinsicConfig;

/// Sibling statistics built once per identity so per-file scoring is a few
/// lookups. Timestamps are parsed here, in one pass.
#[derive(Debug, Clone)]
pub struct SiblingContext {
    min_size_mb: f64,
    max_size_mb: f64,
    day_counts: HashMap<NaiveDate, usize>,
    earliest_secs: Option<i64>,
    latest_secs: Option<i64>,
    timestamps: HashMap<String, DateTime<FixedOffset>>,
}

impl SiblingContext {
    pub fn build(files: &[FileRecord], parser: &IdentityParser) -> Self {
        let mut min_size_mb = f64::MAX;
        let mut max_size_mb = f64::MIN;
        let mut day_counts: HashMap<NaiveDate, usize> = HashMap::new();
        let mut earliest_secs = None;
        let mut latest_secs = None;
        let mut timestamps = HashMap::new();

        for file in files {
            min_size_mb = min_size_mb.min(file.size_mb);
            max_size_mb = max_size_mb.max(file.size_mb);

            if let Some(ts) = parser.timestamp(&file.name) {
                *day_counts.entry(ts.date_naive()).or_insert(0) += 1;
                let secs = ts.timestamp();
                earliest_secs = Some(earliest_secs.map_or(secs, |e: i64| e.min(secs)));
                latest_secs = Some(latest_secs.map_or(secs, |l: i64| l.max(secs)));
                timestamps.insert(file.name.clone(), ts);
            }
        }

        Self {
            min_size_mb,
            max_size_mb,
            day_counts,
            earliest_secs,
            latest_secs,
            timestamps,
        }
    }

    fn timestamp_of(&self, name: &str) -> Option<&DateTime<FixedOffset>> {
        self.timestamps.get(name)
    }
}

/// Computes a 0..1 retention score from file metadata alone.
#[derive(Debug, Clone, Default)]
pub struct FileIntrinsicScorer {
    config: IntrinsicConfig,
}

impl FileIntrinsicScorer {
    pub fn new(config: IntrinsicConfig) -> Self {
        Self { config }
    }

    /// Score one file against its identity's full file list (the file
    /// itself included).
    pub fn score(&self, file: &FileRecord, siblings: &[FileRecord], parser: &IdentityParser) -> f64 {
        let ctx = SiblingContext::build(siblings, parser);
        self.score_in_context(&ctx, file)
    }

    /// Score with a prebuilt sibling context.
    pub fn score_in_context(&self, ctx: &SiblingContext, file: &FileRecord) -> f64 {
        let ts = ctx.timestamp_of(&file.name);

        let size = self.size_score(ctx, file.size_mb);
        let rarity = rarity_score(ctx, ts);
        let recency = recency_score(ctx, ts);

        let weighted = size * self.config.size_weight
            + rarity * self.config.rarity_weight
            + recency * self.config.recency_weight;

        weighted.clamp(0.0, 1.0)
    }

    /// Min/max-normalized size pushed through the power curve. A flat
    /// sibling set (min == max) has nothing to normalize against and gets a
    /// fixed neutral-to-high score instead of a division by zero.
    fn size_score(&self, ctx: &SiblingContext, size_mb: f64) -> f64 {
        let span = ctx.max_size_mb - ctx.min_size_mb;
        if !span.is_finite() || span <= f64::EPSILON {
            return SIZE_FLAT_SCORE;
        }
        let normalized = ((size_mb - ctx.min_size_mb) / span).clamp(0.0, 1.0);
        normalized.powf(self.config.size_exponent)
    }
}

/// Step function over the number of recordings sharing the file's calendar
/// day. Fewer recordings that day means this one is harder to replace.
fn rarity_score(ctx: &SiblingContext, ts: Option<&DateTime<FixedOffset>>) -> f64 {
    let Some(ts) = ts else {
        return NEUTRAL_SCORE;
    };
    let count = ctx
        .day_counts
        .get(&ts.date_naive())
        .copied()
        .unwrap_or(1);
    match count {
        0 | 1 => RARITY_UNIQUE,
        2 => RARITY_PAIR,
        3 => RARITY_FEW,
        4 | 5 => RARITY_SEVERAL,
        _ => RARITY_MANY,
    }
}

/// Linear position between the oldest and newest sibling timestamp:
/// 0 = oldest, 1 = newest.
fn recency_score(ctx: &SiblingContext, ts: Option<&DateTime<FixedOffset>>) -> f64 {
    let Some(ts) = ts else {
        return NEUTRAL_SCORE;
    };
    let (Some(earliest), Some(latest)) = (ctx.earliest_secs, ctx.latest_secs) else {
        return NEUTRAL_SCORE;
    };
    if latest == earliest {
        return NEUTRAL_SCORE;
    }
    let position = (ts.timestamp() - earliest) as f64 / (latest - earliest) as f64;
    position.clamp(0.0, 1.0)
}
