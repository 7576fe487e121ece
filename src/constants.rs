// Capsweep Constants
// Tuning defaults for the scoring and selection engine. Weight families must
// keep their documented sums; selection behavior changes if they drift.

// ----- Filename convention -----

// Timestamp token embedded in recording filenames. Colons are not legal in
// filenames on every platform, so the recorder writes underscores instead:
// 2025-06-26T15_09_46+09_00
pub const TIMESTAMP_PATTERN: &str = r"\d{4}-\d{2}-\d{2}T\d{2}_\d{2}_\d{2}[+-]\d{2}_\d{2}";

pub const IDENTITY_SEPARATOR: char = '-';

// Closed set of platform tokens a filename may start with. Matching is
// case-insensitive; the token is stripped before the identity is formed.
pub const DEFAULT_SITES: [&str; 8] = [
    "twitch", "youtube", "chzzk", "soop", "afreeca", "pandalive", "flextv", "kick",
];

// ----- Units -----

pub const BYTES_PER_MB: f64 = 1_048_576.0;
pub const MB_PER_GB: f64 = 1024.0;

// ----- Intrinsic score weights (must sum to 1.0) -----

pub const INTRINSIC_WEIGHT_SIZE: f64 = 0.5;
pub const INTRINSIC_WEIGHT_RARITY: f64 = 0.3;
pub const INTRINSIC_WEIGHT_RECENCY: f64 = 0.2;

// Power curve applied to the min/max-normalized size. Below 1.0 lifts the
// mid-range so mid-sized files are not drowned out by a single huge one.
pub const SIZE_CURVE_EXPONENT: f64 = 0.7;

// Score when every sibling has the same size (nothing to normalize against).
pub const SIZE_FLAT_SCORE: f64 = 0.7;

// Fallback for sub-scores that cannot be computed (no parseable timestamp).
pub const NEUTRAL_SCORE: f64 = 0.5;

// Rarity step function over the number of same-day sibling files.
pub const RARITY_UNIQUE: f64 = 1.0; // only recording that day
pub const RARITY_PAIR: f64 = 0.7; // one other recording
pub const RARITY_FEW: f64 = 0.5; // three total
pub const RARITY_SEVERAL: f64 = 0.3; // four or five
pub const RARITY_MANY: f64 = 0.1; // busy day

// ----- Composite score (must sum to 1.0) -----

pub const COMPOSITE_WEIGHT_FILE: f64 = 0.6;
pub const COMPOSITE_WEIGHT_RATING: f64 = 0.4;

// Rating fallback when an identity has never been rated. Deliberately not
// zero: unrated must not be treated as worthless.
pub const UNRATED_BASELINE: f64 = 0.5;

pub const RATING_MAX: f64 = 5.0;

// Comment sentiment: matched token weights are summed, the sum is clamped,
// then scaled before being added to rating/5.
pub const SENTIMENT_SUM_LIMIT: f64 = 2.0;
pub const SENTIMENT_SCALE: f64 = 0.15;

// Diversity remap: logistic curve centered mid-range. Steepness 8.0 maps the
// raw [0,1] band onto roughly (0.018, 0.982) without ever touching 0 or 1.
pub const REMAP_CENTER: f64 = 0.5;
pub const REMAP_STEEPNESS: f64 = 8.0;

// ----- Selection -----

// Files scoring above this are never auto-selected, even with budget unmet.
pub const SCORE_CEILING_DEFAULT: f64 = 0.5;

// Extra slots one identity may claim on top of its base quota in balanced
// selection.
pub const BALANCED_BONUS_CAP: usize = 2;

// ----- Quality buckets and deletion-priority labels -----

pub const QUALITY_HIGH_MIN: f64 = 0.8;
pub const QUALITY_LOW_MAX: f64 = 0.2;

pub const PRIORITY_CRITICAL_MAX: f64 = 0.1;
pub const PRIORITY_VERY_HIGH_MAX: f64 = 0.2;
pub const PRIORITY_HIGH_MAX: f64 = 0.3;
pub const PRIORITY_NORMAL_MAX: f64 = 0.5;
pub const PRIORITY_LOW_MAX: f64 = 0.7;

// Keep-ratio per rating, indexed by rating 0..=5 (0 = unrated).
pub const STRATEGY_KEEP_RATIOS: [f64; 6] = [0.5, 0.2, 0.4, 0.6, 0.8, 0.9];

// ----- Scan concurrency -----

// Bounded pool for metadata reads; independent of file count so one slow
// volume cannot spawn unbounded workers.
pub const SCAN_WORKERS: usize = 20;

// Parsing is CPU-only; below this many files the pool overhead outweighs it.
pub const PARALLEL_PARSE_THRESHOLD: usize = 200;

// Sample file names carried on each review item.
pub const REVIEW_SAMPLE_FILES: usize = 5;

// ----- Persisted documents -----

pub const RATINGS_FILE: &str = "user_ratings.json";
pub const KEYWORDS_FILE: &str = "keyword_weights.json";
pub const PROTECTED_FILE: &str = "protected_files.json";

pub const RATINGS_FORMAT_VERSION: &str = "1.0";

// ----- Default sentiment lexicon -----
// Community shorthand found in rating comments. Positive weights favor
// keeping, negative favor deletion.

pub const DEFAULT_KEYWORD_WEIGHTS: [(&str, f64); 23] = [
    // keep signals
    ("ㅆㅅㅌㅊ", 1.5),
    ("GOAT", 1.5),
    ("신", 1.3),
    ("ㅅㅌㅊ", 1.2),
    ("ㅈㅅㅌㅊ", 1.0),
    ("귀여움", 1.0),
    ("올노", 0.9),
    ("ㅍㅅㅌㅊ", 0.8),
    ("자위", 0.7),
    // delete signals
    ("가지치기필요", -1.5),
    ("계륵", -1.3),
    ("추적중지", -1.2),
    ("녹화중지", -1.0),
    ("녹화중단", -1.0),
    ("정으로보는느낌", -1.0),
    ("애매함", -0.8),
    ("현재", -0.6),
    ("ㅍㅌㅊ", -0.5),
    // weak signals
    ("육덕", 0.2),
    ("얼굴", 0.1),
    ("코스", 0.1),
    ("2인", 0.1),
    ("3인", 0.1),
];
