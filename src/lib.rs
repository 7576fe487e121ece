// Capsweep - ranks recorded media by keep-worthiness and plans cleanups

pub mod catalog;
pub mod constants;
pub mod error;
pub mod overlap;
pub mod parse;
pub mod priority;
pub mod rating;
pub mod scoring;
pub mod workflow;

pub use catalog::scan::{scan_directory, scan_directory_with_cancel, ScanOptions, ScanOutcome};
pub use catalog::{Catalog, FileRecord, IdentityBucket};
pub use error::{CapsweepError, Result};
pub use overlap::compare_sites;
pub use parse::{IdentityParser, ParsedName, ParserConfig};
pub use priority::{PriorityEngine, SelectionConfig};
pub use rating::lexicon::SentimentLexicon;
pub use rating::protected::ProtectedFiles;
pub use rating::store::RatingStore;
pub use scoring::ScoreBreakdown;
pub use workflow::{Action, DecisionWorkflow, ReviewItem};
