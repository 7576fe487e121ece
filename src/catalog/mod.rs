// In-memory aggregation of discovered files per identity

pub mod scan;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::MB_PER_GB;

/// One discovered file: bare name plus size in MB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub size_mb: f64,
}

/// All files attributed to one identity with the accumulated size.
/// Invariant: `total_size_mb` equals the sum over `files`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityBucket {
    pub identity: String,
    pub total_size_mb: f64,
    pub files: Vec<FileRecord>,
}

/// Catalog over every known identity. A rescan builds a fresh catalog and
/// swaps it in whole; readers never observe a half-built one.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    buckets: BTreeMap<String, IdentityBucket>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to an identity's bucket, creating it on first use.
    pub fn add(&mut self, identity: &str, file: FileRecord) {
        let bucket = self
            .buckets
            .entry(identity.to_string())
            .or_insert_with(|| IdentityBucket {
                identity: identity.to_string(),
                ..Default::default()
            });
        bucket.total_size_mb += file.size_mb;
        bucket.files.push(file);
    }

    /// Known identities in stable sorted order.
    pub fn identities(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }

    pub fn bucket(&self, identity: &str) -> Option<&IdentityBucket> {
        self.buckets.get(identity)
    }

    /// Buckets in identity order.
    pub fn buckets(&self) -> impl Iterator<Item = &IdentityBucket> {
        self.buckets.values()
    }

    pub fn identity_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn file_count(&self) -> usize {
        self.buckets.values().map(|b| b.files.len()).sum()
    }

    pub fn total_size_mb(&self) -> f64 {
        self.buckets.values().map(|b| b.total_size_mb).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Human-readable size. MB below one GB, GB with two decimals above.
pub fn format_size_mb(size_mb: f64) -> String {
    if size_mb >= MB_PER_GB {
        format!("{:.2} GB", size_mb / MB_PER_GB)
    } else {
        format!("{:.2} MB", size_mb)
    }
}
