// Identity-by-identity review workflow with a running savings projection

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, IdentityBucket};
use crate::constants::{NEUTRAL_SCORE, REVIEW_SAMPLE_FILES};
use crate::scoring::ScoreBreakdown;

/// One identity queued for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub identity: String,
    pub file_count: usize,
    pub total_size_mb: f64,
    /// What deleting this identity's files would free.
    pub potential_savings_mb: f64,
    pub sample_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Keep,
    Delete,
    Skip,
}

/// Walks a queue of review items collecting one decision per identity.
/// While not finished, `index` always points at a valid item. Revisiting an
/// item replaces its decision and the savings projection follows.
#[derive(Debug, Clone)]
pub struct DecisionWorkflow {
    items: Vec<ReviewItem>,
    index: usize,
    finished: bool,
    decisions: BTreeMap<String, Action>,
    projected_savings_mb: f64,
}

impl DecisionWorkflow {
    pub fn new(items: Vec<ReviewItem>) -> Self {
        let finished = items.is_empty();
        Self {
            items,
            index: 0,
            finished,
            decisions: BTreeMap::new(),
            projected_savings_mb: 0.0,
        }
    }

    /// The item under review, or `None` once the workflow is over.
    pub fn current(&self) -> Option<&ReviewItem> {
        if self.finished {
            return None;
        }
        self.items.get(self.index)
    }

    /// Record a decision for the current item and advance. Re-deciding an
    /// identity first backs its earlier Delete out of the projection.
    pub fn decide(&mut self, action: Action) {
        if self.finished {
            return;
        }
        let Some(item) = self.items.get(self.index) else {
            return;
        };
        let identity = item.identity.clone();
        let savings = item.potential_savings_mb;

        if self.decisions.get(&identity) == Some(&Action::Delete) {
            self.projected_savings_mb -= savings;
        }
        if action == Action::Delete {
            self.projected_savings_mb += savings;
        }
        self.decisions.insert(identity, action);

        self.index += 1;
        if self.index >= self.items.len() {
            self.finished = true;
        }
    }

    /// Step back to revisit an earlier item. No-op at the front.
    pub fn previous_item(&mut self) {
        if self.finished || self.index == 0 {
            return;
        }
        self.index -= 1;
    }

    /// Step forward without deciding. No-op at the last item; only
    /// `decide` moves past the end.
    pub fn next_item(&mut self) {
        if self.finished || self.index + 1 >= self.items.len() {
            return;
        }
        self.index += 1;
    }

    /// End the review early, keeping the decisions made so far.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn projected_savings_mb(&self) -> f64 {
        self.projected_savings_mb
    }

    pub fn decisions(&self) -> &BTreeMap<String, Action> {
        &self.decisions
    }

    pub fn into_decisions(self) -> (BTreeMap<String, Action>, f64) {
        (self.decisions, self.projected_savings_mb)
    }
}

fn review_item(bucket: &IdentityBucket) -> ReviewItem {
    ReviewItem {
        identity: bucket.identity.clone(),
        file_count: bucket.files.len(),
        total_size_mb: bucket.total_size_mb,
        potential_savings_mb: bucket.total_size_mb,
        sample_files: bucket
            .files
            .iter()
            .take(REVIEW_SAMPLE_FILES)
            .map(|f| f.name.clone())
            .collect(),
    }
}

/// Review queue ordered by bulk: the identities holding the most disk
/// first.
pub fn build_review_items(catalog: &Catalog) -> Vec<ReviewItem> {
    let mut items: Vec<ReviewItem> = catalog.buckets().map(review_item).collect();
    items.sort_by(|a, b| {
        b.total_size_mb
            .partial_cmp(&a.total_size_mb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.identity.cmp(&b.identity))
    });
    items
}

/// Review queue ordered by mean composite score ascending, so the weakest
/// identities come up first. Identities missing from the ranking sort as
/// neutral.
pub fn build_review_items_by_priority(
    catalog: &Catalog,
    ranking: &[ScoreBreakdown],
) -> Vec<ReviewItem> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for entry in ranking {
        let slot = sums.entry(entry.identity.as_str()).or_insert((0.0, 0));
        slot.0 += entry.composite_score;
        slot.1 += 1;
    }
    let mean_of = |identity: &str| {
        sums.get(identity)
            .map(|(sum, n)| sum / *n as f64)
            .unwrap_or(NEUTRAL_SCORE)
    };

    let mut items: Vec<ReviewItem> = catalog.buckets().map(review_item).collect();
    items.sort_by(|a, b| {
        mean_of(&a.identity)
            .partial_cmp(&mean_of(&b.identity))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.identity.cmp(&b.identity))
    });
    items
}
