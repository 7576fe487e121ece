// Selection passes over the global ranking

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::MB_PER_GB;
use crate::rating::protected::ProtectedFiles;
use crate::scoring::ScoreBreakdown;

use super::{sort_breakdowns, PriorityEngine};

/// Files picked to free a size target, plus how the pass ended.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSelection {
    pub files: Vec<ScoreBreakdown>,
    pub target_gb: f64,
    pub total_savings_mb: f64,
    /// Savings over target in percent; above 100 when the last pick
    /// overshoots the target.
    pub achievement_pct: f64,
    /// True when the score ceiling stopped the pass short of the target.
    pub ceiling_limited: bool,
}

impl PriorityEngine {
    /// Walk the ranking lowest-score first until the target is freed or the
    /// remaining files score too well to suggest. `list` must already be
    /// sorted ascending (see [`PriorityEngine::global_list`]).
    pub fn budget_selection(&self, list: &[ScoreBreakdown], target_gb: f64) -> BudgetSelection {
        let target_mb = target_gb * MB_PER_GB;
        let mut files = Vec::new();
        let mut total_savings_mb = 0.0;
        let mut ceiling_limited = false;

        for entry in list {
            if total_savings_mb >= target_mb {
                break;
            }
            if entry.composite_score > self.config.score_ceiling {
                // Ascending order: everything after this scores higher too
                ceiling_limited = true;
                break;
            }
            total_savings_mb += entry.size_mb;
            files.push(entry.clone());
        }

        let achievement_pct = if target_mb > 0.0 {
            total_savings_mb / target_mb * 100.0
        } else {
            100.0
        };

        BudgetSelection {
            files,
            target_gb,
            total_savings_mb,
            achievement_pct,
            ceiling_limited,
        }
    }

    /// First `count` entries of the ranking as-is.
    pub fn unbalanced_selection(&self, list: &[ScoreBreakdown], count: usize) -> Vec<ScoreBreakdown> {
        list.iter().take(count).cloned().collect()
    }

    /// Pick up to `count_limit` files while spreading picks across
    /// identities: every identity contributes its lowest-scoring files up to
    /// an even share, then identities with the most files left absorb the
    /// spare slots, a bounded bonus each. Keeps a single prolific identity
    /// from monopolizing the deletion list.
    pub fn balanced_selection(
        &self,
        list: &[ScoreBreakdown],
        count_limit: usize,
    ) -> Vec<ScoreBreakdown> {
        if count_limit == 0 || list.is_empty() {
            return Vec::new();
        }

        let mut per_identity: BTreeMap<&str, Vec<&ScoreBreakdown>> = BTreeMap::new();
        for entry in list {
            per_identity
                .entry(entry.identity.as_str())
                .or_default()
                .push(entry);
        }
        let base = (count_limit / per_identity.len()).max(1);

        let mut picked: Vec<ScoreBreakdown> = Vec::new();
        let mut leftovers: Vec<(&str, Vec<&ScoreBreakdown>)> = Vec::new();
        for (identity, files) in per_identity.iter() {
            let take = base.min(files.len());
            picked.extend(files[..take].iter().map(|e| (*e).clone()));
            if files.len() > take {
                leftovers.push((identity, files[take..].to_vec()));
            }
        }

        // Spare slots go to whoever has the most files left
        leftovers.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
        for (_, rest) in leftovers {
            if picked.len() >= count_limit {
                break;
            }
            let spare = count_limit - picked.len();
            let take = self.config.bonus_cap.min(rest.len()).min(spare);
            picked.extend(rest[..take].iter().map(|e| (*e).clone()));
        }

        sort_breakdowns(&mut picked);
        picked.truncate(count_limit);
        picked
    }
}

/// Drop protected file names from a ranking before selection.
pub fn exclude_protected(
    list: &[ScoreBreakdown],
    protected: &ProtectedFiles,
) -> Vec<ScoreBreakdown> {
    list.iter()
        .filter(|entry| !protected.is_protected(&entry.file_name))
        .cloned()
        .collect()
}
