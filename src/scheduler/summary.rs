//! Run summary and fill metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fill rate | placed / considered (1.0 when nothing was owed) |
//! | Unplaced by priority | unplaced units per quota priority |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dispatching::DemandOrdering;
use crate::models::{DemandUnit, PeriodId, Priority};

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The run finished and its changes were committed.
    Completed,
}

/// What a run did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Planned period.
    pub period: PeriodId,
    /// Final state.
    pub status: RunStatus,
    /// Ordering strategy used.
    pub ordering: DemandOrdering,
    /// Demand units considered.
    pub considered: usize,
    /// Units placed.
    pub placed: usize,
    /// Units with no feasible slot.
    pub unplaced: usize,
    /// The unplaced units, in placement order.
    pub unplaced_demands: Vec<DemandUnit>,
    /// `auto` lessons removed by cleanup.
    pub removed_lessons: usize,
    /// Containers removed.
    pub removed_containers: usize,
    /// Containers created for new lessons.
    pub created_containers: usize,
}

impl RunSummary {
    /// Fraction of considered units that were placed.
    pub fn fill_rate(&self) -> f64 {
        if self.considered == 0 {
            1.0
        } else {
            self.placed as f64 / self.considered as f64
        }
    }

    /// Unplaced units grouped by priority (`None` for contract quotas).
    pub fn unplaced_by_priority(&self) -> HashMap<Option<Priority>, usize> {
        let mut counts = HashMap::new();
        for unit in &self.unplaced_demands {
            *counts.entry(unit.priority).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quota;

    fn summary(considered: usize, unplaced: Vec<DemandUnit>) -> RunSummary {
        RunSummary {
            period: PeriodId(1),
            status: RunStatus::Completed,
            ordering: DemandOrdering::Shuffle,
            considered,
            placed: considered - unplaced.len(),
            unplaced: unplaced.len(),
            unplaced_demands: unplaced,
            removed_lessons: 0,
            removed_containers: 0,
            created_containers: 0,
        }
    }

    #[test]
    fn test_fill_rate() {
        assert!((summary(0, vec![]).fill_rate() - 1.0).abs() < 1e-10);
        let unit = DemandUnit::from_quota(&Quota::new(1, 1, 1, 1, 1));
        assert!((summary(4, vec![unit]).fill_rate() - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_unplaced_by_priority() {
        let high = DemandUnit::from_quota(&Quota::new(1, 1, 1, 1, 1).with_priority(Priority::High));
        let plain = DemandUnit::from_quota(&Quota::new(2, 1, 2, 1, 1));
        let s = summary(5, vec![high.clone(), high, plain]);
        let counts = s.unplaced_by_priority();
        assert_eq!(counts.get(&Some(Priority::High)), Some(&2));
        assert_eq!(counts.get(&None), Some(&1));
        assert_eq!(counts.get(&Some(Priority::Low)), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RunStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
