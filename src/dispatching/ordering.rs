//! Demand ordering strategies.
//!
//! # Algorithm
//!
//! 1. Shuffle all units (Fisher-Yates via `SliceRandom::shuffle`).
//! 2. Under [`DemandOrdering::PriorityThenShuffle`], stable-sort by priority
//!    rank so the shuffle survives as the tie-break inside each rank.
//!
//! Units without a priority rank after `LOW`.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::DemandUnit;

/// Rank given to units that carry no priority.
const UNRANKED: u8 = 3;

/// How a run orders its demand units before placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandOrdering {
    /// HIGH → MEDIUM → LOW → unranked, random inside each rank.
    PriorityThenShuffle,
    /// Fully random.
    Shuffle,
}

impl DemandOrdering {
    /// Picks the strategy for a batch of units.
    ///
    /// Priority ordering applies as soon as one unit carries a priority.
    pub fn for_demands(demands: &[DemandUnit]) -> Self {
        if demands.iter().any(|d| d.priority.is_some()) {
            DemandOrdering::PriorityThenShuffle
        } else {
            DemandOrdering::Shuffle
        }
    }

    /// Reorders `demands` in place.
    pub fn apply<R: Rng + ?Sized>(&self, demands: &mut [DemandUnit], rng: &mut R) {
        demands.shuffle(rng);
        if let DemandOrdering::PriorityThenShuffle = self {
            demands.sort_by_key(rank);
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            DemandOrdering::PriorityThenShuffle => "priority+shuffle",
            DemandOrdering::Shuffle => "shuffle",
        }
    }
}

fn rank(demand: &DemandUnit) -> u8 {
    demand.priority.map_or(UNRANKED, |p| p.rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Quota};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn unit(quota: u32, priority: Option<Priority>) -> DemandUnit {
        let q = Quota::new(quota, 1, quota, 1, 1);
        let q = match priority {
            Some(p) => q.with_priority(p),
            None => q,
        };
        DemandUnit::from_quota(&q)
    }

    #[test]
    fn test_strategy_selection() {
        let plain = vec![unit(1, None), unit(2, None)];
        assert_eq!(DemandOrdering::for_demands(&plain), DemandOrdering::Shuffle);

        let mixed = vec![unit(1, None), unit(2, Some(Priority::Low))];
        assert_eq!(
            DemandOrdering::for_demands(&mixed),
            DemandOrdering::PriorityThenShuffle
        );
        assert_eq!(DemandOrdering::for_demands(&[]), DemandOrdering::Shuffle);
    }

    #[test]
    fn test_priority_order() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut demands = vec![
            unit(1, None),
            unit(2, Some(Priority::Low)),
            unit(3, Some(Priority::High)),
            unit(4, Some(Priority::Medium)),
            unit(5, Some(Priority::High)),
        ];
        DemandOrdering::PriorityThenShuffle.apply(&mut demands, &mut rng);

        let ranks: Vec<u8> = demands.iter().map(rank).collect();
        assert_eq!(ranks, vec![0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_shuffle_is_permutation_and_seeded() {
        let base: Vec<DemandUnit> = (1..=20).map(|i| unit(i, None)).collect();

        let mut a = base.clone();
        let mut b = base.clone();
        DemandOrdering::Shuffle.apply(&mut a, &mut SmallRng::seed_from_u64(7));
        DemandOrdering::Shuffle.apply(&mut b, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);

        let mut sorted: Vec<u32> = a.iter().map(|d| d.quota.0).collect();
        sorted.sort();
        assert_eq!(sorted, (1..=20).collect::<Vec<_>>());
    }
}
