//! Slot search.
//!
//! # Algorithm
//!
//! Scan the availability index in (date, time-slot, teacher) order. For each
//! slot the scorer either rejects it or returns a score; keep the first slot
//! whose score is strictly greater than the best so far.
//!
//! Strict comparison means ties resolve to the earliest slot in scan order,
//! and the first feasible slot is always a candidate however low it scores.
//!
//! # Complexity
//! O(s × (f + r)) per demand, s = slots, f = filters, r = rules.

use serde::{Deserialize, Serialize};

use crate::models::{AvailabilityIndex, DemandUnit, SlotKey};
use crate::scoring::{Score, ScoringContext, SlotScorer};

/// Winning slot of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChoice {
    /// Chosen slot.
    pub slot: SlotKey,
    /// Its score.
    pub score: Score,
}

/// Finds the best feasible slot for `demand`, if any.
pub fn find_best_slot(
    demand: &DemandUnit,
    index: &AvailabilityIndex,
    scorer: &SlotScorer,
    ctx: &ScoringContext<'_>,
) -> Option<SlotChoice> {
    let mut best: Option<SlotChoice> = None;
    for slot in index.iter() {
        let Some(score) = scorer.score(demand, slot, ctx) else {
            continue;
        };
        match best {
            Some(b) if score <= b.score => {}
            _ => best = Some(SlotChoice { slot: *slot, score }),
        }
    }
    best
}
