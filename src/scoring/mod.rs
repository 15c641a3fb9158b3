//! Slot feasibility and scoring.
//!
//! A slot is judged in two stages:
//! 1. **Hard filters** ([`HardFilter`]) exclude infeasible slots: subject
//!    gating, student non-overlap, container capacity.
//! 2. **Soft rules** ([`SoftRule`]) rank the survivors: base score plus an
//!    additive adjustment per active rule (subject interval, preferred
//!    teacher).
//!
//! # Score Convention
//! **Higher score = better slot.** Scores are integers and may go negative
//! under heavy penalties; a negative slot is still eligible.

mod context;
mod engine;
mod filters;
mod rules;

pub use context::{Occupancy, PlacementHistory, ScoringContext};
pub use engine::SlotScorer;
pub use filters::{CapacityLimit, HardFilter, StudentNonOverlap, SubjectGate};
pub use rules::{PreferredTeacher, Score, SoftRule, SubjectInterval};
