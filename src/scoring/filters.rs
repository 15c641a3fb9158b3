//! Hard feasibility filters.
//!
//! A slot failing any filter is excluded outright, whatever its score.

use super::ScoringContext;
use crate::models::{DemandUnit, SlotKey};

/// A feasibility check on one (demand, slot) pair.
pub trait HardFilter: Send + Sync + std::fmt::Debug {
    /// Filter name, for logs.
    fn name(&self) -> &'static str;

    /// Whether the slot may take the demand.
    fn admits(&self, demand: &DemandUnit, slot: &SlotKey, ctx: &ScoringContext<'_>) -> bool;
}

/// Subjects at or above the gated tier need a qualified teacher.
///
/// Lower tiers may be taught by anyone.
#[derive(Debug, Clone, Copy)]
pub struct SubjectGate;

impl HardFilter for SubjectGate {
    fn name(&self) -> &'static str {
        "subject-gate"
    }

    fn admits(&self, demand: &DemandUnit, slot: &SlotKey, ctx: &ScoringContext<'_>) -> bool {
        if ctx.directory.subject_tier(demand.subject) < ctx.config.gated_tier {
            return true;
        }
        ctx.directory.can_teach(slot.teacher, demand.subject)
    }
}

/// A student cannot sit in two places at once.
#[derive(Debug, Clone, Copy)]
pub struct StudentNonOverlap;

impl HardFilter for StudentNonOverlap {
    fn name(&self) -> &'static str {
        "student-non-overlap"
    }

    fn admits(&self, demand: &DemandUnit, slot: &SlotKey, ctx: &ScoringContext<'_>) -> bool {
        !ctx
            .occupancy
            .student_busy(demand.student, slot.date, slot.time_slot)
    }
}

/// The slot's container must have a free seat.
#[derive(Debug, Clone, Copy)]
pub struct CapacityLimit;

impl HardFilter for CapacityLimit {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn admits(&self, _demand: &DemandUnit, slot: &SlotKey, ctx: &ScoringContext<'_>) -> bool {
        ctx.occupancy.occupancy(slot) < ctx.config.capacity
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{HashMap, HashSet};

    use chrono::NaiveDate;

    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{
        Directory, QuotaId, StudentId, Subject, SubjectId, SubjectTier, Teacher, TimeSlotId,
    };
    use crate::scoring::{Occupancy, PlacementHistory};

    /// Fixed occupancy for filter and rule tests.
    #[derive(Default)]
    pub(crate) struct FixedOccupancy {
        pub seats: HashMap<SlotKey, usize>,
        pub busy: HashSet<(StudentId, NaiveDate, TimeSlotId)>,
    }

    impl Occupancy for FixedOccupancy {
        fn occupancy(&self, slot: &SlotKey) -> usize {
            self.seats.get(slot).copied().unwrap_or(0)
        }

        fn student_busy(&self, student: StudentId, date: NaiveDate, time_slot: TimeSlotId) -> bool {
            self.busy.contains(&(student, date, time_slot))
        }
    }

    pub(crate) fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    pub(crate) fn demand(student: u32, subject: u32) -> DemandUnit {
        DemandUnit {
            quota: QuotaId(1),
            student: StudentId(student),
            subject: SubjectId(subject),
            priority: None,
        }
    }

    fn directory() -> Directory {
        Directory::new()
            .with_subject(Subject::new(1, SubjectTier::Middle))
            .with_subject(Subject::new(2, SubjectTier::High))
            .with_teacher(Teacher::new(10).with_subject(2))
            .with_teacher(Teacher::new(11))
    }

    #[test]
    fn test_subject_gate() {
        let dir = directory();
        let occ = FixedOccupancy::default();
        let history = PlacementHistory::new();
        let config = EngineConfig::default();
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };

        // High tier: only the qualified teacher
        assert!(SubjectGate.admits(&demand(1, 2), &SlotKey::new(10, d(1), 1), &ctx));
        assert!(!SubjectGate.admits(&demand(1, 2), &SlotKey::new(11, d(1), 1), &ctx));
        // Middle tier: anyone
        assert!(SubjectGate.admits(&demand(1, 1), &SlotKey::new(11, d(1), 1), &ctx));
    }

    #[test]
    fn test_subject_gate_threshold_is_configurable() {
        let dir = directory();
        let occ = FixedOccupancy::default();
        let history = PlacementHistory::new();
        let config = EngineConfig::default().with_gated_tier(SubjectTier::Middle);
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };
        assert!(!SubjectGate.admits(&demand(1, 1), &SlotKey::new(11, d(1), 1), &ctx));
    }

    #[test]
    fn test_non_overlap_and_capacity() {
        let dir = directory();
        let slot = SlotKey::new(10, d(2), 3);
        let mut occ = FixedOccupancy::default();
        occ.busy.insert((StudentId(1), d(2), TimeSlotId(3)));
        occ.seats.insert(slot, 2);
        let history = PlacementHistory::new();
        let config = EngineConfig::default();
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };

        assert!(!StudentNonOverlap.admits(&demand(1, 1), &SlotKey::new(11, d(2), 3), &ctx));
        assert!(StudentNonOverlap.admits(&demand(2, 1), &SlotKey::new(11, d(2), 3), &ctx));
        assert!(!CapacityLimit.admits(&demand(2, 1), &slot, &ctx));
        assert!(CapacityLimit.admits(&demand(2, 1), &SlotKey::new(11, d(2), 3), &ctx));
    }
}
