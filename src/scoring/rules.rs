//! Soft scoring rules.
//!
//! Each rule returns an additive adjustment to the base score. Higher
//! totals win.

use super::ScoringContext;
use crate::config::Strength;
use crate::models::{DemandUnit, SlotKey};

/// Score contribution type.
pub type Score = i64;

/// A preference that ranks feasible slots.
pub trait SoftRule: Send + Sync + std::fmt::Debug {
    /// Rule name, for logs.
    fn name(&self) -> &'static str;

    /// Adjustment for placing `demand` at `slot`.
    fn evaluate(&self, demand: &DemandUnit, slot: &SlotKey, ctx: &ScoringContext<'_>) -> Score;
}

/// Spreads lessons of the same subject apart.
///
/// Compares the candidate date with the student's last lesson of the
/// subject (stored or placed earlier in the run):
/// - no previous lesson → 0
/// - gap ≥ `min_days` → `+bonus`
/// - otherwise → `−penalty × (min_days − gap)`
///
/// The gap is signed; a candidate before the last lesson is penalized
/// harder than one on the same day.
#[derive(Debug, Clone, Copy)]
pub struct SubjectInterval {
    /// Minimum gap in days.
    pub min_days: i64,
    /// Penalty tier.
    pub strength: Strength,
    /// Bonus when the minimum is met.
    pub bonus: Score,
}

impl SoftRule for SubjectInterval {
    fn name(&self) -> &'static str {
        "subject-interval"
    }

    fn evaluate(&self, demand: &DemandUnit, slot: &SlotKey, ctx: &ScoringContext<'_>) -> Score {
        let Some(last) = ctx.history.last_date(demand.student, demand.subject) else {
            return 0;
        };
        let gap = (slot.date - last).num_days();
        if gap >= self.min_days {
            self.bonus
        } else {
            self.strength
                .interval_penalty()
                .saturating_mul(self.min_days.saturating_sub(gap))
                .saturating_neg()
        }
    }
}

/// Rewards the student's preferred teachers.
#[derive(Debug, Clone, Copy)]
pub struct PreferredTeacher {
    /// Bonus tier.
    pub strength: Strength,
}

impl SoftRule for PreferredTeacher {
    fn name(&self) -> &'static str {
        "preferred-teacher"
    }

    fn evaluate(&self, demand: &DemandUnit, slot: &SlotKey, ctx: &ScoringContext<'_>) -> Score {
        if ctx.directory.prefers(demand.student, slot.teacher) {
            self.strength.preferred_bonus()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{Directory, Student, StudentId, SubjectId};
    use crate::scoring::filters::tests::{d, demand, FixedOccupancy};
    use crate::scoring::PlacementHistory;

    fn interval(min_days: i64, strength: Strength) -> SubjectInterval {
        SubjectInterval {
            min_days,
            strength,
            bonus: 50,
        }
    }

    #[test]
    fn test_interval_without_history_is_neutral() {
        let dir = Directory::new();
        let occ = FixedOccupancy::default();
        let history = PlacementHistory::new();
        let config = EngineConfig::default();
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };
        let rule = interval(3, Strength::Normal);
        assert_eq!(rule.evaluate(&demand(1, 1), &SlotKey::new(1, d(5), 1), &ctx), 0);
    }

    #[test]
    fn test_interval_bonus_and_penalty() {
        let dir = Directory::new();
        let occ = FixedOccupancy::default();
        let mut history = PlacementHistory::new();
        history.record(StudentId(1), SubjectId(1), d(10));
        let config = EngineConfig::default();
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };
        let u = demand(1, 1);

        // gap 3 meets the minimum
        assert_eq!(interval(3, Strength::Normal).evaluate(&u, &SlotKey::new(1, d(13), 1), &ctx), 50);
        // gap 1: normal → -60 * 2
        assert_eq!(interval(3, Strength::Normal).evaluate(&u, &SlotKey::new(1, d(11), 1), &ctx), -120);
        // gap 1: weak → -10 * 2, strong → -1000 * 2
        assert_eq!(interval(3, Strength::Weak).evaluate(&u, &SlotKey::new(1, d(11), 1), &ctx), -20);
        assert_eq!(interval(3, Strength::Strong).evaluate(&u, &SlotKey::new(1, d(11), 1), &ctx), -2000);
        // gap -2 (before the last lesson): -60 * 5
        assert_eq!(interval(3, Strength::Normal).evaluate(&u, &SlotKey::new(1, d(8), 1), &ctx), -300);
    }

    #[test]
    fn test_interval_penalty_saturates() {
        let dir = Directory::new();
        let occ = FixedOccupancy::default();
        let mut history = PlacementHistory::new();
        history.record(StudentId(1), SubjectId(1), d(10));
        let config = EngineConfig::default();
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };
        let rule = interval(i64::MAX, Strength::Strong);
        assert_eq!(rule.evaluate(&demand(1, 1), &SlotKey::new(1, d(11), 1), &ctx), i64::MIN + 1);
    }

    #[test]
    fn test_interval_uses_later_of_stored_and_run() {
        let dir = Directory::new();
        let occ = FixedOccupancy::default();
        let mut history = PlacementHistory::new();
        history.observe_stored(StudentId(1), SubjectId(1), d(12));
        history.record(StudentId(1), SubjectId(1), d(5));
        let config = EngineConfig::default();
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };
        // last = 12 → gap to 14 is 2 → -60
        assert_eq!(
            interval(3, Strength::Normal).evaluate(&demand(1, 1), &SlotKey::new(1, d(14), 1), &ctx),
            -60
        );
    }

    #[test]
    fn test_preferred_teacher_bonus() {
        let dir = Directory::new().with_student(Student::new(1).with_preferred(7));
        let occ = FixedOccupancy::default();
        let history = PlacementHistory::new();
        let config = EngineConfig::default();
        let ctx = ScoringContext {
            directory: &dir,
            history: &history,
            occupancy: &occ,
            config: &config,
        };
        let u = demand(1, 1);
        for (strength, bonus) in [
            (Strength::Weak, 20),
            (Strength::Normal, 100),
            (Strength::Strong, 1000),
        ] {
            let rule = PreferredTeacher { strength };
            assert_eq!(rule.evaluate(&u, &SlotKey::new(7, d(1), 1), &ctx), bonus);
            assert_eq!(rule.evaluate(&u, &SlotKey::new(8, d(1), 1), &ctx), 0);
        }
    }
}
