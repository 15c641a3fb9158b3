//! Planning period model.
//!
//! A planning period is the date window a run works in. Every lookup the
//! engine performs (availability, containers, cleanup) is scoped to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PeriodId;
use crate::error::{PlannerError, PlannerResult};

/// Lifecycle state of a planning period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Being planned; the default for new periods.
    #[default]
    Planning,
    /// Published and in use.
    Active,
    /// Closed for edits.
    Archived,
}

/// An inclusive date range `[start_date, end_date]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningPeriod {
    /// Period identifier.
    pub id: PeriodId,
    /// Human-readable name.
    pub name: String,
    /// First day of the window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the window (inclusive).
    pub end_date: NaiveDate,
    /// Lifecycle state.
    pub status: PeriodStatus,
}

impl PlanningPeriod {
    /// Creates a period, rejecting windows whose start is after their end.
    pub fn new(
        id: impl Into<PeriodId>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> PlannerResult<Self> {
        let id = id.into();
        if start_date > end_date {
            return Err(PlannerError::InvalidPeriod {
                id,
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id,
            name: String::new(),
            start_date,
            end_date,
            status: PeriodStatus::Planning,
        })
    }

    /// Sets the period name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: PeriodStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether a date falls inside the window.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the window.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    #[test]
    fn test_period_contains_is_inclusive() {
        let p = PlanningPeriod::new(1, d(1), d(31)).unwrap();
        assert!(p.contains(d(1)));
        assert!(p.contains(d(31)));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()));
        assert_eq!(p.day_count(), 31);
    }

    #[test]
    fn test_period_rejects_inverted_window() {
        let err = PlanningPeriod::new(9, d(10), d(2)).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidPeriod { .. }));
    }

    #[test]
    fn test_single_day_period() {
        let p = PlanningPeriod::new(1, d(5), d(5))
            .unwrap()
            .with_name("Summer intensive")
            .with_status(PeriodStatus::Active);
        assert_eq!(p.day_count(), 1);
        assert_eq!(p.status, PeriodStatus::Active);
        assert_eq!(p.name, "Summer intensive");
    }
}
