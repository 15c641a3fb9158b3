//! Per-run state read by filters and rules.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::models::{Directory, SlotKey, StudentId, SubjectId, TimeSlotId};

/// Live occupancy of the plan being built.
///
/// Implemented by the run workspace, so filters see containers staged
/// earlier in the same run as well as committed ones.
pub trait Occupancy {
    /// Lessons currently seated at a slot.
    fn occupancy(&self, slot: &SlotKey) -> usize;

    /// Whether the student already sits somewhere at this date and time-slot.
    fn student_busy(&self, student: StudentId, date: NaiveDate, time_slot: TimeSlotId) -> bool;
}

/// Last placement date per (student, subject).
///
/// Tracks two sources separately: dates already in storage when the run
/// started, and dates placed during the run. Rules read the later of the two.
/// One history belongs to exactly one run.
#[derive(Debug, Clone, Default)]
pub struct PlacementHistory {
    stored: HashMap<(StudentId, SubjectId), NaiveDate>,
    run: HashMap<(StudentId, SubjectId), NaiveDate>,
}

impl PlacementHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds in a date found in storage.
    pub fn observe_stored(&mut self, student: StudentId, subject: SubjectId, date: NaiveDate) {
        bump(&mut self.stored, (student, subject), date);
    }

    /// Records a placement made during the run.
    pub fn record(&mut self, student: StudentId, subject: SubjectId, date: NaiveDate) {
        bump(&mut self.run, (student, subject), date);
    }

    /// Latest stored date.
    pub fn last_stored(&self, student: StudentId, subject: SubjectId) -> Option<NaiveDate> {
        self.stored.get(&(student, subject)).copied()
    }

    /// Latest date placed during the run.
    pub fn last_in_run(&self, student: StudentId, subject: SubjectId) -> Option<NaiveDate> {
        self.run.get(&(student, subject)).copied()
    }

    /// Later of the stored and run dates.
    pub fn last_date(&self, student: StudentId, subject: SubjectId) -> Option<NaiveDate> {
        match (
            self.last_stored(student, subject),
            self.last_in_run(student, subject),
        ) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

fn bump(map: &mut HashMap<(StudentId, SubjectId), NaiveDate>, key: (StudentId, SubjectId), date: NaiveDate) {
    map.entry(key)
        .and_modify(|d| *d = (*d).max(date))
        .or_insert(date);
}

/// Everything a filter or rule may consult while scoring one slot.
#[derive(Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Directory of the run.
    pub directory: &'a Directory,
    /// Placement history of the run.
    pub history: &'a PlacementHistory,
    /// Live occupancy of the run.
    pub occupancy: &'a dyn Occupancy,
    /// Engine configuration.
    pub config: &'a EngineConfig,
}
