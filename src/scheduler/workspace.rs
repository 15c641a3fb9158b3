//! In-memory overlay for one run.
//!
//! Holds everything the run reads and writes between loading its snapshot
//! and committing: seat counts per slot, which students are busy when,
//! per-quota fulfillment, placement history and the staged change set.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::models::{
    LessonRecord, PlacedLesson, QuotaId, SlotKey, StudentId, SubjectId, TimeSlotId,
};
use crate::scoring::{Occupancy, PlacementHistory};
use crate::store::{Change, ChangeSet};

/// Staged state of a run.
#[derive(Debug, Clone)]
pub struct Workspace {
    seats: HashMap<SlotKey, usize>,
    busy: HashSet<(StudentId, NaiveDate, TimeSlotId)>,
    fulfilled: HashMap<QuotaId, u32>,
    history: PlacementHistory,
    changes: ChangeSet,
}

impl Workspace {
    /// Creates an empty workspace for containers of `capacity` seats.
    ///
    /// The staged change set carries the same limit to the store.
    pub fn new(capacity: usize) -> Self {
        Self {
            seats: HashMap::new(),
            busy: HashSet::new(),
            fulfilled: HashMap::new(),
            history: PlacementHistory::new(),
            changes: ChangeSet::new().with_seat_limit(capacity),
        }
    }

    /// Registers a lesson that stays in place inside the window.
    ///
    /// It takes a seat, blocks its student at that moment and counts
    /// toward its quota.
    pub fn seat_existing(&mut self, slot: SlotKey, lesson: &PlacedLesson) {
        *self.seats.entry(slot).or_insert(0) += 1;
        self.busy.insert((lesson.student, slot.date, slot.time_slot));
        self.observe(slot.date, lesson);
    }

    /// Registers a stored lesson outside the window.
    ///
    /// Counts toward its quota and the interval history; it never competes
    /// for a slot the run can scan.
    pub fn observe_outside(&mut self, record: &LessonRecord) {
        self.observe(record.key.date, &record.lesson);
    }

    fn observe(&mut self, date: NaiveDate, lesson: &PlacedLesson) {
        if let Some(quota) = lesson.quota {
            *self.fulfilled.entry(quota).or_insert(0) += 1;
        }
        self.history
            .observe_stored(lesson.student, lesson.subject, date);
    }

    /// Appends a change to the staged set.
    pub fn stage(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Appends every change of `set`.
    pub fn stage_all(&mut self, set: ChangeSet) {
        for change in set.into_changes() {
            self.changes.push(change);
        }
    }

    /// Lessons bound to each quota.
    pub fn fulfilled(&self) -> &HashMap<QuotaId, u32> {
        &self.fulfilled
    }

    /// Placement history of the run.
    pub fn history(&self) -> &PlacementHistory {
        &self.history
    }

    /// Changes staged so far.
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Takes a seat at `slot` for a lesson placed during the run.
    ///
    /// Returns `false` without touching anything if the slot is full.
    pub(crate) fn claim_seat(
        &mut self,
        slot: SlotKey,
        student: StudentId,
        subject: SubjectId,
        quota: QuotaId,
    ) -> bool {
        let seats = self.seats.entry(slot).or_insert(0);
        if *seats >= self.changes.seat_limit() {
            return false;
        }
        *seats += 1;
        self.busy.insert((student, slot.date, slot.time_slot));
        *self.fulfilled.entry(quota).or_insert(0) += 1;
        self.history.record(student, subject, slot.date);
        true
    }

    /// Consumes the workspace, yielding the change set to commit.
    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }
}

impl Occupancy for Workspace {
    fn occupancy(&self, slot: &SlotKey) -> usize {
        self.seats.get(slot).copied().unwrap_or(0)
    }

    fn student_busy(&self, student: StudentId, date: NaiveDate, time_slot: TimeSlotId) -> bool {
        self.busy.contains(&(student, date, time_slot))
    }
}
