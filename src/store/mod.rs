//! Storage seam.
//!
//! The engine never talks to a database directly. It reads its inputs
//! through [`PlanStore`] and hands back one [`ChangeSet`] per run, which the
//! store must apply atomically: every change or none.
//!
//! [`InMemoryStore`] is the reference implementation used by tests and by
//! callers that keep the plan in memory.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CAPACITY;
use crate::error::StoreResult;
use crate::models::{
    AssignmentContainer, AvailabilitySlot, ContainerId, Directory, LessonId, LessonRecord,
    LessonStatus, NewLesson, PeriodId, PlanningPeriod, Quota, SlotKey,
};

/// Read and write access to planning data.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; the planner service shares one
/// store across worker threads.
///
/// # Atomicity
/// [`PlanStore::apply`] either applies the whole change set or returns an
/// error and leaves the store untouched. Containers the set touches are
/// checked against [`ChangeSet::seat_limit`].
pub trait PlanStore: Send + Sync {
    /// Looks up a planning period. `Ok(None)` if it does not exist.
    fn period(&self, id: PeriodId) -> StoreResult<Option<PlanningPeriod>>;

    /// Loads the teacher/student/subject directory.
    fn directory(&self) -> StoreResult<Directory>;

    /// Loads availability declared for dates inside the window.
    fn availability(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<AvailabilitySlot>>;

    /// Loads the quotas requested for a period.
    fn quotas(&self, period: PeriodId) -> StoreResult<Vec<Quota>>;

    /// Loads every container whose date lies inside the window.
    fn containers_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<AssignmentContainer>>;

    /// Loads every lesson whose container date lies outside the window.
    fn lessons_outside(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<LessonRecord>>;

    /// Locates a lesson and the container holding it.
    fn find_lesson(&self, id: LessonId) -> StoreResult<Option<(AssignmentContainer, LessonRecord)>>;

    /// Applies a change set atomically.
    fn apply(&self, changes: ChangeSet) -> StoreResult<CommitReceipt>;
}

/// One mutation inside a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// Delete a lesson. A container left empty is deleted with it.
    RemoveLesson(LessonId),
    /// Delete a lesson only while it is still `auto`. A lesson locked since
    /// the change was staged rejects the whole set.
    RemoveAutoLesson(LessonId),
    /// Delete a container that holds no lessons.
    RemoveContainer(ContainerId),
    /// Seat a new lesson in the slot's container, creating it if needed.
    AddLesson {
        /// Target slot.
        slot: SlotKey,
        /// Lesson to seat.
        lesson: NewLesson,
    },
    /// Move a lesson to another slot. A source container left empty is deleted.
    MoveLesson {
        /// Lesson to move.
        lesson: LessonId,
        /// Destination slot.
        to: SlotKey,
    },
    /// Change a lesson's status.
    SetStatus {
        /// Lesson to update.
        lesson: LessonId,
        /// New status.
        status: LessonStatus,
    },
}

/// An ordered batch of changes applied as one unit of work.
///
/// Carries the seat limit the store enforces on every container the batch
/// touches, so the engine and the store share one capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    changes: Vec<Change>,
    seat_limit: usize,
}

impl Default for ChangeSet {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
            seat_limit: DEFAULT_CAPACITY,
        }
    }
}

impl ChangeSet {
    /// Creates an empty change set with the default seat limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seat limit checked at commit.
    pub fn with_seat_limit(mut self, seat_limit: usize) -> Self {
        self.seat_limit = seat_limit;
        self
    }

    /// Maximum lessons per container after this set is applied.
    pub fn seat_limit(&self) -> usize {
        self.seat_limit
    }

    /// Appends a change.
    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Appends a change (builder form).
    pub fn with(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }

    /// Changes in application order.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Consumes the set, yielding its changes.
    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

/// What a successful [`PlanStore::apply`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Ids given to added lessons, in change order.
    pub created_lessons: Vec<LessonId>,
    /// Containers created.
    pub created_containers: Vec<ContainerId>,
    /// Lessons deleted.
    pub removed_lessons: Vec<LessonId>,
    /// Containers deleted, explicitly or because they emptied.
    pub removed_containers: Vec<ContainerId>,
}
