//! Manual operator actions.
//!
//! Operators adjust a plan by hand between runs. Every action goes through
//! [`PlanStore::apply`], so the store enforces capacity and student
//! non-overlap exactly as it does for engine runs, and an action either
//! lands completely or not at all.
//!
//! Lessons placed or moved by hand become `locked`; the next run keeps them.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CAPACITY;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{LessonId, LessonStatus, NewLesson, PeriodId, SlotKey, StudentId, SubjectId};
use crate::store::{Change, ChangeSet, CommitReceipt, PlanStore};

/// Memo stored on lessons placed by hand when none is given.
pub const MANUAL_MEMO: &str = "placed manually";

/// A hand placement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualPlacement {
    /// Period whose quota the lesson counts against.
    pub period: PeriodId,
    /// Student.
    pub student: StudentId,
    /// Subject.
    pub subject: SubjectId,
    /// Target slot.
    pub slot: SlotKey,
    /// Lesson memo.
    pub memo: Option<String>,
    /// Lesson to delete first, freeing its seat.
    pub evict: Option<LessonId>,
}

impl ManualPlacement {
    /// Creates a request.
    pub fn new(
        period: impl Into<PeriodId>,
        student: impl Into<StudentId>,
        subject: impl Into<SubjectId>,
        slot: SlotKey,
    ) -> Self {
        Self {
            period: period.into(),
            student: student.into(),
            subject: subject.into(),
            slot,
            memo: None,
            evict: None,
        }
    }

    /// Sets the memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Deletes `lesson` before placing.
    pub fn evicting(mut self, lesson: LessonId) -> Self {
        self.evict = Some(lesson);
        self
    }
}

/// Operator actions over a [`PlanStore`].
///
/// Use the same capacity as the engine's [`EngineConfig`](crate::config::EngineConfig);
/// [`PlannerService::operator`](crate::service::PlannerService::operator) does this.
#[derive(Debug)]
pub struct LessonOperator<S> {
    store: Arc<S>,
    capacity: usize,
}

impl<S: PlanStore> LessonOperator<S> {
    /// Creates an operator over a shared store with the default capacity.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Sets the container capacity enforced on commit.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Container capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Places a `locked` lesson by hand.
    ///
    /// The (period, student, subject) triple must match a quota; the new
    /// lesson is bound to it. The slot's container is created if needed.
    /// An evicted lesson that no longer exists is ignored.
    pub fn place_locked(&self, request: ManualPlacement) -> PlannerResult<CommitReceipt> {
        let quota = self
            .store
            .quotas(request.period)?
            .into_iter()
            .find(|q| q.student == request.student && q.subject == request.subject)
            .ok_or(PlannerError::QuotaNotFound {
                period: request.period,
                student: request.student,
                subject: request.subject,
            })?;

        let mut changes = self.change_set();
        self.stage_eviction(&mut changes, request.evict)?;
        let memo = request.memo.unwrap_or_else(|| MANUAL_MEMO.to_string());
        changes.push(Change::AddLesson {
            slot: request.slot,
            lesson: NewLesson::locked(request.student, request.subject, Some(quota.id))
                .with_memo(memo),
        });

        let receipt = self.store.apply(changes)?;
        info!(
            "placed locked lesson for student {} subject {} at teacher {} {} slot {}",
            request.student,
            request.subject,
            request.slot.teacher,
            request.slot.date,
            request.slot.time_slot
        );
        Ok(receipt)
    }

    /// Moves a lesson to another slot and locks it.
    ///
    /// `evict` names a lesson to delete first. The source container is
    /// removed if the move leaves it empty.
    pub fn move_lesson(
        &self,
        lesson: LessonId,
        to: SlotKey,
        evict: Option<LessonId>,
    ) -> PlannerResult<CommitReceipt> {
        self.require(lesson)?;
        let mut changes = self.change_set();
        self.stage_eviction(&mut changes, evict.filter(|e| *e != lesson))?;
        changes.push(Change::MoveLesson { lesson, to });
        changes.push(Change::SetStatus {
            lesson,
            status: LessonStatus::Locked,
        });

        let receipt = self.store.apply(changes)?;
        info!(
            "moved lesson {lesson} to teacher {} {} slot {}",
            to.teacher, to.date, to.time_slot
        );
        Ok(receipt)
    }

    /// Flips a lesson between `auto` and `locked`, returning the new status.
    pub fn toggle_lock(&self, lesson: LessonId) -> PlannerResult<LessonStatus> {
        let current = self.require(lesson)?;
        let status = current.toggled();
        self.store
            .apply(self.change_set().with(Change::SetStatus { lesson, status }))?;
        info!("lesson {lesson} is now {status:?}");
        Ok(status)
    }

    /// Deletes a lesson; its container goes too if left empty.
    pub fn delete_lesson(&self, lesson: LessonId) -> PlannerResult<CommitReceipt> {
        self.require(lesson)?;
        let receipt = self
            .store
            .apply(self.change_set().with(Change::RemoveLesson(lesson)))?;
        info!("deleted lesson {lesson}");
        Ok(receipt)
    }

    fn change_set(&self) -> ChangeSet {
        ChangeSet::new().with_seat_limit(self.capacity)
    }

    fn require(&self, lesson: LessonId) -> PlannerResult<LessonStatus> {
        self.store
            .find_lesson(lesson)?
            .map(|(_, record)| record.lesson.status)
            .ok_or(PlannerError::LessonNotFound(lesson))
    }

    fn stage_eviction(&self, changes: &mut ChangeSet, evict: Option<LessonId>) -> PlannerResult<()> {
        if let Some(id) = evict {
            if self.store.find_lesson(id)?.is_some() {
                changes.push(Change::RemoveLesson(id));
            }
        }
        Ok(())
    }
}
