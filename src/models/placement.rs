//! Placement models: containers and the lessons inside them.
//!
//! An [`AssignmentContainer`] is the unit of placement for one slot and
//! holds up to `capacity` [`PlacedLesson`]s. Lessons are either `auto`
//! (engine output, replaced on every run) or `locked` (operator decisions
//! the engine never touches).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ContainerId, LessonId, QuotaId, SlotKey, StudentId, SubjectId};

/// Ownership tag of a placed lesson.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    /// Produced by the engine; freely replaced on the next run.
    #[default]
    Auto,
    /// Produced by an operator; never deleted or moved by the engine.
    Locked,
}

impl LessonStatus {
    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            LessonStatus::Auto => LessonStatus::Locked,
            LessonStatus::Locked => LessonStatus::Auto,
        }
    }
}

/// One committed occupancy of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedLesson {
    /// Lesson identifier.
    pub id: LessonId,
    /// Student taking the lesson.
    pub student: StudentId,
    /// Subject taught.
    pub subject: SubjectId,
    /// Quota this lesson fulfils, if any.
    pub quota: Option<QuotaId>,
    /// Ownership tag.
    pub status: LessonStatus,
    /// Free-form operator note.
    pub memo: Option<String>,
}

/// A lesson that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLesson {
    /// Student taking the lesson.
    pub student: StudentId,
    /// Subject taught.
    pub subject: SubjectId,
    /// Quota this lesson fulfils, if any.
    pub quota: Option<QuotaId>,
    /// Ownership tag.
    pub status: LessonStatus,
    /// Free-form operator note.
    pub memo: Option<String>,
}

impl NewLesson {
    /// An engine-placed lesson bound to a quota.
    pub fn auto(student: StudentId, subject: SubjectId, quota: QuotaId) -> Self {
        Self {
            student,
            subject,
            quota: Some(quota),
            status: LessonStatus::Auto,
            memo: None,
        }
    }

    /// An operator-placed lesson.
    pub fn locked(student: StudentId, subject: SubjectId, quota: Option<QuotaId>) -> Self {
        Self {
            student,
            subject,
            quota,
            status: LessonStatus::Locked,
            memo: None,
        }
    }

    /// Attaches a memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Gives the lesson its id.
    pub fn into_placed(self, id: LessonId) -> PlacedLesson {
        PlacedLesson {
            id,
            student: self.student,
            subject: self.subject,
            quota: self.quota,
            status: self.status,
            memo: self.memo,
        }
    }
}

impl PlacedLesson {
    /// Whether an operator locked this lesson.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.status == LessonStatus::Locked
    }
}

/// The placed lessons of one (teacher, date, time-slot) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentContainer {
    /// Container identifier.
    pub id: ContainerId,
    /// Slot the container occupies.
    pub key: SlotKey,
    /// Lessons in placement order.
    pub lessons: Vec<PlacedLesson>,
}

impl AssignmentContainer {
    /// Creates an empty container.
    pub fn new(id: impl Into<ContainerId>, key: SlotKey) -> Self {
        Self {
            id: id.into(),
            key,
            lessons: Vec::new(),
        }
    }

    /// Adds a lesson.
    pub fn with_lesson(mut self, lesson: PlacedLesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Date of the slot.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.key.date
    }

    /// Number of lessons.
    #[inline]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Whether the container holds no lessons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Whether a student already sits in this container.
    pub fn has_student(&self, student: StudentId) -> bool {
        self.lessons.iter().any(|l| l.student == student)
    }

    /// Finds a lesson by id.
    pub fn lesson(&self, id: LessonId) -> Option<&PlacedLesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Number of locked lessons.
    pub fn locked_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.is_locked()).count()
    }
}

/// Flat view of one lesson with its slot, used for history queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    /// Slot the lesson sits in.
    pub key: SlotKey,
    /// The lesson.
    pub lesson: PlacedLesson,
}
