//! Quota and demand models.
//!
//! A quota says "student S is owed N lessons of subject X". Quotas come
//! either from per-period requests (which carry a priority) or from
//! contracts (which do not). The demand builder turns the unfulfilled part
//! of each quota into individual [`DemandUnit`]s.

use serde::{Deserialize, Serialize};

use super::{PeriodId, QuotaId, StudentId, SubjectId};

/// Request priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Placed first.
    High,
    /// Placed after `High`.
    Medium,
    /// Placed after `Medium`.
    Low,
}

impl Priority {
    /// Sort rank (lower = placed earlier).
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// A lesson quota owed to a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quota {
    /// Unique quota identifier. Placed lessons reference it.
    pub id: QuotaId,
    /// Period the quota was requested for.
    pub period: PeriodId,
    /// Student owed the lessons.
    pub student: StudentId,
    /// Subject of the lessons.
    pub subject: SubjectId,
    /// Number of lessons owed.
    pub count: u32,
    /// Request priority; `None` for contract quotas.
    pub priority: Option<Priority>,
}

impl Quota {
    /// Creates a contract quota (no priority).
    pub fn new(
        id: impl Into<QuotaId>,
        period: impl Into<PeriodId>,
        student: impl Into<StudentId>,
        subject: impl Into<SubjectId>,
        count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            period: period.into(),
            student: student.into(),
            subject: subject.into(),
            count,
            priority: None,
        }
    }

    /// Sets a request priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// One still-owed lesson occurrence.
///
/// Units built from the same quota are interchangeable. They are transient:
/// a unit only becomes durable as a placed lesson referencing its quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandUnit {
    /// Originating quota.
    pub quota: QuotaId,
    /// Student owed the lesson.
    pub student: StudentId,
    /// Subject of the lesson.
    pub subject: SubjectId,
    /// Priority inherited from the quota.
    pub priority: Option<Priority>,
}

impl DemandUnit {
    /// Creates a unit for a quota.
    pub fn from_quota(quota: &Quota) -> Self {
        Self {
            quota: quota.id,
            student: quota.student,
            subject: quota.subject,
            priority: quota.priority,
        }
    }
}
