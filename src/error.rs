//! Error types.
//!
//! Infeasible demands are not errors; they are reported in the run summary.
//! Everything here is structural: bad input, storage trouble, or a run that
//! could not start or finish.

use chrono::NaiveDate;

use crate::models::{LessonId, PeriodId, StudentId, SubjectId};
use crate::validation::ValidationError;

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to the caller of a run or an operator action.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The requested planning period does not exist.
    #[error("planning period {0} not found")]
    PeriodNotFound(PeriodId),

    /// The period window is inverted.
    #[error("planning period {id} is invalid: start {start} is after end {end}")]
    InvalidPeriod {
        id: PeriodId,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// A run option could not be understood.
    #[error("invalid option `{key}`: {message}")]
    InvalidOption { key: String, message: String },

    /// Directory, quota or availability data failed validation.
    #[error("input validation failed: {}", join_errors(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A manual placement has no matching quota.
    #[error("no quota for student {student}, subject {subject} in period {period}")]
    QuotaNotFound {
        period: PeriodId,
        student: StudentId,
        subject: SubjectId,
    },

    /// The lesson does not exist.
    #[error("lesson {0} not found")]
    LessonNotFound(LessonId),

    /// Another run holds the period.
    #[error("a run for period {0} is already in progress")]
    RunInProgress(PeriodId),

    /// The run was aborted; nothing was committed.
    #[error("run for period {0} was aborted")]
    Aborted(PeriodId),

    /// The worker thread executing the run panicked.
    #[error("worker for period {0} panicked")]
    WorkerPanicked(PeriodId),

    /// The store failed; nothing was committed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a [`crate::store::PlanStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the change set as a whole.
    #[error("commit rejected: {0}")]
    CommitRejected(String),

    /// A change referenced a record that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Applying the change set would break a placement invariant.
    #[error("placement invariant violated: {}", join_errors(.0))]
    InvariantViolated(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
