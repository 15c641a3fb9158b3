//! Input and placement validation.
//!
//! Two families of checks:
//! - **Input integrity**, run before planning: duplicate quota IDs and
//!   references to teachers, students or subjects the directory lacks.
//! - **Placement invariants**, run on every store commit: container
//!   capacity, student double-booking, empty containers, duplicate slots.
//!
//! Both collect every problem found instead of stopping at the first one.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;

use crate::models::{
    AssignmentContainer, AvailabilitySlot, Directory, Quota, StudentId, TimeSlotId,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A record references an entity that doesn't exist.
    UnknownReference,
    /// A container holds more lessons than its capacity.
    CapacityExceeded,
    /// A student sits in two containers at the same date and time-slot.
    DoubleBooking,
    /// A container holds no lessons.
    EmptyContainer,
    /// Two containers occupy the same slot.
    DuplicateSlot,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the inputs of a planning run.
///
/// Checks:
/// 1. No duplicate quota IDs
/// 2. Quotas reference known students and subjects
/// 3. Availability slots reference known teachers
/// 4. Teacher qualifications reference known subjects
/// 5. Student preferences reference known teachers
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    directory: &Directory,
    quotas: &[Quota],
    slots: &[AvailabilitySlot],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut quota_ids = HashSet::new();
    for q in quotas {
        if !quota_ids.insert(q.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate quota ID: {}", q.id),
            ));
        }
        if directory.student(q.student).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Quota {} references unknown student {}", q.id, q.student),
            ));
        }
        if directory.subject(q.subject).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Quota {} references unknown subject {}", q.id, q.subject),
            ));
        }
    }

    // One report per unknown teacher, not per slot
    let mut reported = HashSet::new();
    for s in slots {
        let teacher = s.key.teacher;
        if directory.teacher(teacher).is_none() && reported.insert(teacher) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Availability references unknown teacher {teacher}"),
            ));
        }
    }

    for t in directory.teachers() {
        for subject in &t.subjects {
            if directory.subject(*subject).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    format!("Teacher {} is qualified for unknown subject {}", t.id, subject),
                ));
            }
        }
    }

    for s in directory.students() {
        for teacher in &s.preferred_teachers {
            if directory.teacher(*teacher).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    format!("Student {} prefers unknown teacher {}", s.id, teacher),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates committed placements.
///
/// Checks:
/// 1. No container holds more than `capacity` lessons
/// 2. No container is empty
/// 3. No two containers share a slot
/// 4. No student sits twice at the same (date, time-slot)
/// 5. No duplicate lesson IDs
pub fn validate_placements<'a, I>(containers: I, capacity: usize) -> ValidationResult
where
    I: IntoIterator<Item = &'a AssignmentContainer>,
{
    let mut errors = Vec::new();
    let mut slots = HashSet::new();
    let mut lesson_ids = HashSet::new();
    let mut seats: HashMap<(StudentId, NaiveDate, TimeSlotId), usize> = HashMap::new();

    for c in containers {
        if c.len() > capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::CapacityExceeded,
                format!(
                    "Container {} holds {} lessons (capacity {})",
                    c.id,
                    c.len(),
                    capacity
                ),
            ));
        }
        if c.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyContainer,
                format!("Container {} holds no lessons", c.id),
            ));
        }
        if !slots.insert(c.key) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSlot,
                format!(
                    "Container {} duplicates slot teacher {} on {} slot {}",
                    c.id, c.key.teacher, c.key.date, c.key.time_slot
                ),
            ));
        }
        for lesson in &c.lessons {
            if !lesson_ids.insert(lesson.id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate lesson ID: {}", lesson.id),
                ));
            }
            *seats
                .entry((lesson.student, c.key.date, c.key.time_slot))
                .or_insert(0) += 1;
        }
    }

    let mut doubled: Vec<_> = seats.into_iter().filter(|(_, n)| *n > 1).collect();
    doubled.sort_by_key(|((student, date, slot), _)| (*date, *slot, *student));
    for ((student, date, slot), n) in doubled {
        errors.push(ValidationError::new(
            ValidationErrorKind::DoubleBooking,
            format!("Student {student} is booked {n} times on {date} slot {slot}"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
