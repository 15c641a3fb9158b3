//! Lesson planning domain models.
//!
//! Provides the data types a run reads and writes. The surrounding service
//! owns persistence; these types are what crosses the [`crate::store`] seam.
//!
//! # Domain Mappings
//!
//! | u-lesson | Meaning |
//! |----------|---------|
//! | Quota | Lessons owed to a student for one subject |
//! | DemandUnit | One still-owed lesson |
//! | SlotKey | Teacher × date × time-slot |
//! | AssignmentContainer | Lessons sharing one slot (up to capacity) |
//! | PlacedLesson | A student seated in a container |

mod availability;
mod demand;
mod directory;
mod ids;
mod period;
mod placement;

pub use availability::{AvailabilityIndex, AvailabilitySlot, SlotKey};
pub use demand::{DemandUnit, Priority, Quota};
pub use directory::{Directory, Student, Subject, SubjectTier, Teacher};
pub use ids::{
    ContainerId, LessonId, PeriodId, QuotaId, StudentId, SubjectId, TeacherId, TimeSlotId,
};
pub use period::{PeriodStatus, PlanningPeriod};
pub use placement::{
    AssignmentContainer, LessonRecord, LessonStatus, NewLesson, PlacedLesson,
};
