//! Directory models: teachers, students, subjects.
//!
//! The directory is read-only input to a run. Teachers carry the subjects
//! they are qualified for; students carry the teachers they prefer.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::{StudentId, SubjectId, TeacherId};

/// School level a subject is taught at.
///
/// Ordered from lowest to highest, so a gating threshold can be expressed
/// as "this tier and above".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SubjectTier {
    /// Elementary school.
    Elementary,
    /// Middle school (the default level for a new subject).
    #[default]
    Middle,
    /// High school.
    High,
}

/// A teachable subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: SubjectId,
    /// Human-readable name.
    pub name: String,
    /// Level the subject belongs to.
    pub tier: SubjectTier,
}

/// A teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: TeacherId,
    /// Human-readable name.
    pub name: String,
    /// Subjects this teacher is qualified to teach.
    pub subjects: BTreeSet<SubjectId>,
}

/// A student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: StudentId,
    /// Human-readable name.
    pub name: String,
    /// Teachers this student prefers to be taught by.
    pub preferred_teachers: BTreeSet<TeacherId>,
}

impl Subject {
    /// Creates a subject at the given tier.
    pub fn new(id: impl Into<SubjectId>, tier: SubjectTier) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            tier,
        }
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Teacher {
    /// Creates a teacher with no qualifications.
    pub fn new(id: impl Into<TeacherId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            subjects: BTreeSet::new(),
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a subject qualification.
    pub fn with_subject(mut self, subject: impl Into<SubjectId>) -> Self {
        self.subjects.insert(subject.into());
        self
    }

    /// Whether this teacher is qualified for a subject.
    pub fn teaches(&self, subject: SubjectId) -> bool {
        self.subjects.contains(&subject)
    }
}

impl Student {
    /// Creates a student with no preferences.
    pub fn new(id: impl Into<StudentId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            preferred_teachers: BTreeSet::new(),
        }
    }

    /// Sets the student name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a preferred teacher.
    pub fn with_preferred(mut self, teacher: impl Into<TeacherId>) -> Self {
        self.preferred_teachers.insert(teacher.into());
        self
    }
}

/// Read-only lookup over teachers, students and subjects.
///
/// Built once per run. Unknown ids resolve to "not qualified" /
/// "not preferred" rather than failing; reference integrity is checked
/// up front by [`crate::validation::validate_input`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    teachers: HashMap<TeacherId, Teacher>,
    students: HashMap<StudentId, Student>,
    subjects: HashMap<SubjectId, Subject>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.insert(teacher.id, teacher);
        self
    }

    /// Adds a student.
    pub fn with_student(mut self, student: Student) -> Self {
        self.students.insert(student.id, student);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.insert(subject.id, subject);
        self
    }

    /// Looks up a teacher.
    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.get(&id)
    }

    /// Looks up a student.
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    /// Looks up a subject.
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    /// Tier of a subject. Unknown subjects fall back to the default tier.
    pub fn subject_tier(&self, id: SubjectId) -> SubjectTier {
        self.subjects.get(&id).map(|s| s.tier).unwrap_or_default()
    }

    /// Whether `teacher` is qualified for `subject`.
    pub fn can_teach(&self, teacher: TeacherId, subject: SubjectId) -> bool {
        self.teachers
            .get(&teacher)
            .is_some_and(|t| t.teaches(subject))
    }

    /// Whether `student` lists `teacher` as preferred.
    pub fn prefers(&self, student: StudentId, teacher: TeacherId) -> bool {
        self.students
            .get(&student)
            .is_some_and(|s| s.preferred_teachers.contains(&teacher))
    }

    /// All teachers.
    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.values()
    }

    /// All students.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// All subjects.
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Directory {
        Directory::new()
            .with_subject(Subject::new(1, SubjectTier::Middle).with_name("Math"))
            .with_subject(Subject::new(2, SubjectTier::High).with_name("Physics"))
            .with_teacher(Teacher::new(10).with_name("Sato").with_subject(2))
            .with_teacher(Teacher::new(11).with_name("Kato"))
            .with_student(
                Student::new(100)
                    .with_name("Mori")
                    .with_preferred(11),
            )
    }

    #[test]
    fn test_directory_lookups() {
        let dir = sample();
        assert!(dir.can_teach(TeacherId(10), SubjectId(2)));
        assert!(!dir.can_teach(TeacherId(11), SubjectId(2)));
        assert!(!dir.can_teach(TeacherId(99), SubjectId(2)));
        assert!(dir.prefers(StudentId(100), TeacherId(11)));
        assert!(!dir.prefers(StudentId(100), TeacherId(10)));
        assert_eq!(dir.teacher(TeacherId(11)).unwrap().name, "Kato");
    }

    #[test]
    fn test_subject_tier_lookup() {
        let dir = sample();
        assert_eq!(dir.subject_tier(SubjectId(2)), SubjectTier::High);
        assert_eq!(dir.subject_tier(SubjectId(1)), SubjectTier::Middle);
        assert_eq!(dir.subject_tier(SubjectId(42)), SubjectTier::Middle);
        assert_eq!(dir.subject(SubjectId(1)).unwrap().name, "Math");
    }

    #[test]
    fn test_tier_ordering() {
        assert!(SubjectTier::Elementary < SubjectTier::Middle);
        assert!(SubjectTier::Middle < SubjectTier::High);
    }
}
