//! Cleanup of engine-placed lessons.
//!
//! Before a re-run, every `auto` lesson in the window is discarded so the
//! engine can place from scratch around what operators locked. Containers
//! that end up empty, or were empty to begin with, go too.

use serde::{Deserialize, Serialize};

use crate::models::{AssignmentContainer, PlacedLesson, SlotKey};
use crate::store::{Change, ChangeSet};

/// Counts from one cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// `auto` lessons removed.
    pub removed_lessons: usize,
    /// Containers removed.
    pub removed_containers: usize,
}

/// Staged cleanup of a window.
#[derive(Debug, Clone, Default)]
pub struct CleanupPlan {
    /// Removals, lessons before containers.
    pub changes: ChangeSet,
    /// Lessons that stay, with their slot.
    pub survivors: Vec<(SlotKey, PlacedLesson)>,
    /// What the removals amount to.
    pub report: CleanupReport,
}

/// Stages the cleanup of `containers` (all assumed inside the window).
///
/// Locked lessons are never staged for removal. Removals are staged as
/// [`Change::RemoveAutoLesson`], so a lesson locked before the commit makes
/// the store reject the set instead of deleting it.
pub fn plan_cleanup(containers: &[AssignmentContainer]) -> CleanupPlan {
    let mut plan = CleanupPlan::default();
    let mut emptied = Vec::new();

    for container in containers {
        let mut kept = 0;
        for lesson in &container.lessons {
            if lesson.is_locked() {
                plan.survivors.push((container.key, lesson.clone()));
                kept += 1;
            } else {
                plan.changes.push(Change::RemoveAutoLesson(lesson.id));
                plan.report.removed_lessons += 1;
            }
        }
        if kept == 0 {
            emptied.push(container.id);
        }
    }

    for id in emptied {
        plan.changes.push(Change::RemoveContainer(id));
        plan.report.removed_containers += 1;
    }
    plan
}
