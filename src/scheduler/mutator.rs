//! Assignment mutator.

use crate::models::{DemandUnit, NewLesson, SlotKey};
use crate::store::Change;

use super::Workspace;

/// Seats `demand` at `slot` in the workspace.
///
/// Stages an `auto` lesson bound to the demand's quota, takes the seat,
/// marks the student busy and records the date in the run history. Later
/// searches in the same run see all of it.
///
/// Returns `false` and stages nothing if the slot's container is already
/// full.
pub fn assign(workspace: &mut Workspace, demand: &DemandUnit, slot: SlotKey) -> bool {
    if !workspace.claim_seat(slot, demand.student, demand.subject, demand.quota) {
        return false;
    }
    workspace.stage(Change::AddLesson {
        slot,
        lesson: NewLesson::auto(demand.student, demand.subject, demand.quota),
    });
    true
}
