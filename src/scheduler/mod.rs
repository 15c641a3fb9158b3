//! Greedy lesson placement.
//!
//! [`LessonPlanner`] drives a run: cleanup, demand building, ordering,
//! slot search and seating, then one atomic commit.
//!
//! # Algorithm
//!
//! Constructive greedy: each demand unit takes the best slot still open when
//! its turn comes. There is no backtracking; a unit that finds no feasible
//! slot is reported as unplaced.
//!
//! # Metrics
//!
//! [`RunSummary`] reports placed/unplaced counts, the fill rate and the
//! cleanup and container counts of the commit.

mod cleanup;
mod demand;
mod mutator;
mod planner;
mod search;
mod summary;
mod workspace;

pub use cleanup::{plan_cleanup, CleanupPlan, CleanupReport};
pub use demand::build_demands;
pub use mutator::assign;
pub use planner::LessonPlanner;
pub use search::{find_best_slot, SlotChoice};
pub use summary::{RunStatus, RunSummary};
pub use workspace::Workspace;
