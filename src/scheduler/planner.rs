//! Greedy lesson planner.
//!
//! # Algorithm
//!
//! 1. Load the period, directory, availability, quotas and stored lessons.
//! 2. Stage cleanup: drop every `auto` lesson in the window and every
//!    container left empty. Locked lessons stay and keep their seats.
//! 3. Build demand units from what each quota still owes.
//! 4. Order the units (priority then shuffle, or shuffle).
//! 5. For each unit, search the best feasible slot and seat it.
//! 6. Commit cleanup and placements as one change set.
//!
//! Nothing reaches the store before step 6, so a failed or aborted run
//! leaves it untouched.
//!
//! # Complexity
//! O(d × s × (f + r)), d = demand units, s = available slots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::cleanup::{plan_cleanup, CleanupReport};
use super::demand::build_demands;
use super::mutator::assign;
use super::search::find_best_slot;
use super::summary::{RunStatus, RunSummary};
use super::Workspace;
use crate::config::{EngineConfig, RunOptions};
use crate::dispatching::DemandOrdering;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{AvailabilityIndex, PeriodId, PlanningPeriod};
use crate::scoring::{ScoringContext, SlotScorer};
use crate::store::PlanStore;
use crate::validation::validate_input;

/// Demands between two progress log lines.
const PROGRESS_EVERY: usize = 10;

/// Greedy planner over a [`PlanStore`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use u_lesson::config::{EngineConfig, RunOptions};
/// use u_lesson::models::{AvailabilitySlot, Directory, PlanningPeriod, Quota, Student, Subject, SubjectTier, Teacher};
/// use u_lesson::scheduler::LessonPlanner;
/// use u_lesson::store::InMemoryStore;
///
/// let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let store = Arc::new(InMemoryStore::new());
/// store.add_period(PlanningPeriod::new(1, day, day).unwrap());
/// store.set_directory(
///     Directory::new()
///         .with_teacher(Teacher::new(1))
///         .with_student(Student::new(10))
///         .with_subject(Subject::new(5, SubjectTier::Middle)),
/// );
/// store.add_availability([AvailabilitySlot::available(1, day, 1)]);
/// store.add_quota(Quota::new(1, 1, 10, 5, 1));
///
/// let planner = LessonPlanner::new(store, EngineConfig::default());
/// let summary = planner.run(1.into(), &RunOptions::new().with_seed(42)).unwrap();
/// assert_eq!(summary.placed, 1);
/// ```
#[derive(Debug)]
pub struct LessonPlanner<S> {
    store: Arc<S>,
    config: EngineConfig,
}

impl<S> Clone for LessonPlanner<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: PlanStore> LessonPlanner<S> {
    /// Creates a planner.
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the planner for a period.
    ///
    /// The demand shuffle is seeded from `options.seed`, or from the OS
    /// when no seed is given.
    pub fn run(&self, period: PeriodId, options: &RunOptions) -> PlannerResult<RunSummary> {
        self.run_abortable(period, options, &AtomicBool::new(false))
    }

    /// Like [`LessonPlanner::run`], checking `abort` before every demand and
    /// before the commit.
    pub fn run_abortable(
        &self,
        period: PeriodId,
        options: &RunOptions,
        abort: &AtomicBool,
    ) -> PlannerResult<RunSummary> {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.execute(period, options, &mut rng, abort)
    }

    /// Runs the planner with a caller-supplied random source.
    ///
    /// `options.seed` is ignored.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        period: PeriodId,
        options: &RunOptions,
        rng: &mut R,
    ) -> PlannerResult<RunSummary> {
        self.execute(period, options, rng, &AtomicBool::new(false))
    }

    /// Removes every `auto` lesson and empty container in the period.
    ///
    /// Commits on its own; running it twice equals running it once.
    pub fn cleanup(&self, period: PeriodId) -> PlannerResult<CleanupReport> {
        let period = self.load_period(period)?;
        let containers = self
            .store
            .containers_between(period.start_date, period.end_date)?;
        let plan = plan_cleanup(&containers);
        if plan.changes.is_empty() {
            return Ok(CleanupReport::default());
        }
        let receipt = self
            .store
            .apply(plan.changes.with_seat_limit(self.config.capacity))?;
        let report = CleanupReport {
            removed_lessons: receipt.removed_lessons.len(),
            removed_containers: receipt.removed_containers.len(),
        };
        info!(
            "cleanup of period {}: removed {} auto lessons, {} containers",
            period.id, report.removed_lessons, report.removed_containers
        );
        Ok(report)
    }

    fn execute<R: Rng + ?Sized>(
        &self,
        period_id: PeriodId,
        options: &RunOptions,
        rng: &mut R,
        abort: &AtomicBool,
    ) -> PlannerResult<RunSummary> {
        let period = self.load_period(period_id)?;
        let (start, end) = (period.start_date, period.end_date);

        let directory = self.store.directory()?;
        let slots = self.store.availability(start, end)?;
        let quotas = self.store.quotas(period.id)?;
        let containers = self.store.containers_between(start, end)?;
        let outside = self.store.lessons_outside(start, end)?;

        validate_input(&directory, &quotas, &slots).map_err(PlannerError::InvalidInput)?;

        let scorer = SlotScorer::from_options(&self.config, options);
        let index = AvailabilityIndex::build(&period, &slots);
        info!(
            "plan period {} [{} .. {}, {} days]: {} slots, {} quotas, rules {:?}",
            period.id,
            start,
            end,
            period.day_count(),
            index.len(),
            quotas.len(),
            scorer.rule_names()
        );

        let mut workspace = Workspace::new(self.config.capacity);
        let cleanup = plan_cleanup(&containers);
        for (slot, lesson) in &cleanup.survivors {
            workspace.seat_existing(*slot, lesson);
        }
        for record in &outside {
            workspace.observe_outside(record);
        }
        workspace.stage_all(cleanup.changes);
        debug!(
            "staged cleanup: {} auto lessons, {} containers",
            cleanup.report.removed_lessons, cleanup.report.removed_containers
        );

        let mut demands = build_demands(&quotas, workspace.fulfilled());
        let ordering = DemandOrdering::for_demands(&demands);
        ordering.apply(&mut demands, rng);
        debug!("{} demand units, ordering {}", demands.len(), ordering.label());

        let considered = demands.len();
        let mut placed = 0;
        let mut unplaced_demands = Vec::new();

        for (i, demand) in demands.into_iter().enumerate() {
            if abort.load(Ordering::SeqCst) {
                info!("run for period {} aborted after {} of {} demands", period.id, i, considered);
                return Err(PlannerError::Aborted(period.id));
            }

            let choice = {
                let ctx = ScoringContext {
                    directory: &directory,
                    history: workspace.history(),
                    occupancy: &workspace,
                    config: &self.config,
                };
                find_best_slot(&demand, &index, &scorer, &ctx)
            };

            match choice {
                Some(choice) if assign(&mut workspace, &demand, choice.slot) => placed += 1,
                _ => {
                    debug!(
                        "no slot for student {} subject {} (quota {})",
                        demand.student, demand.subject, demand.quota
                    );
                    unplaced_demands.push(demand);
                }
            }

            if (i + 1) % PROGRESS_EVERY == 0 {
                debug!("progress: {}/{} demands, {} placed", i + 1, considered, placed);
            }
        }

        if abort.load(Ordering::SeqCst) {
            return Err(PlannerError::Aborted(period.id));
        }

        let changes = workspace.into_changes();
        let receipt = if changes.is_empty() {
            Default::default()
        } else {
            self.store.apply(changes)?
        };

        let summary = RunSummary {
            period: period.id,
            status: RunStatus::Completed,
            ordering,
            considered,
            placed,
            unplaced: unplaced_demands.len(),
            unplaced_demands,
            removed_lessons: receipt.removed_lessons.len(),
            removed_containers: receipt.removed_containers.len(),
            created_containers: receipt.created_containers.len(),
        };
        info!(
            "period {} done: placed {}/{} ({:.1}%), unplaced {}, cleaned {} lessons",
            summary.period,
            summary.placed,
            summary.considered,
            summary.fill_rate() * 100.0,
            summary.unplaced,
            summary.removed_lessons
        );
        Ok(summary)
    }

    fn load_period(&self, id: PeriodId) -> PlannerResult<PlanningPeriod> {
        self.store
            .period(id)?
            .ok_or(PlannerError::PeriodNotFound(id))
    }
}
