//! Concurrent access to the planner.
//!
//! A run is single-threaded, but several callers may ask for runs at once.
//! [`PlannerService`] serializes them per period: while a period is being
//! planned, any other run or cleanup of that period is refused with
//! [`PlannerError::RunInProgress`]. Different periods proceed in parallel.
//!
//! [`PlannerService::spawn`] executes a run on a worker thread and returns a
//! [`RunHandle`] with a cooperative [`AbortHandle`].

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{info, warn};
use parking_lot::Mutex;

use crate::config::{EngineConfig, RunOptions};
use crate::error::{PlannerError, PlannerResult};
use crate::models::PeriodId;
use crate::operator::LessonOperator;
use crate::scheduler::{CleanupReport, LessonPlanner, RunSummary};
use crate::store::PlanStore;

/// Cooperative abort flag shared with a running worker.
///
/// The run checks it before each demand and before committing; an aborted
/// run commits nothing.
#[derive(Clone, Default, Debug)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the run to stop.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether an abort was requested.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl AsRef<AtomicBool> for AbortHandle {
    fn as_ref(&self) -> &AtomicBool {
        &self.0
    }
}

type ActiveSet = Arc<Mutex<HashSet<PeriodId>>>;

/// Marks a period busy until dropped.
struct PeriodGuard {
    active: ActiveSet,
    period: PeriodId,
}

impl PeriodGuard {
    fn acquire(active: &ActiveSet, period: PeriodId) -> PlannerResult<Self> {
        if !active.lock().insert(period) {
            warn!("refused run for period {period}: already in progress");
            return Err(PlannerError::RunInProgress(period));
        }
        Ok(Self {
            active: Arc::clone(active),
            period,
        })
    }
}

impl Drop for PeriodGuard {
    fn drop(&mut self) {
        self.active.lock().remove(&self.period);
    }
}

/// A run executing on a worker thread.
pub struct RunHandle {
    period: PeriodId,
    abort: AbortHandle,
    worker: JoinHandle<PlannerResult<RunSummary>>,
}

impl RunHandle {
    /// Period being planned.
    pub fn period(&self) -> PeriodId {
        self.period
    }

    /// A clone of the abort flag.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Requests the run to stop.
    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Whether the worker has finished.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the run and returns its outcome.
    pub fn join(self) -> PlannerResult<RunSummary> {
        match self.worker.join() {
            Ok(result) => result,
            Err(_) => Err(PlannerError::WorkerPanicked(self.period)),
        }
    }
}

impl fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHandle")
            .field("period", &self.period)
            .field("aborted", &self.abort.is_aborted())
            .field("finished", &self.worker.is_finished())
            .finish()
    }
}

/// Planner front door with per-period exclusion.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use u_lesson::config::EngineConfig;
/// use u_lesson::service::PlannerService;
/// use u_lesson::store::InMemoryStore;
///
/// let service = PlannerService::new(Arc::new(InMemoryStore::new()), EngineConfig::default());
/// assert!(!service.is_running(1.into()));
/// ```
pub struct PlannerService<S> {
    planner: LessonPlanner<S>,
    active: ActiveSet,
}

impl<S: PlanStore + 'static> PlannerService<S> {
    /// Creates a service over a shared store.
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            planner: LessonPlanner::new(store, config),
            active: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// The wrapped planner.
    pub fn planner(&self) -> &LessonPlanner<S> {
        &self.planner
    }

    /// Operator actions over the same store, with the engine's capacity.
    pub fn operator(&self) -> LessonOperator<S> {
        LessonOperator::new(Arc::clone(self.planner.store()))
            .with_capacity(self.planner.config().capacity)
    }

    /// Whether a run or cleanup currently holds the period.
    pub fn is_running(&self, period: PeriodId) -> bool {
        self.active.lock().contains(&period)
    }

    /// Runs on the calling thread.
    pub fn run(&self, period: PeriodId, options: &RunOptions) -> PlannerResult<RunSummary> {
        let _guard = PeriodGuard::acquire(&self.active, period)?;
        self.planner.run(period, options)
    }

    /// Cleans the period on the calling thread.
    pub fn cleanup(&self, period: PeriodId) -> PlannerResult<CleanupReport> {
        let _guard = PeriodGuard::acquire(&self.active, period)?;
        self.planner.cleanup(period)
    }

    /// Starts a run on a worker thread.
    ///
    /// The period is claimed before the thread starts, so a second call for
    /// the same period fails immediately with `RunInProgress`.
    pub fn spawn(&self, period: PeriodId, options: RunOptions) -> PlannerResult<RunHandle> {
        let guard = PeriodGuard::acquire(&self.active, period)?;
        let planner = self.planner.clone();
        let abort = AbortHandle::new();
        let flag = abort.clone();

        let worker = thread::spawn(move || {
            let _guard = guard;
            let result = planner.run_abortable(period, &options, flag.as_ref());
            if let Err(e) = &result {
                info!("worker for period {period} finished with error: {e}");
            }
            result
        });

        Ok(RunHandle {
            period,
            abort,
            worker,
        })
    }
}

impl<S> fmt::Debug for PlannerService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerService")
            .field("active", &*self.active.lock())
            .finish()
    }
}
