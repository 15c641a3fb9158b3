//! Slot scorer: hard filters followed by an additive rule sum.

use std::sync::Arc;

use super::{
    CapacityLimit, HardFilter, PreferredTeacher, Score, ScoringContext, SoftRule,
    StudentNonOverlap, SubjectGate, SubjectInterval,
};
use crate::config::{EngineConfig, RunOptions};
use crate::models::{DemandUnit, SlotKey};

/// Composes hard filters and soft rules into one slot evaluation.
///
/// A slot's score is `base_score + Σ rule(slot)` if every filter admits it,
/// and `None` otherwise.
///
/// # Example
/// ```
/// use u_lesson::config::{EngineConfig, RunOptions, Strength};
/// use u_lesson::scoring::SlotScorer;
///
/// let options = RunOptions::new().with_preferred_teacher(Strength::Weak);
/// let scorer = SlotScorer::from_options(&EngineConfig::default(), &options);
/// assert_eq!(scorer.rule_names(), vec!["preferred-teacher"]);
/// ```
#[derive(Clone)]
pub struct SlotScorer {
    filters: Vec<Arc<dyn HardFilter>>,
    rules: Vec<Arc<dyn SoftRule>>,
    base_score: Score,
}

impl SlotScorer {
    /// A scorer with no filters and no rules.
    pub fn new(base_score: Score) -> Self {
        Self {
            filters: Vec::new(),
            rules: Vec::new(),
            base_score,
        }
    }

    /// The standard scorer for a run.
    ///
    /// Always installs the three hard filters; soft rules follow the options.
    pub fn from_options(config: &EngineConfig, options: &RunOptions) -> Self {
        let mut scorer = Self::new(config.base_score)
            .with_filter(SubjectGate)
            .with_filter(StudentNonOverlap)
            .with_filter(CapacityLimit);

        if let Some(rule) = options.subject_interval {
            scorer = scorer.with_rule(SubjectInterval {
                min_days: rule.min_days,
                strength: rule.strength,
                bonus: config.interval_bonus,
            });
        }
        if let Some(strength) = options.preferred_teacher {
            scorer = scorer.with_rule(PreferredTeacher { strength });
        }
        scorer
    }

    /// Adds a hard filter.
    pub fn with_filter<F: HardFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Adds a soft rule.
    pub fn with_rule<R: SoftRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Name of the first filter rejecting the slot, if any.
    pub fn rejected_by(
        &self,
        demand: &DemandUnit,
        slot: &SlotKey,
        ctx: &ScoringContext<'_>,
    ) -> Option<&'static str> {
        self.filters
            .iter()
            .find(|f| !f.admits(demand, slot, ctx))
            .map(|f| f.name())
    }

    /// Scores a slot, or `None` if a filter rejects it.
    pub fn score(
        &self,
        demand: &DemandUnit,
        slot: &SlotKey,
        ctx: &ScoringContext<'_>,
    ) -> Option<Score> {
        if self.rejected_by(demand, slot, ctx).is_some() {
            return None;
        }
        Some(
            self.rules
                .iter()
                .map(|r| r.evaluate(demand, slot, ctx))
                .fold(self.base_score, Score::saturating_add),
        )
    }

    /// Names of the active soft rules.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Names of the installed filters.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl std::fmt::Debug for SlotScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotScorer")
            .field("filters", &self.filter_names())
            .field("rules", &self.rule_names())
            .field("base_score", &self.base_score)
            .finish()
    }
}
