//! Property tests: plan invariants hold for arbitrary small instances.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use u_lesson::config::{EngineConfig, RunOptions, Strength};
use u_lesson::models::{
    AvailabilitySlot, Directory, LessonStatus, NewLesson, PlanningPeriod, Quota, QuotaId, SlotKey,
    Student, StudentId, Subject, SubjectId, SubjectTier, Teacher,
};
use u_lesson::scheduler::LessonPlanner;
use u_lesson::store::{Change, ChangeSet, InMemoryStore, PlanStore};
use u_lesson::validation::validate_placements;

const CAPACITY: usize = 3;

fn config() -> EngineConfig {
    EngineConfig::default().with_capacity(CAPACITY)
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
}

#[derive(Debug, Clone)]
struct Instance {
    slots: Vec<(u32, u32, u32)>,
    quotas: Vec<(u32, u32, u32)>,
    locks: Vec<(u32, u32, u32, u32)>,
    autos: Vec<(u32, u32, u32, u32)>,
}

fn instance() -> impl Strategy<Value = Instance> {
    (
        prop::collection::vec((1u32..=3, 1u32..=6, 1u32..=3), 0..30),
        prop::collection::vec((1u32..=4, 1u32..=2, 0u32..=4), 0..6),
        prop::collection::vec((1u32..=3, 1u32..=6, 1u32..=3, 1u32..=4), 0..5),
        prop::collection::vec((1u32..=3, 1u32..=6, 1u32..=3, 1u32..=4), 0..5),
    )
        .prop_map(|(slots, quotas, locks, autos)| Instance {
            slots,
            quotas,
            locks,
            autos,
        })
}

/// Teachers 1-3 (teacher 1 qualified for the high-tier subject 2),
/// students 1-4, subjects 1 (middle) and 2 (high).
fn build(instance: &Instance) -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    store.add_period(PlanningPeriod::new(1, d(1), d(6)).unwrap());
    store.set_directory(
        Directory::new()
            .with_subject(Subject::new(1, SubjectTier::Middle))
            .with_subject(Subject::new(2, SubjectTier::High))
            .with_teacher(Teacher::new(1).with_subject(2))
            .with_teacher(Teacher::new(2))
            .with_teacher(Teacher::new(3))
            .with_student(Student::new(1).with_preferred(2))
            .with_student(Student::new(2))
            .with_student(Student::new(3).with_preferred(1))
            .with_student(Student::new(4)),
    );
    store.add_availability(
        instance
            .slots
            .iter()
            .map(|&(t, day, ts)| AvailabilitySlot::available(t, d(day), ts)),
    );
    for (i, &(student, subject, count)) in instance.quotas.iter().enumerate() {
        store.add_quota(Quota::new(i as u32 + 1, 1, student, subject, count));
    }

    // Seed prior lessons through the validating path; conflicting ones are dropped.
    let prior = instance
        .locks
        .iter()
        .map(|&l| (l, LessonStatus::Locked))
        .chain(instance.autos.iter().map(|&l| (l, LessonStatus::Auto)));
    for ((t, day, ts, student), status) in prior {
        let mut lesson = NewLesson::locked(StudentId(student), SubjectId(1), None);
        lesson.status = status;
        let add = Change::AddLesson {
            slot: SlotKey::new(t, d(day), ts),
            lesson,
        };
        let _ = store.apply(ChangeSet::new().with_seat_limit(CAPACITY).with(add));
    }
    Arc::new(store)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_run_keeps_plan_valid(inst in instance(), seed in any::<u64>(), interval in prop::option::of(0i64..=4)) {
        let store = build(&inst);
        let mut options = RunOptions::new()
            .with_seed(seed)
            .with_preferred_teacher(Strength::Normal);
        if let Some(days) = interval {
            options = options.with_subject_interval(days, Strength::Strong);
        }

        let summary = LessonPlanner::new(Arc::clone(&store), config())
            .run(1.into(), &options)
            .unwrap();

        // Capacity, no double booking, no empty container
        let containers = store.containers();
        prop_assert!(validate_placements(&containers, CAPACITY).is_ok());
        prop_assert_eq!(summary.placed + summary.unplaced, summary.considered);
    }

    #[test]
    fn prop_locked_lessons_untouched(inst in instance(), seed in any::<u64>()) {
        let store = build(&inst);
        let locked_before: Vec<_> = store
            .lessons()
            .into_iter()
            .filter(|r| r.lesson.is_locked())
            .collect();

        LessonPlanner::new(Arc::clone(&store), config())
            .run(1.into(), &RunOptions::new().with_seed(seed))
            .unwrap();

        let after = store.lessons();
        for record in &locked_before {
            prop_assert!(after.contains(record), "locked lesson {} moved or vanished", record.lesson.id);
        }
        prop_assert_eq!(
            store.count_lessons(LessonStatus::Locked),
            locked_before.len()
        );
    }

    #[test]
    fn prop_quota_conservation(inst in instance(), seed in any::<u64>()) {
        let store = build(&inst);
        let summary = LessonPlanner::new(Arc::clone(&store), config())
            .run(1.into(), &RunOptions::new().with_seed(seed))
            .unwrap();

        let mut bound: HashMap<QuotaId, u32> = HashMap::new();
        for record in store.lessons() {
            if let Some(q) = record.lesson.quota {
                *bound.entry(q).or_insert(0) += 1;
            }
        }
        let mut missing: HashMap<QuotaId, u32> = HashMap::new();
        for unit in &summary.unplaced_demands {
            *missing.entry(unit.quota).or_insert(0) += 1;
        }

        for quota in store.quotas(1.into()).unwrap() {
            let placed = bound.get(&quota.id).copied().unwrap_or(0);
            let short = missing.get(&quota.id).copied().unwrap_or(0);
            prop_assert_eq!(placed + short, quota.count);
        }
    }

    #[test]
    fn prop_cleanup_idempotent(inst in instance()) {
        let store = build(&inst);
        let planner = LessonPlanner::new(Arc::clone(&store), config());

        planner.cleanup(1.into()).unwrap();
        let once = store.lessons();
        let second = planner.cleanup(1.into()).unwrap();

        prop_assert_eq!(second.removed_lessons, 0);
        prop_assert_eq!(second.removed_containers, 0);
        prop_assert_eq!(store.lessons(), once);
        prop_assert_eq!(store.count_lessons(LessonStatus::Auto), 0);
    }
}
