//! In-memory store.
//!
//! Keeps all planning data behind one lock. A change set is applied to a
//! copy of the data, validated against the set's seat limit, and swapped in
//! only if every change succeeded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use log::debug;
use parking_lot::{Mutex, RwLock};

use super::{Change, ChangeSet, CommitReceipt, PlanStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    AssignmentContainer, AvailabilitySlot, ContainerId, Directory, LessonId, LessonRecord,
    LessonStatus, NewLesson, PeriodId, PlacedLesson, PlanningPeriod, Quota, SlotKey, TimeSlotId,
};
use crate::validation::validate_placements;

/// In-memory [`PlanStore`].
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_lesson::models::PlanningPeriod;
/// use u_lesson::store::{InMemoryStore, PlanStore};
///
/// let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
/// let store = InMemoryStore::new();
/// store.add_period(PlanningPeriod::new(1, start, end).unwrap());
/// assert!(store.period(1.into()).unwrap().is_some());
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    data: RwLock<MemoryData>,
    available: AtomicBool,
    fail_next_commit: Mutex<Option<String>>,
}

#[derive(Debug, Clone)]
struct MemoryData {
    periods: HashMap<PeriodId, PlanningPeriod>,
    directory: Directory,
    availability: Vec<AvailabilitySlot>,
    quotas: Vec<Quota>,
    containers: BTreeMap<ContainerId, AssignmentContainer>,
    by_slot: HashMap<SlotKey, ContainerId>,
    next_container: u64,
    next_lesson: u64,
}

impl Default for MemoryData {
    fn default() -> Self {
        Self {
            periods: HashMap::new(),
            directory: Directory::new(),
            availability: Vec::new(),
            quotas: Vec::new(),
            containers: BTreeMap::new(),
            by_slot: HashMap::new(),
            next_container: 1,
            next_lesson: 1,
        }
    }
}

/// Bookkeeping for one apply: what changed and which moments were touched.
#[derive(Default)]
struct ApplyLog {
    receipt: CommitReceipt,
    touched: HashSet<ContainerId>,
    moments: HashSet<(NaiveDate, TimeSlotId)>,
}

impl MemoryData {
    fn container_of(&self, lesson: LessonId) -> Option<ContainerId> {
        self.containers
            .values()
            .find(|c| c.lesson(lesson).is_some())
            .map(|c| c.id)
    }

    fn status_of(&self, lesson: LessonId) -> StoreResult<LessonStatus> {
        self.containers
            .values()
            .find_map(|c| c.lesson(lesson))
            .map(|l| l.status)
            .ok_or_else(|| StoreError::NotFound(format!("lesson {lesson}")))
    }

    fn container_for_slot(&mut self, slot: SlotKey, log: &mut ApplyLog) -> ContainerId {
        if let Some(&id) = self.by_slot.get(&slot) {
            return id;
        }
        let id = ContainerId(self.next_container);
        self.next_container += 1;
        self.containers.insert(id, AssignmentContainer::new(id, slot));
        self.by_slot.insert(slot, id);
        log.receipt.created_containers.push(id);
        id
    }

    fn take_lesson(&mut self, lesson: LessonId, log: &mut ApplyLog) -> StoreResult<PlacedLesson> {
        let cid = self
            .container_of(lesson)
            .ok_or_else(|| StoreError::NotFound(format!("lesson {lesson}")))?;
        let container = self
            .containers
            .get_mut(&cid)
            .ok_or_else(|| StoreError::NotFound(format!("container {cid}")))?;
        let pos = container
            .lessons
            .iter()
            .position(|l| l.id == lesson)
            .ok_or_else(|| StoreError::NotFound(format!("lesson {lesson}")))?;
        log.touched.insert(cid);
        log.moments.insert(container.key.moment());
        Ok(container.lessons.remove(pos))
    }

    fn seat(&mut self, slot: SlotKey, lesson: PlacedLesson, log: &mut ApplyLog) -> StoreResult<()> {
        let cid = self.container_for_slot(slot, log);
        let container = self
            .containers
            .get_mut(&cid)
            .ok_or_else(|| StoreError::NotFound(format!("container {cid}")))?;
        container.lessons.push(lesson);
        log.touched.insert(cid);
        log.moments.insert(slot.moment());
        Ok(())
    }

    fn remove_container(&mut self, id: ContainerId) -> Option<AssignmentContainer> {
        let removed = self.containers.remove(&id)?;
        self.by_slot.remove(&removed.key);
        Some(removed)
    }

    fn apply_change(&mut self, change: Change, log: &mut ApplyLog) -> StoreResult<()> {
        match change {
            Change::RemoveLesson(id) => {
                self.take_lesson(id, log)?;
                log.receipt.removed_lessons.push(id);
            }
            Change::RemoveAutoLesson(id) => {
                if self.status_of(id)? == LessonStatus::Locked {
                    return Err(StoreError::CommitRejected(format!(
                        "lesson {id} was locked after cleanup was staged"
                    )));
                }
                self.take_lesson(id, log)?;
                log.receipt.removed_lessons.push(id);
            }
            Change::RemoveContainer(id) => {
                let container = self
                    .containers
                    .get(&id)
                    .ok_or_else(|| StoreError::NotFound(format!("container {id}")))?;
                if !container.is_empty() {
                    return Err(StoreError::CommitRejected(format!(
                        "container {id} still holds {} lessons",
                        container.len()
                    )));
                }
                self.remove_container(id);
                log.touched.remove(&id);
                log.receipt.removed_containers.push(id);
            }
            Change::AddLesson { slot, lesson } => {
                let id = LessonId(self.next_lesson);
                self.next_lesson += 1;
                self.seat(slot, lesson.into_placed(id), log)?;
                log.receipt.created_lessons.push(id);
            }
            Change::MoveLesson { lesson, to } => {
                let placed = self.take_lesson(lesson, log)?;
                self.seat(to, placed, log)?;
            }
            Change::SetStatus { lesson, status } => {
                let cid = self
                    .container_of(lesson)
                    .ok_or_else(|| StoreError::NotFound(format!("lesson {lesson}")))?;
                if let Some(l) = self
                    .containers
                    .get_mut(&cid)
                    .and_then(|c| c.lessons.iter_mut().find(|l| l.id == lesson))
                {
                    l.status = status;
                }
            }
        }
        Ok(())
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(MemoryData::default()),
            available: AtomicBool::new(true),
            fail_next_commit: Mutex::new(None),
        }
    }

    /// Adds or replaces a planning period.
    pub fn add_period(&self, period: PlanningPeriod) {
        self.data.write().periods.insert(period.id, period);
    }

    /// Replaces the directory.
    pub fn set_directory(&self, directory: Directory) {
        self.data.write().directory = directory;
    }

    /// Adds availability slots.
    pub fn add_availability(&self, slots: impl IntoIterator<Item = AvailabilitySlot>) {
        self.data.write().availability.extend(slots);
    }

    /// Adds a quota.
    pub fn add_quota(&self, quota: Quota) {
        self.data.write().quotas.push(quota);
    }

    /// Seeds a container directly, bypassing validation.
    ///
    /// Lets tests and importers load legacy state, including empty
    /// containers. Lessons join an existing container at the same slot.
    pub fn insert_container(
        &self,
        slot: SlotKey,
        lessons: impl IntoIterator<Item = NewLesson>,
    ) -> (ContainerId, Vec<LessonId>) {
        let mut data = self.data.write();
        let mut log = ApplyLog::default();
        let cid = data.container_for_slot(slot, &mut log);
        let mut ids = Vec::new();
        for lesson in lessons {
            let id = LessonId(data.next_lesson);
            data.next_lesson += 1;
            if let Some(c) = data.containers.get_mut(&cid) {
                c.lessons.push(lesson.into_placed(id));
            }
            ids.push(id);
        }
        (cid, ids)
    }

    /// Snapshot of every container, ordered by id.
    pub fn containers(&self) -> Vec<AssignmentContainer> {
        self.data.read().containers.values().cloned().collect()
    }

    /// The container occupying a slot, if any.
    pub fn container_at(&self, slot: &SlotKey) -> Option<AssignmentContainer> {
        let data = self.data.read();
        data.by_slot
            .get(slot)
            .and_then(|id| data.containers.get(id))
            .cloned()
    }

    /// Snapshot of every lesson with its slot.
    pub fn lessons(&self) -> Vec<LessonRecord> {
        self.data
            .read()
            .containers
            .values()
            .flat_map(|c| {
                c.lessons.iter().map(|l| LessonRecord {
                    key: c.key,
                    lesson: l.clone(),
                })
            })
            .collect()
    }

    /// Number of lessons with a given status.
    pub fn count_lessons(&self, status: LessonStatus) -> usize {
        self.data
            .read()
            .containers
            .values()
            .flat_map(|c| c.lessons.iter())
            .filter(|l| l.status == status)
            .count()
    }

    /// Simulates the backing store going down (`false`) or recovering.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes the next [`PlanStore::apply`] fail with `reason`.
    pub fn fail_next_commit(&self, reason: impl Into<String>) {
        *self.fail_next_commit.lock() = Some(reason.into());
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".into()))
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanStore for InMemoryStore {
    fn period(&self, id: PeriodId) -> StoreResult<Option<PlanningPeriod>> {
        self.check_available()?;
        Ok(self.data.read().periods.get(&id).cloned())
    }

    fn directory(&self) -> StoreResult<Directory> {
        self.check_available()?;
        Ok(self.data.read().directory.clone())
    }

    fn availability(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<AvailabilitySlot>> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .availability
            .iter()
            .filter(|s| s.key.date >= start && s.key.date <= end)
            .cloned()
            .collect())
    }

    fn quotas(&self, period: PeriodId) -> StoreResult<Vec<Quota>> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .quotas
            .iter()
            .filter(|q| q.period == period)
            .cloned()
            .collect())
    }

    fn containers_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<AssignmentContainer>> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .containers
            .values()
            .filter(|c| c.date() >= start && c.date() <= end)
            .cloned()
            .collect())
    }

    fn lessons_outside(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<LessonRecord>> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .containers
            .values()
            .filter(|c| c.date() < start || c.date() > end)
            .flat_map(|c| {
                c.lessons.iter().map(|l| LessonRecord {
                    key: c.key,
                    lesson: l.clone(),
                })
            })
            .collect())
    }

    fn find_lesson(&self, id: LessonId) -> StoreResult<Option<(AssignmentContainer, LessonRecord)>> {
        self.check_available()?;
        let data = self.data.read();
        Ok(data.containers.values().find_map(|c| {
            c.lesson(id).map(|l| {
                (
                    c.clone(),
                    LessonRecord {
                        key: c.key,
                        lesson: l.clone(),
                    },
                )
            })
        }))
    }

    fn apply(&self, changes: ChangeSet) -> StoreResult<CommitReceipt> {
        self.check_available()?;
        if let Some(reason) = self.fail_next_commit.lock().take() {
            return Err(StoreError::CommitRejected(reason));
        }

        let seat_limit = changes.seat_limit();
        let mut guard = self.data.write();
        let mut staged = guard.clone();
        let mut log = ApplyLog::default();

        for change in changes.into_changes() {
            staged.apply_change(change, &mut log)?;
        }

        let mut emptied: Vec<ContainerId> = log
            .touched
            .iter()
            .copied()
            .filter(|id| staged.containers.get(id).is_some_and(|c| c.is_empty()))
            .collect();
        emptied.sort();
        for id in emptied {
            staged.remove_container(id);
            log.receipt.removed_containers.push(id);
        }

        let affected = staged
            .containers
            .values()
            .filter(|c| log.moments.contains(&c.key.moment()));
        validate_placements(affected, seat_limit).map_err(StoreError::InvariantViolated)?;

        *guard = staged;
        debug!(
            "applied change set: +{} lessons, -{} lessons, +{} containers, -{} containers",
            log.receipt.created_lessons.len(),
            log.receipt.removed_lessons.len(),
            log.receipt.created_containers.len(),
            log.receipt.removed_containers.len()
        );
        Ok(log.receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StudentId, SubjectId};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn auto(student: u32) -> NewLesson {
        NewLesson {
            student: StudentId(student),
            subject: SubjectId(1),
            quota: None,
            status: LessonStatus::Auto,
            memo: None,
        }
    }

    #[test]
    fn test_add_lesson_creates_container() {
        let store = InMemoryStore::new();
        let slot = SlotKey::new(1, d(3), 1);
        let receipt = store
            .apply(ChangeSet::new().with(Change::AddLesson { slot, lesson: auto(10) }))
            .unwrap();
        assert_eq!(receipt.created_containers.len(), 1);
        assert_eq!(receipt.created_lessons.len(), 1);
        assert_eq!(store.container_at(&slot).unwrap().len(), 1);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let slot = SlotKey::new(1, d(3), 1);
        store.insert_container(slot, [auto(10), auto(11)]);

        // Second change overflows the container → nothing applied
        let changes = ChangeSet::new()
            .with(Change::AddLesson {
                slot: SlotKey::new(2, d(4), 1),
                lesson: auto(12),
            })
            .with(Change::AddLesson { slot, lesson: auto(13) });
        let err = store.apply(changes).unwrap_err();
        assert!(matches!(err, StoreError::InvariantViolated(_)));
        assert_eq!(store.containers().len(), 1);
        assert_eq!(store.lessons().len(), 2);
    }

    #[test]
    fn test_seat_limit_comes_from_change_set() {
        let store = InMemoryStore::new();
        let slot = SlotKey::new(1, d(3), 1);
        store.insert_container(slot, [auto(10), auto(11)]);
        let third = || Change::AddLesson { slot, lesson: auto(12) };

        let err = store.apply(ChangeSet::new().with(third())).unwrap_err();
        assert!(matches!(err, StoreError::InvariantViolated(_)));

        store
            .apply(ChangeSet::new().with_seat_limit(3).with(third()))
            .unwrap();
        assert_eq!(store.container_at(&slot).unwrap().len(), 3);
    }

    #[test]
    fn test_remove_auto_lesson_refuses_locked() {
        let store = InMemoryStore::new();
        let (_, ids) = store.insert_container(SlotKey::new(1, d(3), 1), [auto(10), auto(11)]);
        store
            .apply(ChangeSet::new().with(Change::SetStatus {
                lesson: ids[1],
                status: LessonStatus::Locked,
            }))
            .unwrap();

        let err = store
            .apply(
                ChangeSet::new()
                    .with(Change::RemoveAutoLesson(ids[0]))
                    .with(Change::RemoveAutoLesson(ids[1])),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::CommitRejected(_)));
        assert_eq!(store.lessons().len(), 2);

        let receipt = store
            .apply(ChangeSet::new().with(Change::RemoveAutoLesson(ids[0])))
            .unwrap();
        assert_eq!(receipt.removed_lessons, vec![ids[0]]);
    }

    #[test]
    fn test_double_booking_rejected() {
        let store = InMemoryStore::new();
        store.insert_container(SlotKey::new(1, d(3), 1), [auto(10)]);
        let err = store
            .apply(ChangeSet::new().with(Change::AddLesson {
                slot: SlotKey::new(2, d(3), 1),
                lesson: auto(10),
            }))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvariantViolated(_)));
    }

    #[test]
    fn test_remove_last_lesson_prunes_container() {
        let store = InMemoryStore::new();
        let (cid, ids) = store.insert_container(SlotKey::new(1, d(3), 1), [auto(10)]);
        let receipt = store
            .apply(ChangeSet::new().with(Change::RemoveLesson(ids[0])))
            .unwrap();
        assert_eq!(receipt.removed_containers, vec![cid]);
        assert!(store.containers().is_empty());
    }

    #[test]
    fn test_remove_non_empty_container_rejected() {
        let store = InMemoryStore::new();
        let (cid, _) = store.insert_container(SlotKey::new(1, d(3), 1), [auto(10)]);
        let err = store
            .apply(ChangeSet::new().with(Change::RemoveContainer(cid)))
            .unwrap_err();
        assert!(matches!(err, StoreError::CommitRejected(_)));
    }

    #[test]
    fn test_move_and_set_status() {
        let store = InMemoryStore::new();
        let from = SlotKey::new(1, d(3), 1);
        let to = SlotKey::new(2, d(5), 2);
        let (_, ids) = store.insert_container(from, [auto(10)]);
        store
            .apply(
                ChangeSet::new()
                    .with(Change::MoveLesson { lesson: ids[0], to })
                    .with(Change::SetStatus {
                        lesson: ids[0],
                        status: LessonStatus::Locked,
                    }),
            )
            .unwrap();
        assert!(store.container_at(&from).is_none());
        let moved = store.container_at(&to).unwrap();
        assert_eq!(moved.lessons[0].id, ids[0]);
        assert!(moved.lessons[0].is_locked());
    }

    #[test]
    fn test_unknown_lesson_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .apply(ChangeSet::new().with(Change::RemoveLesson(LessonId(999))))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_failure_hooks() {
        let store = InMemoryStore::new();
        store.fail_next_commit("disk full");
        let err = store.apply(ChangeSet::new()).unwrap_err();
        assert!(matches!(err, StoreError::CommitRejected(ref m) if m == "disk full"));
        // Hook fires once
        assert!(store.apply(ChangeSet::new()).is_ok());

        store.set_available(false);
        assert!(matches!(store.directory(), Err(StoreError::Unavailable(_))));
        store.set_available(true);
        assert!(store.directory().is_ok());
    }

    #[test]
    fn test_window_queries() {
        let store = InMemoryStore::new();
        store.insert_container(SlotKey::new(1, d(3), 1), [auto(10)]);
        store.insert_container(SlotKey::new(1, d(20), 1), [auto(11)]);
        assert_eq!(store.containers_between(d(1), d(10)).unwrap().len(), 1);
        let outside = store.lessons_outside(d(1), d(10)).unwrap();
        assert_eq!(outside.len(), 1);
        assert_eq!(outside[0].lesson.student, StudentId(11));
    }
}
