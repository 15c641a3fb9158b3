//! Availability model.
//!
//! A slot is one (teacher, date, time-slot) triple. Teachers mark the slots
//! they can work; the index keeps the ones inside the planning window in
//! scan order.
//!
//! # Scan Order
//! Slots are sorted by date, then time-slot, then teacher. The slot search
//! breaks score ties by this order, so it must be total and stable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::{PlanningPeriod, TeacherId, TimeSlotId};

/// Key of a (teacher, date, time-slot) slot.
///
/// Also keys the assignment container for that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Teacher working the slot.
    pub teacher: TeacherId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Period of the day.
    pub time_slot: TimeSlotId,
}

impl SlotKey {
    /// Creates a slot key.
    pub fn new(
        teacher: impl Into<TeacherId>,
        date: NaiveDate,
        time_slot: impl Into<TimeSlotId>,
    ) -> Self {
        Self {
            teacher: teacher.into(),
            date,
            time_slot: time_slot.into(),
        }
    }

    /// The (date, time-slot) pair, independent of teacher.
    #[inline]
    pub fn moment(&self) -> (NaiveDate, TimeSlotId) {
        (self.date, self.time_slot)
    }
}

impl Ord for SlotKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.time_slot.cmp(&other.time_slot))
            .then(self.teacher.cmp(&other.teacher))
    }
}

impl PartialOrd for SlotKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A teacher's declared availability for one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// The slot.
    pub key: SlotKey,
    /// Whether the teacher marked it available.
    pub available: bool,
}

impl AvailabilitySlot {
    /// An available slot.
    pub fn available(
        teacher: impl Into<TeacherId>,
        date: NaiveDate,
        time_slot: impl Into<TimeSlotId>,
    ) -> Self {
        Self {
            key: SlotKey::new(teacher, date, time_slot),
            available: true,
        }
    }

    /// A slot the teacher marked unavailable.
    pub fn unavailable(
        teacher: impl Into<TeacherId>,
        date: NaiveDate,
        time_slot: impl Into<TimeSlotId>,
    ) -> Self {
        Self {
            key: SlotKey::new(teacher, date, time_slot),
            available: false,
        }
    }
}

/// Available slots inside a planning window, in scan order.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    slots: Vec<SlotKey>,
}

impl AvailabilityIndex {
    /// Builds the index for a period.
    ///
    /// Drops unavailable slots and slots outside the window; duplicates
    /// collapse to one entry.
    pub fn build<'a, I>(period: &PlanningPeriod, slots: I) -> Self
    where
        I: IntoIterator<Item = &'a AvailabilitySlot>,
    {
        let unique: BTreeSet<SlotKey> = slots
            .into_iter()
            .filter(|s| s.available && period.contains(s.key.date))
            .map(|s| s.key)
            .collect();
        Self {
            slots: unique.into_iter().collect(),
        }
    }

    /// Slots in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotKey> {
        self.slots.iter()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
