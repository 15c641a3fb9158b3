//! Lesson placement engine.
//!
//! Places lesson demand (a student owed N lessons of a subject) into
//! teacher/date/time-slot capacity. Hard filters decide where a lesson may
//! go, soft rules decide where it should go, and lessons an operator has
//! locked survive every re-run.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `PlanningPeriod`, `Directory`, `Quota`,
//!   `DemandUnit`, `AvailabilityIndex`, `AssignmentContainer`, `PlacedLesson`
//! - **`config`**: Per-run `RunOptions` and structural `EngineConfig`
//! - **`scoring`**: Hard filters, soft rules and the `SlotScorer`
//! - **`dispatching`**: Demand ordering strategies
//! - **`scheduler`**: `LessonPlanner`: cleanup, demand building, slot search,
//!   placement and the run summary
//! - **`store`**: `PlanStore` seam and the `InMemoryStore`
//! - **`service`**: Per-period run exclusion and worker-thread runs
//! - **`operator`**: Manual place/move/lock/delete actions
//! - **`validation`**: Input integrity and placement invariant checks
//!
//! # Architecture
//!
//! The engine owns no persistence. A run loads a snapshot through
//! `PlanStore`, works in an in-memory workspace, and hands back a single
//! change set that the store applies atomically.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use u_lesson::config::{EngineConfig, RunOptions};
//! use u_lesson::models::{AvailabilitySlot, Directory, PlanningPeriod, Quota, Student, Subject, SubjectTier, Teacher};
//! use u_lesson::scheduler::LessonPlanner;
//! use u_lesson::store::InMemoryStore;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap();
//! let store = Arc::new(InMemoryStore::new());
//! store.add_period(PlanningPeriod::new(1, day(1), day(31)).unwrap());
//! store.set_directory(
//!     Directory::new()
//!         .with_teacher(Teacher::new(1))
//!         .with_student(Student::new(10))
//!         .with_subject(Subject::new(3, SubjectTier::Middle)),
//! );
//! store.add_availability([
//!     AvailabilitySlot::available(1, day(2), 1),
//!     AvailabilitySlot::available(1, day(3), 1),
//! ]);
//! store.add_quota(Quota::new(1, 1, 10, 3, 2));
//!
//! let options = RunOptions::from_json(r#"{"subject_interval_days": null, "seed": 7}"#).unwrap();
//! let summary = LessonPlanner::new(store, EngineConfig::default())
//!     .run(1.into(), &options)
//!     .unwrap();
//! assert_eq!(summary.placed, 2);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod operator;
pub mod scheduler;
pub mod scoring;
pub mod service;
pub mod store;
pub mod validation;
