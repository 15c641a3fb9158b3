//! Demand dispatching order.
//!
//! Decides which demand unit is placed first. Greedy placement is
//! order-sensitive: units placed early get the best slots.
//!
//! # Usage
//!
//! ```
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use u_lesson::dispatching::DemandOrdering;
//! use u_lesson::models::{DemandUnit, Priority, Quota};
//!
//! let mut demands = vec![
//!     DemandUnit::from_quota(&Quota::new(1, 1, 10, 1, 1).with_priority(Priority::Low)),
//!     DemandUnit::from_quota(&Quota::new(2, 1, 11, 1, 1).with_priority(Priority::High)),
//! ];
//! let ordering = DemandOrdering::for_demands(&demands);
//! ordering.apply(&mut demands, &mut SmallRng::seed_from_u64(42));
//! assert_eq!(demands[0].priority, Some(Priority::High));
//! ```

mod ordering;

pub use ordering::DemandOrdering;
