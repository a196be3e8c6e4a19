//! # Scheduling policies.
//!
//! - [`Priority`] / [`order_scenarios`] - the order in which the coordinator
//!   attempts pending scenarios.

mod ordering;

pub use ordering::{Priority, order_scenarios};
