//! # Scenario abstractions and specifications.
//!
//! - [`Scenario`] - trait for an async, cancelable scenario body
//! - [`ScenarioFn`] - closure-backed implementation
//! - [`ScenarioRef`] - shared handle (`Arc<dyn Scenario>`)
//! - [`ScenarioSpec`] - scenario plus its de-duplicated gate list

mod scenario;
mod scenario_fn;
mod spec;

pub use scenario::{BoxScenarioFuture, Scenario, ScenarioRef};
pub use scenario_fn::ScenarioFn;
pub use spec::ScenarioSpec;
