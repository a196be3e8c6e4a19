//! Runtime core: admission, execution and run lifecycle.
//!
//! The main entry point is [`Suite`]. [`Coordinator`] and [`WorkerPool`] are
//! public so embedders can drive their own dispatch loop.
//!
//! Internal modules:
//! - [`suite`]: run lifecycle, dispatch loop, timeout and shutdown;
//! - [`coordinator`]: pending set and all-or-nothing gate admission;
//! - [`pool`]: bounded parallel execution with graceful/forced shutdown;
//! - [`worker`]: runs one scenario body and publishes its events;
//! - [`shutdown`]: cross-platform termination signal handling.

mod coordinator;
mod pool;
mod shutdown;
mod suite;
mod worker;

pub use coordinator::{Admission, Coordinator};
pub use pool::WorkerPool;
pub use suite::{Suite, SuiteOutcome};
