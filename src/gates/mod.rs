//! # Gates: capacity-limited resources scenarios must hold to run.
//!
//! - [`Gate`] - named counting permit with non-blocking `try_enter`/`leave`
//! - [`GateRegistry`] - resolves names to one shared gate per suite run
//! - [`GatePermits`] - all-or-nothing acquisition, reverse-order release on drop

mod gate;
mod permits;
mod registry;

pub use gate::Gate;
pub use permits::GatePermits;
pub use registry::GateRegistry;
