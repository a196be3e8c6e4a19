//! Runtime events: types and broadcast bus.
//!
//! - [`EventKind`], [`Event`] - classification and payload metadata
//! - [`Bus`] - thin wrapper over `tokio::sync::broadcast`
//!
//! Publishers: `Suite`, `Coordinator`, `WorkerPool` workers, `SubscriberSet`
//! workers (overflow/panic). The consumer is the suite's listener, which forwards
//! every event to the `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
