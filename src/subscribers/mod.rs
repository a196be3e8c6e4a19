//! # Event subscribers (reporting sinks).
//!
//! ```text
//! Bus ──► suite listener ──► SubscriberSet ──┬──► SuiteReport
//!                                            ├──► LogWriter (feature "logging")
//!                                            └──► custom Subscribe impls
//! ```
//!
//! - [`Subscribe`] - extension point for sinks
//! - [`SubscriberSet`] - bounded, panic-isolated fan-out
//! - [`SuiteReport`] - in-memory outcome collector
//! - `LogWriter` - renders events through `tracing`

#[cfg(feature = "logging")]
mod log;
mod report;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use report::{ReportSummary, SuiteReport};
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
