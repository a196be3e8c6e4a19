//! # suitevisor
//!
//! **Suitevisor** runs independent test scenarios in parallel while keeping
//! them off each other's toes.
//!
//! Each scenario declares the named *gates* (capacity-limited shared
//! resources: a database, a sandbox account, a rate-limited API) it must hold
//! while running. A coordinator admits a scenario only when it can take one
//! permit from every one of its gates at once, hands it to a bounded worker
//! pool, and the worker returns the permits when the body is done, however it
//! ends.
//!
//! ## Architecture
//! ```text
//!   GateRegistry ──resolve(name, capacity)──► Arc<Gate>
//!                                                │
//!   ScenarioSpec { scenario, gates } ◄───────────┘
//!        │ (many)
//!        ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ Suite::run                                                       │
//! │   order_scenarios ─► Coordinator (pending set, priority order)   │
//! │                           │ try_admit(): all-or-nothing permits  │
//! │                           ▼                                      │
//! │                      Admission ─► WorkerPool::submit             │
//! │                                     │ (Semaphore: parallelism)   │
//! │                                     ▼                            │
//! │                              worker: run body, drop permits      │
//! │   timeout / signal / cancel ─► WorkerPool::shutdown(grace)       │
//! └──────────────┬───────────────────────────────────────────────────┘
//!                │ publish(Event)
//!                ▼
//!          Bus (broadcast) ─► listener ─► SubscriberSet ─► SuiteReport, LogWriter, ...
//! ```
//!
//! ### Scenario lifecycle
//! ```text
//! PENDING ──try_admit──► ADMITTED ──submit──► queued ──slot──► running
//!    ▲          │                                                 │
//!    └─rejected─┘ (rolled back)        ScenarioFinished / Failed / Canceled
//!                                             └─► permits released (reverse order)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                          |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Gates**         | Named counting permits, shared by name per run.          | [`Gate`], [`GateRegistry`], [`GatePermits`] |
//! | **Scenarios**     | Opaque cancelable bodies plus their gate list.           | [`Scenario`], [`ScenarioFn`], [`ScenarioSpec`] |
//! | **Ordering**      | Most contended scenarios are attempted first.            | [`Priority`], [`order_scenarios`]           |
//! | **Runtime**       | Admission, bounded execution, timeout, shutdown.         | [`Suite`], [`Coordinator`], [`WorkerPool`]  |
//! | **Events**        | Lifecycle notifications for reporting sinks.             | [`Event`], [`EventKind`], [`Subscribe`]     |
//! | **Errors**        | Typed errors for the runner and scenario bodies.         | [`SuiteError`], [`ScenarioError`]           |
//! | **Configuration** | Parallelism and timing parameters.                       | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use suitevisor::{Config, GateRegistry, ScenarioError, ScenarioFn, ScenarioSpec, Suite};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.suite_timeout = Some(Duration::from_secs(60));
//!
//!     let suite = Suite::new(cfg, Vec::new())?;
//!     let gates = GateRegistry::new();
//!
//!     let refund = ScenarioFn::arc("refund", |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(ScenarioError::Canceled);
//!         }
//!         Ok(())
//!     });
//!     let report = ScenarioFn::arc("report", |_ctx: CancellationToken| async {
//!         Ok::<_, ScenarioError>(())
//!     });
//!
//!     let outcome = suite
//!         .run(vec![
//!             ScenarioSpec::new(refund, [gates.resolve("ledger", 1)]),
//!             ScenarioSpec::ungated(report),
//!         ])
//!         .await?;
//!
//!     assert!(outcome.is_success());
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod gates;
mod policies;
mod scenarios;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{Admission, Coordinator, Suite, SuiteOutcome, WorkerPool};
pub use error::{ScenarioError, SubmitError, SuiteError};
pub use events::{Bus, Event, EventKind};
pub use gates::{Gate, GatePermits, GateRegistry};
pub use policies::{Priority, order_scenarios};
pub use scenarios::{BoxScenarioFuture, Scenario, ScenarioFn, ScenarioRef, ScenarioSpec};
pub use subscribers::{ReportSummary, Subscribe, SubscriberSet, SuiteReport};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
