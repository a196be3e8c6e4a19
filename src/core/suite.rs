//! # Suite: end-to-end orchestration of one gated run.
//!
//! The [`Suite`] owns the configuration and the subscribers. Each call to
//! [`Suite::run`] builds a fresh bus, coordinator and worker pool, so no gate or
//! pending state leaks from one run into the next.
//!
//! ## High-level flow
//! ```text
//! run(specs)
//!   ├─ empty? ─► Err(EmptyWorkload)                  (nothing published)
//!   ├─ listener: Bus ─► SubscriberSet (until SuiteFinished)
//!   ├─ publish SuiteStarting{count}
//!   ├─ order_scenarios(specs) ─► Coordinator (pending set)
//!   ├─ select! {
//!   │     dispatch loop drained      ─► outcome Ok
//!   │     suite_timeout elapsed      ─► SuiteTimedOut, ShutdownRequested("timeout")
//!   │     SIGINT / SIGTERM / SIGQUIT ─► ShutdownRequested("signal")
//!   │     Suite::cancel()            ─► ShutdownRequested("cancel")
//!   │  }
//!   ├─ WorkerPool::shutdown(grace)   ─► AllStoppedWithin | GraceExceeded
//!   ├─ publish SuiteFinished         (exactly once, drop guard)
//!   └─ flush subscribers
//! ```
//!
//! ## Dispatch loop
//! ```text
//! loop {
//!   pending empty      ─► pool quiescent? return : wait
//!   pool has queued    ─► wait                          (backpressure)
//!   try_admit()        ─► Some ─► submit, next iteration
//!                      └► None ─► pool quiescent? report_stalls()
//!                                 wait
//! }
//! wait = select!(sleep(poll_interval), pool.completion())
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use suitevisor::{
//!     Config, GateRegistry, ScenarioError, ScenarioFn, ScenarioSpec, Subscribe, Suite, SuiteReport,
//! };
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.parallelism = 4;
//!     cfg.suite_timeout = Some(Duration::from_secs(30));
//!
//!     let report = Arc::new(SuiteReport::new());
//!     let suite = Suite::new(cfg, vec![report.clone() as Arc<dyn Subscribe>])?;
//!
//!     let gates = GateRegistry::new();
//!     let specs = ["login", "logout"].into_iter().map(|name| {
//!         let body = ScenarioFn::arc(name, |_ctx: CancellationToken| async {
//!             Ok::<_, ScenarioError>(())
//!         });
//!         ScenarioSpec::new(body, [gates.resolve("session-store", 1)])
//!     });
//!
//!     let outcome = suite.run(specs.collect()).await?;
//!     assert_eq!(outcome.scenarios, 2);
//!     assert_eq!(report.summary().passed.len(), 2);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::coordinator::Coordinator;
use crate::core::pool::WorkerPool;
use crate::core::shutdown;
use crate::error::SuiteError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::order_scenarios;
use crate::scenarios::ScenarioSpec;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Result of a run that drained its whole workload.
#[derive(Clone, Debug)]
pub struct SuiteOutcome {
    /// Number of scenarios scheduled.
    pub scenarios: usize,
    /// Scenarios whose body failed or panicked.
    pub failed: Vec<String>,
    /// Wall time of the run.
    pub elapsed: Duration,
}

impl SuiteOutcome {
    /// `true` if no scenario failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
enum Stop {
    Timeout(Duration),
    Signal,
    Cancel,
}

impl Stop {
    fn reason(self) -> &'static str {
        match self {
            Stop::Timeout(_) => "timeout",
            Stop::Signal => "signal",
            Stop::Cancel => "cancel",
        }
    }
}

/// Runs sets of gated scenarios.
pub struct Suite {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    token: CancellationToken,
}

impl Suite {
    /// Creates a suite after validating `cfg`.
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Result<Self, SuiteError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            subscribers,
            token: CancellationToken::new(),
        })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Interrupts the current run (and any later one).
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token that interrupts runs of this suite when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Schedules `specs` and waits until they have all run, or the run is cut short.
    ///
    /// Scenario failures do not fail the run; they are listed in
    /// [`SuiteOutcome::failed`]. A timeout or an interruption returns
    /// [`SuiteError::TimedOut`] / [`SuiteError::Interrupted`] after the worker
    /// pool has been shut down.
    pub async fn run(&self, specs: Vec<ScenarioSpec>) -> Result<SuiteOutcome, SuiteError> {
        if specs.is_empty() {
            return Err(SuiteError::EmptyWorkload);
        }
        let started = Instant::now();
        let total = specs.len();

        let bus = Bus::new(self.cfg.bus_capacity);
        let listener = self.subscriber_listener(&bus);
        let finish = FinishGuard {
            bus: bus.clone(),
            started,
            armed: true,
        };

        info!(
            scenarios = total,
            parallelism = self.cfg.parallelism,
            "suite starting"
        );
        bus.publish(Event::new(EventKind::SuiteStarting).with_count(total));

        let coord = Coordinator::new(
            order_scenarios(specs),
            self.cfg.gate_poll_interval,
            bus.clone(),
        );
        let pool = WorkerPool::new(self.cfg.parallelism, bus.clone());

        let stop = tokio::select! {
            () = self.dispatch(&coord, &pool) => None,
            d = deadline(self.cfg.suite_timeout) => Some(Stop::Timeout(d)),
            () = shutdown::interrupted() => Some(Stop::Signal),
            () = self.token.cancelled() => Some(Stop::Cancel),
        };

        let (pending, running) = match stop {
            None => (Vec::new(), Vec::new()),
            Some(stop) => {
                let pending = coord.pending_names().await;
                let running = pool.running();
                warn!(
                    reason = stop.reason(),
                    pending = pending.len(),
                    running = running.len(),
                    "suite shutdown requested"
                );
                if let Stop::Timeout(timeout) = stop {
                    bus.publish(
                        Event::new(EventKind::SuiteTimedOut)
                            .with_timeout(timeout)
                            .with_count(pending.len()),
                    );
                }
                bus.publish(Event::new(EventKind::ShutdownRequested).with_reason(stop.reason()));
                (pending, running)
            }
        };

        let forced = pool.shutdown(self.cfg.grace).await;
        let result = match stop {
            None => Ok(SuiteOutcome {
                scenarios: total,
                failed: pool.failed(),
                elapsed: started.elapsed(),
            }),
            Some(Stop::Timeout(timeout)) => Err(SuiteError::TimedOut {
                timeout,
                pending,
                running,
                forced,
            }),
            Some(Stop::Signal | Stop::Cancel) => Err(SuiteError::Interrupted {
                pending,
                running,
                forced,
            }),
        };

        finish.fire(result.as_ref().err().map(SuiteError::as_label));
        let _ = listener.await;
        result
    }

    /// Admits and submits scenarios until the pending set is empty and the
    /// pool is quiescent.
    async fn dispatch(&self, coord: &Coordinator, pool: &WorkerPool) {
        loop {
            if coord.is_empty().await {
                if pool.is_quiescent() {
                    return;
                }
            } else if !pool.has_queued_submissions() {
                if let Some(admission) = coord.try_admit().await {
                    if pool.submit(admission).is_err() {
                        return;
                    }
                    continue;
                }
                if pool.is_quiescent() {
                    coord.report_stalls().await;
                }
            }
            self.idle(pool).await;
        }
    }

    async fn idle(&self, pool: &WorkerPool) {
        tokio::select! {
            () = time::sleep(self.cfg.poll_interval) => {}
            () = pool.completion().notified() => {}
        }
    }

    /// Forwards bus events to the subscribers until `SuiteFinished`, then
    /// drains their queues.
    fn subscriber_listener(&self, bus: &Bus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), bus.clone());

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        let last = ev.kind == EventKind::SuiteFinished;
                        set.emit(&ev);
                        if last {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "subscriber listener lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }
}

async fn deadline(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(d) => {
            time::sleep(d).await;
            d
        }
        None => std::future::pending().await,
    }
}

/// Publishes `SuiteFinished` once, even if the run future is dropped midway.
struct FinishGuard {
    bus: Bus,
    started: Instant,
    armed: bool,
}

impl FinishGuard {
    fn fire(mut self, reason: Option<&'static str>) {
        self.armed = false;
        self.publish(reason);
    }

    fn publish(&self, reason: Option<&'static str>) {
        let elapsed = self.started.elapsed();
        info!(?elapsed, reason = reason.unwrap_or("completed"), "suite finished");

        let mut ev = Event::new(EventKind::SuiteFinished).with_elapsed(elapsed);
        if let Some(reason) = reason {
            ev = ev.with_reason(reason);
        }
        self.bus.publish(ev);
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if self.armed {
            self.publish(Some("dropped"));
        }
    }
}
