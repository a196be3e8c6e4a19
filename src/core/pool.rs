//! # Bounded worker pool for admitted scenarios.
//!
//! ```text
//! submit(admission)
//!   queued += 1, spawn on JoinSet
//!        │
//!        ▼
//!   acquire slot (Semaphore, cancellable)
//!   active += 1, queued -= 1 ─► completion.notify_one()
//!   run_scenario(spec, token)
//!   drop: permits released ─► active -= 1 ─► completion.notify_one()
//! ```
//!
//! ## Rules
//! - `submit` never blocks; after shutdown began it returns [`SubmitError::Closed`]
//! - `active` is raised before `queued` is lowered, so a scenario moving from
//!   queued to active never makes the pool look quiescent
//! - gate permits are released before the completion notification, so a woken
//!   dispatch loop already sees the freed gates
//! - release also happens when the task is aborted, because it lives in a drop
//!   guard owned by the task

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::coordinator::Admission;
use crate::core::worker::run_scenario;
use crate::error::SubmitError;
use crate::events::{Bus, Event, EventKind};
use crate::gates::GatePermits;

#[derive(Default)]
struct Shared {
    queued: AtomicUsize,
    active: AtomicUsize,
    in_flight: Mutex<Vec<String>>,
    failed: Mutex<Vec<String>>,
    completion: Notify,
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

struct Tasks {
    set: JoinSet<()>,
    closed: bool,
}

/// Executes admitted scenarios with bounded parallelism.
pub struct WorkerPool {
    bus: Bus,
    slots: Arc<Semaphore>,
    token: CancellationToken,
    shared: Arc<Shared>,
    tasks: Mutex<Tasks>,
}

impl WorkerPool {
    /// Creates a pool running at most `parallelism` scenarios at once.
    pub fn new(parallelism: usize, bus: Bus) -> Self {
        Self {
            bus,
            slots: Arc::new(Semaphore::new(parallelism.max(1))),
            token: CancellationToken::new(),
            shared: Arc::new(Shared::default()),
            tasks: Mutex::new(Tasks {
                set: JoinSet::new(),
                closed: false,
            }),
        }
    }

    /// Hands an admitted scenario to the pool.
    ///
    /// Returns the admission's permits to their gates (by dropping them) when
    /// the pool is closed.
    pub fn submit(&self, admission: Admission) -> Result<(), SubmitError> {
        let mut tasks = locked(&self.tasks);
        if tasks.closed {
            return Err(SubmitError::Closed);
        }
        while tasks.set.try_join_next().is_some() {}

        let Admission { spec, permits } = admission;
        let name = spec.name().to_string();

        self.shared.queued.fetch_add(1, Ordering::SeqCst);
        locked(&self.shared.in_flight).push(name.clone());
        let mut slot = Slot {
            shared: Arc::clone(&self.shared),
            name,
            permits: Some(permits),
            started: false,
        };

        let slots = Arc::clone(&self.slots);
        let token = self.token.clone();
        let bus = self.bus.clone();

        tasks.set.spawn(async move {
            let permit = tokio::select! {
                p = slots.acquire_owned() => p,
                _ = token.cancelled() => {
                    bus.publish(
                        Event::new(EventKind::ScenarioCanceled)
                            .with_scenario(spec.name())
                            .with_reason("not started"),
                    );
                    return;
                }
            };
            let Ok(permit) = permit else {
                return;
            };

            slot.start();
            if let Err(e) = run_scenario(&spec, token, &bus).await
                && !e.is_cancellation()
            {
                locked(&slot.shared.failed).push(slot.name.clone());
            }
            drop(permit);
            drop(slot);
        });
        Ok(())
    }

    /// `true` while some submission is still waiting for a worker slot.
    pub fn has_queued_submissions(&self) -> bool {
        self.shared.queued.load(Ordering::SeqCst) > 0
    }

    /// `true` when nothing is queued and nothing is executing.
    ///
    /// `queued` is read before `active`: a start moves a submission from
    /// queued to active in the opposite order, so no start falls between the
    /// two reads unnoticed.
    pub fn is_quiescent(&self) -> bool {
        self.shared.queued.load(Ordering::SeqCst) == 0
            && self.shared.active.load(Ordering::SeqCst) == 0
    }

    /// Names of submitted scenarios that have not finished (queued or executing), sorted.
    pub fn running(&self) -> Vec<String> {
        let mut names = locked(&self.shared.in_flight).clone();
        names.sort_unstable();
        names
    }

    /// Names of scenarios that failed or panicked, in completion order.
    pub fn failed(&self) -> Vec<String> {
        locked(&self.shared.failed).clone()
    }

    /// Notified whenever a submission leaves the queue or finishes.
    ///
    /// Uses `notify_one` semantics: a wake-up with no waiter is remembered for
    /// the next `notified().await`.
    pub fn completion(&self) -> &Notify {
        &self.shared.completion
    }

    /// Stops accepting work, cancels running scenarios and waits up to `grace`.
    ///
    /// Scenarios still running after `grace` are aborted and returned.
    /// Publishes `AllStoppedWithin` or `GraceExceeded`.
    pub async fn shutdown(&self, grace: Duration) -> Vec<String> {
        let mut set = {
            let mut tasks = locked(&self.tasks);
            tasks.closed = true;
            std::mem::take(&mut tasks.set)
        };
        self.token.cancel();

        let drained = time::timeout(grace, async {
            while set.join_next().await.is_some() {}
        })
        .await
        .is_ok();

        if drained {
            self.bus.publish(Event::new(EventKind::AllStoppedWithin));
            return Vec::new();
        }

        let forced = self.running();
        set.abort_all();
        while set.join_next().await.is_some() {}

        for name in &forced {
            warn!(scenario = %name, ?grace, "scenario aborted after grace period");
            self.bus.publish(
                Event::new(EventKind::ScenarioCanceled)
                    .with_scenario(name.as_str())
                    .with_reason("aborted"),
            );
        }
        self.bus
            .publish(Event::new(EventKind::GraceExceeded).with_count(forced.len()));
        forced
    }
}

/// Per-submission bookkeeping, settled on drop (normal exit, panic or abort).
struct Slot {
    shared: Arc<Shared>,
    name: String,
    permits: Option<GatePermits>,
    started: bool,
}

impl Slot {
    fn start(&mut self) {
        self.shared.active.fetch_add(1, Ordering::SeqCst);
        self.shared.queued.fetch_sub(1, Ordering::SeqCst);
        self.started = true;
        self.shared.completion.notify_one();
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        drop(self.permits.take());

        {
            let mut in_flight = locked(&self.shared.in_flight);
            if let Some(pos) = in_flight.iter().position(|n| *n == self.name) {
                in_flight.swap_remove(pos);
            }
        }
        let counter = if self.started {
            &self.shared.active
        } else {
            &self.shared.queued
        };
        counter.fetch_sub(1, Ordering::SeqCst);
        self.shared.completion.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScenarioError;
    use crate::gates::Gate;
    use crate::scenarios::{ScenarioFn, ScenarioSpec};

    fn admit(spec: ScenarioSpec) -> Admission {
        let permits = GatePermits::try_acquire(spec.gates()).expect("gates free");
        Admission { spec, permits }
    }

    async fn wait_quiescent(pool: &WorkerPool) {
        while !pool.is_quiescent() {
            pool.completion().notified().await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn releases_gates_after_failure_and_panic() {
        let gate = Arc::new(Gate::new("db", 2));
        let pool = WorkerPool::new(2, Bus::new(64));

        let failing = ScenarioSpec::new(
            ScenarioFn::arc("fails", |_ctx: CancellationToken| async {
                Err::<(), _>(ScenarioError::fail("nope"))
            }),
            [Arc::clone(&gate)],
        );
        let panicking = ScenarioSpec::new(
            ScenarioFn::arc("panics", |_ctx: CancellationToken| async {
                if true {
                    panic!("boom");
                }
                Ok::<_, ScenarioError>(())
            }),
            [Arc::clone(&gate)],
        );

        pool.submit(admit(failing)).expect("open");
        pool.submit(admit(panicking)).expect("open");
        assert_eq!(gate.available(), 0);

        wait_quiescent(&pool).await;
        assert_eq!(gate.available(), 2);

        let mut failed = pool.failed();
        failed.sort();
        assert_eq!(failed, vec!["fails".to_string(), "panics".to_string()]);
        assert!(pool.running().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn parallelism_bounds_execution() {
        let pool = WorkerPool::new(1, Bus::new(64));
        let gate = Arc::new(Gate::new("marker", 1));
        let release = CancellationToken::new();

        let r = release.clone();
        pool.submit(admit(ScenarioSpec::ungated(ScenarioFn::arc(
            "first",
            move |_ctx: CancellationToken| {
                let r = r.clone();
                async move {
                    r.cancelled().await;
                    Ok::<_, ScenarioError>(())
                }
            },
        ))))
        .expect("open");
        pool.submit(admit(ScenarioSpec::new(
            ScenarioFn::arc("second", |_ctx: CancellationToken| async {
                Ok::<_, ScenarioError>(())
            }),
            [Arc::clone(&gate)],
        )))
        .expect("open");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(pool.has_queued_submissions());
        assert!(!pool.is_quiescent());
        assert_eq!(pool.running(), vec!["first".to_string(), "second".to_string()]);

        release.cancel();
        wait_quiescent(&pool).await;
        assert!(!pool.has_queued_submissions());
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown_aborts_stragglers_and_frees_gates() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let pool = WorkerPool::new(2, bus);
        let gate = Arc::new(Gate::new("ftp", 1));

        pool.submit(admit(ScenarioSpec::new(
            ScenarioFn::arc("stubborn", |_ctx: CancellationToken| async {
                std::future::pending::<()>().await;
                Ok::<_, ScenarioError>(())
            }),
            [Arc::clone(&gate)],
        )))
        .expect("open");
        tokio::time::sleep(Duration::from_millis(20)).await;

        let forced = pool.shutdown(Duration::from_millis(50)).await;
        assert_eq!(forced, vec!["stubborn".to_string()]);
        assert_eq!(gate.available(), 1);
        assert!(pool.is_quiescent());

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert!(kinds.contains(&EventKind::GraceExceeded));
        assert!(!kinds.contains(&EventKind::AllStoppedWithin));

        let late = ScenarioSpec::ungated(ScenarioFn::arc("late", |_ctx: CancellationToken| async {
            Ok::<_, ScenarioError>(())
        }));
        assert_eq!(pool.submit(admit(late)), Err(SubmitError::Closed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn never_quiescent_while_a_scenario_starts() {
        use std::sync::atomic::AtomicBool;

        let pool = Arc::new(WorkerPool::new(1, Bus::new(1024)));
        let mut false_idle = 0;

        for round in 0..300 {
            let done = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&done);
            pool.submit(admit(ScenarioSpec::ungated(ScenarioFn::arc(
                format!("tick-{round}"),
                move |_ctx: CancellationToken| {
                    let flag = Arc::clone(&flag);
                    async move {
                        tokio::time::sleep(Duration::from_millis(1)).await;
                        flag.store(true, Ordering::SeqCst);
                        Ok::<_, ScenarioError>(())
                    }
                },
            ))))
            .expect("open");

            let watcher = Arc::clone(&pool);
            false_idle += tokio::task::spawn_blocking(move || {
                let mut seen = 0;
                loop {
                    let idle = watcher.is_quiescent();
                    let finished = done.load(Ordering::SeqCst);
                    if idle && !finished {
                        seen += 1;
                    }
                    if idle && finished {
                        return seen;
                    }
                    std::hint::spin_loop();
                }
            })
            .await
            .expect("watcher");
        }

        assert_eq!(false_idle, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cooperative_scenarios_stop_within_grace() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let pool = WorkerPool::new(2, bus);

        pool.submit(admit(ScenarioSpec::ungated(ScenarioFn::arc(
            "polite",
            |ctx: CancellationToken| async move {
                ctx.cancelled().await;
                Err::<(), _>(ScenarioError::Canceled)
            },
        ))))
        .expect("open");
        tokio::time::sleep(Duration::from_millis(20)).await;

        let forced = pool.shutdown(Duration::from_secs(5)).await;
        assert!(forced.is_empty());
        assert!(pool.failed().is_empty());

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert!(kinds.contains(&EventKind::ScenarioCanceled));
        assert_eq!(kinds.last(), Some(&EventKind::AllStoppedWithin));
    }
}
