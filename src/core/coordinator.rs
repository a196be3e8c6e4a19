//! # Coordinator: gated admission of pending scenarios.
//!
//! The coordinator owns the pending list (seeded in priority order) and hands
//! out at most one [`Admission`] per scan.
//!
//! ```text
//! try_admit():
//!   lock pending (bounded wait, busy => None)
//!   for spec in pending (priority order):
//!       GatePermits::try_acquire(spec.gates)
//!         ├─ Some(permits) ─► remove spec, publish ScenarioAdmitted, return
//!         └─ None          ─► rolled back, try next spec in the same scan
//!   return None
//! ```
//!
//! ## Rules
//! - scans and rollbacks happen under one critical section
//! - acquisition never blocks on a gate; a contested scenario is skipped
//! - a rejected scenario stays pending, in place, for the next scan
//! - the list is re-scanned from the start on every attempt, so live gate
//!   availability always wins over the initial ordering
//!
//! ## Stalls
//! When the worker pool is quiescent nothing can return a permit. A pending
//! scenario whose gate has no permit left at that point will never run;
//! [`Coordinator::report_stalls`] surfaces it once as `ScenarioStalled`.

use std::collections::HashSet;
use std::time::Duration;

use tokio::{sync::Mutex, time};
use tracing::{debug, warn};

use crate::events::{Bus, Event, EventKind};
use crate::gates::GatePermits;
use crate::scenarios::ScenarioSpec;

/// A scenario that holds every gate it needs and is ready for a worker.
#[derive(Debug)]
pub struct Admission {
    /// The admitted scenario.
    pub spec: ScenarioSpec,
    /// Permits held on its gates; released when dropped.
    pub permits: GatePermits,
}

struct Pending {
    queue: Vec<ScenarioSpec>,
    stalled: HashSet<String>,
}

/// Owner of the pending set.
pub struct Coordinator {
    pending: Mutex<Pending>,
    lock_timeout: Duration,
    bus: Bus,
}

impl Coordinator {
    /// Seeds the coordinator with already ordered specs.
    ///
    /// `lock_timeout` bounds the wait for the critical section in
    /// [`Coordinator::try_admit`].
    pub fn new(ordered: Vec<ScenarioSpec>, lock_timeout: Duration, bus: Bus) -> Self {
        Self {
            pending: Mutex::new(Pending {
                queue: ordered,
                stalled: HashSet::new(),
            }),
            lock_timeout,
            bus,
        }
    }

    /// Admits the first pending scenario whose gates can all be entered.
    ///
    /// Returns `None` when nothing is admissible right now, or when the
    /// critical section stayed busy for longer than the lock timeout.
    pub async fn try_admit(&self) -> Option<Admission> {
        let mut pending = time::timeout(self.lock_timeout, self.pending.lock())
            .await
            .ok()?;

        let (idx, permits) = pending
            .queue
            .iter()
            .enumerate()
            .find_map(|(i, spec)| GatePermits::try_acquire(spec.gates()).map(|p| (i, p)))?;
        let spec = pending.queue.remove(idx);
        drop(pending);

        debug!(scenario = spec.name(), gates = ?permits.gate_names(), "scenario admitted");
        self.bus.publish(
            Event::new(EventKind::ScenarioAdmitted)
                .with_scenario(spec.name())
                .with_count(permits.len()),
        );
        Some(Admission { spec, permits })
    }

    /// Number of scenarios not yet admitted.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.queue.len()
    }

    /// Names of scenarios not yet admitted, in scan order.
    pub async fn pending_names(&self) -> Vec<String> {
        self.pending
            .lock()
            .await
            .queue
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// `true` once every scenario has been admitted.
    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.queue.is_empty()
    }

    /// Reports pending scenarios blocked on an exhausted gate.
    ///
    /// Only meaningful while the worker pool is quiescent. Each scenario is
    /// reported at most once per run. Returns the number newly reported.
    pub async fn report_stalls(&self) -> usize {
        let mut pending = self.pending.lock().await;
        let Pending { queue, stalled } = &mut *pending;

        let mut reported = 0;
        for spec in queue.iter() {
            let Some(gate) = spec.gates().iter().find(|g| g.available() == 0) else {
                continue;
            };
            if !stalled.insert(spec.name().to_string()) {
                continue;
            }
            warn!(
                scenario = spec.name(),
                gate = gate.name(),
                capacity = gate.capacity(),
                "scenario stalled: gate has no permits and no scenario is running"
            );
            self.bus.publish(
                Event::new(EventKind::ScenarioStalled)
                    .with_scenario(spec.name())
                    .with_gate(gate.name()),
            );
            reported += 1;
        }
        reported
    }
}
