//! # All-or-nothing gate acquisition with RAII release.
//!
//! [`GatePermits`] holds one permit from each gate a scenario requires. Permits
//! are returned in **reverse** acquisition order, exactly once, either through
//! [`GatePermits::release`] or when the value is dropped.
//!
//! Dropping is what makes release unconditional: a worker owns the permits for
//! the lifetime of its task, so they come back whether the scenario body
//! succeeds, fails, panics, or the task is aborted during forced shutdown.
//!
//! ```text
//! try_acquire([A, B, C])
//!   A.try_enter() ✓ ─► B.try_enter() ✓ ─► C.try_enter() ✗
//!                                           └─► rollback: B.leave(), A.leave()
//! ```

use std::sync::Arc;

use super::gate::Gate;

/// Permits held on a set of gates.
#[derive(Debug)]
pub struct GatePermits {
    held: Vec<Arc<Gate>>,
}

impl GatePermits {
    /// Tries to enter every gate in order.
    ///
    /// On the first refusal, every gate already entered is left again (in
    /// reverse order) and `None` is returned; gate state is as before the call.
    /// An empty slice always succeeds.
    pub fn try_acquire(gates: &[Arc<Gate>]) -> Option<Self> {
        let mut permits = Self {
            held: Vec::with_capacity(gates.len()),
        };
        for gate in gates {
            if !gate.try_enter() {
                // `permits` drops here and rolls back the partial acquisition.
                return None;
            }
            permits.held.push(Arc::clone(gate));
        }
        Some(permits)
    }

    /// Names of the held gates, in acquisition order.
    pub fn gate_names(&self) -> Vec<&str> {
        self.held.iter().map(|g| g.name()).collect()
    }

    /// Number of gates held.
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// `true` for an ungated scenario.
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Releases all permits now.
    pub fn release(mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        while let Some(gate) = self.held.pop() {
            gate.leave();
        }
    }
}

impl Drop for GatePermits {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gates(specs: &[(&str, usize)]) -> Vec<Arc<Gate>> {
        specs
            .iter()
            .map(|(n, c)| Arc::new(Gate::new(*n, *c)))
            .collect()
    }

    #[test]
    fn acquires_all_or_nothing() {
        let gs = gates(&[("a", 1), ("b", 0)]);
        assert!(GatePermits::try_acquire(&gs).is_none());
        assert_eq!(gs[0].available(), 1, "partial acquisition must be rolled back");
        assert_eq!(gs[1].available(), 0);
    }

    #[test]
    fn drop_releases_every_gate() {
        let gs = gates(&[("a", 1), ("b", 2)]);
        let permits = GatePermits::try_acquire(&gs).expect("gates free");
        assert_eq!(permits.gate_names(), vec!["a", "b"]);
        assert_eq!(gs[0].available(), 0);
        assert_eq!(gs[1].available(), 1);

        drop(permits);
        assert_eq!(gs[0].available(), 1);
        assert_eq!(gs[1].available(), 2);
    }

    #[test]
    fn explicit_release_happens_once() {
        let gs = gates(&[("a", 1)]);
        let permits = GatePermits::try_acquire(&gs).expect("gate free");
        permits.release();
        assert_eq!(gs[0].available(), 1);

        // Another holder takes the permit; the earlier release must not give it back twice.
        let other = GatePermits::try_acquire(&gs).expect("gate free again");
        assert_eq!(gs[0].available(), 0);
        drop(other);
        assert_eq!(gs[0].available(), 1);
    }

    #[test]
    fn empty_gate_list_always_succeeds() {
        let permits = GatePermits::try_acquire(&[]).expect("ungated");
        assert!(permits.is_empty());
        assert_eq!(permits.len(), 0);
    }

    #[test]
    fn release_survives_panicking_holder() {
        let gs = gates(&[("a", 1), ("b", 1)]);
        let held = GatePermits::try_acquire(&gs).expect("gates free");

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _permits = held;
            panic!("scenario body blew up");
        }));

        assert!(res.is_err());
        assert_eq!(gs[0].available(), 1);
        assert_eq!(gs[1].available(), 1);
    }
}
