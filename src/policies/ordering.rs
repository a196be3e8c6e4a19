//! # Ordering policy for pending scenarios.
//!
//! [`Priority`] ranks scenarios so the ones most likely to hit contention are
//! tried first. Without it, a long tail of ungated scenarios could keep every
//! worker busy while a gated scenario waits behind them.
//!
//! Rule (ascending):
//! 1. lowest remaining permits across the scenario's gates (ungated = last)
//! 2. more distinct gates first
//! 3. otherwise submission order (stable sort)
//!
//! Availability is sampled once, when the suite seeds the coordinator. The
//! order is advisory: every admission attempt re-checks live gate state.
//!
//! # Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use suitevisor::{GateRegistry, ScenarioError, ScenarioFn, ScenarioSpec, order_scenarios};
//!
//! let gates = GateRegistry::new();
//! let body = |n: &'static str| ScenarioFn::arc(n, |_ctx: CancellationToken| async { Ok::<_, ScenarioError>(()) });
//!
//! let ordered = order_scenarios(vec![
//!     ScenarioSpec::ungated(body("free")),
//!     ScenarioSpec::new(body("wide"), [gates.resolve("pool", 4)]),
//!     ScenarioSpec::new(body("narrow"), [gates.resolve("db", 1)]),
//! ]);
//! let names: Vec<_> = ordered.iter().map(|s| s.name()).collect();
//! assert_eq!(names, ["narrow", "wide", "free"]);
//! ```

use std::cmp::{Ordering, Reverse};

use crate::scenarios::ScenarioSpec;

/// Sort key of a scenario at classification time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Priority {
    /// Lowest `available()` among the scenario's gates; `None` when ungated.
    pub min_available: Option<usize>,
    /// Number of distinct gates required.
    pub gate_count: usize,
}

impl Priority {
    /// Samples the gates of `spec` once.
    pub fn classify(spec: &ScenarioSpec) -> Self {
        Self {
            min_available: spec.gates().iter().map(|g| g.available()).min(),
            gate_count: spec.gates().len(),
        }
    }

    fn key(&self) -> (usize, Reverse<usize>) {
        (
            self.min_available.unwrap_or(usize::MAX),
            Reverse(self.gate_count),
        )
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.min_available
            .is_none()
            .cmp(&other.min_available.is_none())
            .then_with(|| self.key().cmp(&other.key()))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns `specs` in priority order (stable for equal priorities).
pub fn order_scenarios(mut specs: Vec<ScenarioSpec>) -> Vec<ScenarioSpec> {
    specs.sort_by_cached_key(Priority::classify);
    specs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScenarioError;
    use crate::gates::GateRegistry;
    use crate::scenarios::{ScenarioFn, ScenarioRef};
    use tokio_util::sync::CancellationToken;

    fn body(name: String) -> ScenarioRef {
        ScenarioFn::arc(name, |_ctx: CancellationToken| async { Ok::<_, ScenarioError>(()) })
    }

    fn names(specs: &[ScenarioSpec]) -> Vec<&str> {
        specs.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn gated_scenario_sorts_before_a_hundred_ungated() {
        let reg = GateRegistry::new();
        let mut specs: Vec<_> = (0..100)
            .map(|i| ScenarioSpec::ungated(body(format!("free-{i}"))))
            .collect();
        specs.push(ScenarioSpec::new(body("gated".into()), [reg.resolve("g", 1)]));

        let ordered = order_scenarios(specs);
        assert_eq!(ordered[0].name(), "gated");
        assert_eq!(ordered[1].name(), "free-0");
        assert_eq!(ordered[100].name(), "free-99");
    }

    #[test]
    fn scarcer_gate_first_then_more_gates() {
        let reg = GateRegistry::new();
        let ordered = order_scenarios(vec![
            ScenarioSpec::new(body("cap3".into()), [reg.resolve("c3", 3)]),
            ScenarioSpec::new(body("cap1".into()), [reg.resolve("c1", 1)]),
            ScenarioSpec::new(
                body("cap3-two-gates".into()),
                [reg.resolve("c3", 3), reg.resolve("other", 5)],
            ),
        ]);
        assert_eq!(names(&ordered), ["cap1", "cap3-two-gates", "cap3"]);
    }

    #[test]
    fn uses_remaining_permits_not_capacity() {
        let reg = GateRegistry::new();
        let busy = reg.resolve("busy", 5);
        for _ in 0..5 {
            assert!(busy.try_enter());
        }
        let ordered = order_scenarios(vec![
            ScenarioSpec::new(body("idle".into()), [reg.resolve("idle", 2)]),
            ScenarioSpec::new(body("busy".into()), [busy]),
        ]);
        assert_eq!(names(&ordered), ["busy", "idle"]);
    }

    #[test]
    fn zero_capacity_gate_still_sorts_before_ungated() {
        let reg = GateRegistry::new();
        let gated = Priority::classify(&ScenarioSpec::new(
            body("never".into()),
            [reg.resolve("never", 0)],
        ));
        let free = Priority::classify(&ScenarioSpec::ungated(body("free".into())));
        assert!(gated < free);
        assert_eq!(gated.min_available, Some(0));
        assert_eq!(free.min_available, None);
    }

    #[test]
    fn ties_keep_submission_order() {
        let ordered = order_scenarios(vec![
            ScenarioSpec::ungated(body("a".into())),
            ScenarioSpec::ungated(body("b".into())),
            ScenarioSpec::ungated(body("c".into())),
        ]);
        assert_eq!(names(&ordered), ["a", "b", "c"]);
    }
}
