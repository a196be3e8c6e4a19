//! # Scenario specification for gated scheduling.
//!
//! [`ScenarioSpec`] bundles a [`ScenarioRef`] with the gates it must hold while
//! running. Gates are de-duplicated by name at construction (first occurrence
//! wins, order preserved), so a scenario never enters the same gate twice.
//! The list is fixed from then on.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::gates::Gate;
use crate::scenarios::scenario::ScenarioRef;

/// A scenario together with its required gates.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use suitevisor::{GateRegistry, ScenarioError, ScenarioFn, ScenarioSpec};
///
/// let gates = GateRegistry::new();
/// let body = ScenarioFn::arc("pay", |_ctx: CancellationToken| async { Ok::<_, ScenarioError>(()) });
///
/// let spec = ScenarioSpec::new(
///     body,
///     [gates.resolve("db", 1), gates.resolve("db", 1), gates.resolve("psp", 2)],
/// );
/// assert_eq!(spec.gate_names(), vec!["db", "psp"]);
/// assert!(spec.is_gated());
/// ```
#[derive(Clone)]
pub struct ScenarioSpec {
    scenario: ScenarioRef,
    gates: Vec<Arc<Gate>>,
}

impl ScenarioSpec {
    /// Creates a spec, collapsing gates that share a name.
    pub fn new(scenario: ScenarioRef, gates: impl IntoIterator<Item = Arc<Gate>>) -> Self {
        let mut seen = HashSet::new();
        let gates = gates
            .into_iter()
            .filter(|g| seen.insert(g.name().to_string()))
            .collect();
        Self { scenario, gates }
    }

    /// Creates a spec that requires no gates.
    pub fn ungated(scenario: ScenarioRef) -> Self {
        Self {
            scenario,
            gates: Vec::new(),
        }
    }

    /// Returns the scenario body.
    pub fn scenario(&self) -> &ScenarioRef {
        &self.scenario
    }

    /// Convenience: returns the scenario name.
    pub fn name(&self) -> &str {
        self.scenario.name()
    }

    /// Required gates in acquisition order.
    pub fn gates(&self) -> &[Arc<Gate>] {
        &self.gates
    }

    /// Required gate names in acquisition order.
    pub fn gate_names(&self) -> Vec<&str> {
        self.gates.iter().map(|g| g.name()).collect()
    }

    /// `true` if at least one gate is required.
    pub fn is_gated(&self) -> bool {
        !self.gates.is_empty()
    }
}

impl fmt::Debug for ScenarioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioSpec")
            .field("name", &self.name())
            .field("gates", &self.gate_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScenarioError;
    use crate::gates::GateRegistry;
    use crate::scenarios::ScenarioFn;
    use tokio_util::sync::CancellationToken;

    fn body(name: &'static str) -> ScenarioRef {
        ScenarioFn::arc(name, |_ctx: CancellationToken| async { Ok::<_, ScenarioError>(()) })
    }

    #[test]
    fn duplicates_collapse_keeping_first_order() {
        let reg = GateRegistry::new();
        let spec = ScenarioSpec::new(
            body("s"),
            [
                reg.resolve("b", 1),
                reg.resolve("a", 1),
                reg.resolve("b", 1),
                reg.resolve("a", 1),
            ],
        );
        assert_eq!(spec.gate_names(), vec!["b", "a"]);
    }

    #[test]
    fn ungated_spec() {
        let spec = ScenarioSpec::ungated(body("plain"));
        assert!(!spec.is_gated());
        assert_eq!(spec.name(), "plain");
        assert!(format!("{spec:?}").contains("plain"));
    }
}
