//! # Gate registry: one shared [`Gate`] per name.
//!
//! Scenarios that name the same gate must contend for the same permits, so gate
//! construction goes through [`GateRegistry::resolve`]. The first resolution of a
//! name fixes its capacity; later calls get the same instance whatever capacity
//! they pass.
//!
//! A registry is a plain value scoped to one suite run. Build one, resolve the
//! gates while assembling [`ScenarioSpec`](crate::ScenarioSpec)s, then drop it
//! with the run.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::gate::Gate;

/// Name → gate map with first-writer-wins capacity.
#[derive(Debug, Default)]
pub struct GateRegistry {
    gates: RwLock<HashMap<String, Arc<Gate>>>,
}

impl GateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the gate registered under `name`, creating it with `capacity`
    /// on first use.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use suitevisor::GateRegistry;
    ///
    /// let registry = GateRegistry::new();
    /// let a = registry.resolve("db", 1);
    /// let b = registry.resolve("db", 5);
    /// assert!(Arc::ptr_eq(&a, &b));
    /// assert_eq!(b.capacity(), 1);
    /// ```
    pub fn resolve(&self, name: &str, capacity: usize) -> Arc<Gate> {
        if let Some(gate) = self.read().get(name) {
            return Arc::clone(gate);
        }

        let mut gates = self.gates.write().unwrap_or_else(|p| p.into_inner());
        let gate = gates
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Gate::new(name, capacity)));
        Arc::clone(gate)
    }

    /// Returns the gate registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<Gate>> {
        self.read().get(name).cloned()
    }

    /// Number of distinct gates.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// `true` if no gate was resolved yet.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sorted `(name, available, capacity)` triples for diagnostics.
    pub fn snapshot(&self) -> Vec<(String, usize, usize)> {
        let mut out: Vec<_> = self
            .read()
            .values()
            .map(|g| (g.name().to_string(), g.available(), g.capacity()))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        out
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Gate>>> {
        self.gates.read().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_writer_wins() {
        let reg = GateRegistry::new();
        let first = reg.resolve("printer", 2);
        let again = reg.resolve("printer", 10);

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.capacity(), 2);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn shared_permits_across_resolutions() {
        let reg = GateRegistry::new();
        let a = reg.resolve("g", 1);
        let b = reg.resolve("g", 1);

        assert!(a.try_enter());
        assert!(!b.try_enter());
        a.leave();
        assert!(b.try_enter());
    }

    #[test]
    fn snapshot_is_sorted() {
        let reg = GateRegistry::new();
        reg.resolve("zeta", 1);
        reg.resolve("alpha", 3);
        reg.resolve("alpha", 3).try_enter();

        assert_eq!(
            reg.snapshot(),
            vec![("alpha".to_string(), 2, 3), ("zeta".to_string(), 1, 1)]
        );
        assert!(reg.get("alpha").is_some());
        assert!(reg.get("missing").is_none());
    }

    #[test]
    fn registries_are_independent() {
        let one = GateRegistry::new();
        let two = GateRegistry::new();
        assert!(!Arc::ptr_eq(&one.resolve("g", 1), &two.resolve("g", 1)));
        assert!(!one.is_empty());
    }
}
