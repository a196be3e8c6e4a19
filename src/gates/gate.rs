//! # Gate: named, capacity-bounded permit counter.
//!
//! A [`Gate`] hands out at most `capacity` permits at a time. Both operations
//! are non-blocking; a scenario that cannot enter simply stays pending and is
//! retried by the coordinator on a later scan.
//!
//! ## Rules
//! - `0 <= available <= capacity` after every call
//! - `try_enter` is an atomic decrement-if-positive
//! - `leave` is an atomic increment clamped at `capacity`
//! - pairing `leave` with a prior successful `try_enter` is the caller's job

use std::sync::atomic::{AtomicUsize, Ordering};

/// Named counting permit resource shared by every scenario that references it.
#[derive(Debug)]
pub struct Gate {
    name: String,
    capacity: usize,
    available: AtomicUsize,
}

impl Gate {
    /// Creates a gate with all `capacity` permits available.
    ///
    /// A zero-capacity gate is legal; scenarios requiring it stay pending until
    /// the suite times out.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            available: AtomicUsize::new(capacity),
        }
    }

    /// Takes one permit if any is available.
    ///
    /// Returns `false` with no side effect when the gate is exhausted.
    pub fn try_enter(&self) -> bool {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Returns one permit, never exceeding `capacity`.
    pub fn leave(&self) {
        let cap = self.capacity;
        let _ = self
            .available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < cap).then_some(n + 1)
            });
    }

    /// Gate name (unique within a [`GateRegistry`](crate::GateRegistry)).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total permits, fixed at creation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently available (a snapshot; may change immediately).
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn enter_until_exhausted() {
        let g = Gate::new("db", 2);
        assert!(g.try_enter());
        assert!(g.try_enter());
        assert!(!g.try_enter());
        assert_eq!(g.available(), 0);

        g.leave();
        assert_eq!(g.available(), 1);
        assert!(g.try_enter());
    }

    #[test]
    fn leave_is_clamped_to_capacity() {
        let g = Gate::new("db", 1);
        g.leave();
        g.leave();
        assert_eq!(g.available(), 1);
    }

    #[test]
    fn zero_capacity_never_admits() {
        let g = Gate::new("never", 0);
        assert!(!g.try_enter());
        g.leave();
        assert_eq!(g.available(), 0);
    }

    #[test]
    fn capacity_invariant_holds_for_mixed_sequences() {
        let g = Gate::new("mixed", 3);
        let ops = [true, true, false, true, true, true, false, false, false, false, true];
        for enter in ops {
            if enter {
                g.try_enter();
            } else {
                g.leave();
            }
            assert!(g.available() <= g.capacity());
        }
    }

    #[test]
    fn concurrent_enters_never_oversubscribe() {
        let g = Arc::new(Gate::new("shared", 4));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let g = Arc::clone(&g);
                std::thread::spawn(move || g.try_enter())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|ok| *ok)
            .count();

        assert_eq!(admitted, 4);
        assert_eq!(g.available(), 0);
    }
}
