//! # Runtime events emitted by the suite runner, coordinator and workers.
//!
//! [`EventKind`] falls into four groups:
//! - **Suite lifecycle**: starting, finished, timed out
//! - **Scenario lifecycle**: admitted, starting, finished, failed, canceled, stalled
//! - **Shutdown**: requested, all stopped within grace, grace exceeded
//! - **Subscriber health**: overflow, panic
//!
//! [`Event`] carries a global sequence number, a wall-clock timestamp and
//! optional metadata depending on the kind.
//!
//! ## Ordering guarantees
//! `seq` is globally unique and increases monotonically. For one scenario,
//! `ScenarioStarting` always precedes its terminal event; across scenarios no
//! order is implied.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use suitevisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ScenarioFailed)
//!     .with_scenario("checkout")
//!     .with_reason("boom")
//!     .with_elapsed(Duration::from_millis(12));
//!
//! assert_eq!(ev.kind, EventKind::ScenarioFailed);
//! assert_eq!(ev.scenario.as_deref(), Some("checkout"));
//! assert_eq!(ev.elapsed_ms, Some(12));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Suite lifecycle ===
    /// Suite run is starting (published once per run).
    ///
    /// Sets:
    /// - `count`: number of scenarios to schedule
    SuiteStarting,

    /// Suite run finished (published exactly once per started run, however it ends).
    ///
    /// Sets:
    /// - `elapsed_ms`: wall time of the run
    /// - `reason`: error label when the run did not complete normally, or
    ///   `"dropped"` when the run future was dropped before finishing
    SuiteFinished,

    /// Suite-wide timeout expired.
    ///
    /// Sets:
    /// - `timeout_ms`: configured timeout
    /// - `count`: scenarios still pending
    SuiteTimedOut,

    // === Scenario lifecycle ===
    /// Coordinator acquired every gate of a scenario and handed it to the pool.
    ///
    /// Sets:
    /// - `scenario`: scenario name
    /// - `count`: number of gates held
    ScenarioAdmitted,

    /// A worker started executing the scenario body.
    ///
    /// Sets:
    /// - `scenario`: scenario name
    ScenarioStarting,

    /// Scenario body returned `Ok`.
    ///
    /// Sets:
    /// - `scenario`: scenario name
    /// - `elapsed_ms`: body wall time
    ScenarioFinished,

    /// Scenario body returned an error or panicked.
    ///
    /// Sets:
    /// - `scenario`: scenario name
    /// - `reason`: failure message
    /// - `elapsed_ms`: body wall time (panics included)
    ScenarioFailed,

    /// Scenario observed cancellation, or was aborted after the grace period.
    ///
    /// Sets:
    /// - `scenario`: scenario name
    /// - `reason`: `"cancelled"` or `"aborted"`
    ScenarioCanceled,

    /// Scenario can never be admitted with the current gate state: the pool is
    /// idle, so no holder will release a permit. Reported once per scenario.
    ///
    /// Sets:
    /// - `scenario`: scenario name
    /// - `gate`: first gate without permits
    ScenarioStalled,

    // === Shutdown ===
    /// Shutdown requested (timeout, OS signal or explicit cancel).
    ///
    /// Sets:
    /// - `reason`: `"timeout"`, `"signal"` or `"cancel"`
    ShutdownRequested,

    /// Every worker finished within the grace period.
    AllStoppedWithin,

    /// Grace period exceeded; remaining workers were aborted.
    ///
    /// Sets:
    /// - `count`: number of aborted scenarios
    GraceExceeded,

    // === Subscriber health ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `scenario`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `scenario`: subscriber name
    /// - `reason`: `"full"` or `"closed"`
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Scenario (or subscriber) name, if applicable.
    pub scenario: Option<Arc<str>>,
    /// Gate name, if applicable.
    pub gate: Option<Arc<str>>,
    /// Human-readable reason (errors, shutdown cause, overflow details).
    pub reason: Option<Arc<str>>,
    /// Elapsed wall time in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
    /// Configured timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Kind-specific count (scenarios, gates, aborted workers).
    pub count: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            scenario: None,
            gate: None,
            reason: None,
            elapsed_ms: None,
            timeout_ms: None,
            count: None,
        }
    }

    /// Attaches a scenario name.
    #[inline]
    pub fn with_scenario(mut self, name: impl Into<Arc<str>>) -> Self {
        self.scenario = Some(name.into());
        self
    }

    /// Attaches a gate name.
    #[inline]
    pub fn with_gate(mut self, name: impl Into<Arc<str>>) -> Self {
        self.gate = Some(name.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(millis(d));
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(millis(d));
        self
    }

    /// Attaches a count.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_scenario(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_scenario(subscriber)
            .with_reason(info)
    }

    /// `true` for events that close a scenario's lifecycle.
    #[inline]
    pub fn is_scenario_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ScenarioFinished | EventKind::ScenarioFailed | EventKind::ScenarioCanceled
        )
    }
}

fn millis(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::SuiteStarting);
        let b = Event::new(EventKind::SuiteFinished);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn durations_saturate() {
        let ev = Event::new(EventKind::SuiteTimedOut).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn terminal_kinds() {
        assert!(Event::new(EventKind::ScenarioFailed).is_scenario_terminal());
        assert!(Event::new(EventKind::ScenarioCanceled).is_scenario_terminal());
        assert!(!Event::new(EventKind::ScenarioStarting).is_scenario_terminal());
    }
}
