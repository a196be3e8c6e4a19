//! # SuiteReport: in-memory reporting sink.
//!
//! Collects scenario outcomes from lifecycle events. Serialization is up to
//! the caller; [`SuiteReport::summary`] returns a plain snapshot.
//!
//! ## Rules
//! - a scenario is "started" on `ScenarioStarting`
//! - the terminal event decides passed / failed / canceled
//! - `ScenarioStalled` is recorded separately (the scenario never started)
//! - `SuiteStarting` / `SuiteFinished` are counted, so callers can assert they
//!   fired exactly once

use std::collections::BTreeSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Snapshot of a [`SuiteReport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Number of `SuiteStarting` events seen.
    pub suites_started: usize,
    /// Number of `SuiteFinished` events seen.
    pub suites_finished: usize,
    /// Reason carried by the last `SuiteFinished` (`None` for a drained run).
    pub finish_reason: Option<String>,
    /// Whether the suite hit its timeout.
    pub timed_out: bool,
    /// Scenarios whose body started.
    pub started: BTreeSet<String>,
    /// Scenarios that finished successfully.
    pub passed: BTreeSet<String>,
    /// Scenarios that failed (error or panic).
    pub failed: BTreeSet<String>,
    /// Scenarios cancelled or aborted during shutdown.
    pub canceled: BTreeSet<String>,
    /// Scenarios diagnosed as unable to ever acquire their gates.
    pub stalled: BTreeSet<String>,
}

impl ReportSummary {
    /// Scenarios that started but have no terminal outcome yet.
    pub fn unfinished(&self) -> BTreeSet<String> {
        self.started
            .iter()
            .filter(|s| {
                !self.passed.contains(*s) && !self.failed.contains(*s) && !self.canceled.contains(*s)
            })
            .cloned()
            .collect()
    }
}

/// Subscriber accumulating a [`ReportSummary`].
#[derive(Default)]
pub struct SuiteReport {
    state: RwLock<ReportSummary>,
}

impl SuiteReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current summary.
    pub fn summary(&self) -> ReportSummary {
        self.state
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn record(&self, ev: &Event) {
        let mut s = self.state.write().unwrap_or_else(|p| p.into_inner());
        let name = ev.scenario.as_deref().map(str::to_string);

        match (ev.kind, name) {
            (EventKind::SuiteStarting, _) => s.suites_started += 1,
            (EventKind::SuiteFinished, _) => {
                s.suites_finished += 1;
                s.finish_reason = ev.reason.as_deref().map(str::to_string);
            }
            (EventKind::SuiteTimedOut, _) => s.timed_out = true,
            (EventKind::ScenarioStarting, Some(n)) => {
                s.started.insert(n);
            }
            (EventKind::ScenarioFinished, Some(n)) => {
                s.passed.insert(n);
            }
            (EventKind::ScenarioFailed, Some(n)) => {
                s.failed.insert(n);
            }
            (EventKind::ScenarioCanceled, Some(n)) => {
                s.canceled.insert(n);
            }
            (EventKind::ScenarioStalled, Some(n)) => {
                s.stalled.insert(n);
            }
            _ => {}
        }
    }
}

#[async_trait]
impl Subscribe for SuiteReport {
    async fn on_event(&self, event: &Event) {
        self.record(event);
    }

    fn name(&self) -> &'static str {
        "suite-report"
    }

    fn queue_capacity(&self) -> usize {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_outcomes() {
        let report = SuiteReport::new();
        for ev in [
            Event::new(EventKind::SuiteStarting),
            Event::new(EventKind::ScenarioStarting).with_scenario("a"),
            Event::new(EventKind::ScenarioStarting).with_scenario("b"),
            Event::new(EventKind::ScenarioStarting).with_scenario("c"),
            Event::new(EventKind::ScenarioFinished).with_scenario("a"),
            Event::new(EventKind::ScenarioFailed).with_scenario("b"),
            Event::new(EventKind::ScenarioStalled).with_scenario("z"),
            Event::new(EventKind::SuiteFinished),
        ] {
            report.on_event(&ev).await;
        }

        let s = report.summary();
        assert_eq!(s.suites_started, 1);
        assert_eq!(s.suites_finished, 1);
        assert!(s.passed.contains("a"));
        assert!(s.failed.contains("b"));
        assert!(s.stalled.contains("z"));
        assert_eq!(s.unfinished(), BTreeSet::from(["c".to_string()]));
        assert!(!s.timed_out);
        assert_eq!(s.finish_reason, None);
    }
}
