//! # LogWriter: renders events as `tracing` records.
//!
//! Scenario failures, stalls and forced shutdown go out at `warn`, the rest at
//! `info`/`debug`. Install any `tracing` subscriber to see them.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO suitevisor: suite starting scenarios=12
//! DEBUG suitevisor: scenario admitted scenario="checkout" gates=2
//! INFO suitevisor: scenario finished scenario="checkout" elapsed_ms=41
//! WARN suitevisor: scenario stalled scenario="export" gate="ftp"
//! WARN suitevisor: suite timed out timeout_ms=60000 pending=1
//! INFO suitevisor: suite finished elapsed_ms=60012 reason="suite_timed_out"
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let scenario = e.scenario.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::SuiteStarting => info!(target: "suitevisor", scenarios = ?e.count, "suite starting"),
            EventKind::SuiteFinished => {
                info!(target: "suitevisor", elapsed_ms = ?e.elapsed_ms, reason, "suite finished")
            }
            EventKind::SuiteTimedOut => warn!(
                target: "suitevisor",
                timeout_ms = ?e.timeout_ms,
                pending = ?e.count,
                "suite timed out"
            ),
            EventKind::ScenarioAdmitted => {
                debug!(target: "suitevisor", scenario, gates = ?e.count, "scenario admitted")
            }
            EventKind::ScenarioStarting => info!(target: "suitevisor", scenario, "scenario starting"),
            EventKind::ScenarioFinished => {
                info!(target: "suitevisor", scenario, elapsed_ms = ?e.elapsed_ms, "scenario finished")
            }
            EventKind::ScenarioFailed => warn!(
                target: "suitevisor",
                scenario,
                reason,
                elapsed_ms = ?e.elapsed_ms,
                "scenario failed"
            ),
            EventKind::ScenarioCanceled => {
                info!(target: "suitevisor", scenario, reason, "scenario canceled")
            }
            EventKind::ScenarioStalled => warn!(
                target: "suitevisor",
                scenario,
                gate = e.gate.as_deref().unwrap_or("-"),
                "scenario stalled"
            ),
            EventKind::ShutdownRequested => info!(target: "suitevisor", reason, "shutdown requested"),
            EventKind::AllStoppedWithin => info!(target: "suitevisor", "all scenarios stopped within grace"),
            EventKind::GraceExceeded => {
                warn!(target: "suitevisor", aborted = ?e.count, "grace exceeded")
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "suitevisor", subscriber = scenario, reason, "subscriber overflow")
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "suitevisor", subscriber = scenario, reason, "subscriber panicked")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
