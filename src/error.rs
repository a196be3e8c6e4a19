//! Error types used by the suitevisor runtime and scenario bodies.
//!
//! This module defines three enums:
//!
//! - [`SuiteError`] - errors raised by the suite runner itself (configuration,
//!   empty workload, timeout, interruption).
//! - [`ScenarioError`] - errors raised by an individual scenario body.
//! - [`SubmitError`] - rejection of work handed to a closed worker pool.
//!
//! `SuiteError` and `ScenarioError` provide `as_label` (stable snake_case for
//! logs/metrics) and `as_message` for human-readable detail.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the suite runner.
///
/// `InvalidConfig` and `EmptyWorkload` abort a run before any scenario is
/// dispatched (and before `SuiteStarting` is published). `TimedOut` and
/// `Interrupted` are raised after the shutdown sequence has completed and carry
/// the scenarios that did not finish.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SuiteError {
    /// A timing or parallelism parameter was zero.
    #[error("invalid configuration: `{field}` must be greater than zero")]
    InvalidConfig {
        /// Name of the offending [`Config`](crate::Config) field.
        field: &'static str,
    },

    /// No scenarios were supplied.
    #[error("no scenarios to schedule")]
    EmptyWorkload,

    /// The suite-wide timeout expired before every scenario completed.
    #[error(
        "suite did not complete within {timeout:?}; pending={pending:?} running={running:?} forced={forced:?}"
    )]
    TimedOut {
        /// Configured suite timeout.
        timeout: Duration,
        /// Scenarios never admitted (still waiting on their gates).
        pending: Vec<String>,
        /// Scenarios executing when the timeout fired.
        running: Vec<String>,
        /// Scenarios that outlived the shutdown grace period and were aborted.
        forced: Vec<String>,
    },

    /// The run was interrupted (OS signal or [`Suite::cancel`](crate::Suite::cancel)).
    #[error("suite interrupted; pending={pending:?} running={running:?} forced={forced:?}")]
    Interrupted {
        /// Scenarios never admitted.
        pending: Vec<String>,
        /// Scenarios executing when the interruption arrived.
        running: Vec<String>,
        /// Scenarios that outlived the shutdown grace period and were aborted.
        forced: Vec<String>,
    },
}

impl SuiteError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use suitevisor::SuiteError;
    ///
    /// assert_eq!(SuiteError::EmptyWorkload.as_label(), "suite_empty_workload");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SuiteError::InvalidConfig { .. } => "suite_invalid_config",
            SuiteError::EmptyWorkload => "suite_empty_workload",
            SuiteError::TimedOut { .. } => "suite_timed_out",
            SuiteError::Interrupted { .. } => "suite_interrupted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SuiteError::InvalidConfig { field } => format!("invalid config: {field} must be > 0"),
            SuiteError::EmptyWorkload => "no scenarios supplied".to_string(),
            SuiteError::TimedOut {
                timeout,
                pending,
                running,
                ..
            } => format!(
                "timed out after {timeout:?}; {} pending, {} running",
                pending.len(),
                running.len()
            ),
            SuiteError::Interrupted {
                pending, running, ..
            } => format!(
                "interrupted; {} pending, {} running",
                pending.len(),
                running.len()
            ),
        }
    }

    /// Returns `true` when the run ended before draining its workload
    /// (timeout or interruption) rather than failing validation.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            SuiteError::TimedOut { .. } | SuiteError::Interrupted { .. }
        )
    }

    /// Scenarios that never left the pending set, if the run got that far.
    pub fn pending(&self) -> &[String] {
        match self {
            SuiteError::TimedOut { pending, .. } | SuiteError::Interrupted { pending, .. } => {
                pending
            }
            _ => &[],
        }
    }
}

/// # Errors produced by a scenario body.
///
/// The runtime never retries a scenario; these only decide which terminal
/// event the worker publishes.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Scenario body failed.
    #[error("scenario failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Scenario observed cancellation and exited early.
    #[error("context cancelled")]
    Canceled,
}

impl ScenarioError {
    /// Convenience constructor for [`ScenarioError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ScenarioError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use suitevisor::ScenarioError;
    ///
    /// assert_eq!(ScenarioError::fail("boom").as_label(), "scenario_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ScenarioError::Fail { .. } => "scenario_failed",
            ScenarioError::Canceled => "scenario_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ScenarioError::Fail { error } => format!("error: {error}"),
            ScenarioError::Canceled => "context cancelled".to_string(),
        }
    }

    /// `true` for [`ScenarioError::Canceled`].
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ScenarioError::Canceled)
    }
}

/// Error returned by [`WorkerPool::submit`](crate::WorkerPool::submit).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Pool is shutting down and no longer accepts work.
    #[error("worker pool closed")]
    Closed,
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
