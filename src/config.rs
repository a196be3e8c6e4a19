//! # Suite runtime configuration.
//!
//! Provides [`Config`], the numeric parameters of a suite run. Parsing them from
//! a command line or a file is left to the embedding application; the runtime
//! only validates them.
//!
//! ## Rules
//! - every duration and count must be strictly positive
//! - `suite_timeout = None` means "no suite-wide timeout"; `Some(0s)` is invalid
//! - validation runs in [`Suite::new`](crate::Suite::new), before anything is scheduled

use std::time::Duration;

use crate::error::SuiteError;

/// Global configuration for a suite run.
///
/// ## Field semantics
/// - `parallelism`: maximum scenarios executing at once
/// - `suite_timeout`: wall-clock budget for the whole run (`None` = unbounded)
/// - `poll_interval`: dispatch loop back-off while the pool is saturated or draining
/// - `gate_poll_interval`: longest wait for the coordinator's critical section
/// - `grace`: how long in-flight scenarios may keep running after shutdown begins
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of worker slots.
    pub parallelism: usize,

    /// Suite-wide timeout.
    ///
    /// On expiry the dispatch loop stops admitting work and the worker pool is
    /// shut down; the run ends with [`SuiteError::TimedOut`].
    pub suite_timeout: Option<Duration>,

    /// Back-off used by the dispatch loop when it has nothing to do right now.
    ///
    /// The wait is cancellable and is cut short whenever a worker finishes.
    pub poll_interval: Duration,

    /// Maximum wait for exclusive access to the pending set.
    ///
    /// If another scan holds it longer, the attempt yields and is retried on
    /// the next loop iteration.
    pub gate_poll_interval: Duration,

    /// Grace period for in-flight scenarios once shutdown begins.
    ///
    /// Scenarios still running afterwards are aborted; their gates are released
    /// by the abort itself.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl Config {
    /// Checks that every parameter is strictly positive.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use suitevisor::Config;
    ///
    /// let mut cfg = Config::default();
    /// assert!(cfg.validate().is_ok());
    ///
    /// cfg.suite_timeout = Some(Duration::ZERO);
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), SuiteError> {
        let checks: [(&'static str, bool); 6] = [
            ("parallelism", self.parallelism > 0),
            (
                "suite_timeout",
                self.suite_timeout.is_none_or(|d| d > Duration::ZERO),
            ),
            ("poll_interval", self.poll_interval > Duration::ZERO),
            ("gate_poll_interval", self.gate_poll_interval > Duration::ZERO),
            ("grace", self.grace > Duration::ZERO),
            ("bus_capacity", self.bus_capacity > 0),
        ];
        match checks.iter().find(|(_, ok)| !*ok) {
            Some(&(field, _)) => Err(SuiteError::InvalidConfig { field }),
            None => Ok(()),
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `parallelism` = available CPUs (1 if unknown)
    /// - `suite_timeout = None`
    /// - `poll_interval = 250ms`
    /// - `gate_poll_interval = 500ms`
    /// - `grace = 300s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            suite_timeout: None,
            poll_interval: Duration::from_millis(250),
            gate_poll_interval: Duration::from_millis(500),
            grace: Duration::from_secs(300),
            bus_capacity: 1024,
        }
    }
}
