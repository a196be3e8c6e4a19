//! # Scenario abstraction.
//!
//! A [`Scenario`] is an opaque, cancelable unit of work. The runtime never
//! looks inside the body: it only calls [`Scenario::run`] once after the
//! scenario's gates were acquired, and releases them when the returned future
//! completes (or is dropped).
//!
//! The common handle type is [`ScenarioRef`], an `Arc<dyn Scenario>`.

use std::{future::Future, pin::Pin, sync::Arc};

use tokio_util::sync::CancellationToken;

use crate::error::ScenarioError;

/// Boxed future returned by [`Scenario::run`].
pub type BoxScenarioFuture =
    Pin<Box<dyn Future<Output = Result<(), ScenarioError>> + Send + 'static>>;

/// Shared handle to a scenario object.
pub type ScenarioRef = Arc<dyn Scenario>;

/// # Asynchronous, cancelable scenario body.
///
/// `ctx` is cancelled when the suite times out or is interrupted. Bodies should
/// check it at convenient points and return [`ScenarioError::Canceled`]; bodies
/// that ignore it are aborted after the shutdown grace period.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use suitevisor::{BoxScenarioFuture, Scenario, ScenarioError};
///
/// struct Login;
///
/// impl Scenario for Login {
///     fn name(&self) -> &str { "login" }
///
///     fn run(&self, ctx: CancellationToken) -> BoxScenarioFuture {
///         Box::pin(async move {
///             if ctx.is_cancelled() {
///                 return Err(ScenarioError::Canceled);
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Scenario: Send + Sync + 'static {
    /// Stable, human-readable identifier used in events and reports.
    fn name(&self) -> &str;

    /// Creates the future executing this scenario once.
    fn run(&self, ctx: CancellationToken) -> BoxScenarioFuture;
}
