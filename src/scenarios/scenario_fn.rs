//! # Function-backed scenario (`ScenarioFn`)
//!
//! [`ScenarioFn`] wraps a closure `F: Fn(CancellationToken) -> Fut` and produces
//! a fresh future per run. Shared state, if any, goes into an explicit `Arc`
//! captured by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use suitevisor::{ScenarioFn, ScenarioRef, ScenarioError};
//!
//! let s: ScenarioRef = ScenarioFn::arc("checkout", |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(ScenarioError::Canceled);
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(s.name(), "checkout");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ScenarioError;
use crate::scenarios::scenario::{BoxScenarioFuture, Scenario};

/// Function-backed scenario implementation.
#[derive(Debug)]
pub struct ScenarioFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ScenarioFn<F> {
    /// Creates a new function-backed scenario.
    ///
    /// Prefer [`ScenarioFn::arc`] when you immediately need a [`ScenarioRef`](crate::ScenarioRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the scenario and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Scenario for ScenarioFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ScenarioError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: CancellationToken) -> BoxScenarioFuture {
        Box::pin((self.f)(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioRef;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn each_run_creates_a_fresh_future() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let s: ScenarioRef = ScenarioFn::arc("counter", move |_ctx: CancellationToken| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        s.run(CancellationToken::new()).await.expect("first run");
        s.run(CancellationToken::new()).await.expect("second run");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn body_sees_cancellation() {
        let s = ScenarioFn::new("cancel-aware", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                Err(ScenarioError::Canceled)
            } else {
                Ok(())
            }
        });
        let token = CancellationToken::new();
        token.cancel();

        let err = s.run(token).await.expect_err("should observe cancellation");
        assert!(err.is_cancellation());
    }
}
