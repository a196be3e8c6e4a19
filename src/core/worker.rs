//! # Execute one admitted scenario.
//!
//! Runs the scenario body once with the pool's cancellation token and publishes
//! its lifecycle events to the [`Bus`].
//!
//! ## Event flow
//!
//! ```text
//! publish ScenarioStarting
//! scenario.run(token)
//!   ├─ Ok(())          ──► publish ScenarioFinished
//!   ├─ Err(Canceled)   ──► publish ScenarioCanceled ("cancelled")
//!   ├─ Err(Fail)       ──► publish ScenarioFailed
//!   └─ panic           ──► caught ──► publish ScenarioFailed ("panicked: ...")
//! ```
//!
//! ## Rules
//! - exactly one terminal event per call
//! - no retries; a scenario runs at most once per suite
//! - gates are not touched here: the caller owns the permits and releases them
//!   after this returns (or when its task is aborted)

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::{ScenarioError, panic_message};
use crate::events::{Bus, Event, EventKind};
use crate::scenarios::ScenarioSpec;

/// Runs `spec` once, publishing starting and terminal events.
///
/// A panic in the body is converted into [`ScenarioError::Fail`].
pub(crate) async fn run_scenario(
    spec: &ScenarioSpec,
    token: CancellationToken,
    bus: &Bus,
) -> Result<(), ScenarioError> {
    let name = spec.name();
    bus.publish(Event::new(EventKind::ScenarioStarting).with_scenario(name));

    let started = Instant::now();
    let res = match AssertUnwindSafe(spec.scenario().run(token))
        .catch_unwind()
        .await
    {
        Ok(res) => res,
        Err(payload) => Err(ScenarioError::fail(format!(
            "panicked: {}",
            panic_message(&*payload)
        ))),
    };
    let elapsed = started.elapsed();

    match &res {
        Ok(()) => bus.publish(
            Event::new(EventKind::ScenarioFinished)
                .with_scenario(name)
                .with_elapsed(elapsed),
        ),
        Err(ScenarioError::Canceled) => bus.publish(
            Event::new(EventKind::ScenarioCanceled)
                .with_scenario(name)
                .with_reason("cancelled"),
        ),
        Err(e) => bus.publish(
            Event::new(EventKind::ScenarioFailed)
                .with_scenario(name)
                .with_reason(e.as_message())
                .with_elapsed(elapsed),
        ),
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioFn;

    async fn kinds_for(spec: ScenarioSpec) -> (Result<(), ScenarioError>, Vec<Event>) {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let res = run_scenario(&spec, CancellationToken::new(), &bus).await;
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        (res, events)
    }

    #[tokio::test]
    async fn success_publishes_starting_then_finished() {
        let spec = ScenarioSpec::ungated(ScenarioFn::arc("ok", |_ctx: CancellationToken| async {
            Ok::<_, ScenarioError>(())
        }));
        let (res, events) = kinds_for(spec).await;

        assert!(res.is_ok());
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::ScenarioStarting, EventKind::ScenarioFinished]
        );
    }

    #[tokio::test]
    async fn failure_carries_the_message() {
        let spec = ScenarioSpec::ungated(ScenarioFn::arc("bad", |_ctx: CancellationToken| async {
            Err::<(), _>(ScenarioError::fail("assertion failed"))
        }));
        let (res, events) = kinds_for(spec).await;

        assert!(matches!(res, Err(ScenarioError::Fail { .. })));
        let last = events.last().expect("terminal event");
        assert_eq!(last.kind, EventKind::ScenarioFailed);
        assert_eq!(last.reason.as_deref(), Some("error: assertion failed"));
    }

    #[tokio::test]
    async fn panic_becomes_failure() {
        let spec = ScenarioSpec::ungated(ScenarioFn::arc("boom", |_ctx: CancellationToken| async {
            if true {
                panic!("kaboom");
            }
            Ok::<_, ScenarioError>(())
        }));
        let (res, events) = kinds_for(spec).await;

        match res {
            Err(ScenarioError::Fail { error }) => assert_eq!(error, "panicked: kaboom"),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(events.last().map(|e| e.kind), Some(EventKind::ScenarioFailed));
    }

    #[tokio::test]
    async fn cancellation_is_not_a_failure() {
        let spec = ScenarioSpec::ungated(ScenarioFn::arc("stop", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err::<(), _>(ScenarioError::Canceled)
        }));
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();
        token.cancel();

        let res = run_scenario(&spec, token, &bus).await;
        assert!(res.as_ref().is_err_and(ScenarioError::is_cancellation));

        let _starting = rx.recv().await.expect("starting");
        let ev = rx.recv().await.expect("terminal");
        assert_eq!(ev.kind, EventKind::ScenarioCanceled);
        assert_eq!(ev.reason.as_deref(), Some("cancelled"));
    }
}
