//! # Example: Suite Timeout
//!
//! One scenario asks for a gate with zero capacity and can never start; another
//! ignores cancellation. The suite timeout ends the run, the stuck scenario is
//! aborted after the grace period, and the error lists what did not finish.
//!
//! Run with:
//! ```text
//! cargo run --example suite_timeout
//! ```

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use suitevisor::{
    Config, GateRegistry, ScenarioError, ScenarioFn, ScenarioSpec, Subscribe, Suite, SuiteError,
    SuiteReport,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut cfg = Config::default();
    cfg.parallelism = 2;
    cfg.suite_timeout = Some(Duration::from_secs(1));
    cfg.grace = Duration::from_millis(300);

    let report = Arc::new(SuiteReport::new());
    let suite = Suite::new(cfg, vec![report.clone() as Arc<dyn Subscribe>])?;
    let gates = GateRegistry::new();

    let export = ScenarioFn::arc("nightly-export", |_ctx: CancellationToken| async {
        Ok::<_, ScenarioError>(())
    });
    let hang = ScenarioFn::arc("legacy-soap-call", |_ctx: CancellationToken| async {
        std::future::pending::<()>().await;
        Ok::<_, ScenarioError>(())
    });
    let quick = ScenarioFn::arc("health-check", |_ctx: CancellationToken| async {
        Ok::<_, ScenarioError>(())
    });

    let specs = vec![
        ScenarioSpec::new(export, [gates.resolve("ftp", 0)]),
        ScenarioSpec::new(hang, [gates.resolve("soap-endpoint", 1)]),
        ScenarioSpec::ungated(quick),
    ];

    match suite.run(specs).await {
        Err(err @ SuiteError::TimedOut { .. }) => {
            println!("{}: {}", err.as_label(), err.as_message());
            if let SuiteError::TimedOut {
                pending, forced, ..
            } = &err
            {
                println!("never admitted: {pending:?}");
                println!("aborted:        {forced:?}");
            }
        }
        Err(err) => return Err(err.into()),
        Ok(outcome) => println!("unexpectedly drained: {outcome:?}"),
    }

    let summary = report.summary();
    println!("stalled:  {:?}", summary.stalled);
    println!("canceled: {:?}", summary.canceled);
    println!("passed:   {:?}", summary.passed);
    Ok(())
}
