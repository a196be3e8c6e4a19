//! # Example: Gated Suite
//!
//! Eight checkout scenarios share a payment sandbox that accepts two sessions
//! at a time; three of them also need the single inventory fixture. Reporting
//! scenarios need no gate at all.
//!
//! Run with:
//! ```text
//! RUST_LOG=info cargo run --example gated_suite --features logging
//! ```

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use suitevisor::{
    Config, GateRegistry, LogWriter, ScenarioError, ScenarioFn, ScenarioRef, ScenarioSpec,
    Subscribe, Suite, SuiteReport,
};

fn scenario(name: String, work_ms: u64) -> ScenarioRef {
    ScenarioFn::arc(name, move |ctx: CancellationToken| async move {
        tokio::select! {
            _ = ctx.cancelled() => Err(ScenarioError::Canceled),
            _ = tokio::time::sleep(Duration::from_millis(work_ms)) => Ok(()),
        }
    })
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut cfg = Config::default();
    cfg.parallelism = 4;
    cfg.suite_timeout = Some(Duration::from_secs(30));
    cfg.grace = Duration::from_secs(5);

    let report = Arc::new(SuiteReport::new());
    let subs = vec![
        report.clone() as Arc<dyn Subscribe>,
        Arc::new(LogWriter::new()) as Arc<dyn Subscribe>,
    ];
    let suite = Suite::new(cfg, subs)?;

    let gates = GateRegistry::new();
    let mut specs = Vec::new();
    for i in 0..8 {
        let mut needs = vec![gates.resolve("payment-sandbox", 2)];
        if i % 3 == 0 {
            needs.push(gates.resolve("inventory-fixture", 1));
        }
        specs.push(ScenarioSpec::new(
            scenario(format!("checkout-{i}"), 150 + 40 * i),
            needs,
        ));
    }
    for i in 0..4 {
        specs.push(ScenarioSpec::ungated(scenario(format!("report-{i}"), 60)));
    }

    let outcome = suite.run(specs).await?;
    let summary = report.summary();
    println!(
        "ran {} scenarios in {:?}: {} passed, {} failed",
        outcome.scenarios,
        outcome.elapsed,
        summary.passed.len(),
        summary.failed.len()
    );
    for (name, available, capacity) in gates.snapshot() {
        println!("gate {name}: {available}/{capacity} free");
    }
    Ok(())
}
