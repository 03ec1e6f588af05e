use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::daemon::Bridge;
use crate::diagnostics::health::HealthReport;
use crate::runtime::observability::{LogObserver, Observer};
use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn dispatch(cli: Cli, config: Config, shutdown: CancellationToken) -> Result<()> {
    let observer: Arc<dyn Observer> = Arc::new(LogObserver::new(config.service_name.clone()));
    let bridge = Bridge::from_config(config, Arc::clone(&observer)).context("wire bridge")?;

    let outcome = match cli.selected_command() {
        Commands::Run => bridge.run(shutdown).await,
        Commands::Check => run_check(&bridge).await,
    };
    observer.flush();
    outcome
}

async fn run_check(bridge: &Bridge) -> Result<()> {
    let report = bridge.health().report().await;
    print!("{}", render_report(&report));

    let gtg = bridge.health().gtg().await;
    if !gtg.good_to_go {
        bail!(
            "not good to go: {}",
            gtg.message.unwrap_or_else(|| "unknown failure".into())
        );
    }
    println!("good to go");
    Ok(())
}

fn render_report(report: &HealthReport) -> String {
    let mut out = format!("{} ({})\n", report.name, report.system_code);
    for check in &report.checks {
        let mark = if check.ok { "ok  " } else { "FAIL" };
        let _ = writeln!(out, "  [{mark}] {}: {}", check.name, check.check_output);
    }
    out
}
