//! upwatch — continuous HTTP availability monitor.
//!
//! Probes a single URL on a fixed interval, classifies each probe as
//! UP or DOWN, and prints a running log of state changes plus a final
//! summary on CTRL+C.
//!
//! # Usage
//!
//! ```text
//! upwatch --url https://example.com --max-ms 5000 --interval-ms 1000
//! ```
//!
//! Report lines and the summary go to stdout; diagnostics go to stderr
//! via `RUST_LOG`-filtered tracing.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use upwatch_core::{Check, MonitorConfig};
use upwatch_monitor::{Poller, ProbeFn, Reporter};
use upwatch_probe::HttpProber;
use upwatch_stats::Summary;

#[derive(Parser)]
#[command(name = "upwatch", about = "Continuous HTTP availability monitor", version)]
struct Cli {
    /// The url to check.
    #[arg(long)]
    url: String,

    /// Probe timeout in milliseconds; a slower response counts as down.
    #[arg(long = "max-ms", default_value_t = 30_000)]
    max_ms: u64,

    /// Milliseconds between scheduled probes.
    #[arg(long = "interval-ms", default_value_t = 1_000)]
    interval_ms: u64,

    /// Report every check instead of only state changes.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,upwatch=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_millis(cli.max_ms);
    let interval = Duration::from_millis(cli.interval_ms);

    let config = MonitorConfig::new(cli.url.clone(), interval, timeout)
        .with_verbose(cli.verbose);

    let prober = Arc::new(HttpProber::new(timeout)?);
    let probe: ProbeFn = Arc::new(move |target: String| {
        let prober = prober.clone();
        Box::pin(async move { prober.probe(&target).await })
    });
    let reporter: Reporter = Box::new(|check: &Check| println!("{}", format_check(check)));

    // Fails fast on an empty target or zero interval, before any probe.
    let poller = Poller::new(config, probe, reporter)?;

    println!("Running uptime check on '{}'", cli.url);
    println!("Timeout is set to {timeout:?}");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        // Idempotent: repeated signals cannot re-trigger the shutdown path.
        let _ = shutdown_tx.send(true);
    });

    let summary = poller.run(shutdown_rx).await;

    println!();
    print!("{}", format_summary(&summary));
    Ok(())
}

/// One tab-delimited line per reported check:
/// state, status code or "n/a", elapsed, reason when down.
fn format_check(check: &Check) -> String {
    let status = match check.status_code() {
        Some(code) => code.to_string(),
        None => "n/a".to_string(),
    };
    match check.down_reason() {
        Some(reason) => format!("Down\t{status}\t{:?}\t{reason}", check.elapsed()),
        None => format!("Up\t{status}\t{:?}", check.elapsed()),
    }
}

fn format_summary(summary: &Summary) -> String {
    format!(
        "{} outages of {} checks\nAverage loadtime: {:?}\nDowntime: {:?}\nUptime: {:?}\n",
        summary.outages,
        summary.total_checks,
        summary.average_load_time,
        summary.downtime,
        summary.uptime,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use upwatch_core::DownReason;

    fn span() -> (Instant, Instant) {
        let started = Instant::now();
        (started, started + Duration::from_millis(150))
    }

    #[test]
    fn up_line_has_state_status_and_elapsed() {
        let (started, finished) = span();
        let line = format_check(&Check::completed(started, finished, 200));
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], "Up");
        assert_eq!(fields[1], "200");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn down_line_carries_reason_and_na_status() {
        let (started, finished) = span();
        let line = format_check(&Check::failed(started, finished, DownReason::TimedOut));
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], "Down");
        assert_eq!(fields[1], "n/a");
        assert_eq!(fields[3], "request timed out");
    }

    #[test]
    fn non_200_line_keeps_the_status_code() {
        let (started, finished) = span();
        let line = format_check(&Check::completed(started, finished, 404));
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], "Down");
        assert_eq!(fields[1], "404");
        assert_eq!(fields[3], "non 200 response code");
    }

    #[test]
    fn summary_block_lists_all_totals() {
        let summary = Summary {
            outages: 2,
            total_checks: 40,
            average_load_time: Duration::from_millis(120),
            downtime: Duration::from_secs(3),
            uptime: Duration::from_secs(37),
        };
        let block = format_summary(&summary);
        assert!(block.starts_with("2 outages of 40 checks\n"));
        assert!(block.contains("Average loadtime: 120ms\n"));
        assert!(block.contains("Downtime: 3s\n"));
        assert!(block.contains("Uptime: 37s\n"));
    }
}
