//! Fence Monitor Demo
//!
//! Simulates a district grid of electric fences, warms each fence's anomaly
//! engine with an hour of history, then streams live ticks through a
//! `FleetMonitor` and prints every verdict that is not plain normal.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use colored::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fence_anomaly::{FenceId, FenceReport, FenceStatus, FleetMonitor, MonitorConfig};

mod sim;

use sim::{SimulatedFence, PROFILES};

/// Fence monitor demo
#[derive(Parser)]
#[command(name = "fence-monitor")]
#[command(about = "Simulated electric fence fleet with streaming anomaly detection", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "FENCE_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Number of live ticks to simulate
    #[arg(short, long, default_value_t = 30)]
    ticks: usize,

    /// Number of fences (1-10)
    #[arg(short, long, default_value_t = 10)]
    fences: usize,

    /// Probability that a tick is a surge or sag
    #[arg(long, default_value_t = 0.05)]
    fault_rate: f64,

    /// RNG seed for reproducible runs
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Print the JSON export of this fence at the end
    #[arg(long)]
    export: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if !(1..=PROFILES.len()).contains(&cli.fences) {
        bail!("--fences must be between 1 and {}", PROFILES.len());
    }
    if !(0.0..=1.0).contains(&cli.fault_rate) {
        bail!("--fault-rate must be within [0, 1]");
    }

    let config = MonitorConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let mut fleet = FleetMonitor::new(config)?;
    let mut rng = StdRng::seed_from_u64(cli.seed);

    print_banner();

    let mut fences: Vec<SimulatedFence> = PROFILES[..cli.fences]
        .iter()
        .map(SimulatedFence::new)
        .collect();

    // Warm-up: one hour of per-minute history per fence
    for fence in &fences {
        fleet.register(fence.profile.id)?;
        let id = FenceId::from(fence.profile.id);
        for (current, voltage, ts) in fence.history(&mut rng, 60) {
            fleet.analyze(&id, current, voltage, Some(ts))?;
        }
    }
    println!(
        "{} {} fences warmed with 60 readings each",
        "✓".green(),
        fences.len()
    );
    println!();

    // Live ticks
    let mut flagged = 0usize;
    for tick in 1..=cli.ticks {
        for fence in &mut fences {
            let (current, voltage) = fence.tick(&mut rng, cli.fault_rate);
            let id = FenceId::from(fence.profile.id);
            let report = fleet.analyze(&id, current, voltage, None)?;
            if report.verdict.is_anomaly || report.status != FenceStatus::Normal {
                flagged += 1;
                print_report(tick, fence.profile.name, current, &report);
            }
        }
    }
    println!();
    println!("{} {} ticks, {} flagged readings", "✓".green(), cli.ticks, flagged);
    println!();

    print_fence_table(&fleet, &fences)?;
    print_summary(&fleet)?;

    if let Some(fence) = cli.export {
        let export = fleet.export(&FenceId::new(fence.as_str()))?;
        println!();
        println!("{}", export.to_json()?);
    }

    println!();
    println!("{}", "Demo complete!".green().bold());
    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║            Electric Fence Anomaly Monitoring Demo                ║".cyan()
    );
    println!(
        "{}",
        "║  zscore · iqr · pattern · rate_change → ensemble verdict         ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════════╝".cyan()
    );
    println!();
}

fn status_label(status: FenceStatus) -> ColoredString {
    match status {
        FenceStatus::Normal => "NORMAL  ".green(),
        FenceStatus::Warning => "WARNING ".yellow(),
        FenceStatus::Critical => "CRITICAL".red().bold(),
    }
}

fn print_report(tick: usize, name: &str, current: f64, report: &FenceReport) {
    let verdict = &report.verdict;
    println!(
        "[t{:03}] {} {} {:<28} {:>6.2}A  {} ({:.0}%)",
        tick,
        status_label(report.status),
        report.fence.as_str().bold(),
        name,
        current,
        verdict.anomaly_type.label(),
        verdict.confidence * 100.0
    );
    if verdict.is_anomaly {
        if let Some(reason) = &verdict.reason {
            println!("        {} {}", "↳".dimmed(), reason.dimmed());
        }
    }
}

fn print_fence_table(fleet: &FleetMonitor, fences: &[SimulatedFence]) -> anyhow::Result<()> {
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".yellow()
    );
    println!(
        "  {:<8} {:<28} {:>7} {:>7} {:>9}  {}",
        "Fence", "Site", "Mean", "Std", "Anomalies", "Mode"
    );
    for fence in fences {
        let insights = fleet.insights(&FenceId::from(fence.profile.id))?;
        println!(
            "  {:<8} {:<28} {:>6.2}A {:>7.2} {:>9}  {}",
            fence.profile.id,
            fence.profile.name,
            insights.statistics.mean,
            insights.statistics.std,
            insights.total_anomalies,
            insights.learning_status
        );
    }
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".yellow()
    );
    Ok(())
}

fn print_summary(fleet: &FleetMonitor) -> anyhow::Result<()> {
    let summary = fleet.summary()?;
    println!();
    println!("{}", "Fleet summary".bold());
    println!("  logged anomalies : {}", summary.total_anomalies);
    println!(
        "  fences           : {} monitoring, {} learning",
        summary.monitoring_fences, summary.learning_fences
    );
    for (anomaly_type, count) in &summary.anomaly_types {
        println!("  {:<17}: {}", anomaly_type.label(), count);
    }
    match summary.most_common_anomaly {
        Some(t) => println!("  most common      : {}", t.label().red()),
        None => println!("  most common      : {}", "none".green()),
    }
    Ok(())
}
