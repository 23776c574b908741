use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use sysgauge::config::{Config, load_config, load_config_from_path};
use sysgauge::logging::init_tracing;
use sysgauge::report::render_text;
use sysgauge::system::collector::Collector;
use sysgauge::system::scheduler::Scheduler;
use sysgauge::system::snapshot::SystemSnapshot;

#[derive(Parser)]
#[command(
    name = "sysgauge",
    about = "Sample host CPU, memory, disk and rank processes by CPU usage"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Filesystem whose capacity is sampled
    #[arg(long)]
    mount_path: Option<PathBuf>,

    /// Root of the proc pseudo-filesystem
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Number of processes shown per tick
    #[arg(long)]
    top: Option<usize>,

    /// CPU ratio mode: cumulative, delta
    #[arg(long)]
    cpu_mode: Option<String>,

    /// Log filter, e.g. warn, debug, sysgauge=trace
    #[arg(long)]
    log_level: Option<String>,

    /// Print each snapshot as one JSON line instead of the text report.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Stop after this many snapshots; 0 runs until interrupted.
    #[arg(long, default_value_t = 0)]
    iterations: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    init_tracing(&config.logging)?;

    let refresh_ms = config.general.refresh_rate_ms;
    if refresh_ms == 0 {
        return Err(eyre!("--refresh-rate must be greater than 0"));
    }

    let collector =
        Collector::new(config.collector_settings()).wrap_err("failed to initialise sampler")?;
    let handle = Scheduler::new(collector, Duration::from_millis(refresh_ms)).spawn();
    let mut snapshots = handle.snapshots;
    let top = config.general.top_processes;
    let mut printed = 0u64;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                print_snapshot(&snapshot, top, cli.json)?;
                printed += 1;
                if cli.iterations > 0 && printed >= cli.iterations {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    // dropping the receiver stops the sampling loop on its next tick
    drop(snapshots);
    handle.task.abort();
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref path) = cli.mount_path {
        config.sources.mount_path = path.clone();
    }
    if let Some(ref root) = cli.proc_root {
        config.sources.proc_root = root.clone();
    }
    if let Some(top) = cli.top {
        config.general.top_processes = top;
    }
    if let Some(ref mode) = cli.cpu_mode {
        config.general.cpu_mode = mode.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    config
}

fn print_snapshot(snapshot: &SystemSnapshot, top: usize, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        println!("{}\n", render_text(snapshot, top));
    }
    Ok(())
}
