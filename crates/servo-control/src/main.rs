//! Rotary servo controller daemon (servod)

#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rotary_servo::{ControlConfig, ControlLoop, logging, signal};
use rotary_servo_io::{DEFAULT_SYSFS_ROOT, SysfsBackend};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "servod")]
#[command(about = "Drive a PWM servo from a rotary encoder")]
#[command(version)]
struct Cli {
    /// sysfs class directory holding the gpio and pwm interfaces
    #[arg(long, env = "SERVOD_SYSFS_ROOT", default_value = DEFAULT_SYSFS_ROOT)]
    sysfs_root: PathBuf,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 1)]
    tick_ms: u64,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Drop per-tick status lines
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    info!("Starting servod v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => {
            info!("servod stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ControlConfig::new(cli.sysfs_root, Duration::from_millis(cli.tick_ms))
        .context("invalid configuration")?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let _listener = signal::spawn_shutdown_listener(shutdown_tx)
        .context("failed to register termination signal handlers")?;

    let mut backend = SysfsBackend::new(&config.sysfs_root);
    let control = ControlLoop::start(&mut backend, config).context("startup failed")?;

    let report = control.run(shutdown_rx).await;
    if !report.is_clean() {
        warn!(
            failures = report.failures().len(),
            "shutdown finished with release failures"
        );
    }
    Ok(())
}
