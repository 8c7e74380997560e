//! simple-dummy - placeholder daemon for build system standardization
//!
//! Main entry point. Prints a banner, then drives one worker either in the
//! foreground (five heartbeats) or as a daemon until SIGINT/SIGTERM.

mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use simple_dummy_worker::{SignalHandler, StdoutSink, Worker, WorkerConfig};

use crate::cli::{Cli, RunMode};

/// Initialize tracing for diagnostics.
///
/// Heartbeat lines own stdout, so diagnostics go to stderr. `RUST_LOG`
/// overrides the default `warn` level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let mode = cli.mode();

    println!("Simple Dummy Application v{}", env!("CARGO_PKG_VERSION"));
    println!("A test application for build system standardization");

    let worker = Arc::new(Worker::new(WorkerConfig::default(), Arc::new(StdoutSink))?);

    let signals = SignalHandler::new();
    signals.setup_os_signals().await?;
    let watcher = signals.stop_worker_on_shutdown(worker.clone());

    let runner = worker.clone();
    let result = match mode {
        RunMode::Daemon => {
            println!("Running in daemon mode...");
            let signals = signals.clone();
            tokio::task::spawn_blocking(move || signals.run_daemon_until_shutdown(&runner)).await?
        }
        RunMode::Foreground if signals.is_shutdown_requested() => {
            info!("shutdown requested before foreground run, skipping");
            Ok(())
        }
        RunMode::Foreground => {
            println!("Running in foreground mode...");
            tokio::task::spawn_blocking(move || runner.run_foreground()).await?
        }
    };

    if let Err(e) = result {
        error!(error = %e, "worker failed to start");
        return Err(e.into());
    }

    // A signal-driven stop may still be joining; stop() waits for it.
    watcher.abort();
    tokio::task::spawn_blocking(move || worker.stop()).await?;

    info!(mode = ?mode, "simple-dummy exiting");
    Ok(())
}
