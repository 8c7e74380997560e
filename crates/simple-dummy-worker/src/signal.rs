//! Signal handling for the CLI wrapper.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::WorkerError;
use crate::worker::Worker;

/// Signal type for worker control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerSignal {
    /// Graceful shutdown (SIGTERM, SIGINT, Ctrl+C).
    Shutdown,
}

impl std::fmt::Display for WorkerSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerSignal::Shutdown => write!(f, "SHUTDOWN"),
        }
    }
}

/// Fans OS shutdown signals out to subscribers.
#[derive(Clone)]
pub struct SignalHandler {
    sender: broadcast::Sender<WorkerSignal>,
    shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    /// Create a new signal handler.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            sender,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to signals.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkerSignal> {
        self.sender.subscribe()
    }

    /// Send a signal.
    pub fn send(&self, signal: WorkerSignal) {
        debug!("Sending signal: {}", signal);

        match signal {
            WorkerSignal::Shutdown => {
                self.shutdown_requested.store(true, Ordering::SeqCst);
            }
        }

        let _ = self.sender.send(signal);
    }

    /// Request shutdown.
    pub fn request_shutdown(&self) {
        self.send(WorkerSignal::Shutdown);
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Stop `worker` on every shutdown signal until the handler goes away.
    ///
    /// A signal that lands before the worker starts is a no-op for
    /// `Worker::stop`, so the task keeps listening instead of exiting after
    /// the first one. `Worker::stop` joins a thread and runs on the blocking
    /// pool.
    pub fn stop_worker_on_shutdown(&self, worker: Arc<Worker>) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        let already_requested = self.is_shutdown_requested();

        tokio::spawn(async move {
            if already_requested {
                stop_on_blocking_pool(worker.clone()).await;
            }

            loop {
                match rx.recv().await {
                    Ok(WorkerSignal::Shutdown) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        stop_on_blocking_pool(worker.clone()).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Run `worker` as a daemon until shutdown is requested. Blocking.
    ///
    /// The shutdown flag is checked after the worker thread is up, so a
    /// request that arrived before the start still stops it.
    pub fn run_daemon_until_shutdown(&self, worker: &Worker) -> Result<(), WorkerError> {
        worker.start_daemon()?;
        if self.is_shutdown_requested() {
            info!(worker = %worker.name(), "shutdown requested before start, stopping worker");
            worker.stop();
        }
        worker.wait();
        Ok(())
    }

    /// Set up OS signal handlers (Unix only).
    #[cfg(unix)]
    pub async fn setup_os_signals(&self) -> Result<(), WorkerError> {
        use tokio::signal::unix::{signal, SignalKind};

        // SIGTERM handler
        let mut sigterm =
            signal(SignalKind::terminate()).map_err(|e| WorkerError::SignalSetup(e.to_string()))?;

        let sigterm_handler = self.clone();
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                info!("Received SIGTERM");
                sigterm_handler.request_shutdown();
            }
        });

        // SIGINT handler
        let mut sigint =
            signal(SignalKind::interrupt()).map_err(|e| WorkerError::SignalSetup(e.to_string()))?;

        let sigint_handler = self.clone();
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                info!("Received SIGINT");
                sigint_handler.request_shutdown();
            }
        });

        debug!("OS signal handlers installed (SIGTERM, SIGINT)");
        Ok(())
    }

    /// Set up OS signal handlers (non-Unix fallback).
    #[cfg(not(unix))]
    pub async fn setup_os_signals(&self) -> Result<(), WorkerError> {
        let handler = self.clone();

        // Only Ctrl+C is available on non-Unix
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received Ctrl+C");
                handler.request_shutdown();
            }
        });

        debug!("OS signal handlers installed (Ctrl+C only)");
        Ok(())
    }
}

async fn stop_on_blocking_pool(worker: Arc<Worker>) {
    info!(worker = %worker.name(), "shutdown requested, stopping worker");
    if let Err(e) = tokio::task::spawn_blocking(move || worker.stop()).await {
        warn!(error = %e, "worker stop task failed");
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
