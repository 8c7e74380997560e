//! Lifecycle-managed worker.
//!
//! A [`Worker`] runs its heartbeat either inline on the calling thread
//! ([`Worker::run_foreground`]) or on one background thread
//! ([`Worker::run_daemon`]). Both threads share a single atomic running flag.
//! Lifecycle transitions are serialized by the mutex that owns the thread
//! handle; the background thread itself only ever reads the flag.

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::log::{self, LogSink};
use crate::status::WorkerStatus;

pub use crate::error::WorkerState;

/// Worker state as an atomic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerStateValue {
    Idle = 0,
    RunningForeground = 1,
    RunningDaemon = 2,
    Stopped = 3,
}

impl From<u8> for WorkerStateValue {
    fn from(v: u8) -> Self {
        match v {
            0 => WorkerStateValue::Idle,
            1 => WorkerStateValue::RunningForeground,
            2 => WorkerStateValue::RunningDaemon,
            3 => WorkerStateValue::Stopped,
            _ => WorkerStateValue::Idle,
        }
    }
}

impl From<WorkerStateValue> for WorkerState {
    fn from(v: WorkerStateValue) -> Self {
        match v {
            WorkerStateValue::Idle => WorkerState::Idle,
            WorkerStateValue::RunningForeground => WorkerState::RunningForeground,
            WorkerStateValue::RunningDaemon => WorkerState::RunningDaemon,
            WorkerStateValue::Stopped => WorkerState::Stopped,
        }
    }
}

/// A named unit of heartbeat work with start/stop lifecycle.
///
/// Dropping a running worker stops it and joins the background thread.
pub struct Worker {
    config: WorkerConfig,
    state: AtomicU8,
    running: Arc<AtomicBool>,
    iterations: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<u64>>>,
    sink: Arc<dyn LogSink>,
}

impl Worker {
    /// Create a new worker writing its log lines to `sink`.
    pub fn new(config: WorkerConfig, sink: Arc<dyn LogSink>) -> Result<Self, WorkerError> {
        config.validate().map_err(WorkerError::Config)?;

        let worker = Self {
            config,
            state: AtomicU8::new(WorkerStateValue::Idle as u8),
            running: Arc::new(AtomicBool::new(false)),
            iterations: Arc::new(AtomicU64::new(0)),
            handle: Mutex::new(None),
            sink,
        };
        worker.log_message(&format!("{} initialized", worker.config.name));
        Ok(worker)
    }

    /// Worker name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get the worker configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> WorkerState {
        WorkerStateValue::from(self.state.load(Ordering::SeqCst)).into()
    }

    /// Check the shared running flag.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Whether a background thread handle is currently held.
    ///
    /// Takes the lifecycle lock, so it blocks while a concurrent
    /// [`Worker::stop`] joins the thread (up to one `worker_interval`).
    pub fn has_worker_thread(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Iterations completed in the current (or most recent) run.
    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::SeqCst)
    }

    /// Snapshot of the worker for display.
    ///
    /// Like [`Worker::has_worker_thread`], this waits out a concurrent join.
    pub fn status(&self) -> WorkerStatus {
        let worker_alive = self
            .handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());

        WorkerStatus {
            name: self.config.name.clone(),
            state: self.state(),
            iterations: self.iterations(),
            worker_alive,
        }
    }

    /// Write a timestamped line to this worker's sink.
    pub fn log_message(&self, message: &str) {
        log::log_message(self.sink.as_ref(), message);
    }

    /// Run the bounded heartbeat loop on the calling thread.
    ///
    /// Returns after `foreground_iterations` iterations, or earlier if
    /// [`Worker::stop`] is called from another thread.
    pub fn run_foreground(&self) -> Result<(), WorkerError> {
        {
            let _lifecycle = self.handle.lock();
            self.enter_running(WorkerStateValue::RunningForeground)?;
        }

        info!(worker = %self.config.name, "foreground run started");
        self.log_message(&format!("{} running in foreground", self.config.name));

        let interval = self.config.foreground_interval();
        for i in 0..self.config.foreground_iterations {
            if !self.is_running() {
                debug!(worker = %self.config.name, completed = i, "foreground run interrupted");
                break;
            }
            self.log_message(&format!("Foreground iteration {}", i + 1));
            self.iterations.fetch_add(1, Ordering::SeqCst);
            thread::sleep(interval);
        }

        {
            let _lifecycle = self.handle.lock();
            self.running.store(false, Ordering::SeqCst);
            self.set_state(WorkerStateValue::Stopped);
        }

        self.log_message(&format!("{} foreground mode completed", self.config.name));
        Ok(())
    }

    /// Start the background worker thread and block until stopped.
    ///
    /// Also returns if the worker thread dies on its own (a panic in the
    /// sink); the dead thread is reaped through [`Worker::stop`].
    pub fn run_daemon(&self) -> Result<(), WorkerError> {
        self.start_daemon()?;
        self.wait();
        Ok(())
    }

    /// Spawn the background worker thread and return immediately.
    pub fn start_daemon(&self) -> Result<(), WorkerError> {
        let mut slot = self.handle.lock();
        self.enter_running(WorkerStateValue::RunningDaemon)?;

        let running = self.running.clone();
        let iterations = self.iterations.clone();
        let sink = self.sink.clone();
        let interval = self.config.worker_interval();

        let spawned = thread::Builder::new()
            .name(format!("{}-worker", self.config.name))
            .spawn(move || worker_loop(&running, &iterations, sink.as_ref(), interval));

        match spawned {
            Ok(handle) => *slot = Some(handle),
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                self.set_state(WorkerStateValue::Stopped);
                error!(worker = %self.config.name, error = %e, "failed to spawn worker thread");
                return Err(WorkerError::Spawn(e));
            }
        }

        info!(worker = %self.config.name, "daemon worker thread started");
        self.log_message(&format!("{} daemon started", self.config.name));
        Ok(())
    }

    /// Block until the running flag clears, checking every `poll_interval`.
    ///
    /// A worker thread that exits while the flag is still set is reaped
    /// through [`Worker::stop`] before this returns.
    pub fn wait(&self) {
        let poll = self.config.poll_interval();
        while self.is_running() && !self.worker_exited() {
            thread::sleep(poll);
        }
        if self.is_running() && self.worker_exited() {
            warn!(worker = %self.config.name, "worker thread exited while still running");
            self.stop();
        }
    }

    /// A handle is held but its thread has already finished.
    fn worker_exited(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| handle.is_finished())
    }

    /// Stop the worker and join its background thread.
    ///
    /// No-op when not running. When this returns after a daemon run, the
    /// background thread has terminated.
    pub fn stop(&self) {
        let mut slot = self.handle.lock();
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        info!(worker = %self.config.name, "stopping worker");

        if let Some(handle) = slot.take() {
            match handle.join() {
                Ok(iterations) => {
                    debug!(worker = %self.config.name, iterations, "worker thread joined");
                }
                Err(payload) => {
                    let err = WorkerError::WorkerPanicked(panic_message(payload.as_ref()));
                    error!(worker = %self.config.name, error = %err, "worker thread did not exit cleanly");
                }
            }
        }

        // A foreground run finalizes its own state when its loop notices the flag.
        if self.state() == WorkerState::RunningDaemon {
            self.set_state(WorkerStateValue::Stopped);
        }

        self.log_message(&format!("{} stopped", self.config.name));
    }

    /// Move into a running state. Caller holds the lifecycle lock.
    fn enter_running(&self, to: WorkerStateValue) -> Result<(), WorkerError> {
        let from = self.state();
        if from.is_running() || self.is_running() {
            return Err(WorkerError::InvalidStateTransition {
                from,
                to: to.into(),
            });
        }

        self.iterations.store(0, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        self.set_state(to);
        Ok(())
    }

    fn set_state(&self, value: WorkerStateValue) {
        self.state.store(value as u8, Ordering::SeqCst);
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the background thread. Returns the number of iterations run.
fn worker_loop(
    running: &AtomicBool,
    iterations: &AtomicU64,
    sink: &dyn LogSink,
    interval: Duration,
) -> u64 {
    let mut counter = 0;
    while running.load(Ordering::SeqCst) {
        counter += 1;
        log::log_message(sink, &format!("Daemon worker iteration {}", counter));
        iterations.store(counter, Ordering::SeqCst);
        thread::sleep(interval);
    }
    debug!(iterations = counter, "worker loop exited");
    counter
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
