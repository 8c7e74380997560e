//! # simple-dummy worker
//!
//! Lifecycle-managed heartbeat worker for the simple-dummy placeholder daemon.
//!
//! ## Features
//!
//! - Foreground mode: a bounded number of timestamped iterations on the
//!   calling thread
//! - Daemon mode: one background thread logging until stopped
//! - Idempotent `stop()` that joins the background thread
//! - Stop on SIGTERM/SIGINT for the CLI wrapper
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use simple_dummy_worker::{StdoutSink, Worker, WorkerConfig};
//!
//! let worker = Worker::new(WorkerConfig::default(), Arc::new(StdoutSink))?;
//! worker.run_foreground()?;
//! # Ok::<(), simple_dummy_worker::WorkerError>(())
//! ```

pub mod config;
pub mod error;
pub mod log;
pub mod signal;
pub mod status;
pub mod worker;

// Re-exports
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerState};
pub use log::{log_message, LogSink, MemorySink, StdoutSink};
pub use signal::{SignalHandler, WorkerSignal};
pub use status::WorkerStatus;
pub use worker::Worker;
