//! Worker-related errors.

use thiserror::Error;

/// Errors that can occur during worker lifecycle operations.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The background worker thread could not be created.
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The background worker thread panicked before it was joined.
    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// Invalid worker state transition.
    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition { from: WorkerState, to: WorkerState },

    /// Failed to set up signal handlers.
    #[error("Failed to set up signal handlers: {0}")]
    SignalSetup(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, never run.
    Idle,
    /// Bounded loop on the calling thread.
    RunningForeground,
    /// Background thread active.
    RunningDaemon,
    /// Last run finished or was stopped.
    Stopped,
}

impl WorkerState {
    /// Whether this state has the running flag set.
    pub fn is_running(self) -> bool {
        matches!(self, WorkerState::RunningForeground | WorkerState::RunningDaemon)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Idle => write!(f, "idle"),
            WorkerState::RunningForeground => write!(f, "running_foreground"),
            WorkerState::RunningDaemon => write!(f, "running_daemon"),
            WorkerState::Stopped => write!(f, "stopped"),
        }
    }
}
