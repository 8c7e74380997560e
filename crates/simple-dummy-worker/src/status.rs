//! Worker status information.

pub use crate::error::WorkerState;

/// Worker status information.
#[derive(Debug, Clone)]
pub struct WorkerStatus {
    /// Worker name.
    pub name: String,
    /// Current lifecycle state.
    pub state: WorkerState,
    /// Iterations completed in the current or last run.
    pub iterations: u64,
    /// Whether a background thread is still executing.
    pub worker_alive: bool,
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}, iterations: {}",
            self.name, self.state, self.iterations
        )?;
        if self.worker_alive {
            write!(f, ", worker thread alive")?;
        }
        Ok(())
    }
}
