//! Worker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Worker configuration.
///
/// Intervals are stored in milliseconds. The defaults use a one second time
/// unit: foreground iterations and daemon polling tick once per unit, the
/// background worker once every two units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Name used in lifecycle log lines and for the worker thread.
    #[serde(default = "default_name")]
    pub name: String,

    /// Number of iterations in foreground mode.
    #[serde(default = "default_foreground_iterations")]
    pub foreground_iterations: u32,

    /// Delay between foreground iterations (in milliseconds).
    #[serde(default = "default_foreground_interval")]
    pub foreground_interval_ms: u64,

    /// Delay between background worker iterations (in milliseconds).
    #[serde(default = "default_worker_interval")]
    pub worker_interval_ms: u64,

    /// How often the daemon caller checks the running flag (in milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_name() -> String {
    "simple-dummy".to_string()
}

fn default_foreground_iterations() -> u32 {
    5
}

fn default_foreground_interval() -> u64 {
    1000
}

fn default_worker_interval() -> u64 {
    2000
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            foreground_iterations: default_foreground_iterations(),
            foreground_interval_ms: default_foreground_interval(),
            worker_interval_ms: default_worker_interval(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl WorkerConfig {
    /// Create a new config with the given worker name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Rescale every interval to `unit`, keeping the 1:2:1 ratio.
    ///
    /// Intervals have millisecond resolution: a non-zero unit below 1ms is
    /// raised to 1ms. A zero unit stays zero and fails [`validate`].
    ///
    /// [`validate`]: WorkerConfig::validate
    pub fn with_time_unit(mut self, unit: Duration) -> Self {
        let ms = if unit.is_zero() {
            0
        } else {
            (unit.as_millis() as u64).max(1)
        };
        self.foreground_interval_ms = ms;
        self.worker_interval_ms = ms * 2;
        self.poll_interval_ms = ms;
        self
    }

    /// Get the foreground interval as a Duration.
    pub fn foreground_interval(&self) -> Duration {
        Duration::from_millis(self.foreground_interval_ms)
    }

    /// Get the worker interval as a Duration.
    pub fn worker_interval(&self) -> Duration {
        Duration::from_millis(self.worker_interval_ms)
    }

    /// Get the poll interval as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }

        if self.foreground_iterations == 0 {
            return Err("foreground_iterations must be > 0".to_string());
        }

        if self.foreground_interval_ms == 0 {
            return Err("foreground_interval_ms must be > 0".to_string());
        }

        if self.worker_interval_ms == 0 {
            return Err("worker_interval_ms must be > 0".to_string());
        }

        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
