//! LoggerConfig - Config Loader output
//!
//! Selects the sink and tunes the dispatch queues.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete logger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Output sink
    #[serde(default)]
    pub sink: SinkConfig,

    /// Queue and task limits
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name, defaults to the sink type
    #[serde(default)]
    pub name: Option<String>,

    /// Sink type
    #[serde(default)]
    pub sink_type: SinkType,

    /// Output path (file sink only)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Append to an existing file instead of truncating it
    #[serde(default = "default_append")]
    pub append: bool,
}

fn default_append() -> bool {
    true
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            name: None,
            sink_type: SinkType::default(),
            path: None,
            append: default_append(),
        }
    }
}

impl SinkConfig {
    /// Name used in tracing fields and metric labels
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.sink_type.as_str())
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Process standard output
    #[default]
    Stdout,
    /// Process standard error
    Stderr,
    /// Append-only file
    File,
    /// In-memory buffer
    Memory,
}

impl SinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for SinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Submission queue capacity (>= 1; 1 is a single-slot handoff)
    #[serde(default = "default_submission_capacity")]
    pub submission_capacity: usize,

    /// Error queue capacity (0 = unbounded)
    #[serde(default)]
    pub error_queue_capacity: usize,

    /// Maximum concurrently running write tasks (0 = unbounded)
    #[serde(default)]
    pub max_in_flight_writes: usize,
}

fn default_submission_capacity() -> usize {
    1
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            submission_capacity: default_submission_capacity(),
            error_queue_capacity: 0,
            max_in_flight_writes: 0,
        }
    }
}
