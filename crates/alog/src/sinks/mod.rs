//! Sink implementations
//!
//! Contains WriterSink (stdout/stderr/any AsyncWrite), FileSink and MemorySink,
//! plus `AnySink` for picking one from configuration at runtime.

mod file;
mod memory;
mod writer;

pub use self::file::FileSink;
pub use self::memory::MemorySink;
pub use self::writer::{stderr, stdout, StderrSink, StdoutSink, WriterSink};

use contracts::{ContractError, LogSink, SinkConfig, SinkType};
use tracing::instrument;

/// Sink chosen from a `SinkConfig`
pub enum AnySink {
    Stdout(StdoutSink),
    Stderr(StderrSink),
    File(FileSink),
    Memory(MemorySink),
}

impl AnySink {
    /// Build the configured sink
    ///
    /// # Errors
    /// - file sink without a path
    /// - file open failure
    #[instrument(
        name = "any_sink_from_config",
        skip(config),
        fields(sink = %config.display_name(), sink_type = %config.sink_type)
    )]
    pub async fn from_config(config: &SinkConfig) -> Result<Self, ContractError> {
        let name = config.display_name();
        match config.sink_type {
            SinkType::Stdout => Ok(Self::Stdout(WriterSink::new(name, tokio::io::stdout()))),
            SinkType::Stderr => Ok(Self::Stderr(WriterSink::new(name, tokio::io::stderr()))),
            SinkType::File => {
                let path = config.path.as_ref().ok_or_else(|| {
                    ContractError::config_validation("sink.path", "file sink requires a path")
                })?;
                let sink = FileSink::open(name, path, config.append).await?;
                Ok(Self::File(sink))
            }
            SinkType::Memory => Ok(Self::Memory(MemorySink::new(name))),
        }
    }

    /// Shared view of the buffer when this is a memory sink
    pub fn as_memory(&self) -> Option<&MemorySink> {
        match self {
            Self::Memory(sink) => Some(sink),
            _ => None,
        }
    }
}

impl LogSink for AnySink {
    fn name(&self) -> &str {
        match self {
            Self::Stdout(sink) => sink.name(),
            Self::Stderr(sink) => sink.name(),
            Self::File(sink) => sink.name(),
            Self::Memory(sink) => sink.name(),
        }
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError> {
        match self {
            Self::Stdout(sink) => sink.write(buf).await,
            Self::Stderr(sink) => sink.write(buf).await,
            Self::File(sink) => sink.write(buf).await,
            Self::Memory(sink) => sink.write(buf).await,
        }
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Stdout(sink) => sink.flush().await,
            Self::Stderr(sink) => sink.flush().await,
            Self::File(sink) => sink.flush().await,
            Self::Memory(sink) => sink.flush().await,
        }
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Stdout(sink) => sink.close().await,
            Self::Stderr(sink) => sink.close().await,
            Self::File(sink) => sink.close().await,
            Self::Memory(sink) => sink.close().await,
        }
    }
}
