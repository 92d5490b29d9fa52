//! # Alog
//!
//! Non-blocking line logger.
//!
//! Responsibilities:
//! - Accept messages without making callers wait for sink I/O
//! - Serialize every write to the sink behind one guard
//! - Surface async write failures on an error channel that never blocks
//!
//! ```no_run
//! # async fn demo() -> Result<(), contracts::ContractError> {
//! let log = alog::Alog::stdout();
//! log.start()?;
//!
//! let sender = log.message_channel();
//! sender.send("service started").await?;
//!
//! log.write("written before returning").await?;
//! log.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod format;
pub mod handle;
pub mod logger;
pub mod metrics;
pub mod reporting;
pub mod sinks;
pub mod writer;

#[cfg(test)]
mod testing;

pub use contracts::{ContractError, DispatchConfig, LogSink, LoggerConfig, SinkConfig, SinkType};
pub use dispatch::DispatchLoop;
pub use format::{format_message, format_message_at, TIMESTAMP_FORMAT};
pub use handle::MessageSender;
pub use logger::Alog;
pub use metrics::{MetricsSnapshot, WriterMetrics};
pub use reporting::{ErrorReceiver, ErrorReporter};
pub use sinks::{AnySink, FileSink, MemorySink, StderrSink, StdoutSink, WriterSink};
pub use writer::SinkWriter;
