//! LogSink trait - byte destination interface
//!
//! Defines the abstract "writer" capability the logger appends lines to.

use crate::ContractError;

/// Byte sink trait
///
/// All sink implementations must implement this trait. The logger guarantees
/// that calls on one sink never overlap, so implementations need no locking
/// of their own.
#[trait_variant::make(LogSink: Send)]
pub trait LocalLogSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one formatted line
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    /// Returns the sink failure as-is; the logger does not wrap it.
    async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
