//! WriterSink - adapts any tokio `AsyncWrite` into a LogSink

use contracts::{ContractError, LogSink};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument};

/// Sink over an arbitrary async writer
pub struct WriterSink<W> {
    name: String,
    writer: W,
}

/// Process standard output
pub type StdoutSink = WriterSink<tokio::io::Stdout>;

/// Process standard error
pub type StderrSink = WriterSink<tokio::io::Stderr>;

/// Sink writing to standard output, the default destination
pub fn stdout() -> StdoutSink {
    WriterSink::new("stdout", tokio::io::stdout())
}

/// Sink writing to standard error
pub fn stderr() -> StderrSink {
    WriterSink::new("stderr", tokio::io::stderr())
}

impl<W> WriterSink<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    /// Consume the sink and return the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> LogSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError> {
        self.writer.write_all(buf).await?;
        Ok(buf.len())
    }

    #[instrument(name = "writer_sink_flush", skip(self), fields(sink = %self.name))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.writer.flush().await?;
        Ok(())
    }

    #[instrument(name = "writer_sink_close", skip(self), fields(sink = %self.name))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.writer.shutdown().await?;
        debug!(sink = %self.name, "WriterSink closed");
        Ok(())
    }
}
