//! SinkWriter - serialized access to the sink
//!
//! The async mutex is held for the whole format-and-write sequence, on both
//! the async path and the direct path, so at most one write reaches the sink
//! at a time. Once closed, the guarded slot rejects further writes.

use std::sync::Arc;
use std::time::Instant;

use contracts::{ContractError, LogSink};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::format::format_message;
use crate::metrics::WriterMetrics;
use crate::reporting::ErrorReporter;

/// Sink plus its closed flag, both behind the same guard
struct SinkSlot<S> {
    sink: S,
    closed: bool,
}

pub struct SinkWriter<S> {
    sink: Arc<Mutex<SinkSlot<S>>>,
    name: Arc<str>,
    reporter: ErrorReporter,
    metrics: Arc<WriterMetrics>,
}

impl<S> Clone for SinkWriter<S> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            name: Arc::clone(&self.name),
            reporter: self.reporter.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<S> SinkWriter<S>
where
    S: LogSink + Send + 'static,
{
    pub(crate) fn new(
        sink: S,
        name: Arc<str>,
        reporter: ErrorReporter,
        metrics: Arc<WriterMetrics>,
    ) -> Self {
        Self {
            sink: Arc::new(Mutex::new(SinkSlot {
                sink,
                closed: false,
            })),
            name,
            reporter,
            metrics,
        }
    }

    /// Sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Async path: write one message, failures go to the error channel
    pub async fn write(&self, message: String) {
        if let Err(err) = self.write_locked(&message).await {
            self.metrics.inc_failure_count();
            observability::record_write_failure(&self.name, "async");
            warn!(sink = %self.name, error = %err, "Write failed");
            self.reporter.report(err);
        }
    }

    /// Direct path: write one message and hand the sink result back as-is
    pub async fn write_direct(&self, message: &str) -> Result<usize, ContractError> {
        let result = self.write_locked(message).await;
        if let Err(err) = &result {
            self.metrics.inc_failure_count();
            observability::record_write_failure(&self.name, "direct");
            debug!(sink = %self.name, error = %err, "Direct write failed");
        }
        result
    }

    /// Flush the sink under the guard; no-op once closed
    pub async fn flush(&self) -> Result<(), ContractError> {
        let mut slot = self.sink.lock().await;
        if slot.closed {
            return Ok(());
        }
        slot.sink.flush().await
    }

    /// Close the sink under the guard
    ///
    /// Later writes on either path fail with `ContractError::Stopped`,
    /// including ones already waiting on the guard. Closing twice is a no-op.
    pub async fn close(&self) -> Result<(), ContractError> {
        let mut slot = self.sink.lock().await;
        if slot.closed {
            return Ok(());
        }
        slot.closed = true;
        slot.sink.close().await
    }

    pub async fn is_closed(&self) -> bool {
        self.sink.lock().await.closed
    }

    pub(crate) fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    async fn write_locked(&self, message: &str) -> Result<usize, ContractError> {
        let mut slot = self.sink.lock().await;
        if slot.closed {
            return Err(ContractError::Stopped);
        }
        let started = Instant::now();

        let line = format_message(message);
        let written = slot.sink.write(line.as_bytes()).await?;

        self.metrics.record_write(written);
        observability::record_line_written(&self.name, written);
        observability::record_write_latency_ms(
            &self.name,
            started.elapsed().as_secs_f64() * 1000.0,
        );
        trace!(sink = %self.name, bytes = written, "Line written");
        Ok(written)
    }
}
