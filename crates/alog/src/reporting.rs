//! Error reporting channel
//!
//! Async-path write failures are pushed here without ever suspending the
//! writer. Capacity 0 means unbounded: with no observer, errors accumulate
//! in memory until someone drains them. A bounded queue drops the newest
//! error when full and counts the drop.

use std::sync::Arc;

use async_channel::TrySendError;
use contracts::ContractError;
use tracing::{debug, warn};

use crate::metrics::WriterMetrics;

/// Create a reporter/receiver pair
pub(crate) fn error_channel(
    capacity: usize,
    sink_name: Arc<str>,
    metrics: Arc<WriterMetrics>,
) -> (ErrorReporter, ErrorReceiver) {
    let (tx, rx) = if capacity == 0 {
        async_channel::unbounded()
    } else {
        async_channel::bounded(capacity)
    };

    (
        ErrorReporter {
            tx,
            sink_name,
            metrics,
        },
        ErrorReceiver { rx },
    )
}

/// Producer side, owned by the sink writer
#[derive(Clone)]
pub struct ErrorReporter {
    tx: async_channel::Sender<ContractError>,
    sink_name: Arc<str>,
    metrics: Arc<WriterMetrics>,
}

impl ErrorReporter {
    /// Queue an error without waiting
    pub fn report(&self, err: ContractError) {
        match self.tx.try_send(err) {
            Ok(()) => {
                self.metrics.inc_errors_reported();
            }
            Err(TrySendError::Full(err)) => {
                self.metrics.inc_errors_dropped();
                observability::record_error_dropped(&self.sink_name);
                warn!(
                    sink = %self.sink_name,
                    error = %err,
                    "Error queue full, error dropped"
                );
            }
            Err(TrySendError::Closed(err)) => {
                self.metrics.inc_errors_dropped();
                observability::record_error_dropped(&self.sink_name);
                debug!(
                    sink = %self.sink_name,
                    error = %err,
                    "Error channel closed, error dropped"
                );
            }
        }
    }

    /// Close the channel; receivers drain what is queued, then see `None`
    pub fn close(&self) -> bool {
        self.tx.close()
    }
}

/// Receive-only view of the error channel
///
/// Clones share one queue: each error is delivered to exactly one receiver.
#[derive(Clone)]
pub struct ErrorReceiver {
    rx: async_channel::Receiver<ContractError>,
}

impl ErrorReceiver {
    /// Wait for the next error
    ///
    /// Returns `None` once the logger has stopped and the queue is empty.
    pub async fn recv(&self) -> Option<ContractError> {
        self.rx.recv().await.ok()
    }

    /// Take an error if one is queued
    pub fn try_recv(&self) -> Option<ContractError> {
        self.rx.try_recv().ok()
    }

    /// Number of undelivered errors
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}
