//! MessageSender - send-only submission handle

use contracts::ContractError;
use tokio::sync::mpsc;
use tracing::debug;

/// Send-only end of the submission queue
///
/// Cheap to clone; every clone feeds the same dispatch loop.
#[derive(Debug, Clone)]
pub struct MessageSender {
    tx: mpsc::Sender<String>,
}

impl MessageSender {
    pub(crate) fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }

    /// Submit a message, waiting while the queue is full
    ///
    /// With the default single-slot queue this waits until the dispatch loop
    /// has taken the previous message.
    ///
    /// # Errors
    /// `ContractError::Closed` once the logger has been stopped.
    pub async fn send(&self, message: impl Into<String>) -> Result<(), ContractError> {
        self.tx
            .send(message.into())
            .await
            .map_err(|_| ContractError::Closed)
    }

    /// Submit a message without waiting
    ///
    /// # Errors
    /// - `ContractError::QueueFull` when the queue has no free slot
    /// - `ContractError::Closed` once the logger has been stopped
    pub fn try_send(&self, message: impl Into<String>) -> Result<(), ContractError> {
        match self.tx.try_send(message.into()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Submission queue full, message rejected");
                Err(ContractError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ContractError::Closed),
        }
    }

    /// Submit from a thread outside the async runtime
    ///
    /// # Panics
    /// When called from within an asynchronous execution context.
    pub fn blocking_send(&self, message: impl Into<String>) -> Result<(), ContractError> {
        self.tx
            .blocking_send(message.into())
            .map_err(|_| ContractError::Closed)
    }

    /// True once the dispatch loop stopped accepting messages
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Currently free queue slots
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}
