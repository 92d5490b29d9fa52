//! Dispatch loop - pulls submitted messages and fans out write tasks
//!
//! One message is pulled at a time and handed to its own write task; the
//! loop never waits for a write before pulling the next message. Write
//! order at the sink is therefore not submission order: the tasks race for
//! the sink guard.

use std::sync::Arc;

use contracts::LogSink;
use tokio::sync::{mpsc, watch, OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument};

use crate::metrics::WriterMetrics;
use crate::writer::SinkWriter;

enum Event {
    Shutdown,
    Reaped(Result<(), JoinError>),
    Message(String, Option<OwnedSemaphorePermit>),
    InputClosed,
}

/// The single consumer of the submission queue
pub struct DispatchLoop<S> {
    writer: SinkWriter<S>,
    input_rx: mpsc::Receiver<String>,
    shutdown_rx: watch::Receiver<bool>,
    /// Bounds concurrently running write tasks when set
    limiter: Option<Arc<Semaphore>>,
    metrics: Arc<WriterMetrics>,
    tasks: JoinSet<()>,
}

impl<S> DispatchLoop<S>
where
    S: LogSink + Send + 'static,
{
    /// `max_in_flight = 0` leaves write tasks unbounded
    pub(crate) fn new(
        writer: SinkWriter<S>,
        input_rx: mpsc::Receiver<String>,
        shutdown_rx: watch::Receiver<bool>,
        max_in_flight: usize,
        metrics: Arc<WriterMetrics>,
    ) -> Self {
        let limiter = (max_in_flight > 0).then(|| Arc::new(Semaphore::new(max_in_flight)));
        Self {
            writer,
            input_rx,
            shutdown_rx,
            limiter,
            metrics,
            tasks: JoinSet::new(),
        }
    }

    /// Run until shutdown is signalled (or its sender dropped), then drain
    #[instrument(name = "dispatch_loop_run", skip(self), fields(sink = %self.writer.name()))]
    pub async fn run(mut self) {
        info!(bounded = self.limiter.is_some(), "Dispatch loop started");

        loop {
            let event = tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => Event::Shutdown,

                Some(result) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    Event::Reaped(result)
                }

                next = next_message(&mut self.input_rx, self.limiter.as_ref()) => match next {
                    Some((message, permit)) => Event::Message(message, permit),
                    None => Event::InputClosed,
                },
            };

            match event {
                Event::Shutdown => {
                    debug!("Shutdown signalled");
                    break;
                }
                Event::Reaped(result) => Self::reap(result),
                Event::Message(message, permit) => self.dispatch(message, permit),
                Event::InputClosed => {
                    debug!("All submission senders dropped");
                    break;
                }
            }
        }

        self.drain().await;
    }

    /// Spawn the loop as a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Stop accepting messages, write everything already queued, wait for
    /// in-flight writes, then flush and close the sink and the error channel
    #[instrument(name = "dispatch_loop_drain", skip(self), fields(sink = %self.writer.name()))]
    pub async fn drain(mut self) {
        self.input_rx.close();

        let mut queued: u64 = 0;
        while let Some(message) = self.input_rx.recv().await {
            let permit = match &self.limiter {
                Some(limiter) => Arc::clone(limiter).acquire_owned().await.ok(),
                None => None,
            };
            self.dispatch(message, permit);
            queued += 1;
        }

        let in_flight = self.tasks.len();
        while let Some(result) = self.tasks.join_next().await {
            Self::reap(result);
        }

        if let Err(e) = self.writer.flush().await {
            error!(error = %e, "Flush failed on shutdown");
            self.writer.reporter().report(e);
        }
        if let Err(e) = self.writer.close().await {
            error!(error = %e, "Close failed on shutdown");
            self.writer.reporter().report(e);
        }
        self.writer.reporter().close();

        info!(
            queued,
            in_flight,
            dispatched = self.metrics.dispatched_count(),
            "Dispatch loop drained"
        );
    }

    fn dispatch(&mut self, message: String, permit: Option<OwnedSemaphorePermit>) {
        self.metrics.inc_dispatched_count();
        observability::record_message_dispatched(self.writer.name());

        let in_flight = self.metrics.inc_in_flight();
        observability::record_writes_in_flight(self.writer.name(), in_flight);

        let writer = self.writer.clone();
        let metrics = Arc::clone(&self.metrics);
        self.tasks.spawn(async move {
            writer.write(message).await;
            let in_flight = metrics.dec_in_flight();
            observability::record_writes_in_flight(writer.name(), in_flight);
            drop(permit);
        });
    }

    fn reap(result: Result<(), JoinError>) {
        if let Err(e) = result {
            error!(error = ?e, "Write task panicked");
        }
    }
}

/// Wait for a free write slot (when bounded), then for the next message
///
/// Cancel-safe: a permit taken before cancellation is released on drop and
/// `recv` loses nothing.
async fn next_message(
    input_rx: &mut mpsc::Receiver<String>,
    limiter: Option<&Arc<Semaphore>>,
) -> Option<(String, Option<OwnedSemaphorePermit>)> {
    let permit = match limiter {
        Some(limiter) => Some(Arc::clone(limiter).acquire_owned().await.ok()?),
        None => None,
    };
    let message = input_rx.recv().await?;
    Some((message, permit))
}
