//! Alog - the public logger facade
//!
//! Two ways to log:
//! - async: push messages into [`Alog::message_channel`]; failures surface on
//!   [`Alog::error_channel`]
//! - direct: [`Alog::write`] returns the sink result to the caller and never
//!   touches the error channel
//!
//! Both paths share one sink guard.

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{ContractError, DispatchConfig, LogSink, LoggerConfig};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::dispatch::DispatchLoop;
use crate::handle::MessageSender;
use crate::metrics::{MetricsSnapshot, WriterMetrics};
use crate::reporting::{error_channel, ErrorReceiver};
use crate::sinks::{self, AnySink, StdoutSink};
use crate::writer::SinkWriter;

enum LoopState {
    /// Constructed, queue not yet consumed
    Idle(mpsc::Receiver<String>),
    Running(JoinHandle<()>),
    Stopped,
}

/// Non-blocking logger over a single sink
pub struct Alog<S> {
    writer: SinkWriter<S>,
    input_tx: mpsc::Sender<String>,
    errors: ErrorReceiver,
    shutdown_tx: watch::Sender<bool>,
    state: Mutex<LoopState>,
    config: DispatchConfig,
    metrics: Arc<WriterMetrics>,
}

impl Alog<StdoutSink> {
    /// Logger writing to standard output
    pub fn stdout() -> Self {
        Self::new(sinks::stdout())
    }
}

impl Alog<AnySink> {
    /// Build the configured sink and a logger over it
    ///
    /// # Errors
    /// Sink construction failure (e.g. the log file cannot be opened).
    pub async fn from_config(config: &LoggerConfig) -> Result<Self, ContractError> {
        let sink = AnySink::from_config(&config.sink).await?;
        Ok(Self::with_config(sink, config.dispatch))
    }
}

impl<S> Alog<S>
where
    S: LogSink + Send + 'static,
{
    /// Logger with default dispatch settings
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, DispatchConfig::default())
    }

    /// Logger with explicit dispatch settings
    ///
    /// A `submission_capacity` of 0 is treated as 1.
    pub fn with_config(sink: S, config: DispatchConfig) -> Self {
        let metrics = Arc::new(WriterMetrics::new());
        let name: Arc<str> = sink.name().into();

        let (reporter, errors) = error_channel(
            config.error_queue_capacity,
            Arc::clone(&name),
            Arc::clone(&metrics),
        );
        let writer = SinkWriter::new(sink, name, reporter, Arc::clone(&metrics));
        let (input_tx, input_rx) = mpsc::channel(config.submission_capacity.max(1));
        let (shutdown_tx, _) = watch::channel(false);

        debug!(sink = %writer.name(), ?config, "Logger created");

        Self {
            writer,
            input_tx,
            errors,
            shutdown_tx,
            state: Mutex::new(LoopState::Idle(input_rx)),
            config,
            metrics,
        }
    }

    /// Sink name
    pub fn name(&self) -> &str {
        self.writer.name()
    }

    /// Send-only submission endpoint
    pub fn message_channel(&self) -> MessageSender {
        MessageSender::new(self.input_tx.clone())
    }

    /// Receive-only error endpoint
    ///
    /// Should be drained: with the default unbounded error queue every
    /// undelivered failure stays in memory.
    pub fn error_channel(&self) -> ErrorReceiver {
        self.errors.clone()
    }

    /// Write a message and wait for the sink result
    ///
    /// Returns the byte count of the formatted line.
    ///
    /// # Errors
    /// - the sink failure, unchanged
    /// - `ContractError::Stopped` after [`Alog::stop`]
    pub async fn write(&self, message: &str) -> Result<usize, ContractError> {
        if self.is_stopped() {
            return Err(ContractError::Stopped);
        }
        self.writer.write_direct(message).await
    }

    /// Spawn the dispatch loop on the current tokio runtime
    ///
    /// # Errors
    /// - `ContractError::AlreadyStarted` on a second call
    /// - `ContractError::Stopped` after [`Alog::stop`]
    /// - `ContractError::Other` when called outside a tokio runtime
    #[instrument(name = "alog_start", skip(self), fields(sink = %self.name()))]
    pub fn start(&self) -> Result<(), ContractError> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(ContractError::Other(
                "Alog::start requires a tokio runtime".to_string(),
            ));
        }

        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, LoopState::Stopped) {
            LoopState::Idle(input_rx) => {
                let dispatch = DispatchLoop::new(
                    self.writer.clone(),
                    input_rx,
                    self.shutdown_tx.subscribe(),
                    self.config.max_in_flight_writes,
                    Arc::clone(&self.metrics),
                );
                *state = LoopState::Running(dispatch.spawn());
                info!("Logger started");
                Ok(())
            }
            LoopState::Running(handle) => {
                *state = LoopState::Running(handle);
                Err(ContractError::AlreadyStarted)
            }
            LoopState::Stopped => Err(ContractError::Stopped),
        }
    }

    /// Drain and disable
    ///
    /// Stops accepting submissions, waits until every queued and in-flight
    /// message is written, flushes and closes the sink, then closes the
    /// error channel. Afterwards sends fail with `Closed` and direct writes
    /// with `Stopped`. Calling it again returns immediately.
    #[instrument(name = "alog_stop", skip(self), fields(sink = %self.name()))]
    pub async fn stop(&self) {
        let previous = std::mem::replace(&mut *self.lock_state(), LoopState::Stopped);

        match previous {
            LoopState::Running(handle) => {
                self.shutdown_tx.send_replace(true);
                if let Err(e) = handle.await {
                    error!(error = ?e, "Dispatch loop panicked");
                }
            }
            LoopState::Idle(input_rx) => {
                // Never started: drain whatever was queued before stop
                DispatchLoop::new(
                    self.writer.clone(),
                    input_rx,
                    self.shutdown_tx.subscribe(),
                    self.config.max_in_flight_writes,
                    Arc::clone(&self.metrics),
                )
                .drain()
                .await;
            }
            LoopState::Stopped => {
                debug!("Logger already stopped");
                return;
            }
        }

        info!(
            written = self.metrics.write_count(),
            failures = self.metrics.failure_count(),
            "Logger stopped"
        );
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.lock_state(), LoopState::Running(_))
    }

    pub fn is_stopped(&self) -> bool {
        matches!(*self.lock_state(), LoopState::Stopped)
    }

    /// Current counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn lock_state(&self) -> MutexGuard<'_, LoopState> {
        // State transitions are single assignments; a poisoned lock still
        // holds a valid state.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
