//! Mock sinks for unit tests

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{ContractError, LogSink};
use tokio::time::sleep;

/// Sink that fails every write
pub struct FailingSink {
    pub name: String,
    pub calls: Arc<AtomicU64>,
}

impl FailingSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl LogSink for FailingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, _buf: &[u8]) -> Result<usize, ContractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ContractError::sink_write(&self.name, "mock failure"))
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Sink that sleeps inside every write and records how many writes were
/// ever active at the same time
#[derive(Clone, Default)]
pub struct SlowSink {
    pub delay_ms: u64,
    pub active: Arc<AtomicUsize>,
    pub max_active: Arc<AtomicUsize>,
    pub lines: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<AtomicUsize>,
}

impl SlowSink {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Default::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for SlowSink {
    fn name(&self) -> &str {
        "slow"
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        sleep(Duration::from_millis(self.delay_ms)).await;
        self.lines
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(buf).into_owned());
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
