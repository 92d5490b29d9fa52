//! MemorySink - growing in-memory buffer
//!
//! Clones share the buffer, so a caller can keep one handle to inspect what
//! the logger wrote after moving the other into it.

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{ContractError, LogSink};

#[derive(Debug, Clone)]
pub struct MemorySink {
    name: String,
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffer: Arc::default(),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<u8>> {
        // Plain byte buffer: a panic mid-push leaves nothing inconsistent
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Raw bytes written so far
    pub fn bytes(&self) -> Vec<u8> {
        self.buffer().clone()
    }

    /// Buffer as UTF-8 (lossy)
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer()).into_owned()
    }

    /// Buffer split into lines, without terminators
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError> {
        self.buffer().extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
