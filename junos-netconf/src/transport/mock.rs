//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::Transport;
use crate::error::{Result, TransportError};
use crate::rpc::TERMINATOR;

#[derive(Debug, Default)]
struct MockState {
    /// Replies released one per write, in order.
    scripted: VecDeque<Vec<Vec<u8>>>,
    /// Chunks ready to be read.
    pending: VecDeque<Vec<u8>>,
    /// Every write, decoded.
    writes: Vec<String>,
    closed: bool,
    disconnected: bool,
}

/// Transport that answers each write with the next scripted reply.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a framed reply (terminator appended) for the next write.
    pub(crate) fn reply(self, body: &str) -> Self {
        self.reply_chunks(vec![format!("{}{}", body, TERMINATOR).into_bytes()])
    }

    /// Queue a reply delivered as several separate reads.
    pub(crate) fn reply_chunks(self, chunks: Vec<Vec<u8>>) -> Self {
        self.state.lock().unwrap().scripted.push_back(chunks);
        self
    }

    /// Make data readable immediately, without waiting for a write.
    pub(crate) fn pending(self, chunk: &[u8]) -> Self {
        self.state.lock().unwrap().pending.push_back(chunk.to_vec());
        self
    }

    /// Fail reads once pending data is exhausted.
    pub(crate) fn disconnect_when_drained(self) -> Self {
        self.state.lock().unwrap().disconnected = true;
        self
    }

    pub(crate) fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

impl Transport for MockTransport {
    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .writes
            .push(String::from_utf8_lossy(data).into_owned());
        if let Some(chunks) = state.scripted.pop_front() {
            state.pending.extend(chunks);
        }
        Ok(())
    }

    async fn read_available(&mut self) -> Result<Option<Vec<u8>>> {
        let mut state = self.state.lock().unwrap();
        match state.pending.pop_front() {
            Some(chunk) => Ok(Some(chunk)),
            None if state.disconnected => Err(TransportError::Disconnected.into()),
            None => Ok(None),
        }
    }

    async fn read(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.state.lock().unwrap().pending.pop_front())
    }

    async fn close(self) -> Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}
