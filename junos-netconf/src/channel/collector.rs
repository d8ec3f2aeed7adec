//! Poll-and-backoff response collection.

use std::time::Duration;

use log::{debug, trace, warn};
use tokio::time::Instant;

use super::buffer::FrameBuffer;
use crate::error::{ProtocolError, Result};
use crate::transport::Transport;

/// Default round-trip timeout for one reply.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(200_000);

/// Default pause between probes when nothing is buffered.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Reads a reply from a transport until an end-of-message marker is seen.
///
/// The loop probes the transport; when data is ready it is appended, when it
/// is not the task sleeps for `poll_interval`. Each iteration checks the
/// elapsed time against `timeout`. There is no cancellation: the loop ends on
/// the marker, on the timeout, or on a transport error.
#[derive(Debug, Clone)]
pub struct ResponseCollector {
    timeout: Duration,
    poll_interval: Duration,
}

impl ResponseCollector {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Collect one reply and return everything before the first `terminator`.
    ///
    /// On timeout, any partial data is discarded and
    /// [`ProtocolError::ResponseTimeout`] is returned.
    pub async fn collect<T>(&self, terminator: &str, transport: &mut T) -> Result<String>
    where
        T: Transport + ?Sized,
    {
        let start = Instant::now();
        let mut buffer = FrameBuffer::new();

        loop {
            if let Some(frame) = buffer.take_frame(terminator.as_bytes()) {
                debug!(
                    "response complete: {} bytes in {:?}",
                    frame.len(),
                    start.elapsed()
                );
                let reply = String::from_utf8_lossy(&frame).into_owned();
                trace!("response: {}", reply);
                return Ok(reply);
            }

            if start.elapsed() > self.timeout {
                warn!(
                    "Response timeout exceeded after {:?} ({} bytes discarded)",
                    self.timeout,
                    buffer.len()
                );
                return Err(ProtocolError::ResponseTimeout(self.timeout).into());
            }

            match transport.read_available().await? {
                Some(chunk) => {
                    trace!("read {} bytes", chunk.len());
                    buffer.extend(&chunk);
                }
                None => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

impl Default for ResponseCollector {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}
