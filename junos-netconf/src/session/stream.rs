//! Incremental reading of a reply as it arrives.
//!
//! Long-running commands (log tails, large `show` output) can produce replies
//! that are slow to complete or too large to want in memory at once. An
//! `RpcStream` hands the raw bytes to the caller as they arrive instead of
//! collecting up to the end-of-message marker. There is no marker detection
//! and no timeout here: the caller decides when the reply is over, usually on
//! seeing the `]]>]]>` line.

use bytes::BytesMut;
use log::{debug, trace};
use memchr::memchr;

use crate::error::Result;
use crate::transport::Transport;

/// Raw reply stream for one request.
///
/// Created by [`NetconfSession::execute_rpc_streaming`](super::NetconfSession::execute_rpc_streaming)
/// and [`NetconfSession::run_cli_command_streaming`](super::NetconfSession::run_cli_command_streaming).
///
/// # Example
///
/// ```rust,no_run
/// # async fn example(session: &mut junos_netconf::NetconfSession) -> Result<(), junos_netconf::Error> {
/// let mut stream = session.run_cli_command_streaming("show log messages").await?;
/// while let Some(line) = stream.next_line().await? {
///     if line.contains(junos_netconf::TERMINATOR) {
///         break;
///     }
///     println!("{}", line);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RpcStream<'a, T: Transport> {
    transport: &'a mut T,
    /// Bytes read but not yet handed out by `next_line`.
    pending: BytesMut,
    finished: bool,
}

impl<'a, T: Transport> RpcStream<'a, T> {
    /// The request must already have been written to `transport`.
    pub(crate) fn new(transport: &'a mut T) -> Self {
        Self {
            transport,
            pending: BytesMut::new(),
            finished: false,
        }
    }

    /// Next chunk of raw bytes, or `None` once the transport reaches end of
    /// stream. Bytes buffered by [`next_line`](Self::next_line) come first.
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if !self.pending.is_empty() {
            return Ok(Some(self.pending.split().to_vec()));
        }
        if self.finished {
            return Ok(None);
        }
        match self.transport.read().await? {
            Some(chunk) => {
                trace!("stream chunk: {} bytes", chunk.len());
                Ok(Some(chunk))
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }

    /// Next line without its line ending.
    ///
    /// A trailing partial line is returned once the transport reaches end of
    /// stream; after that, `None`.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = memchr(b'\n', &self.pending) {
                let line = self.pending.split_to(pos + 1);
                return Ok(Some(Self::decode_line(&line)));
            }
            if self.finished {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                let rest = self.pending.split();
                return Ok(Some(Self::decode_line(&rest)));
            }
            match self.transport.read().await? {
                Some(chunk) => self.pending.extend_from_slice(&chunk),
                None => self.finished = true,
            }
        }
    }

    fn decode_line(bytes: &[u8]) -> String {
        let line = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        String::from_utf8_lossy(line).into_owned()
    }

    /// Whether the transport has reported end of stream.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<T: Transport> Drop for RpcStream<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                "RpcStream dropped before end of stream ({} bytes buffered)",
                self.pending.len()
            );
        }
    }
}
