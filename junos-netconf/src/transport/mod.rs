//! Byte-stream transport beneath a NETCONF session.
//!
//! The session engine only needs a bidirectional byte stream with a
//! non-blocking "is anything buffered" probe. [`SshTransport`] provides one
//! over the `netconf` SSH subsystem; tests substitute a scripted stream.

pub mod config;
#[cfg(test)]
pub(crate) mod mock;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::SshTransport;

use std::future::Future;

use crate::error::Result;

/// An already-connected, already-authenticated byte stream.
///
/// Implementations are owned by exactly one session and are never shared.
pub trait Transport: Send {
    /// Write all bytes to the peer.
    fn write_all(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Return whatever the peer has sent that is ready right now.
    ///
    /// `Ok(None)` means nothing is buffered at the moment; the caller decides
    /// whether to back off and probe again. Fails once the peer has gone away.
    fn read_available(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Wait for the next chunk of data. `Ok(None)` at end of stream.
    fn read(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Release the stream.
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}
