//! # junos-netconf
//!
//! Async NETCONF 1.0 client engine for Juniper Junos devices.
//!
//! The crate drives a NETCONF session over the `netconf` SSH subsystem: it
//! builds `<rpc>` envelopes, frames replies on the `]]>]]>` end-of-message
//! marker, classifies `rpc-error` replies and wraps the usual configuration
//! workflow (lock, load, validate, commit, unlock).
//!
//! ## Features
//!
//! - Async SSH transport via russh, with known_hosts verification
//! - Poll-and-backoff reply collection with a per-reply deadline
//! - XML, text and `set` configuration loads, from strings or files
//! - Candidate lock guard and composite commit-from-file
//! - Streaming reads for long-running commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use junos_netconf::SessionBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), junos_netconf::Error> {
//!     let mut session = SessionBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .connect()
//!         .await?;
//!
//!     println!("{}", session.run_cli_command("show version").await?);
//!
//!     session.load_set_configuration("set system host-name r1").await?;
//!     session.commit().await?;
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod rpc;
pub mod session;
pub mod transport;
pub mod xml;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use rpc::{ConfigFormat, Datastore, LoadType, Rpc, RpcReply, Severity, TERMINATOR};
pub use session::{CandidateLock, NetconfSession, RpcStream, SessionBuilder, SessionConfig};
pub use transport::{AuthMethod, HostKeyVerification, SshConfig, SshTransport, Transport};
pub use xml::{XmlDocument, XmlElement};
