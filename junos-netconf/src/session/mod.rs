//! NETCONF session layer.
//!
//! A [`NetconfSession`] owns one transport and drives the request/reply
//! exchanges on it: hello, locking, loading, committing, retrieval and
//! operational commands. Sessions are normally opened with
//! [`SessionBuilder`].

mod builder;
mod candidate;
pub(crate) mod config;
mod netconf;
mod stream;

pub use builder::SessionBuilder;
pub use candidate::CandidateLock;
pub use config::{DEFAULT_HELLO, SessionConfig};
pub use netconf::NetconfSession;
pub use stream::RpcStream;
