//! RPC envelopes and replies.
//!
//! Every request on the wire is `<rpc>...</rpc>` followed by the legacy
//! end-of-message marker [`TERMINATOR`]. [`Rpc`] is the single canonical form
//! of an outgoing request; [`RpcReply`] wraps the text that came back.

mod envelope;
pub mod operations;
mod options;
mod reply;

pub use envelope::Rpc;
pub use options::{ConfigFormat, Datastore, LoadType};
pub use reply::{RpcReply, Severity};

/// End-of-message marker of the NETCONF 1.0 framing.
pub const TERMINATOR: &str = "]]>]]>";
