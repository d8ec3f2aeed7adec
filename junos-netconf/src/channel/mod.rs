//! Channel layer: message framing and reply collection.
//!
//! This module turns the unbounded byte stream of a transport into discrete
//! replies delimited by the NETCONF 1.0 end-of-message marker.

mod buffer;
mod collector;

pub use buffer::FrameBuffer;
pub use collector::{DEFAULT_POLL_INTERVAL, DEFAULT_RESPONSE_TIMEOUT, ResponseCollector};
