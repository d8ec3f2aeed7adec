//! Session-level settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::{DEFAULT_POLL_INTERVAL, DEFAULT_RESPONSE_TIMEOUT};

/// Client greeting sent at session start, terminator included.
pub const DEFAULT_HELLO: &str = concat!(
    "<hello xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\">",
    "<capabilities>",
    "<capability>urn:ietf:params:netconf:base:1.0</capability>",
    "<capability>urn:ietf:params:netconf:base:1.0#candidate</capability>",
    "<capability>urn:ietf:params:netconf:base:1.0#confirmed-commit</capability>",
    "<capability>urn:ietf:params:netconf:base:1.0#validate</capability>",
    "<capability>urn:ietf:params:netconf:base:1.0#url?protocol=http,ftp,file</capability>",
    "</capabilities>",
    "</hello>",
    "]]>]]>"
);

/// Timing and greeting used by a [`NetconfSession`](super::NetconfSession).
///
/// Deserializes with defaults for any missing field:
///
/// ```rust
/// use junos_netconf::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::default()
///     .with_response_timeout(Duration::from_secs(60))
///     .with_poll_interval(Duration::from_millis(50));
/// assert_eq!(config.response_timeout, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Deadline for one complete reply.
    pub response_timeout: Duration,

    /// Backoff between probes while waiting for a reply.
    pub poll_interval: Duration,

    /// Greeting sent verbatim at session start.
    pub hello: String,
}

impl SessionConfig {
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_hello(mut self, hello: impl Into<String>) -> Self {
        self.hello = hello.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            hello: DEFAULT_HELLO.to_string(),
        }
    }
}
