//! Error types for junos-netconf.

use std::convert::Infallible;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for junos-netconf operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// NETCONF exchange errors (timeouts, rpc-error replies)
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Caller input rejected before any I/O
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Reply could not be parsed as XML
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
}

impl Error {
    /// True if no end-of-message marker arrived within the response timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Protocol(ProtocolError::ResponseTimeout(_)))
    }

    /// True if the caller passed a malformed or missing argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::Input(InputError::InvalidArgument { .. }))
    }

    /// The raw device reply attached to a protocol failure, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            Error::Protocol(
                ProtocolError::Load { reply, .. }
                | ProtocolError::Commit { reply, .. }
                | ProtocolError::LockFailed { reply },
            ) => Some(reply),
            _ => None,
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        InputError::InvalidArgument {
            message: message.into(),
        }
        .into()
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Transport layer errors (SSH connection, authentication, channel I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Server presented a key different from the one in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Server is not in known_hosts and strict checking is enabled
    #[error("Host {host}:{port} not found in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// The server refused the `netconf` subsystem
    #[error("Subsystem '{0}' request failed")]
    SubsystemRequestFailed(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Connect timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by a completed or abandoned NETCONF exchange.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The end-of-message marker did not arrive in time. Partial data is discarded.
    #[error("Response timeout exceeded after {0:?}")]
    ResponseTimeout(Duration),

    /// An edit-config / load-configuration was rejected
    #[error("{message}")]
    Load { message: String, reply: String },

    /// A commit was rejected
    #[error("{message}")]
    Commit { message: String, reply: String },

    /// The candidate lock could not be taken
    #[error("Unclean lock operation. Cannot proceed further.")]
    LockFailed { reply: String },
}

/// Caller input errors. Always raised before anything is written to the device.
#[derive(Error, Debug)]
pub enum InputError {
    /// Malformed or missing argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Configuration file does not exist
    #[error("The system cannot find the configuration file specified: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration file exists but could not be read
    #[error("Failed to read configuration file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// XML document model errors.
#[derive(Error, Debug)]
pub enum XmlError {
    /// Text is not well-formed XML
    #[error("Malformed XML: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// Result type alias using junos-netconf's Error.
pub type Result<T> = std::result::Result<T, Error>;
