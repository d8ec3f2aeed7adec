//! Canonical RPC envelope construction.

use std::fmt;

use super::TERMINATOR;
use crate::error::{Error, Result};
use crate::xml::XmlDocument;

const RPC_OPEN: &str = "<rpc>";
const RPC_CLOSE: &str = "</rpc>";
const RPC_EMPTY: &str = "<rpc/>";

/// A complete, framed NETCONF request: `<rpc>` + body + `</rpc>` + terminator.
///
/// Three input shapes are accepted and normalized:
///
/// ```rust
/// use junos_netconf::rpc::Rpc;
///
/// let a = Rpc::new("get-chassis-inventory")?;
/// let b = Rpc::new("<get-chassis-inventory/>")?;
/// let c = Rpc::new("<rpc><get-chassis-inventory/></rpc>")?;
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// assert_eq!(a.as_str(), "<rpc><get-chassis-inventory/></rpc>]]>]]>");
/// # Ok::<(), junos_netconf::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rpc {
    wire: String,
}

impl Rpc {
    /// Normalize caller content into an envelope.
    ///
    /// - content starting with `<rpc>`, or `<rpc` and whitespace, or equal to
    ///   `<rpc/>` is used as is
    /// - any other element is wrapped in `<rpc>...</rpc>`
    /// - a bare operation name becomes `<rpc><name/></rpc>`
    ///
    /// Surrounding whitespace and a trailing terminator are stripped first, so
    /// feeding an envelope back in yields the same envelope.
    pub fn new(content: &str) -> Result<Self> {
        let content = content.trim();
        let content = content.strip_suffix(TERMINATOR).unwrap_or(content).trim_end();

        if content.is_empty() {
            return Err(Error::invalid_argument("RPC content can't be empty"));
        }

        let envelope = if is_envelope(content) {
            content.to_string()
        } else if content.starts_with('<') {
            format!("{}{}{}", RPC_OPEN, content, RPC_CLOSE)
        } else {
            format!("{}<{}/>{}", RPC_OPEN, content, RPC_CLOSE)
        };

        Ok(Self::framed(envelope))
    }

    /// Frame an envelope built internally from a known-good body.
    pub(crate) fn from_body(body: impl fmt::Display) -> Self {
        Self::framed(format!("{}{}{}", RPC_OPEN, body, RPC_CLOSE))
    }

    fn framed(mut envelope: String) -> Self {
        envelope.push_str(TERMINATOR);
        Self { wire: envelope }
    }

    /// The bytes written to the transport, terminator included.
    pub fn as_str(&self) -> &str {
        &self.wire
    }

    /// The envelope without the terminator.
    pub fn envelope(&self) -> &str {
        &self.wire[..self.wire.len() - TERMINATOR.len()]
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.wire.as_bytes()
    }
}

/// `<rpc>`, `<rpc/>`, or `<rpc` followed by whitespace and attributes.
fn is_envelope(content: &str) -> bool {
    if content.starts_with(RPC_OPEN) || content == RPC_EMPTY {
        return true;
    }
    content
        .strip_prefix("<rpc")
        .and_then(|rest| rest.bytes().next())
        .is_some_and(|b| b.is_ascii_whitespace())
}

impl fmt::Display for Rpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.envelope())
    }
}

impl TryFrom<&str> for Rpc {
    type Error = Error;

    fn try_from(content: &str) -> Result<Self> {
        Self::new(content)
    }
}

impl TryFrom<String> for Rpc {
    type Error = Error;

    fn try_from(content: String) -> Result<Self> {
        Self::new(&content)
    }
}

impl TryFrom<&XmlDocument> for Rpc {
    type Error = Error;

    fn try_from(document: &XmlDocument) -> Result<Self> {
        Self::new(document.as_str())
    }
}
