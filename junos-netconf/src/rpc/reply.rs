//! Classification of RPC replies.

use std::fmt;

use crate::error::Result;
use crate::xml::XmlDocument;

const RPC_ERROR: &str = "<rpc-error>";
const OK: &str = "<ok/>";
const SEVERITY_PATH: [&str; 2] = ["rpc-error", "error-severity"];
const MESSAGE_PATH: [&str; 2] = ["rpc-error", "error-message"];

/// `error-severity` of an `rpc-error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// The raw text of one reply, terminator removed.
///
/// Only the first `rpc-error` of a reply is ever inspected: when a device
/// reports several errors or warnings at once, [`severity`](Self::severity),
/// [`has_error`](Self::has_error), [`has_warning`](Self::has_warning) and
/// [`error_message`](Self::error_message) all describe the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcReply {
    raw: String,
}

impl RpcReply {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }

    /// True if `<ok/>` appears anywhere in the reply text.
    pub fn is_ok(&self) -> bool {
        self.raw.contains(OK)
    }

    /// Severity of the first `rpc-error`, if the reply has one.
    ///
    /// The reply is only parsed when it textually contains `<rpc-error>`.
    pub fn severity(&self) -> Result<Option<Severity>> {
        if !self.raw.contains(RPC_ERROR) {
            return Ok(None);
        }
        let doc = self.to_xml()?;
        Ok(match doc.find_value(&SEVERITY_PATH) {
            Some("error") => Some(Severity::Error),
            Some("warning") => Some(Severity::Warning),
            _ => None,
        })
    }

    /// True if the first `rpc-error` has severity exactly `error`.
    pub fn has_error(&self) -> Result<bool> {
        Ok(self.severity()? == Some(Severity::Error))
    }

    /// True if the first `rpc-error` has severity exactly `warning`.
    pub fn has_warning(&self) -> Result<bool> {
        Ok(self.severity()? == Some(Severity::Warning))
    }

    /// Trimmed `error-message` of the first `rpc-error`.
    pub fn error_message(&self) -> Result<Option<String>> {
        if !self.raw.contains(RPC_ERROR) {
            return Ok(None);
        }
        let doc = self.to_xml()?;
        Ok(doc
            .find_value(&MESSAGE_PATH)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string))
    }

    /// No error-severity `rpc-error`, and an `<ok/>` acknowledgment.
    pub fn succeeded(&self) -> Result<bool> {
        Ok(!self.has_error()? && self.is_ok())
    }

    /// "<label> returned error", with the device's message appended when known.
    pub(crate) fn failure_message(&self, label: &str) -> String {
        match self.error_message() {
            Ok(Some(detail)) => format!("{} returned error: {}", label, detail),
            _ => format!("{} returned error", label),
        }
    }

    /// Parse the reply into a document.
    pub fn to_xml(&self) -> Result<XmlDocument> {
        XmlDocument::parse(&self.raw)
    }
}

impl fmt::Display for RpcReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARNING: &str = "<rpc-reply><rpc-error><error-severity>warning</error-severity>\
                           </rpc-error><ok/></rpc-reply>";
    const ERROR: &str = "<rpc-reply><rpc-error><error-severity>error</error-severity>\
                         <error-message>\nconfiguration database locked\n</error-message>\
                         </rpc-error></rpc-reply>";

    #[test]
    fn test_warning_is_not_error() {
        let reply = RpcReply::new(WARNING);
        assert!(!reply.has_error().unwrap());
        assert!(reply.has_warning().unwrap());
        assert!(reply.succeeded().unwrap());
    }

    #[test]
    fn test_error() {
        let reply = RpcReply::new(ERROR);
        assert!(reply.has_error().unwrap());
        assert!(!reply.has_warning().unwrap());
        assert!(!reply.succeeded().unwrap());
        assert_eq!(
            reply.error_message().unwrap().as_deref(),
            Some("configuration database locked")
        );
        assert_eq!(
            reply.failure_message("Load operation"),
            "Load operation returned error: configuration database locked"
        );
    }

    #[test]
    fn test_only_first_rpc_error_counts() {
        let reply = RpcReply::new(
            "<rpc-reply>\
             <rpc-error><error-severity>warning</error-severity></rpc-error>\
             <rpc-error><error-severity>error</error-severity></rpc-error>\
             </rpc-reply>",
        );
        assert!(!reply.has_error().unwrap());
        assert!(reply.has_warning().unwrap());
    }

    #[test]
    fn test_no_rpc_error_skips_parsing() {
        // Not XML at all, but no <rpc-error> so nothing is parsed
        let reply = RpcReply::new("garbage <ok/> garbage");
        assert!(!reply.has_error().unwrap());
        assert!(!reply.has_warning().unwrap());
        assert!(reply.is_ok());
        assert_eq!(reply.failure_message("Commit operation"), "Commit operation returned error");
    }

    #[test]
    fn test_is_ok_is_textual() {
        assert!(RpcReply::new("<rpc-reply><a><b><ok/></b></a></rpc-reply>").is_ok());
        assert!(!RpcReply::new("<rpc-reply><ok></ok></rpc-reply>").is_ok());
        assert!(!RpcReply::new("<rpc-reply/>").is_ok());
    }

    #[test]
    fn test_malformed_error_reply() {
        let reply = RpcReply::new("<rpc-reply><rpc-error>");
        assert!(matches!(reply.has_error(), Err(crate::Error::Xml(_))));
    }
}
