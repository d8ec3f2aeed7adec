//! Owned XML document model for device replies.
//!
//! Replies are parsed once with `roxmltree` and copied into a small owned tree
//! so they can outlive the reply text. Element names are matched by local name
//! (namespace prefixes and URIs are ignored).

use std::fmt;

use crate::error::{Result, XmlError};

/// An XML element: local name, attributes, direct text and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            name: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            text: node.text().map(str::to_string),
            children: node
                .children()
                .filter(|c| c.is_element())
                .map(Self::from_node)
                .collect(),
        }
    }

    /// Local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text of the element's first child node, if that node is text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First descendant (depth-first, document order) with the given name.
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Follow `path`, taking the first matching descendant at each step.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter()
            .try_fold(self, |element, name| element.find_descendant(name))
    }

    fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, attr: bool) -> fmt::Result {
        for c in text.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' if attr => f.write_str("&quot;")?,
                _ => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}

/// Normalized form: local names, no namespace declarations, first text only.
/// Use [`XmlDocument`]'s `Display` for the exact source.
impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"", key)?;
            Self::write_escaped(f, value, true)?;
            f.write_str("\"")?;
        }
        if self.text.is_none() && self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        if let Some(text) = &self.text {
            Self::write_escaped(f, text, false)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.name)
    }
}

/// A parsed XML document.
///
/// The source text of the document element is kept alongside the tree, so
/// `Display` reproduces it exactly: namespace declarations, prefixes and
/// mixed content survive even though lookups work on local names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Document element as it appeared in the parsed text.
    source: String,
    root: XmlElement,
}

impl XmlDocument {
    /// Parse text into a document. Leading whitespace is tolerated.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim_start();
        let doc = roxmltree::Document::parse(text).map_err(XmlError::Parse)?;
        let root = doc.root_element();
        Ok(Self {
            source: text[root.range()].to_string(),
            root: XmlElement::from_node(root),
        })
    }

    /// The document element's source text, prolog and trailing comments excluded.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The document element.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Text at a tag path, searched from the document element.
    ///
    /// Each step selects the first descendant with that name, so
    /// `["rpc-error", "error-severity"]` finds the severity of the first
    /// `rpc-error` anywhere in the reply.
    pub fn find_value(&self, path: &[&str]) -> Option<&str> {
        self.root.find(path).and_then(XmlElement::text)
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"
<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0" xmlns:junos="http://xml.juniper.net/junos/21.4R0/junos">
  <rpc-error>
    <error-type>protocol</error-type>
    <error-severity>warning</error-severity>
  </rpc-error>
  <rpc-error>
    <error-severity>error</error-severity>
    <error-message>syntax error</error-message>
  </rpc-error>
</rpc-reply>"#;

    #[test]
    fn test_find_value_takes_first_match() {
        let doc = XmlDocument::parse(REPLY).unwrap();
        assert_eq!(doc.root().name(), "rpc-reply");
        assert_eq!(
            doc.find_value(&["rpc-error", "error-severity"]),
            Some("warning")
        );
        assert_eq!(doc.find_value(&["error-message"]), Some("syntax error"));
    }

    #[test]
    fn test_find_value_missing() {
        let doc = XmlDocument::parse(REPLY).unwrap();
        assert_eq!(doc.find_value(&["output"]), None);
        assert_eq!(doc.find_value(&["rpc-error", "output"]), None);
    }

    #[test]
    fn test_find_value_through_nesting() {
        let doc = XmlDocument::parse(
            "<rpc-reply><output-wrapper><output>\nHostname: r1\n</output></output-wrapper></rpc-reply>",
        )
        .unwrap();
        assert_eq!(doc.find_value(&["output"]), Some("\nHostname: r1\n"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            XmlDocument::parse("<rpc-reply><ok/>"),
            Err(crate::Error::Xml(_))
        ));
    }

    #[test]
    fn test_parse_skips_leading_comments() {
        let doc = XmlDocument::parse(
            "\n<!-- No zombies were killed -->\n<hello><session-id>7</session-id></hello>",
        )
        .unwrap();
        assert_eq!(doc.find_value(&["session-id"]), Some("7"));
    }

    #[test]
    fn test_display_round_trips_structure() {
        let doc = XmlDocument::parse(
            r#"<get-config><source><candidate/></source><filter type="subtree">a &amp; b</filter></get-config>"#,
        )
        .unwrap();
        assert_eq!(
            doc.to_string(),
            r#"<get-config><source><candidate/></source><filter type="subtree">a &amp; b</filter></get-config>"#
        );
    }

    #[test]
    fn test_display_keeps_namespaces_and_mixed_content() {
        let namespaced = r#"<get-config xmlns="urn:ietf:params:xml:ns:netconf:base:1.0"><source><candidate/></source></get-config>"#;
        let mixed = "<a>head<b/>tail</a>";
        let prefixed = r#"<jc:load-configuration xmlns:jc="http://xml.juniper.net/junos/conf" jc:action="set"/>"#;

        for text in [namespaced, mixed, prefixed] {
            assert_eq!(XmlDocument::parse(text).unwrap().to_string(), text);
        }

        let doc = XmlDocument::parse(prefixed).unwrap();
        assert_eq!(doc.root().name(), "load-configuration");
        assert_eq!(doc.root().attribute("action"), Some("set"));
    }

    #[test]
    fn test_display_drops_prolog() {
        let doc = XmlDocument::parse(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- header -->\n<get-software-information/>\n",
        )
        .unwrap();
        assert_eq!(doc.as_str(), "<get-software-information/>");
    }
}
