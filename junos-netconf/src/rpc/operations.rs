//! Builders for the fixed set of RPCs the session issues.
//!
//! All payload text supplied by the caller for text, set and CLI requests is
//! XML-escaped. XML payloads and subtree filters are inserted verbatim.

use std::fmt::Write;
use std::time::Duration;

use super::Rpc;
use super::options::{Datastore, LoadType};

/// Escape character data for inclusion in an element body.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a bare name as a self-closed tag; pass element text through.
fn tag_or_element(value: &str) -> String {
    if value.starts_with('<') {
        value.to_string()
    } else {
        format!("<{}/>", value)
    }
}

pub fn lock(target: Datastore) -> Rpc {
    Rpc::from_body(format_args!("<lock><target><{}/></target></lock>", target))
}

pub fn unlock(target: Datastore) -> Rpc {
    Rpc::from_body(format_args!(
        "<unlock><target><{}/></target></unlock>",
        target
    ))
}

/// `edit-config` with an XML payload, rooted at `<configuration>`.
pub fn edit_config_xml(target: Datastore, configuration: &str, load_type: LoadType) -> Rpc {
    let configuration = configuration.trim();
    let mut body = String::with_capacity(configuration.len() + 160);
    let _ = write!(
        body,
        "<edit-config><target><{}/></target><default-operation>{}</default-operation><config>",
        target, load_type
    );
    if configuration.starts_with("<configuration") {
        body.push_str(configuration);
    } else {
        let _ = write!(body, "<configuration>{}</configuration>", configuration);
    }
    body.push_str("</config></edit-config>");
    Rpc::from_body(body)
}

/// `edit-config` with a text/tree payload.
pub fn edit_config_text(target: Datastore, configuration: &str, load_type: LoadType) -> Rpc {
    Rpc::from_body(format_args!(
        "<edit-config><target><{}/></target><default-operation>{}</default-operation>\
         <config-text><configuration-text>{}</configuration-text></config-text></edit-config>",
        target,
        load_type,
        escape_text(configuration)
    ))
}

/// `load-configuration` of `set` statements.
pub fn load_configuration_set(configuration: &str) -> Rpc {
    Rpc::from_body(format_args!(
        "<load-configuration action=\"set\"><configuration-set>{}</configuration-set></load-configuration>",
        escape_text(configuration)
    ))
}

pub fn get_config(source: Datastore, filter: &str) -> Rpc {
    Rpc::from_body(format_args!(
        "<get-config><source><{}/></source><filter type=\"subtree\">{}</filter></get-config>",
        source, filter
    ))
}

pub fn commit() -> Rpc {
    Rpc::from_body("<commit/>")
}

/// Commit that the device rolls back unless confirmed within `timeout`.
pub fn commit_confirmed(timeout: Duration) -> Rpc {
    Rpc::from_body(format_args!(
        "<commit><confirmed/><confirm-timeout>{}</confirm-timeout></commit>",
        timeout.as_secs()
    ))
}

pub fn validate(source: Datastore) -> Rpc {
    Rpc::from_body(format_args!(
        "<validate><source><{}/></source></validate>",
        source
    ))
}

pub fn reboot() -> Rpc {
    Rpc::from_body("<request-reboot/>")
}

/// CLI command with plain-text output.
pub fn command_text(command: &str) -> Rpc {
    Rpc::from_body(format_args!(
        "<command format=\"text\">{}</command>",
        escape_text(command)
    ))
}

/// `open-configuration`; `mode` is a bare name such as `private` or an element.
pub fn open_configuration(mode: &str) -> Rpc {
    Rpc::from_body(format_args!(
        "<open-configuration>{}</open-configuration>",
        tag_or_element(mode.trim())
    ))
}

pub fn close_configuration() -> Rpc {
    Rpc::from_body("<close-configuration/>")
}

pub fn close_session() -> Rpc {
    Rpc::from_body("<close-session/>")
}
