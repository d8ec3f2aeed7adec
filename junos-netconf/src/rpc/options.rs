//! Datastores, load types and configuration formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Configuration datastore addressed by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datastore {
    /// Staging area; edits land here until committed.
    #[default]
    Candidate,
    /// The active configuration.
    Running,
}

impl Datastore {
    pub fn as_str(&self) -> &'static str {
        match self {
            Datastore::Candidate => "candidate",
            Datastore::Running => "running",
        }
    }
}

impl fmt::Display for Datastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `default-operation` of an edit-config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadType {
    Merge,
    Replace,
}

impl LoadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadType::Merge => "merge",
            LoadType::Replace => "replace",
        }
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("merge") {
            Ok(LoadType::Merge)
        } else if s.eq_ignore_ascii_case("replace") {
            Ok(LoadType::Replace)
        } else {
            Err(Error::invalid_argument(format!(
                "'loadType' argument must be merge|replace, got '{}'",
                s
            )))
        }
    }
}

impl TryFrom<&str> for LoadType {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Syntax of a configuration payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// `<configuration>` XML.
    Xml,
    /// Curly-brace text/tree format.
    Text,
    /// `set` statements, one per line.
    Set,
}

impl ConfigFormat {
    /// Classify a payload by its leading token: `<` is XML, `set` is set
    /// format, anything else is text.
    pub fn detect(configuration: &str) -> Self {
        let configuration = configuration.trim_start();
        if configuration.starts_with('<') {
            ConfigFormat::Xml
        } else if configuration.starts_with("set") {
            ConfigFormat::Set
        } else {
            ConfigFormat::Text
        }
    }

    /// Whether loads in this format take a merge/replace load type.
    pub fn uses_load_type(&self) -> bool {
        !matches!(self, ConfigFormat::Set)
    }
}
