//! Classifier types and error definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message carried by [`ClassifyError::InvalidNode`]; callers match on it
pub const INVALID_NODE_MESSAGE: &str = "invalid node id.";

/// Recognized hardware vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Vendor {
    Cisco,
    Dell,
    Hpe,
    Lenovo,
    Supermicro,
    Intel,
    Quanta,
    Nvidia,
}

impl Vendor {
    pub const ALL: [Vendor; 8] = [
        Vendor::Cisco,
        Vendor::Dell,
        Vendor::Hpe,
        Vendor::Lenovo,
        Vendor::Supermicro,
        Vendor::Intel,
        Vendor::Quanta,
        Vendor::Nvidia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Cisco => "Cisco",
            Vendor::Dell => "Dell",
            Vendor::Hpe => "HPE",
            Vendor::Lenovo => "Lenovo",
            Vendor::Supermicro => "Supermicro",
            Vendor::Intel => "Intel",
            Vendor::Quanta => "Quanta",
            Vendor::Nvidia => "NVIDIA",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = ClassifierConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Vendor::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ClassifierConfigError::UnknownVendor(s.to_string()))
    }
}

impl TryFrom<String> for Vendor {
    type Error = ClassifierConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Vendor> for String {
    fn from(vendor: Vendor) -> Self {
        vendor.as_str().to_string()
    }
}

/// A node as held by the node directory.
///
/// Serializes back to exactly the fields it was read from; an absent
/// `identifiers` key stays absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,

    /// Reported hardware identifiers, in directory order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, identifiers: Vec<String>) -> Self {
        Self {
            id: id.into(),
            identifiers: Some(identifiers),
            extra: serde_json::Map::new(),
        }
    }

    /// Identifiers, empty when the record carries none
    pub fn identifiers(&self) -> &[String] {
        self.identifiers.as_deref().unwrap_or_default()
    }
}

/// Best-guess vendor for a node, alongside the node as fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorClassification {
    /// `None` when no rule recognized any identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,

    pub node: NodeRecord,
}

/// Node directory failure other than "no such node"
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Node directory unavailable: {0}")]
    Unavailable(String),

    #[error("Node lookup failed: {0}")]
    Lookup(String),
}

/// Classification error type
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The directory has no node for the requested id
    #[error("invalid node id.")]
    InvalidNode(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Result type for classification
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Invalid classifier rule or OUI configuration
#[derive(Debug, Error)]
pub enum ClassifierConfigError {
    #[error("Unknown vendor: {0}")]
    UnknownVendor(String),

    #[error("Invalid rule pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid asset tag bounds: min {min}, max {max:?}")]
    InvalidAssetTagBounds { min: usize, max: Option<usize> },

    #[error("Invalid OUI prefix: {0}")]
    InvalidOuiPrefix(String),
}
