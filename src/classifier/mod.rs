//! Node vendor classification.
//!
//! A node's reported identifiers are checked in order against an ordered
//! rule table; the first identifier a rule recognizes decides the vendor.
//!
//! | Rule | Token shape | Vendor |
//! |------|-------------|--------|
//! | `rack_unit` | `<ipv4>:<path>` with `sys/rack-unit` in the path | Cisco |
//! | `asset_tag` | bare alphanumeric code, not MAC-shaped | Dell |
//! | `mac_oui` | `xx:xx:xx:xx:xx:xx` | from the OUI table, unknown on a miss |

#[allow(clippy::module_inception)]
mod classifier;
mod directory;
mod oui;
mod rules;
mod types;

pub use classifier::VendorClassifier;
pub use directory::{InMemoryNodeDirectory, NodeDirectory};
pub use oui::{MacPrefix, OuiLookup, OuiTable};
pub use rules::{
    default_rules, is_mac_shaped, TokenMatcher, VendorRule, VendorRuleConfig, VendorRuleTable,
};
pub use types::{
    ClassifierConfigError, ClassifyError, ClassifyResult, DirectoryError, NodeRecord, Vendor,
    VendorClassification, INVALID_NODE_MESSAGE,
};
