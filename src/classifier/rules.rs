//! Ordered identifier rules mapping token shapes to vendors

use std::net::Ipv4Addr;
use std::sync::Arc;

use lazy_static::lazy_static;
use mac_address::MacAddress;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::oui::{MacPrefix, OuiLookup};
use super::types::{ClassifierConfigError, Vendor};

const DEFAULT_RACK_UNIT_PATTERN: &str = "sys/rack-unit";
const DEFAULT_ASSET_TAG_MIN_LEN: usize = 1;

lazy_static! {
    static ref MAC_PATTERN: Regex =
        Regex::new(r"^[0-9A-Fa-f]{2}(:[0-9A-Fa-f]{2}){5}$").unwrap();

    static ref BUILTIN_RULES: Arc<VendorRuleTable> = Arc::new(
        VendorRuleTable::from_config(&default_rules())
            .expect("built-in vendor rules must compile")
    );
}

/// One configured rule, as read from settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VendorRuleConfig {
    /// `<ipv4>:<path>` where the path matches `path_pattern`
    RackUnit {
        vendor: Vendor,
        #[serde(default = "default_rack_unit_pattern")]
        path_pattern: String,
    },
    /// Bare alphanumeric code that is not MAC-shaped; unbounded above by default
    AssetTag {
        vendor: Vendor,
        #[serde(default = "default_asset_tag_min_len")]
        min_len: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_len: Option<usize>,
    },
    /// Colon-separated MAC resolved through the OUI table
    MacOui,
}

fn default_rack_unit_pattern() -> String {
    DEFAULT_RACK_UNIT_PATTERN.to_string()
}

fn default_asset_tag_min_len() -> usize {
    DEFAULT_ASSET_TAG_MIN_LEN
}

/// Rule set used when no rules are configured
pub fn default_rules() -> Vec<VendorRuleConfig> {
    vec![
        VendorRuleConfig::RackUnit {
            vendor: Vendor::Cisco,
            path_pattern: default_rack_unit_pattern(),
        },
        VendorRuleConfig::AssetTag {
            vendor: Vendor::Dell,
            min_len: DEFAULT_ASSET_TAG_MIN_LEN,
            max_len: None,
        },
        VendorRuleConfig::MacOui,
    ]
}

/// Whether a token looks like a MAC address, separated or bare
pub fn is_mac_shaped(token: &str) -> bool {
    MAC_PATTERN.is_match(token)
        || (token.len() == 12 && token.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Token shape a rule recognizes
#[derive(Debug, Clone)]
pub enum TokenMatcher {
    RackUnit { path: Regex },
    AssetTag {
        min_len: usize,
        max_len: Option<usize>,
    },
    MacOui,
}

impl TokenMatcher {
    pub fn kind(&self) -> &'static str {
        match self {
            TokenMatcher::RackUnit { .. } => "rack_unit",
            TokenMatcher::AssetTag { .. } => "asset_tag",
            TokenMatcher::MacOui => "mac_oui",
        }
    }
}

/// A matcher paired with the vendor it implies
#[derive(Debug, Clone)]
pub struct VendorRule {
    matcher: TokenMatcher,
    /// Fixed vendor; `None` for rules resolving the vendor from the token
    vendor: Option<Vendor>,
}

impl VendorRule {
    pub fn new(matcher: TokenMatcher, vendor: Option<Vendor>) -> Self {
        Self { matcher, vendor }
    }

    pub fn matcher(&self) -> &TokenMatcher {
        &self.matcher
    }

    /// Vendor this rule assigns to `token`, if it recognizes it
    pub fn classify(&self, token: &str, oui: &dyn OuiLookup) -> Option<Vendor> {
        match &self.matcher {
            TokenMatcher::RackUnit { path } => {
                let (host, rest) = token.split_once(':')?;
                host.parse::<Ipv4Addr>().ok()?;
                path.is_match(rest).then_some(self.vendor).flatten()
            }
            TokenMatcher::AssetTag { min_len, max_len } => {
                let len = token.len();
                let shaped = len >= *min_len
                    && max_len.map_or(true, |max| len <= max)
                    && token.chars().all(|c| c.is_ascii_alphanumeric())
                    && !is_mac_shaped(token);
                shaped.then_some(self.vendor).flatten()
            }
            TokenMatcher::MacOui => {
                if !MAC_PATTERN.is_match(token) {
                    return None;
                }
                let mac: MacAddress = token.parse().ok()?;
                oui.lookup(MacPrefix::from_mac(&mac))
            }
        }
    }
}

impl TryFrom<&VendorRuleConfig> for VendorRule {
    type Error = ClassifierConfigError;

    fn try_from(config: &VendorRuleConfig) -> Result<Self, Self::Error> {
        match config {
            VendorRuleConfig::RackUnit {
                vendor,
                path_pattern,
            } => {
                let path =
                    Regex::new(path_pattern).map_err(|source| ClassifierConfigError::InvalidPattern {
                        pattern: path_pattern.clone(),
                        source,
                    })?;
                Ok(Self::new(TokenMatcher::RackUnit { path }, Some(*vendor)))
            }
            VendorRuleConfig::AssetTag {
                vendor,
                min_len,
                max_len,
            } => {
                if *min_len == 0 || max_len.is_some_and(|max| max < *min_len) {
                    return Err(ClassifierConfigError::InvalidAssetTagBounds {
                        min: *min_len,
                        max: *max_len,
                    });
                }
                Ok(Self::new(
                    TokenMatcher::AssetTag {
                        min_len: *min_len,
                        max_len: *max_len,
                    },
                    Some(*vendor),
                ))
            }
            VendorRuleConfig::MacOui => Ok(Self::new(TokenMatcher::MacOui, None)),
        }
    }
}

/// Ordered, immutable rule list; earlier rules take priority
#[derive(Debug, Clone)]
pub struct VendorRuleTable {
    rules: Vec<VendorRule>,
}

impl VendorRuleTable {
    pub fn new(rules: Vec<VendorRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(configs: &[VendorRuleConfig]) -> Result<Self, ClassifierConfigError> {
        let rules = configs
            .iter()
            .map(VendorRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Process-wide default table
    pub fn builtin() -> Arc<VendorRuleTable> {
        BUILTIN_RULES.clone()
    }

    pub fn rules(&self) -> &[VendorRule] {
        &self.rules
    }

    /// First vendor any rule assigns to `token`, with the deciding rule
    pub fn classify_token(
        &self,
        token: &str,
        oui: &dyn OuiLookup,
    ) -> Option<(Vendor, &VendorRule)> {
        self.rules
            .iter()
            .find_map(|rule| rule.classify(token, oui).map(|vendor| (vendor, rule)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::oui::OuiTable;

    fn classify(token: &str) -> Option<Vendor> {
        let oui = OuiTable::builtin();
        VendorRuleTable::builtin()
            .classify_token(token, &oui)
            .map(|(vendor, _)| vendor)
    }

    #[test]
    fn test_rack_unit_is_cisco() {
        assert_eq!(classify("1.1.1.0:sys/rack-unit-2"), Some(Vendor::Cisco));
        assert_eq!(
            classify("10.240.19.70:org-root/sys/rack-unit-14"),
            Some(Vendor::Cisco)
        );
    }

    #[test]
    fn test_rack_unit_requires_ipv4_host() {
        assert_eq!(classify("host:sys/rack-unit-2"), None);
        assert_eq!(classify("1.1.1:sys/rack-unit-2"), None);
        assert_eq!(classify("1.1.1.0:sys/chassis-1"), None);
    }

    #[test]
    fn test_asset_tag_is_dell() {
        assert_eq!(classify("1234ABC"), Some(Vendor::Dell));
        assert_eq!(classify("H7ZK9Q2"), Some(Vendor::Dell));
    }

    #[test]
    fn test_separated_tokens_are_not_asset_tags() {
        assert_eq!(classify("1234-ABC"), None);
        assert_eq!(classify("node.example"), None);
        assert_eq!(classify("ab:cd"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_asset_tag_any_length() {
        assert_eq!(classify("X"), Some(Vendor::Dell));
        assert_eq!(classify("X1"), Some(Vendor::Dell));
        assert_eq!(classify("ABC"), Some(Vendor::Dell));
        assert_eq!(classify("ABCDEFGHIJKLMNOPQ"), Some(Vendor::Dell));
        assert_eq!(classify(&"7".repeat(64)), Some(Vendor::Dell));
    }

    #[test]
    fn test_configured_asset_tag_bounds() {
        let table = VendorRuleTable::from_config(&[VendorRuleConfig::AssetTag {
            vendor: Vendor::Dell,
            min_len: 3,
            max_len: Some(7),
        }])
        .unwrap();
        let oui = OuiTable::new();

        assert!(table.classify_token("AB", &oui).is_none());
        assert!(table.classify_token("ABC", &oui).is_some());
        assert!(table.classify_token("1234ABC", &oui).is_some());
        assert!(table.classify_token("1234ABCD", &oui).is_none());
    }

    #[test]
    fn test_bare_mac_is_not_asset_tag() {
        assert!(is_mac_shaped("5254beef1757"));
        assert_eq!(classify("5254beef1757"), None);
    }

    #[test]
    fn test_mac_resolved_through_oui() {
        assert_eq!(classify("00:25:b5:00:00:1f"), Some(Vendor::Cisco));
        assert_eq!(classify("ac:1f:6b:12:34:56"), Some(Vendor::Supermicro));
        assert_eq!(classify("52:54:be:ef:17:57"), None);
    }

    #[test]
    fn test_rule_kinds_in_priority_order() {
        let kinds: Vec<&str> = VendorRuleTable::builtin()
            .rules()
            .iter()
            .map(|rule| rule.matcher().kind())
            .collect();
        assert_eq!(kinds, vec!["rack_unit", "asset_tag", "mac_oui"]);
    }

    #[test]
    fn test_configured_pattern() {
        let table = VendorRuleTable::from_config(&[VendorRuleConfig::RackUnit {
            vendor: Vendor::Quanta,
            path_pattern: r"^/chassis/\d+$".to_string(),
        }])
        .unwrap();
        let oui = OuiTable::new();

        assert!(matches!(
            table.classify_token("10.0.0.1:/chassis/4", &oui),
            Some((Vendor::Quanta, _))
        ));
        assert!(table.classify_token("1.1.1.0:sys/rack-unit-2", &oui).is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_pattern = VendorRuleConfig::RackUnit {
            vendor: Vendor::Cisco,
            path_pattern: "sys/(rack".to_string(),
        };
        assert!(matches!(
            VendorRuleTable::from_config(&[bad_pattern]),
            Err(ClassifierConfigError::InvalidPattern { .. })
        ));

        let bad_bounds = VendorRuleConfig::AssetTag {
            vendor: Vendor::Dell,
            min_len: 8,
            max_len: Some(4),
        };
        assert!(matches!(
            VendorRuleTable::from_config(&[bad_bounds]),
            Err(ClassifierConfigError::InvalidAssetTagBounds { .. })
        ));
    }

    #[test]
    fn test_rule_config_deserialize() {
        let rules: Vec<VendorRuleConfig> = serde_json::from_value(serde_json::json!([
            {"kind": "rack_unit", "vendor": "cisco"},
            {"kind": "asset_tag", "vendor": "Dell", "max_len": 7},
            {"kind": "mac_oui"}
        ]))
        .unwrap();

        assert_eq!(
            rules[0],
            VendorRuleConfig::RackUnit {
                vendor: Vendor::Cisco,
                path_pattern: "sys/rack-unit".to_string()
            }
        );
        assert_eq!(
            rules[1],
            VendorRuleConfig::AssetTag {
                vendor: Vendor::Dell,
                min_len: 1,
                max_len: Some(7)
            }
        );
        assert_eq!(rules[2], VendorRuleConfig::MacOui);
    }
}
