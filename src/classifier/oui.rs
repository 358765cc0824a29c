//! MAC address OUI to vendor lookup

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use mac_address::MacAddress;

use super::types::{ClassifierConfigError, Vendor};

/// First three octets of a MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacPrefix([u8; 3]);

impl MacPrefix {
    pub const fn new(octets: [u8; 3]) -> Self {
        Self(octets)
    }

    pub fn from_mac(mac: &MacAddress) -> Self {
        let bytes = mac.bytes();
        Self([bytes[0], bytes[1], bytes[2]])
    }

    pub fn octets(&self) -> [u8; 3] {
        self.0
    }
}

impl fmt::Display for MacPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}:{:02X}:{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Accepts `00:25:B5`, `00-25-b5` and `0025B5`
impl FromStr for MacPrefix {
    type Err = ClassifierConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ClassifierConfigError::InvalidOuiPrefix(s.to_string()));
        }

        let mut octets = [0u8; 3];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| ClassifierConfigError::InvalidOuiPrefix(s.to_string()))?;
        }
        Ok(Self(octets))
    }
}

/// Resolves a MAC prefix to a vendor
pub trait OuiLookup: Send + Sync {
    fn lookup(&self, prefix: MacPrefix) -> Option<Vendor>;
}

/// Immutable OUI table
#[derive(Debug, Clone, Default)]
pub struct OuiTable {
    entries: HashMap<MacPrefix, Vendor>,
}

const BUILTIN_OUIS: &[([u8; 3], Vendor)] = &[
    ([0x00, 0x25, 0xB5], Vendor::Cisco),
    ([0x00, 0x14, 0x22], Vendor::Dell),
    ([0x18, 0x66, 0xDA], Vendor::Dell),
    ([0xF8, 0xBC, 0x12], Vendor::Dell),
    ([0x94, 0x18, 0x82], Vendor::Hpe),
    ([0xAC, 0x1F, 0x6B], Vendor::Supermicro),
    ([0x0C, 0xC4, 0x7A], Vendor::Supermicro),
    ([0x00, 0x1B, 0x21], Vendor::Intel),
    ([0x6C, 0xAE, 0x8B], Vendor::Lenovo),
    ([0xB8, 0x3F, 0xD2], Vendor::Nvidia),
];

impl OuiTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with well-known server vendor prefixes
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (octets, vendor) in BUILTIN_OUIS {
            table.insert(MacPrefix::new(*octets), *vendor);
        }
        table
    }

    /// Build a table from `prefix -> vendor name` pairs
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self, ClassifierConfigError> {
        let mut table = Self::new();
        table.extend_from_entries(entries)?;
        Ok(table)
    }

    /// Add configured entries, replacing any existing prefix
    pub fn extend_from_entries<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<(), ClassifierConfigError> {
        for (prefix, vendor) in entries {
            self.insert(prefix.parse()?, vendor.parse()?);
        }
        Ok(())
    }

    pub fn insert(&mut self, prefix: MacPrefix, vendor: Vendor) -> Option<Vendor> {
        self.entries.insert(prefix, vendor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OuiLookup for OuiTable {
    fn lookup(&self, prefix: MacPrefix) -> Option<Vendor> {
        self.entries.get(&prefix).copied()
    }
}
