//! Wallet account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An on-chain account address as handed out by the wallet extension.
///
/// Addresses are opaque SS58-style strings (e.g. `5Grwva…utQY`); the session
/// layer never derives or validates them cryptographically, it only compares
/// and persists them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Create a new account address from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address is well-formed enough to persist and query with.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }

    /// Abbreviated form for log output (`5Grwv…utQY`).
    ///
    /// Counts characters, not bytes: addresses are user-supplied strings
    /// and abbreviation must never panic on multibyte input.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_round_trip() {
        let addr = AccountAddress::new("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert_eq!(addr.as_str(), "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert!(addr.is_valid());
    }

    #[test]
    fn test_empty_address_invalid() {
        assert!(!AccountAddress::new("").is_valid());
    }

    #[test]
    fn test_short_form() {
        let addr = AccountAddress::new("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert_eq!(addr.short(), "5Grwv…utQY");

        let tiny = AccountAddress::new("5Grw");
        assert_eq!(tiny.short(), "5Grw");
    }

    #[test]
    fn test_short_multibyte_addresses() {
        // 7 chars but 14 bytes; short of the character threshold, so the
        // full string comes back.
        let seven = AccountAddress::new("ééééééé");
        assert_eq!(seven.short(), "ééééééé");

        // Long enough to abbreviate; must cut on character boundaries.
        let long = AccountAddress::new("àèìòùáéíóúâêîôû");
        assert_eq!(long.short(), "àèìòù…êîôû");

        let mixed = AccountAddress::new("5Grwvé€F5zXb26Fz9rcQ");
        assert_eq!(mixed.short(), "5Grwv…9rcQ");
    }
}
