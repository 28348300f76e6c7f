//! Accounts as supplied by a wallet provider.

use crate::WalletError;
use async_trait::async_trait;
use becoming_types::AccountAddress;
use std::fmt;
use std::sync::Arc;

/// Per-account signing capability.
///
/// Present only on accounts whose extension granted signing access; a
/// selected account without a signer can still browse but mutating calls
/// will fail at submission time.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign an opaque payload, returning the hex-encoded signature.
    async fn sign_raw(&self, payload: &[u8]) -> Result<String, WalletError>;
}

/// One signing account exposed by a wallet extension.
#[derive(Clone)]
pub struct Account {
    pub address: AccountAddress,
    /// Display name from the extension's metadata, if any.
    pub display_name: Option<String>,
    /// Which extension supplied the account (e.g. "polkadot-js").
    pub wallet_source: Option<String>,
    /// Signing capability; `None` means the extension withheld it.
    pub signer: Option<Arc<dyn Signer>>,
}

impl Account {
    pub fn new(address: impl Into<AccountAddress>) -> Self {
        Self {
            address: address.into(),
            display_name: None,
            wallet_source: None,
            signer: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_wallet_source(mut self, source: impl Into<String>) -> Self {
        self.wallet_source = Some(source.into());
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Whether this account can sign transactions.
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }
}

// Identity is the address; the signer handle is deliberately excluded.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Account {}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("display_name", &self.display_name)
            .field("wallet_source", &self.wallet_source)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_address_only() {
        let a = Account::new("5Grw").with_display_name("Alice");
        let b = Account::new("5Grw").with_display_name("Someone Else");
        assert_eq!(a, b);
        assert_ne!(a, Account::new("5FHn"));
    }

    #[test]
    fn test_can_sign() {
        let plain = Account::new("5Grw");
        assert!(!plain.can_sign());
    }
}
