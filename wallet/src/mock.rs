//! Deterministic demo wallet provider for mock mode.

use crate::{Account, ExtensionInfo, Signer, WalletError, WalletProvider};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Stable demo account addresses, identical on every run so persisted
/// selection survives reloads.
pub const DEMO_ADDRESS_ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
pub const DEMO_ADDRESS_DEV: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

/// A signer that returns a fixed signature without prompting.
pub struct MockSigner {
    signature: String,
}

impl MockSigner {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}

#[async_trait]
impl Signer for MockSigner {
    async fn sign_raw(&self, _payload: &[u8]) -> Result<String, WalletError> {
        Ok(self.signature.clone())
    }
}

/// Wallet provider used in mock mode: a fixed pair of demo accounts, no
/// prompts, an optional artificial connection delay so the UI's loading
/// states are exercised like the real extension handshake.
pub struct MockWalletProvider {
    delay: Duration,
}

impl MockWalletProvider {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(500),
        }
    }

    /// Override the simulated connection delay (zero for tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The fixed demo account set.
    pub fn demo_accounts() -> Vec<Account> {
        vec![
            Account::new(DEMO_ADDRESS_ALICE)
                .with_display_name("Alice")
                .with_wallet_source("polkadot-js")
                .with_signer(Arc::new(MockSigner::new("0x123456"))),
            Account::new(DEMO_ADDRESS_DEV)
                .with_display_name("Development Account")
                .with_wallet_source("polkadot-js")
                .with_signer(Arc::new(MockSigner::new("0x654321"))),
        ]
    }
}

impl Default for MockWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn enable(&self, app_name: &str) -> Result<Vec<ExtensionInfo>, WalletError> {
        tracing::debug!(app = app_name, "mock wallet enable");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(vec![ExtensionInfo {
            name: "polkadot-js".to_string(),
            version: "0.0.0-mock".to_string(),
        }])
    }

    async fn accounts(&self) -> Result<Vec<Account>, WalletError> {
        Ok(Self::demo_accounts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_accounts_stable_and_signing() {
        let provider = MockWalletProvider::new().with_delay(Duration::ZERO);
        let extensions = provider.enable("Becoming").await.unwrap();
        assert_eq!(extensions.len(), 1);

        let first = provider.accounts().await.unwrap();
        let second = provider.accounts().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].address.as_str(), DEMO_ADDRESS_ALICE);
        assert_eq!(first[1].address.as_str(), DEMO_ADDRESS_DEV);
        assert!(first.iter().all(Account::can_sign));
    }

    #[tokio::test]
    async fn test_mock_signer_fixed_signature() {
        let signer = MockSigner::new("0x123456");
        assert_eq!(signer.sign_raw(b"payload").await.unwrap(), "0x123456");
        assert_eq!(signer.sign_raw(b"other").await.unwrap(), "0x123456");
    }
}
