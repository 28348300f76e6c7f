//! Nullable wallet provider — scripted extension responses for testing.

use async_trait::async_trait;
use becoming_wallet::{Account, ExtensionInfo, WalletError, WalletProvider};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A scripted wallet provider.
///
/// Configure the extensions `enable` reports and queue up account lists
/// for successive `accounts` calls; the last queued list repeats once the
/// queue is drained, so a single list behaves like a fixed provider.
pub struct NullWallet {
    extensions: Vec<ExtensionInfo>,
    account_script: Mutex<VecDeque<Vec<Account>>>,
    current_accounts: Mutex<Vec<Account>>,
    enable_calls: AtomicUsize,
}

impl NullWallet {
    /// A provider with one responding extension and the given accounts.
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            extensions: vec![ExtensionInfo {
                name: "null-extension".to_string(),
                version: "0.0.0".to_string(),
            }],
            account_script: Mutex::new(VecDeque::new()),
            current_accounts: Mutex::new(accounts),
            enable_calls: AtomicUsize::new(0),
        }
    }

    /// A provider where no extension responds to `enable`.
    pub fn without_extension() -> Self {
        Self {
            extensions: Vec::new(),
            account_script: Mutex::new(VecDeque::new()),
            current_accounts: Mutex::new(Vec::new()),
            enable_calls: AtomicUsize::new(0),
        }
    }

    /// Queue an account list to be served by the next `accounts` call.
    /// Lists are consumed in order; exercises reconnects that refresh
    /// signer handles.
    pub fn queue_accounts(&self, accounts: Vec<Account>) {
        self.account_script.lock().unwrap().push_back(accounts);
    }

    /// How many times `enable` has been called.
    pub fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for NullWallet {
    async fn enable(&self, _app_name: &str) -> Result<Vec<ExtensionInfo>, WalletError> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.extensions.clone())
    }

    async fn accounts(&self) -> Result<Vec<Account>, WalletError> {
        if let Some(next) = self.account_script.lock().unwrap().pop_front() {
            *self.current_accounts.lock().unwrap() = next;
        }
        Ok(self.current_accounts.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_account_lists_consumed_in_order() {
        let wallet = NullWallet::with_accounts(vec![Account::new("5Aaa")]);
        wallet.queue_accounts(vec![Account::new("5Bbb"), Account::new("5Ccc")]);

        // The queued list takes precedence over the initial one.
        let first = wallet.accounts().await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].address.as_str(), "5Bbb");

        // Drained queue repeats the last list.
        let second = wallet.accounts().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_extension_installed() {
        let wallet = NullWallet::without_extension();
        assert!(wallet.enable("app").await.unwrap().is_empty());
        assert_eq!(wallet.enable_calls(), 1);
    }
}
