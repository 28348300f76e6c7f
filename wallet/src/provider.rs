//! The wallet provider trait.

use crate::{Account, WalletError};
use async_trait::async_trait;

/// A wallet extension that responded to an enable request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionInfo {
    pub name: String,
    pub version: String,
}

/// Capability exposed by the browser's wallet extension layer.
///
/// `enable` may prompt the user the first time an app requests access;
/// whether a prompt is shown is the provider's business. The coordinator
/// decides separately whether a *failed* enable is surfaced or swallowed
/// (silent restoration).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request enablement for `app_name`. Returns the extensions that
    /// responded; an empty list means no wallet is installed or the user
    /// declined.
    async fn enable(&self, app_name: &str) -> Result<Vec<ExtensionInfo>, WalletError>;

    /// Enumerate signing accounts across all enabled extensions.
    async fn accounts(&self) -> Result<Vec<Account>, WalletError>;
}
