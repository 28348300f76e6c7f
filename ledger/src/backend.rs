//! The ledger backend trait.

use crate::LedgerError;
use async_trait::async_trait;
use becoming_types::{AccountAddress, AvatarStage, Milestone, Timestamp, TokenId};
use becoming_wallet::Account;
use serde::{Deserialize, Serialize};

/// Outcome of a successful mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub token_id: TokenId,
    pub minted_at: Timestamp,
}

/// The observable contract surface, satisfied identically by the mock and
/// the real chain.
///
/// Invariants every implementation upholds:
/// - at most one live mint record per account; a second mint fails with
///   [`LedgerError::AlreadyMinted`] unless `allow_remint` is set, in which
///   case the account's milestone log is cleared (re-minting resets
///   progress);
/// - milestone appends are atomic and strictly append-only;
/// - mutating operations on an unminted account fail with
///   [`LedgerError::NotMinted`].
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Open a connection to the backing network, if any. Backends with
    /// nothing to open are ready immediately.
    async fn ensure_ready(&self) -> Result<(), LedgerError> {
        Ok(())
    }

    /// Owner of the account's soulbound token, if minted.
    async fn owner_of(
        &self,
        account: &AccountAddress,
    ) -> Result<Option<AccountAddress>, LedgerError>;

    /// Whether a live mint record exists for `account`.
    async fn minted(&self, account: &AccountAddress) -> Result<bool, LedgerError> {
        Ok(self.owner_of(account).await?.as_ref() == Some(account))
    }

    /// Mint the soulbound token for `account`.
    async fn mint(&self, account: &Account, allow_remint: bool)
        -> Result<MintReceipt, LedgerError>;

    /// Append one milestone to the account's log.
    async fn append_milestone(
        &self,
        account: &Account,
        milestone: &Milestone,
    ) -> Result<(), LedgerError>;

    /// Send a value-bearing tip to `recipient`.
    async fn send_tip(
        &self,
        account: &Account,
        recipient: &AccountAddress,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// The account's milestone log, oldest first.
    async fn milestones(&self, account: &AccountAddress) -> Result<Vec<Milestone>, LedgerError>;

    /// Current avatar stage for the account.
    async fn avatar_stage(&self, account: &AccountAddress) -> Result<AvatarStage, LedgerError>;

    /// When the account minted, if known.
    async fn mint_timestamp(
        &self,
        account: &AccountAddress,
    ) -> Result<Option<Timestamp>, LedgerError>;
}
