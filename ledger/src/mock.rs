//! Mock ledger — contract behavior simulated over the key-value store.
//!
//! Used when real-network mode is disabled. The simulation is deliberately
//! faithful to the multi-step transaction flow (connection check → fee
//! estimate → submission → confirmation) with artificial sequential delays,
//! so loading-state UI is exercised identically to real mode.

use crate::{LedgerBackend, LedgerError, MintReceipt};
use async_trait::async_trait;
use becoming_store::{keys, KeyValueStore};
use becoming_types::{
    milestone, tip, AccountAddress, AvatarStage, Clock, Milestone, SystemClock, Timestamp, TipRecord,
    TokenId,
};
use becoming_wallet::Account;
use std::sync::Arc;
use std::time::Duration;

/// Artificial delays inserted between simulated transaction steps.
#[derive(Clone, Copy, Debug)]
pub struct SimDelays {
    pub connect_check: Duration,
    pub fee_estimate: Duration,
    pub submission: Duration,
    pub confirmation: Duration,
    pub query: Duration,
}

impl SimDelays {
    /// Delays matching the pacing of a real wallet/chain round trip.
    pub fn realistic() -> Self {
        Self {
            connect_check: Duration::from_millis(500),
            fee_estimate: Duration::from_millis(1000),
            submission: Duration::from_millis(1500),
            confirmation: Duration::from_millis(2000),
            query: Duration::from_millis(800),
        }
    }

    /// No delays; for tests.
    pub fn none() -> Self {
        Self {
            connect_check: Duration::ZERO,
            fee_estimate: Duration::ZERO,
            submission: Duration::ZERO,
            confirmation: Duration::ZERO,
            query: Duration::ZERO,
        }
    }
}

impl Default for SimDelays {
    fn default() -> Self {
        Self::realistic()
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}

/// In-process simulation of the on-chain contract, backed entirely by the
/// persistent key-value store.
pub struct MockLedger {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    delays: SimDelays,
}

impl MockLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            delays: SimDelays::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_delays(mut self, delays: SimDelays) -> Self {
        self.delays = delays;
        self
    }

    fn is_minted(&self, account: &AccountAddress) -> Result<bool, LedgerError> {
        Ok(self.store.get_flag(&keys::minted(account))?)
    }

    /// Assign the next token id via a read-modify-write on the counter key.
    fn next_token_id(&self) -> Result<TokenId, LedgerError> {
        let current = self
            .store
            .get(&keys::next_token_id())?
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(1);
        self.store
            .put(&keys::next_token_id(), &(current + 1).to_string())?;
        Ok(TokenId::new(current))
    }
}

#[async_trait]
impl LedgerBackend for MockLedger {
    async fn owner_of(
        &self,
        account: &AccountAddress,
    ) -> Result<Option<AccountAddress>, LedgerError> {
        Ok(self.is_minted(account)?.then(|| account.clone()))
    }

    async fn mint(
        &self,
        account: &Account,
        allow_remint: bool,
    ) -> Result<MintReceipt, LedgerError> {
        let address = &account.address;
        let already = self.is_minted(address)?;
        if already && !allow_remint {
            return Err(LedgerError::AlreadyMinted);
        }

        pause(self.delays.connect_check).await;
        tracing::debug!(account = %address.short(), "wallet connected, preparing transaction");
        pause(self.delays.fee_estimate).await;
        tracing::debug!("estimating transaction fees");
        pause(self.delays.submission).await;
        tracing::debug!("transaction submitted to network");
        pause(self.delays.confirmation).await;
        tracing::debug!("transaction confirmed by network");

        let token_id = self.next_token_id()?;
        let minted_at = self.clock.now();
        self.store.put_flag(&keys::minted(address), true)?;
        self.store
            .put(&keys::mint_date(address), &minted_at.as_secs().to_string())?;
        self.store.put(&keys::token_id(address), &token_id.to_string())?;

        // Re-minting resets progress.
        if already {
            self.store.delete(&keys::milestones(address))?;
            tracing::debug!(account = %address.short(), "cleared existing milestones for re-mint");
        }

        Ok(MintReceipt { token_id, minted_at })
    }

    async fn append_milestone(
        &self,
        account: &Account,
        new_entry: &Milestone,
    ) -> Result<(), LedgerError> {
        let address = &account.address;
        if !self.is_minted(address)? {
            return Err(LedgerError::NotMinted);
        }

        pause(self.delays.connect_check).await;
        tracing::debug!("preparing milestone data");
        pause(self.delays.submission).await;
        tracing::debug!("submitting transaction to network");

        // Read the latest log immediately before writing so rapid sequential
        // appends never lose an entry.
        let key = keys::milestones(address);
        let mut log = self
            .store
            .get(&key)?
            .map(|raw| milestone::decode_log(&raw))
            .unwrap_or_default();
        log.push(new_entry.clone());
        self.store.put(&key, &milestone::encode_log(&log))?;

        pause(self.delays.confirmation).await;
        tracing::debug!(count = log.len(), "transaction confirmed, milestone added");
        Ok(())
    }

    async fn send_tip(
        &self,
        account: &Account,
        recipient: &AccountAddress,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let address = &account.address;
        if !self.is_minted(address)? {
            return Err(LedgerError::NotMinted);
        }

        let key = keys::tips(address);
        let mut log = self
            .store
            .get(&key)?
            .map(|raw| tip::decode_log(&raw))
            .unwrap_or_default();
        log.push(TipRecord {
            recipient: recipient.clone(),
            amount,
            sent_at: self.clock.now(),
        });
        self.store.put(&key, &tip::encode_log(&log))?;

        pause(self.delays.confirmation).await;
        tracing::debug!(recipient = %recipient.short(), amount, "tip recorded");
        Ok(())
    }

    async fn milestones(&self, account: &AccountAddress) -> Result<Vec<Milestone>, LedgerError> {
        pause(self.delays.query).await;
        Ok(self
            .store
            .get(&keys::milestones(account))?
            .map(|raw| milestone::decode_log(&raw))
            .unwrap_or_default())
    }

    async fn avatar_stage(&self, account: &AccountAddress) -> Result<AvatarStage, LedgerError> {
        let count = self.milestones(account).await?.len();
        Ok(AvatarStage::from_milestone_count(count))
    }

    async fn mint_timestamp(
        &self,
        account: &AccountAddress,
    ) -> Result<Option<Timestamp>, LedgerError> {
        Ok(self
            .store
            .get(&keys::mint_date(account))?
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Timestamp::new))
    }
}
