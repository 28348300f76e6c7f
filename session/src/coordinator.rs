//! The session coordinator.
//!
//! One coordinator owns all session state: connection and contract
//! readiness, the discovered account list, the selected account, and the
//! gating of every mutating operation. It is constructed once per
//! application instance and torn down explicitly; nothing lives in ambient
//! globals.
//!
//! Public operations never raise: each one records `last_error` and returns
//! `false` on failure. Mutual exclusion is the per-operation-class in-flight
//! token; the interior mutex is only ever held for field access, never
//! across an await.

use crate::{LedgerMode, OpGate, SessionConfig, SessionError, SessionState};
use becoming_ledger::LedgerBackend;
use becoming_store::{keys, KeyValueStore};
use becoming_types::{
    AccountAddress, AvatarStage, Clock, Milestone, SystemClock, Timestamp,
};
use becoming_wallet::{Account, WalletProvider};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Side effect fired on a successful mint. UI-observed only.
pub type CelebrationHook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    connection_ready: bool,
    contract_ready: bool,
    connecting: bool,
    minting: bool,
    last_error: Option<String>,
    accounts: Vec<Account>,
    selected: Option<Account>,
    /// Mint status of the selected account, once checked.
    minted: Option<bool>,
    /// Silent restoration already ran; reset only on explicit account change.
    restore_attempted: bool,
}

pub struct SessionCoordinator {
    config: SessionConfig,
    store: Arc<dyn KeyValueStore>,
    wallet: Arc<dyn WalletProvider>,
    ledger: Arc<dyn LedgerBackend>,
    clock: Arc<dyn Clock>,
    celebration: Option<CelebrationHook>,
    inner: Mutex<Inner>,
    connect_gate: OpGate,
    mint_gate: OpGate,
    milestone_gate: OpGate,
    tip_gate: OpGate,
    /// Bumped on teardown/reset; completions from an older generation stop
    /// applying state.
    generation: AtomicU64,
}

impl SessionCoordinator {
    pub fn new(
        config: SessionConfig,
        store: Arc<dyn KeyValueStore>,
        wallet: Arc<dyn WalletProvider>,
        ledger: Arc<dyn LedgerBackend>,
    ) -> Self {
        Self {
            config,
            store,
            wallet,
            ledger,
            clock: Arc::new(SystemClock),
            celebration: None,
            inner: Mutex::new(Inner::default()),
            connect_gate: OpGate::new(),
            mint_gate: OpGate::new(),
            milestone_gate: OpGate::new(),
            tip_gate: OpGate::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register the celebratory side effect fired on a successful mint.
    pub fn on_celebration(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.celebration = Some(Box::new(hook));
        self
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Establish readiness and attempt silent session restoration.
    ///
    /// Mock mode is ready synchronously with no network traffic. Real mode
    /// opens the node connection; failure is terminal — `last_error` is set
    /// and no retry loop runs. Returns whether the contract is ready.
    pub async fn initialize(&self) -> bool {
        match self.config.mode {
            LedgerMode::Mock => {
                self.normalize_mock_storage();
                let mut inner = self.inner.lock().unwrap();
                inner.connection_ready = true;
                inner.contract_ready = true;
                tracing::info!("mock mode, contract ready");
            }
            LedgerMode::Real => match self.ledger.ensure_ready().await {
                Ok(()) => {
                    let mut inner = self.inner.lock().unwrap();
                    inner.connection_ready = true;
                    inner.contract_ready = true;
                    tracing::info!(node = %self.config.node_url, "contract ready");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "node connection failed");
                    self.inner.lock().unwrap().last_error = Some(e.to_string());
                }
            },
        }
        self.restore_session().await;
        self.inner.lock().unwrap().contract_ready
    }

    /// Stop applying results of any in-flight operation and clear state.
    ///
    /// An outstanding transaction is not aborted; its completion is simply
    /// discarded.
    pub fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();
        *inner = Inner::default();
        tracing::debug!("session torn down");
    }

    /// Silently reconnect and reselect the persisted account, if any.
    ///
    /// Idempotent: runs at most once until an explicit account change resets
    /// the guard, and never while a connect is already underway.
    pub async fn restore_session(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.restore_attempted || inner.selected.is_some() || inner.connecting {
                return;
            }
            inner.restore_attempted = true;
        }
        if self.connect_gate.is_busy() {
            return;
        }
        let connected = self.store.get_flag(&keys::connected()).unwrap_or(false);
        let stored = self.store.get(&keys::selected_account()).unwrap_or(None);
        match (connected, stored) {
            (true, Some(address)) if !address.is_empty() => {
                tracing::debug!(account = %AccountAddress::new(address).short(), "restoring previous session");
                self.connect_wallet(true).await;
            }
            _ => {}
        }
    }

    // ── Wallet ──────────────────────────────────────────────────────────

    /// Connect the wallet and discover accounts.
    ///
    /// Silent mode never surfaces errors and never flickers the
    /// `connecting` flag; it is the restoration path. A call while a
    /// connect is already in flight reports success without starting a
    /// second attempt.
    pub async fn connect_wallet(&self, silent: bool) -> bool {
        let Some(_token) = self.connect_gate.try_acquire() else {
            tracing::debug!("connect already in progress");
            return true;
        };
        let gen = self.generation.load(Ordering::SeqCst);
        if !silent {
            self.inner.lock().unwrap().connecting = true;
        }
        let result = self.do_connect(gen).await;
        if !silent && self.current(gen) {
            self.inner.lock().unwrap().connecting = false;
        }
        match result {
            Ok(connected) => connected,
            Err(e) if silent => {
                tracing::debug!(error = %e, "silent connect failed");
                false
            }
            Err(e) => self.fail(gen, e),
        }
    }

    async fn do_connect(&self, gen: u64) -> Result<bool, SessionError> {
        let extensions = self
            .wallet
            .enable(&self.config.app_name)
            .await
            .map_err(|e| SessionError::Ledger(e.to_string()))?;
        if extensions.is_empty() {
            return Err(SessionError::NoExtension);
        }
        let accounts = self
            .wallet
            .accounts()
            .await
            .map_err(|e| SessionError::Ledger(e.to_string()))?;
        if accounts.is_empty() {
            return Err(SessionError::NoAccounts);
        }
        if !self.current(gen) {
            return Ok(false);
        }
        tracing::info!(count = accounts.len(), "wallet connected");

        // Reselect the persisted address if it is among the discovered
        // accounts; absence is not an error.
        let stored = self.store.get(&keys::selected_account()).unwrap_or(None);
        let mut restored = false;
        {
            let mut inner = self.inner.lock().unwrap();
            inner.accounts = accounts.clone();
            if inner.selected.is_none() {
                if let Some(address) = stored {
                    if let Some(account) =
                        accounts.iter().find(|a| a.address.as_str() == address)
                    {
                        tracing::info!(account = %account.address.short(), "restored account selection");
                        inner.selected = Some(account.clone());
                        inner.minted = None;
                        restored = true;
                    }
                }
            }
        }
        if let Err(e) = self.store.put_flag(&keys::connected(), true) {
            tracing::warn!(error = %e, "failed to persist connected flag");
        }
        if restored && self.contract_ready() {
            self.refresh_mint_status().await;
        }
        Ok(true)
    }

    /// Select an account, refreshing its signer handle once if missing.
    ///
    /// A still-signerless account is selected anyway; mutating calls will
    /// fail at submission time rather than here.
    pub async fn select_account(&self, account: &Account) -> bool {
        let gen = self.generation.load(Ordering::SeqCst);
        let mut chosen = account.clone();
        if !chosen.can_sign() {
            tracing::debug!(account = %chosen.address.short(), "no signer on selected account, reconnecting once");
            if let Some(fresh) = self.refreshed_account(&chosen.address).await {
                if fresh.can_sign() {
                    chosen = fresh;
                }
            }
            if !chosen.can_sign() {
                tracing::warn!(account = %chosen.address.short(), "proceeding without signing capability");
            }
        }
        if !self.current(gen) {
            return false;
        }
        {
            let mut inner = self.inner.lock().unwrap();
            inner.selected = Some(chosen.clone());
            inner.minted = None;
            // Explicit account change re-arms silent restoration.
            inner.restore_attempted = false;
            inner.last_error = None;
        }
        let persisted = self
            .store
            .put(&keys::selected_account(), chosen.address.as_str())
            .and_then(|()| self.store.put_flag(&keys::connected(), true));
        if let Err(e) = persisted {
            return self.fail(gen, SessionError::Ledger(format!("failed to persist selection: {e}")));
        }
        tracing::info!(account = %chosen.address.short(), "account selected");
        if self.contract_ready() {
            self.refresh_mint_status().await;
        }
        true
    }

    /// One silent enable+enumerate round to refresh a signer handle.
    async fn refreshed_account(&self, address: &AccountAddress) -> Option<Account> {
        let extensions = self.wallet.enable(&self.config.app_name).await.ok()?;
        if extensions.is_empty() {
            return None;
        }
        let accounts = self.wallet.accounts().await.ok()?;
        self.inner.lock().unwrap().accounts = accounts.clone();
        accounts.into_iter().find(|a| &a.address == address)
    }

    // ── Mutating operations ─────────────────────────────────────────────

    /// Mint the soulbound token for the selected account.
    pub async fn mint_nft(&self) -> bool {
        let Some(_token) = self.mint_gate.try_acquire() else {
            tracing::debug!("mint already in progress");
            return false;
        };
        let gen = self.generation.load(Ordering::SeqCst);
        self.inner.lock().unwrap().minting = true;
        let result = self.do_mint(gen).await;
        if self.current(gen) {
            self.inner.lock().unwrap().minting = false;
        }
        match result {
            Ok(minted) => minted,
            Err(e) => self.fail(gen, e),
        }
    }

    async fn do_mint(&self, gen: u64) -> Result<bool, SessionError> {
        let account = self.selected_or_err()?;
        self.require_contract_ready()?;

        let already = self
            .ledger
            .minted(&account.address)
            .await
            .map_err(|e| SessionError::Ledger(e.to_string()))?;
        let mut allow_remint = false;
        if already {
            if !self.config.is_dev_account(&account.address) {
                return Err(SessionError::AlreadyMinted);
            }
            if !self.store.get_flag(&keys::dev_auto_mint()).unwrap_or(false) {
                return Err(SessionError::RemintBlocked);
            }
            allow_remint = true;
            tracing::info!(account = %account.address.short(), "development re-mint override active");
        }

        let receipt = self
            .ledger
            .mint(&account, allow_remint)
            .await
            .map_err(|e| SessionError::Ledger(e.to_string()))?;
        tracing::info!(
            account = %account.address.short(),
            token = %receipt.token_id,
            "mint finalized"
        );
        if !self.current(gen) {
            tracing::debug!("mint completed after teardown, result discarded");
            return Ok(false);
        }
        {
            let mut inner = self.inner.lock().unwrap();
            inner.minted = Some(true);
            inner.last_error = None;
        }
        if let Err(e) = self.store.put_flag(&keys::minted(&account.address), true) {
            tracing::warn!(error = %e, "failed to persist minted flag");
        }
        if let Some(hook) = &self.celebration {
            hook();
        }
        Ok(true)
    }

    /// Record one milestone for the selected account.
    ///
    /// The digest must already be computed (see
    /// [`SessionCoordinator::calculate_digest`]); the append is atomic and
    /// strictly ordered.
    pub async fn add_milestone(
        &self,
        title: &str,
        proof_digest: &str,
        description: Option<String>,
        category: Option<String>,
    ) -> bool {
        let Some(_token) = self.milestone_gate.try_acquire() else {
            tracing::debug!("milestone submission already in progress");
            return false;
        };
        let gen = self.generation.load(Ordering::SeqCst);
        let result = self
            .do_add_milestone(title, proof_digest, description, category)
            .await;
        match result {
            Ok(()) => true,
            Err(e) => self.fail(gen, e),
        }
    }

    async fn do_add_milestone(
        &self,
        title: &str,
        proof_digest: &str,
        description: Option<String>,
        category: Option<String>,
    ) -> Result<(), SessionError> {
        let account = self.selected_or_err()?;
        self.require_contract_ready()?;
        if !self.minted_now(&account.address).await? {
            return Err(SessionError::MintFirstMilestone);
        }
        let entry = Milestone::new(title, proof_digest, description, category, self.clock.now())
            .map_err(|e| SessionError::Invalid(e.to_string()))?;
        self.ledger
            .append_milestone(&account, &entry)
            .await
            .map_err(|e| SessionError::Ledger(e.to_string()))?;
        tracing::info!(account = %account.address.short(), title, "milestone recorded");
        Ok(())
    }

    /// Send a value-bearing tip from the selected account.
    pub async fn send_tip(&self, recipient: &str, amount: u128) -> bool {
        let Some(_token) = self.tip_gate.try_acquire() else {
            tracing::debug!("tip already in progress");
            return false;
        };
        let gen = self.generation.load(Ordering::SeqCst);
        match self.do_send_tip(recipient, amount).await {
            Ok(()) => true,
            Err(e) => self.fail(gen, e),
        }
    }

    async fn do_send_tip(&self, recipient: &str, amount: u128) -> Result<(), SessionError> {
        let account = self.selected_or_err()?;
        self.require_contract_ready()?;
        let recipient = AccountAddress::new(recipient);
        if !recipient.is_valid() {
            return Err(SessionError::Invalid("Recipient address is required".to_string()));
        }
        if !self.minted_now(&account.address).await? {
            return Err(SessionError::MintFirstTip);
        }
        self.ledger
            .send_tip(&account, &recipient, amount)
            .await
            .map_err(|e| SessionError::Ledger(e.to_string()))?;
        tracing::info!(recipient = %recipient.short(), amount, "tip sent");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Whether the selected account has minted, from cache if available.
    pub async fn check_minted(&self) -> bool {
        if let Some(cached) = self.inner.lock().unwrap().minted {
            return cached;
        }
        self.refresh_mint_status().await
    }

    /// Re-query the authoritative source and reconcile the persisted flag.
    pub async fn force_mint_check(&self) -> bool {
        self.inner.lock().unwrap().minted = None;
        self.refresh_mint_status().await
    }

    async fn refresh_mint_status(&self) -> bool {
        let Some(account) = self.selected() else {
            return false;
        };
        match self.ledger.minted(&account.address).await {
            Ok(minted) => {
                // Keep the persisted flag in line with the authoritative
                // source, whichever direction it moved.
                if let Err(e) = self.store.put_flag(&keys::minted(&account.address), minted) {
                    tracing::warn!(error = %e, "failed to reconcile minted flag");
                }
                self.inner.lock().unwrap().minted = Some(minted);
                minted
            }
            Err(e) => {
                tracing::debug!(error = %e, "mint status check failed");
                false
            }
        }
    }

    /// Milestone log of the selected account, oldest first.
    pub async fn get_milestones(&self) -> Vec<Milestone> {
        match self.selected() {
            Some(account) => self.get_milestones_for_account(&account.address).await,
            None => Vec::new(),
        }
    }

    /// Milestone log of an arbitrary account.
    pub async fn get_milestones_for_account(&self, account: &AccountAddress) -> Vec<Milestone> {
        match self.ledger.milestones(account).await {
            Ok(log) => log,
            Err(e) => {
                tracing::debug!(error = %e, "milestone query failed");
                Vec::new()
            }
        }
    }

    /// Avatar stage of the selected account.
    pub async fn get_avatar_stage(&self) -> AvatarStage {
        match self.selected() {
            Some(account) => self.get_avatar_stage_for_account(&account.address).await,
            None => AvatarStage::Beginning,
        }
    }

    /// Avatar stage of an arbitrary account. Backends without a direct
    /// stage query derive it from the milestone count.
    pub async fn get_avatar_stage_for_account(&self, account: &AccountAddress) -> AvatarStage {
        match self.ledger.avatar_stage(account).await {
            Ok(stage) => stage,
            Err(e) => {
                tracing::debug!(error = %e, "stage query failed");
                AvatarStage::Beginning
            }
        }
    }

    /// When the selected account's journey began.
    ///
    /// Prefers the ledger's mint timestamp; a minted account whose
    /// timestamp was lost gets "now", persisted so the answer is stable
    /// from then on.
    pub async fn journey_start_date(&self) -> Option<Timestamp> {
        let account = self.selected()?;
        match self.ledger.mint_timestamp(&account.address).await {
            Ok(Some(ts)) => Some(ts),
            Ok(None) | Err(_) => {
                if !self.check_minted().await {
                    return None;
                }
                let now = self.clock.now();
                if let Err(e) = self
                    .store
                    .put(&keys::mint_date(&account.address), &now.as_secs().to_string())
                {
                    tracing::warn!(error = %e, "failed to persist journey start date");
                }
                Some(now)
            }
        }
    }

    /// Owner of an account's soulbound token, if minted.
    pub async fn get_owner(&self, account: &AccountAddress) -> Option<AccountAddress> {
        match self.ledger.owner_of(account).await {
            Ok(owner) => owner,
            Err(e) => {
                tracing::debug!(error = %e, "owner query failed");
                None
            }
        }
    }

    /// SHA-256 proof digest of free text, as used for milestone proofs.
    pub fn calculate_digest(&self, text: &str) -> String {
        becoming_crypto::digest_text(text)
    }

    // ── Development helpers ─────────────────────────────────────────────

    /// Wipe all persisted mock state and deselect the account.
    ///
    /// `auto_mint` is the state the mint-each-time override is left in.
    /// Mock mode only; the real ledger cannot be reset from here.
    pub fn reset_mock_state(&self, auto_mint: bool) -> bool {
        if self.config.mode != LedgerMode::Mock {
            tracing::warn!("reset requested outside mock mode, ignoring");
            return false;
        }
        // In-flight completions from before the reset must not re-apply.
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut addresses: Vec<AccountAddress> = {
            let mut inner = self.inner.lock().unwrap();
            let mut addresses: Vec<_> =
                inner.accounts.iter().map(|a| a.address.clone()).collect();
            if let Some(account) = inner.selected.take() {
                addresses.push(account.address);
            }
            inner.minted = None;
            inner.restore_attempted = false;
            inner.last_error = None;
            addresses
        };
        // A previously selected account persists across restarts even when
        // no connect has run yet this session.
        if let Ok(Some(stored)) = self.store.get(&keys::selected_account()) {
            addresses.push(AccountAddress::new(stored));
        }
        addresses.dedup_by(|a, b| a == b);
        let mut result = Ok(());
        for address in &addresses {
            result = result
                .and_then(|()| self.store.delete(&keys::minted(address)))
                .and_then(|()| self.store.delete(&keys::mint_date(address)))
                .and_then(|()| self.store.delete(&keys::token_id(address)))
                .and_then(|()| self.store.delete(&keys::milestones(address)))
                .and_then(|()| self.store.delete(&keys::tips(address)));
        }
        result = result
            .and_then(|()| self.store.delete(&keys::connected()))
            .and_then(|()| self.store.delete(&keys::selected_account()))
            .and_then(|()| self.store.put_flag(&keys::dev_auto_mint(), auto_mint));
        match result {
            Ok(()) => {
                tracing::info!(auto_mint, "mock state reset");
                true
            }
            Err(e) => {
                self.inner.lock().unwrap().last_error = Some(e.to_string());
                tracing::warn!(error = %e, "mock state reset failed");
                false
            }
        }
    }

    /// Toggle the development-account re-mint override.
    pub fn enable_mint_each_time(&self, enable: bool) -> bool {
        match self.store.put_flag(&keys::dev_auto_mint(), enable) {
            Ok(()) => {
                tracing::info!(enable, "mint-each-time override updated");
                true
            }
            Err(e) => {
                self.inner.lock().unwrap().last_error = Some(e.to_string());
                false
            }
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Point-in-time session snapshot.
    pub fn state(&self) -> SessionState {
        let inner = self.inner.lock().unwrap();
        SessionState {
            mode: self.config.mode,
            connection_ready: inner.connection_ready,
            contract_ready: inner.contract_ready,
            connecting: inner.connecting,
            minting: inner.minting,
            last_error: inner.last_error.clone(),
        }
    }

    /// Currently selected account, if any.
    pub fn selected(&self) -> Option<Account> {
        self.inner.lock().unwrap().selected.clone()
    }

    /// Accounts discovered by the last connect.
    pub fn accounts(&self) -> Vec<Account> {
        self.inner.lock().unwrap().accounts.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().unwrap().last_error.clone()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn current(&self, gen: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == gen
    }

    fn contract_ready(&self) -> bool {
        self.inner.lock().unwrap().contract_ready
    }

    fn selected_or_err(&self) -> Result<Account, SessionError> {
        self.selected().ok_or(SessionError::NoAccountSelected)
    }

    fn require_contract_ready(&self) -> Result<(), SessionError> {
        if self.contract_ready() {
            Ok(())
        } else {
            Err(SessionError::ContractNotReady)
        }
    }

    /// Mint status for precondition checks; queries on cache miss.
    async fn minted_now(&self, account: &AccountAddress) -> Result<bool, SessionError> {
        if let Some(cached) = self.inner.lock().unwrap().minted {
            return Ok(cached);
        }
        let minted = self
            .ledger
            .minted(account)
            .await
            .map_err(|e| SessionError::Ledger(e.to_string()))?;
        self.inner.lock().unwrap().minted = Some(minted);
        Ok(minted)
    }

    /// Record the error and report failure; skipped when the session has
    /// moved on to a newer generation.
    fn fail(&self, gen: u64, err: SessionError) -> bool {
        tracing::warn!(error = %err, "operation failed");
        if self.current(gen) {
            self.inner.lock().unwrap().last_error = Some(err.to_string());
        }
        false
    }

    /// Repair persisted session keys left inconsistent by an interrupted
    /// run: a connected flag without a selected account (or the reverse)
    /// is cleared so restoration starts from a clean slate.
    fn normalize_mock_storage(&self) {
        let connected = self.store.get_flag(&keys::connected()).unwrap_or(false);
        let selected = self
            .store
            .get(&keys::selected_account())
            .unwrap_or(None)
            .filter(|s| !s.is_empty());
        match (connected, selected.is_some()) {
            (true, false) => {
                tracing::debug!("clearing orphaned connected flag");
                let _ = self.store.delete(&keys::connected());
            }
            (false, true) => {
                tracing::debug!("clearing orphaned account selection");
                let _ = self.store.delete(&keys::selected_account());
            }
            _ => {}
        }
    }
}
