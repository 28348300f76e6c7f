//! End-to-end mock-mode session flows.

use becoming_ledger::{MockLedger, SimDelays};
use becoming_nullables::{NullClock, NullKvStore, NullWallet};
use becoming_session::{SessionConfig, SessionCoordinator};
use becoming_store::{keys, KeyValueStore};
use becoming_types::{is_proof_digest, AccountAddress, AvatarStage};
use becoming_wallet::{
    Account, MockWalletProvider, DEMO_ADDRESS_ALICE, DEMO_ADDRESS_DEV,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn coordinator_on(store: Arc<NullKvStore>) -> SessionCoordinator {
    let ledger = MockLedger::new(store.clone())
        .with_clock(Arc::new(NullClock::new(1_700_000_000)))
        .with_delays(SimDelays::none());
    SessionCoordinator::new(
        SessionConfig::mock().with_dev_account(DEMO_ADDRESS_DEV),
        store,
        Arc::new(MockWalletProvider::new().with_delay(Duration::ZERO)),
        Arc::new(ledger),
    )
    .with_clock(Arc::new(NullClock::new(1_700_000_000)))
}

async fn connected(store: Arc<NullKvStore>) -> SessionCoordinator {
    let session = coordinator_on(store);
    assert!(session.initialize().await);
    assert!(session.connect_wallet(false).await);
    session
}

fn account(session: &SessionCoordinator, address: &str) -> Account {
    session
        .accounts()
        .into_iter()
        .find(|a| a.address.as_str() == address)
        .expect("demo account present")
}

#[tokio::test]
async fn test_fresh_account_full_journey() {
    let session = connected(Arc::new(NullKvStore::new())).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    assert!(session.select_account(&alice).await);
    assert!(!session.check_minted().await);

    assert!(session.mint_nft().await);
    assert!(session.check_minted().await);

    let digest = session.calculate_digest("Finished 5k run");
    assert!(session.add_milestone("Finished 5k run", &digest, None, None).await);

    let log = session.get_milestones().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].title, "Finished 5k run");
    assert!(is_proof_digest(&log[0].proof_digest));
    assert_eq!(session.get_avatar_stage().await, AvatarStage::OnWay);
}

#[tokio::test]
async fn test_second_mint_rejected_without_side_effects() {
    let store = Arc::new(NullKvStore::new());
    let session = connected(store.clone()).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    session.select_account(&alice).await;

    assert!(session.mint_nft().await);
    let first_date = store
        .get(&keys::mint_date(&alice.address))
        .unwrap()
        .expect("mint date persisted");
    let first_token = store
        .get(&keys::token_id(&alice.address))
        .unwrap()
        .expect("token id persisted");

    assert!(!session.mint_nft().await);
    let err = session.last_error().expect("error recorded");
    assert!(err.contains("already minted"), "unexpected error: {err}");

    // First mint's record is untouched.
    assert_eq!(
        store.get(&keys::mint_date(&alice.address)).unwrap().unwrap(),
        first_date
    );
    assert_eq!(
        store.get(&keys::token_id(&alice.address)).unwrap().unwrap(),
        first_token
    );
}

#[tokio::test]
async fn test_dev_remint_blocked_until_override() {
    let session = connected(Arc::new(NullKvStore::new())).await;
    let dev = account(&session, DEMO_ADDRESS_DEV);
    session.select_account(&dev).await;
    assert!(session.mint_nft().await);

    assert!(!session.mint_nft().await);
    let err = session.last_error().expect("error recorded");
    assert!(err.contains("Re-minting is disabled"), "unexpected error: {err}");

    // With the override on, the dev account re-mints and loses its progress.
    let digest = session.calculate_digest("before remint");
    assert!(session.add_milestone("before remint", &digest, None, None).await);
    assert!(session.enable_mint_each_time(true));
    assert!(session.mint_nft().await);
    assert!(session.get_milestones().await.is_empty());
    assert_eq!(session.get_avatar_stage().await, AvatarStage::Beginning);
}

#[tokio::test]
async fn test_non_dev_account_never_reminted() {
    let session = connected(Arc::new(NullKvStore::new())).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    session.select_account(&alice).await;
    assert!(session.mint_nft().await);

    // The override only applies to the configured development account.
    session.enable_mint_each_time(true);
    assert!(!session.mint_nft().await);
    assert!(session.last_error().unwrap().contains("already minted"));
}

#[tokio::test]
async fn test_silent_reconnect_is_idempotent() {
    let store = Arc::new(NullKvStore::new());
    let session = connected(store.clone()).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    session.select_account(&alice).await;
    let keys_before = store.keys();

    assert!(session.connect_wallet(true).await);
    assert!(session.connect_wallet(true).await);

    assert_eq!(session.selected().unwrap().address.as_str(), DEMO_ADDRESS_ALICE);
    assert_eq!(store.keys(), keys_before);
}

#[tokio::test]
async fn test_restoration_across_restart() {
    let store = Arc::new(NullKvStore::new());
    {
        let session = connected(store.clone()).await;
        let alice = account(&session, DEMO_ADDRESS_ALICE);
        session.select_account(&alice).await;
        session.mint_nft().await;
        session.teardown();
    }

    // A new coordinator over the same store restores silently on init.
    let session = coordinator_on(store);
    assert!(session.initialize().await);
    let restored = session.selected().expect("selection restored");
    assert_eq!(restored.address.as_str(), DEMO_ADDRESS_ALICE);
    assert!(session.check_minted().await);
    assert!(!session.state().connecting);
}

#[tokio::test]
async fn test_restore_noop_without_persisted_session() {
    let session = coordinator_on(Arc::new(NullKvStore::new()));
    assert!(session.initialize().await);
    assert!(session.selected().is_none());
    // Repeated calls stay no-ops; the guard only re-arms on account change.
    session.restore_session().await;
    session.restore_session().await;
    assert!(session.selected().is_none());
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let store = Arc::new(NullKvStore::new());
    let session = connected(store.clone()).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    session.select_account(&alice).await;
    session.mint_nft().await;
    let digest = session.calculate_digest("gone soon");
    session.add_milestone("gone soon", &digest, None, None).await;

    assert!(session.reset_mock_state(false));
    assert!(session.selected().is_none());
    assert!(!session.check_minted().await);
    assert_eq!(store.get(&keys::milestones(&alice.address)).unwrap(), None);
    assert_eq!(store.get(&keys::selected_account()).unwrap(), None);
}

#[tokio::test]
async fn test_milestone_requires_mint() {
    let session = connected(Arc::new(NullKvStore::new())).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    session.select_account(&alice).await;

    let digest = session.calculate_digest("too early");
    assert!(!session.add_milestone("too early", &digest, None, None).await);
    assert!(session
        .last_error()
        .unwrap()
        .contains("mint an NFT before adding milestones"));
}

#[tokio::test]
async fn test_tip_requires_mint_then_succeeds() {
    let session = connected(Arc::new(NullKvStore::new())).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    session.select_account(&alice).await;

    assert!(!session.send_tip(DEMO_ADDRESS_DEV, 250).await);
    assert!(session
        .last_error()
        .unwrap()
        .contains("mint an NFT before sending tips"));

    assert!(session.mint_nft().await);
    assert!(session.send_tip(DEMO_ADDRESS_DEV, 250).await);
    assert!(!session.send_tip("", 250).await);
}

#[tokio::test]
async fn test_operations_require_selected_account() {
    let session = connected(Arc::new(NullKvStore::new())).await;
    assert!(!session.mint_nft().await);
    assert_eq!(
        session.last_error().as_deref(),
        Some("Please connect your wallet first")
    );
}

#[tokio::test]
async fn test_celebration_fires_only_on_successful_mint() {
    let store = Arc::new(NullKvStore::new());
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();

    let ledger = MockLedger::new(store.clone()).with_delays(SimDelays::none());
    let session = SessionCoordinator::new(
        SessionConfig::mock(),
        store,
        Arc::new(MockWalletProvider::new().with_delay(Duration::ZERO)),
        Arc::new(ledger),
    )
    .on_celebration(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    session.initialize().await;
    session.connect_wallet(false).await;
    let alice = account(&session, DEMO_ADDRESS_ALICE);
    session.select_account(&alice).await;

    assert!(session.mint_nft().await);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!session.mint_nft().await);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connect_without_extension() {
    let store = Arc::new(NullKvStore::new());
    let ledger = MockLedger::new(store.clone()).with_delays(SimDelays::none());
    let session = SessionCoordinator::new(
        SessionConfig::mock(),
        store,
        Arc::new(NullWallet::without_extension()),
        Arc::new(ledger),
    );
    session.initialize().await;

    // Silent failure stays quiet; a user-initiated connect surfaces it.
    assert!(!session.connect_wallet(true).await);
    assert!(session.last_error().is_none());
    assert!(!session.connect_wallet(false).await);
    assert!(session.last_error().unwrap().contains("No wallet extension"));
}

#[tokio::test]
async fn test_select_refreshes_missing_signer() {
    let store = Arc::new(NullKvStore::new());
    let wallet = Arc::new(NullWallet::with_accounts(vec![Account::new(
        DEMO_ADDRESS_ALICE,
    )]));
    let ledger = MockLedger::new(store.clone()).with_delays(SimDelays::none());
    let session = SessionCoordinator::new(
        SessionConfig::mock(),
        store,
        wallet.clone(),
        Arc::new(ledger),
    );
    session.initialize().await;
    session.connect_wallet(false).await;

    // The reconnect serves a refreshed entry that can sign.
    let fresh = MockWalletProvider::demo_accounts()
        .into_iter()
        .find(|a| a.address.as_str() == DEMO_ADDRESS_ALICE)
        .unwrap();
    wallet.queue_accounts(vec![fresh]);

    let stale = account(&session, DEMO_ADDRESS_ALICE);
    assert!(!stale.can_sign());
    assert!(session.select_account(&stale).await);
    assert!(session.selected().unwrap().can_sign());
    // Initial connect plus exactly one refresh.
    assert_eq!(wallet.enable_calls(), 2);
}

#[tokio::test]
async fn test_storage_normalization_repairs_orphans() {
    let store = Arc::new(NullKvStore::new());
    store.put_flag(&keys::connected(), true).unwrap();

    let session = coordinator_on(store.clone());
    session.initialize().await;
    // Connected flag without a selected account is cleared, so no silent
    // connect was attempted.
    assert_eq!(store.get(&keys::connected()).unwrap(), None);
    assert!(session.selected().is_none());
}
