//! Session configuration, read once at startup.

use becoming_ledger::SimDelays;
use becoming_types::AccountAddress;

/// Which ledger backend the session drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerMode {
    /// Store-backed simulation; no network at any point.
    Mock,
    /// Real node and deployed contract.
    Real,
}

/// Configuration for a session coordinator.
///
/// Read once at construction; changing any of it means building a new
/// coordinator. `dev_account` designates the one account allowed to re-mint
/// when the mint-each-time override is enabled; it is plain configuration,
/// nothing about the account itself marks it as special.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub mode: LedgerMode,
    pub node_url: String,
    pub contract_address: Option<String>,
    pub dev_account: Option<AccountAddress>,
    /// Name presented to wallet extensions on the enable request.
    pub app_name: String,
    /// Artificial pacing for mock-mode transaction simulation.
    pub delays: SimDelays,
    pub debug: bool,
}

impl SessionConfig {
    /// Mock-mode configuration with no delays; the usual test setup.
    pub fn mock() -> Self {
        Self {
            mode: LedgerMode::Mock,
            node_url: String::new(),
            contract_address: None,
            dev_account: None,
            app_name: "Becoming".to_string(),
            delays: SimDelays::none(),
            debug: false,
        }
    }

    pub fn with_dev_account(mut self, account: impl Into<AccountAddress>) -> Self {
        self.dev_account = Some(account.into());
        self
    }

    /// Read configuration from `BECOMING_*` environment variables.
    ///
    /// `BECOMING_MODE` is "real" or anything else for mock;
    /// `BECOMING_NODE_URL` and `BECOMING_CONTRACT_ADDRESS` bind the real
    /// backend; `BECOMING_DEV_ACCOUNT` designates the re-mint account;
    /// `BECOMING_DEBUG` enables verbose logging.
    pub fn from_env() -> Self {
        let mode = match std::env::var("BECOMING_MODE").as_deref() {
            Ok("real") => LedgerMode::Real,
            _ => LedgerMode::Mock,
        };
        Self {
            mode,
            node_url: std::env::var("BECOMING_NODE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:9944".to_string()),
            contract_address: std::env::var("BECOMING_CONTRACT_ADDRESS").ok(),
            dev_account: std::env::var("BECOMING_DEV_ACCOUNT")
                .ok()
                .filter(|s| !s.is_empty())
                .map(AccountAddress::new),
            app_name: std::env::var("BECOMING_APP_NAME").unwrap_or_else(|_| "Becoming".to_string()),
            delays: if mode == LedgerMode::Mock {
                SimDelays::realistic()
            } else {
                SimDelays::none()
            },
            debug: std::env::var("BECOMING_DEBUG").as_deref() == Ok("1"),
        }
    }

    /// Whether `account` is the configured development account.
    pub fn is_dev_account(&self, account: &AccountAddress) -> bool {
        self.dev_account.as_ref() == Some(account)
    }
}
