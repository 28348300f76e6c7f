//! Namespaced session keys.
//!
//! Every persisted entry lives under a fixed application prefix plus, where
//! the value is per-account, the account address. Keeping the builders in one
//! place is what guarantees the mock ledger and the session coordinator agree
//! on where state lives.

use becoming_types::AccountAddress;

/// Fixed application prefix for all persisted keys.
pub const APP_PREFIX: &str = "becoming_";

/// Wallet-connected flag.
pub fn connected() -> String {
    format!("{APP_PREFIX}connected")
}

/// Address of the account selected in the last session.
pub fn selected_account() -> String {
    format!("{APP_PREFIX}selected_account")
}

/// Minted flag for one account.
pub fn minted(account: &AccountAddress) -> String {
    format!("{APP_PREFIX}minted_{account}")
}

/// Mint timestamp for one account (Unix seconds, decimal).
pub fn mint_date(account: &AccountAddress) -> String {
    format!("{APP_PREFIX}mint_date_{account}")
}

/// Token id assigned to one account's soulbound token.
pub fn token_id(account: &AccountAddress) -> String {
    format!("{APP_PREFIX}token_id_{account}")
}

/// Append-only milestone log for one account (JSON array).
pub fn milestones(account: &AccountAddress) -> String {
    format!("{APP_PREFIX}milestones_{account}")
}

/// Tip log for one account (JSON array).
pub fn tips(account: &AccountAddress) -> String {
    format!("{APP_PREFIX}tips_{account}")
}

/// Development-account auto-mint override flag.
pub fn dev_auto_mint() -> String {
    format!("{APP_PREFIX}dev_auto_mint")
}

/// Counter backing mock token-id assignment.
pub fn next_token_id() -> String {
    format!("{APP_PREFIX}next_token_id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_carry_app_prefix() {
        let addr = AccountAddress::new("5Grw");
        for key in [
            connected(),
            selected_account(),
            minted(&addr),
            mint_date(&addr),
            token_id(&addr),
            milestones(&addr),
            tips(&addr),
            dev_auto_mint(),
            next_token_id(),
        ] {
            assert!(key.starts_with(APP_PREFIX), "unprefixed key: {key}");
        }
    }

    #[test]
    fn test_per_account_keys_distinct() {
        let a = AccountAddress::new("5Grw");
        let b = AccountAddress::new("5FHn");
        assert_ne!(milestones(&a), milestones(&b));
        assert_ne!(minted(&a), minted(&b));
        assert_ne!(milestones(&a), tips(&a));
    }
}
