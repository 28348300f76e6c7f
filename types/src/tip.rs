//! Tip records persisted by the mock ledger.

use crate::{AccountAddress, Timestamp};
use serde::{Deserialize, Serialize};

/// A tip sent from one account to another.
///
/// Amounts are in the chain's smallest unit (planck). On the real chain the
/// value rides the transaction itself; the mock ledger keeps a per-sender log
/// so the demo UI has something to show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipRecord {
    pub recipient: AccountAddress,
    pub amount: u128,
    pub sent_at: Timestamp,
}

/// Serialize a tip log for the string-valued key-value store.
pub fn encode_log(tips: &[TipRecord]) -> String {
    serde_json::to_string(tips).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a tip log from stored JSON; malformed data reads as empty.
pub fn decode_log(raw: &str) -> Vec<TipRecord> {
    serde_json::from_str(raw).unwrap_or_default()
}
