//! Transaction status tracking.
//!
//! A submission produces a sequence of status observations; callers only ever
//! see the single terminal outcome. In-block inclusion alone is not success:
//! only finalization (or an explicit error) terminates the wait.

use crate::ChainError;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Observed status of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Broadcast,
    InBlock { block: String },
    Finalized { block: String },
    Dropped,
    Error {
        #[serde(default)]
        detail: String,
    },
}

impl TxStatus {
    /// Whether this status ends the wait.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finalized { .. } | Self::Dropped | Self::Error { .. }
        )
    }
}

/// Terminal outcome of a finalized transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    /// Hash of the finalizing block.
    pub block: String,
}

/// Consume status observations until a terminal state, resolving exactly once.
///
/// `poll` is invoked repeatedly (every `interval`) and intermediate states
/// are logged, never surfaced. There is deliberately no hard timeout: a
/// long-running finalization wait stays visibly pending at the caller rather
/// than resolving silently.
pub async fn wait_terminal<F, Fut>(
    tx_hash: &str,
    mut poll: F,
    interval: Duration,
) -> Result<TxReceipt, ChainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<TxStatus, ChainError>>,
{
    loop {
        let status = poll().await?;
        match status {
            TxStatus::Finalized { block } => {
                tracing::debug!(tx = tx_hash, %block, "transaction finalized");
                return Ok(TxReceipt {
                    tx_hash: tx_hash.to_string(),
                    block,
                });
            }
            TxStatus::Dropped => {
                return Err(ChainError::Submission("transaction dropped".to_string()));
            }
            TxStatus::Error { detail } => {
                let detail = if detail.is_empty() {
                    "transaction failed with error status".to_string()
                } else {
                    detail
                };
                return Err(ChainError::Submission(detail));
            }
            TxStatus::InBlock { ref block } => {
                tracing::debug!(tx = tx_hash, %block, "transaction in block, awaiting finality");
            }
            TxStatus::Pending | TxStatus::Broadcast => {
                tracing::debug!(tx = tx_hash, ?status, "transaction pending");
            }
        }
        tokio::time::sleep(interval).await;
    }
}
