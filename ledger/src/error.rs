use becoming_chain::ChainError;
use becoming_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("account has already minted")]
    AlreadyMinted,

    #[error("account has not minted yet")]
    NotMinted,

    #[error("signer not available - please check wallet permissions")]
    SignerUnavailable,

    /// Simulation reported failure; the call was never submitted. Carries
    /// the translated human-readable message.
    #[error("failed to estimate gas: {0}")]
    Estimation(String),

    /// The transaction reached the network and then failed. Raw status
    /// detail is preserved as-is.
    #[error("transaction failed: {0}")]
    Submission(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("chain error: {0}")]
    Chain(ChainError),
}

impl From<ChainError> for LedgerError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Submission(detail) => Self::Submission(detail),
            other => Self::Chain(other),
        }
    }
}
