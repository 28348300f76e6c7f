use thiserror::Error;

/// User-facing session errors.
///
/// Public coordinator operations never propagate these: each one is recorded
/// as `last_error` and the operation returns `false`. The messages are what
/// the UI shows, so they stay in plain language.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please connect your wallet first")]
    NoAccountSelected,

    #[error("Contract is not ready yet. Please try again in a moment.")]
    ContractNotReady,

    #[error("No wallet extension found. Please install the Polkadot.js extension.")]
    NoExtension,

    #[error("No accounts found. Please create an account in your wallet extension.")]
    NoAccounts,

    #[error("You have already minted your Becoming NFT. Each account can only mint once.")]
    AlreadyMinted,

    #[error("Re-minting is disabled for the development account. Enable mint-each-time to mint again.")]
    RemintBlocked,

    #[error("You need to mint an NFT before adding milestones")]
    MintFirstMilestone,

    #[error("You need to mint an NFT before sending tips")]
    MintFirstTip,

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Ledger(String),
}
