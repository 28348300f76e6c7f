use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("no wallet extension found")]
    NoExtension,

    #[error("no accounts found in wallet")]
    NoAccounts,

    #[error("signing error: {0}")]
    Signing(String),

    #[error("extension error: {0}")]
    Extension(String),
}
