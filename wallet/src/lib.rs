//! Wallet provider capability.
//!
//! The browser extension is abstracted behind [`WalletProvider`]: request
//! enablement, enumerate signing accounts, sign payloads per account. The
//! session coordinator depends only on the traits; mock mode injects the
//! deterministic [`MockWalletProvider`].

pub mod account;
pub mod error;
pub mod mock;
pub mod provider;

pub use account::{Account, Signer};
pub use error::WalletError;
pub use mock::{MockSigner, MockWalletProvider, DEMO_ADDRESS_ALICE, DEMO_ADDRESS_DEV};
pub use provider::{ExtensionInfo, WalletProvider};
