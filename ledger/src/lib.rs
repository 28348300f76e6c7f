//! Ledger backend seam.
//!
//! The session coordinator runs one operation path regardless of mode; only
//! the injected [`LedgerBackend`] differs. [`MockLedger`] simulates the
//! contract's observable behavior against the persistent key-value store,
//! including artificial transaction delays; [`ChainLedger`] speaks to the
//! real contract with simulate-then-finalize discipline.

pub mod backend;
pub mod chain;
pub mod error;
pub mod mock;

pub use backend::{LedgerBackend, MintReceipt};
pub use chain::{ChainLedger, ContractSurface};
pub use error::LedgerError;
pub use mock::{MockLedger, SimDelays};
