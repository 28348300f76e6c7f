//! Session coordination for the Becoming soulbound-NFT tracker.
//!
//! The [`SessionCoordinator`] is the single object a UI talks to: it owns
//! connection/contract readiness, wallet account discovery and selection,
//! session restoration from persisted state, and the mint / milestone / tip
//! operations, all against an injected [`becoming_ledger::LedgerBackend`]
//! (mock or real chain).

pub mod config;
pub mod coordinator;
pub mod error;
pub mod inflight;
pub mod state;

pub use config::{LedgerMode, SessionConfig};
pub use coordinator::{CelebrationHook, SessionCoordinator};
pub use error::SessionError;
pub use inflight::{OpGate, OpToken};
pub use state::SessionState;
