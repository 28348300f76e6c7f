//! Deterministic test doubles for the session layer's external seams.
//!
//! The coordinator reaches the outside world only through traits: the
//! system clock, the persistent key-value store and the wallet extension.
//! Each double here implements one of those seams with fully scripted,
//! in-memory behavior — no filesystem, no network, no wall-clock time —
//! so session and ledger tests control every input and observe every
//! effect.

pub mod clock;
pub mod store;
pub mod wallet;

pub use clock::NullClock;
pub use store::NullKvStore;
pub use wallet::NullWallet;
