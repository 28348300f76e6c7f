//! Proof digest primitives.
//!
//! Milestone proofs are committed as SHA-256 digests, hex-encoded. The same
//! digest function is used in mock and real mode so a proof recorded against
//! the mock ledger stays valid if the account later moves on chain.

pub mod digest;

pub use digest::{digest_bytes, digest_text, DIGEST_HEX_LEN};
