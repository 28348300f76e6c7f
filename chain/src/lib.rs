//! Network binding and contract-call capability.
//!
//! [`NodeClient`] wraps the node's JSON-RPC endpoint; [`ContractHandle`]
//! layers the typed contract surface on top of it. Every read-only simulate
//! returns a tagged [`CallOutcome`] decoded once at this boundary, and every
//! signed submission resolves exactly once when the transaction reaches a
//! terminal state (finalized or errored).

pub mod client;
pub mod contract;
pub mod error;
pub mod tx;

pub use client::{ChainInfoResult, NodeClient, QueryResult};
pub use contract::{CallOutcome, ContractHandle, Simulation};
pub use error::{ChainError, DispatchError};
pub use tx::{wait_terminal, TxReceipt, TxStatus};
