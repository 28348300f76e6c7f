//! Session state snapshot.

use crate::LedgerMode;

/// Point-in-time view of the session, cheap to clone.
///
/// Consumers re-render from snapshots; they never reach into the
/// coordinator's interior. `contract_ready` implies the contract binding
/// (and, in real mode, the node connection) is established; in mock mode it
/// is true from initialization onward.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub mode: LedgerMode,
    pub connection_ready: bool,
    pub contract_ready: bool,
    /// A non-silent wallet connect is underway.
    pub connecting: bool,
    /// A mint is underway.
    pub minting: bool,
    pub last_error: Option<String>,
}
