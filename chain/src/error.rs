//! Chain errors and the contracts-pallet error translation table.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Module index of the contracts pallet on the target chain.
pub const CONTRACTS_MODULE: u8 = 8;

/// Error marker the runtime emits when the contract itself failed an
/// assertion (as opposed to the pallet rejecting the call).
pub const CONTRACT_CALL_FAILED: u32 = 33_554_432;

/// Lower bound of the code band reserved for contract-defined errors.
pub const CUSTOM_ERROR_FLOOR: u32 = 1_000_000;

/// A structured module/error-code pair from a failed dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchError {
    /// Runtime module that rejected the call.
    pub module: u8,
    /// Module-scoped error code.
    pub code: u32,
}

impl DispatchError {
    pub fn new(module: u8, code: u32) -> Self {
        Self { module, code }
    }

    /// Map a known contracts-pallet code to a human-readable message.
    ///
    /// Unknown codes pass through as a generic message with the raw code
    /// preserved for diagnostics; errors from other modules are reported
    /// verbatim.
    pub fn translate(&self) -> String {
        if self.module != CONTRACTS_MODULE {
            return format!("module {} error {}", self.module, self.code);
        }
        match self.code {
            0 => "OutOfGas - The contract exhausted its gas limit".to_string(),
            1 => "BalanceTooLow - Balance too low for operation".to_string(),
            2 => "ContractNotFound - Referenced contract not found".to_string(),
            3 => "DecodingFailed - Input data decoding failed".to_string(),
            4 => "ContractTrapped - Contract trapped during execution".to_string(),
            5 => "ValueTooLarge - Value transferred is too large".to_string(),
            6 => "TerminatedInConstructor - Constructor failed to initialize state".to_string(),
            7 => "InputForwarded - Input was forwarded to another contract".to_string(),
            8 => "TooManyTopics - Too many event topics were emitted".to_string(),
            9 => "NoChainExtension - Chain extension not found".to_string(),
            10 => "DelegateCallNotAllowed - Delegate call not allowed".to_string(),
            11 => "StorageDepositNotEnoughFunds - Not enough balance to pay storage deposit"
                .to_string(),
            12 => "StorageDepositLimitExhausted - Storage deposit limit exhausted".to_string(),
            13 => "CodeRejected - Code rejected due to size or quality issues".to_string(),
            14 => "DebugMessageInvalidUTF8 - Debug message contained invalid UTF-8".to_string(),
            CONTRACT_CALL_FAILED => {
                "ContractCallFailed - The call to the contract has failed (likely an assertion in the contract code)"
                    .to_string()
            }
            code if code >= CUSTOM_ERROR_FLOOR => format!(
                "Custom contract error {code} - likely a specific error defined in the contract"
            ),
            code => format!("Unknown contract error number: {code}"),
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.translate())
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("node RPC error: {0}")]
    Rpc(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("dispatch error: {0}")]
    Dispatch(DispatchError),

    /// Post-submission failure; surfaced with raw status detail since the
    /// structured error is no longer available at that point.
    #[error("transaction failed: {0}")]
    Submission(String),
}
