//! Typed handle over the deployed Becoming contract.

use crate::{wait_terminal, ChainError, DispatchError, NodeClient, TxReceipt};
use becoming_types::{AccountAddress, Milestone, TokenId};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Tagged result of a simulate/query call.
///
/// Decoded exactly once at the network boundary; call sites match on the
/// variant instead of re-probing dynamic result shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome<T> {
    Ok(T),
    Err(DispatchError),
}

impl<T> CallOutcome<T> {
    /// Convert into a `Result`, translating the dispatch error.
    pub fn into_result(self) -> Result<T, ChainError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(err) => Err(ChainError::Dispatch(err)),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }
}

/// A simulate result together with the gas a real submission would need.
#[derive(Clone, Debug)]
pub struct Simulation<T> {
    pub outcome: CallOutcome<T>,
    pub gas_required: u64,
}

/// How often the finalization wait polls transaction status.
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Argument list for the account-keyed queries: one positional address.
fn account_args(account: &AccountAddress) -> serde_json::Value {
    json!([account.as_str()])
}

/// Typed contract-call capability bound to one deployed contract.
#[derive(Clone)]
pub struct ContractHandle {
    client: NodeClient,
    address: String,
}

impl ContractHandle {
    pub fn new(client: NodeClient, address: impl Into<String>) -> Self {
        Self {
            client,
            address: address.into(),
        }
    }

    /// Address of the bound contract.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The underlying node client.
    pub fn client(&self) -> &NodeClient {
        &self.client
    }

    /// Run a read-only simulation of `method` and decode the output.
    pub async fn simulate<T: DeserializeOwned>(
        &self,
        caller: &AccountAddress,
        method: &str,
        args: serde_json::Value,
        value: u128,
    ) -> Result<Simulation<T>, ChainError> {
        let result = self
            .client
            .contract_query(&self.address, caller.as_str(), method, args, value)
            .await?;
        let outcome = if result.ok {
            let decoded = serde_json::from_value(result.output)
                .map_err(|e| ChainError::Decode(format!("{method} output: {e}")))?;
            CallOutcome::Ok(decoded)
        } else {
            let err = result
                .module_error
                .ok_or_else(|| ChainError::Decode(format!("{method}: error without module code")))?;
            tracing::debug!(method, module = err.module, code = err.code, "simulation failed");
            CallOutcome::Err(err)
        };
        Ok(Simulation {
            outcome,
            gas_required: result.gas_required,
        })
    }

    /// Submit a signed call and wait for the terminal status. In-block
    /// inclusion is not treated as success; only finalization resolves.
    pub async fn submit_and_finalize(
        &self,
        caller: &AccountAddress,
        signature: &str,
        method: &str,
        args: serde_json::Value,
        value: u128,
        gas_limit: u64,
    ) -> Result<TxReceipt, ChainError> {
        let tx_hash = self
            .client
            .contract_submit(
                &self.address,
                caller.as_str(),
                method,
                args,
                value,
                gas_limit,
                signature,
            )
            .await?;
        tracing::debug!(method, tx = %tx_hash, "transaction submitted");
        let client = self.client.clone();
        let hash = tx_hash.clone();
        let poll = move || {
            let client = client.clone();
            let hash = hash.clone();
            async move { client.tx_status(&hash).await }
        };
        wait_terminal(&tx_hash, poll, STATUS_POLL_INTERVAL).await
    }

    // ── Typed queries ───────────────────────────────────────────────────

    /// Current owner of the soulbound token, if minted.
    pub async fn get_owner(
        &self,
        caller: &AccountAddress,
    ) -> Result<CallOutcome<Option<AccountAddress>>, ChainError> {
        Ok(self
            .simulate(caller, "getOwner", account_args(caller), 0)
            .await?
            .outcome)
    }

    /// Milestones recorded under a token id.
    pub async fn get_milestones(
        &self,
        caller: &AccountAddress,
        token_id: TokenId,
    ) -> Result<CallOutcome<Vec<Milestone>>, ChainError> {
        Ok(self
            .simulate(caller, "getMilestones", json!([token_id.as_u64()]), 0)
            .await?
            .outcome)
    }

    /// Milestones recorded for an arbitrary account.
    pub async fn get_milestones_for_account(
        &self,
        account: &AccountAddress,
    ) -> Result<CallOutcome<Vec<Milestone>>, ChainError> {
        Ok(self
            .simulate(account, "getMilestonesForAccount", account_args(account), 0)
            .await?
            .outcome)
    }

    /// Avatar stage index for a token id.
    pub async fn get_avatar_stage(
        &self,
        caller: &AccountAddress,
        token_id: TokenId,
    ) -> Result<CallOutcome<u8>, ChainError> {
        Ok(self
            .simulate(caller, "getAvatarStage", json!([token_id.as_u64()]), 0)
            .await?
            .outcome)
    }

    /// Avatar stage index for an arbitrary account. The contract may not
    /// expose this; callers fall back to deriving from the milestone count.
    pub async fn get_avatar_stage_for_account(
        &self,
        account: &AccountAddress,
    ) -> Result<CallOutcome<u8>, ChainError> {
        Ok(self
            .simulate(account, "getAvatarStageForAccount", account_args(account), 0)
            .await?
            .outcome)
    }

    /// Mint timestamp (Unix seconds) for an account. Optional contract
    /// method; an RPC-level failure here is expected on older deployments.
    pub async fn get_mint_timestamp(
        &self,
        account: &AccountAddress,
    ) -> Result<CallOutcome<Option<u64>>, ChainError> {
        Ok(self
            .simulate(account, "getMintTimestamp", account_args(account), 0)
            .await?
            .outcome)
    }
}
