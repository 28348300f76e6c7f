//! HTTP client for the chain node's JSON-RPC endpoint.

use crate::{ChainError, DispatchError, TxStatus};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Client for communicating with a chain node via JSON-RPC.
///
/// Wraps `reqwest::Client` with the node's base URL and provides typed
/// methods for each RPC action the session layer needs.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    node_url: String,
}

impl NodeClient {
    /// Create a new client targeting the given base URL.
    pub fn new(node_url: impl Into<String>) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::Connection(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
        })
    }

    /// The configured node URL.
    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| ChainError::Rpc("params must be a JSON object".into()))?
            .insert("action".to_string(), json!(action));

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Connection(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ChainError::Rpc(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChainError::Decode(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
            return Err(ChainError::Rpc(format!("node error: {err}")));
        }

        Ok(json.get("result").cloned().unwrap_or(json))
    }

    /// Probe the node. Used once at session initialization to establish
    /// connection readiness; failure here is terminal until a retry is
    /// user-initiated.
    pub async fn chain_info(&self) -> Result<ChainInfoResult, ChainError> {
        let result = self.rpc_call("chain_info", json!({})).await?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::Decode(format!("invalid chain_info response: {e}")))
    }

    /// Read-only contract call simulation. Doubles as gas estimation: the
    /// node runs the call without committing state and reports the gas a
    /// real submission would need.
    pub async fn contract_query(
        &self,
        contract: &str,
        caller: &str,
        method: &str,
        args: serde_json::Value,
        value: u128,
    ) -> Result<QueryResult, ChainError> {
        let result = self
            .rpc_call(
                "contract_query",
                json!({
                    "contract": contract,
                    "caller": caller,
                    "method": method,
                    "args": args,
                    "value": value.to_string(),
                }),
            )
            .await?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::Decode(format!("invalid query response: {e}")))
    }

    /// Submit a signed state-mutating contract call. Returns the transaction
    /// hash; completion is observed separately via [`NodeClient::tx_status`].
    pub async fn contract_submit(
        &self,
        contract: &str,
        caller: &str,
        method: &str,
        args: serde_json::Value,
        value: u128,
        gas_limit: u64,
        signature: &str,
    ) -> Result<String, ChainError> {
        let result = self
            .rpc_call(
                "contract_submit",
                json!({
                    "contract": contract,
                    "caller": caller,
                    "method": method,
                    "args": args,
                    "value": value.to_string(),
                    "gas_limit": gas_limit,
                    "signature": signature,
                }),
            )
            .await?;
        result
            .get("tx_hash")
            .and_then(|h| h.as_str())
            .map(str::to_string)
            .ok_or_else(|| ChainError::Decode("submit response missing tx_hash".into()))
    }

    /// Current status of a submitted transaction.
    pub async fn tx_status(&self, tx_hash: &str) -> Result<TxStatus, ChainError> {
        let result = self
            .rpc_call("tx_status", json!({ "tx_hash": tx_hash }))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::Decode(format!("invalid tx_status response: {e}")))
    }
}

/// Response from the `chain_info` RPC.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainInfoResult {
    pub chain: String,
    #[serde(default)]
    pub finalized_height: u64,
}

/// Raw result of a contract query/simulation, decoded once at this boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    pub ok: bool,
    /// Decoded contract output when `ok`.
    #[serde(default)]
    pub output: serde_json::Value,
    /// Structured dispatch error when not `ok`.
    #[serde(default)]
    pub module_error: Option<DispatchError>,
    /// Gas a real submission of this call would need.
    #[serde(default)]
    pub gas_required: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_result_ok_decode() {
        let raw = r#"{"ok":true,"output":"5Grw","gas_required":12000}"#;
        let result: QueryResult = serde_json::from_str(raw).unwrap();
        assert!(result.ok);
        assert_eq!(result.output, serde_json::json!("5Grw"));
        assert_eq!(result.gas_required, 12000);
        assert!(result.module_error.is_none());
    }

    #[test]
    fn test_query_result_err_decode() {
        let raw = r#"{"ok":false,"module_error":{"module":8,"code":1}}"#;
        let result: QueryResult = serde_json::from_str(raw).unwrap();
        assert!(!result.ok);
        let err = result.module_error.unwrap();
        assert_eq!(err, DispatchError::new(8, 1));
        assert!(err.translate().starts_with("BalanceTooLow"));
    }

    #[test]
    fn test_client_keeps_url() {
        let client = NodeClient::new("http://127.0.0.1:9944").unwrap();
        assert_eq!(client.node_url(), "http://127.0.0.1:9944");
    }
}
