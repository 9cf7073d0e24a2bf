//! Chain data providers.
//!
//! The verifier consumes two narrow capabilities, expressed as traits so
//! tests can substitute deterministic fixtures:
//!
//! - [`EventProvider`] - fetch the account's historical policy-setting
//!   events
//! - [`TraceProvider`] - simulate a transaction and return its
//!   invocation trace
//!
//! [`RpcProvider`] implements both against a Starknet JSON-RPC node.
//! Provider responses are validated into the closed trace records here,
//! at the boundary; malformed shapes fail the request instead of
//! flowing into the matching engine.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use starkward_core::error::{ProviderError, ProviderResult};
use starkward_core::felt::{sanitize_calldata, to_decimal};
use starkward_core::types::{EmittedEvent, InvocationNode, PolicySetEvent, Transaction};

/// Selector of the account's `policy_set` event.
pub const SET_POLICY_EVENT_SELECTOR: &str =
    "0xa79c31a86c9b0b2abf73ad994711fbad4da038921b96087ff074964aecc528";

/// Events are paged from the node in chunks of this size.
const EVENT_CHUNK_SIZE: u64 = 20;

/// First block scanned for policy events. Accounts with the policy
/// feature did not exist before this height.
const EVENT_FROM_BLOCK: u64 = 50_000;

/// Fetches historical policy-setting events for an account.
#[async_trait]
pub trait EventProvider: Send + Sync {
    /// Return every policy-setting event the account has emitted, oldest
    /// first.
    async fn policy_events(&self, account: &str) -> ProviderResult<Vec<PolicySetEvent>>;
}

/// Simulates a transaction and returns its invocation trace.
#[async_trait]
pub trait TraceProvider: Send + Sync {
    /// Simulate `tx` against pending state and return the execute-phase
    /// call tree.
    async fn simulate(&self, tx: &Transaction) -> ProviderResult<InvocationNode>;
}

/// A Starknet JSON-RPC client implementing both provider capabilities.
#[derive(Debug, Clone)]
pub struct RpcProvider {
    http: reqwest::Client,
    url: String,
}

impl RpcProvider {
    /// Create a provider against the given JSON-RPC endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn rpc_call(&self, method: &str, params: Value) -> ProviderResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::rejected(format!(
                "{method} returned HTTP {status}"
            )));
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(ProviderError::rejected(format!(
                "{method} failed ({}): {}",
                error.code, error.message
            )));
        }
        envelope
            .result
            .ok_or_else(|| ProviderError::malformed_response(format!("{method} returned no result")))
    }
}

#[async_trait]
impl EventProvider for RpcProvider {
    async fn policy_events(&self, account: &str) -> ProviderResult<Vec<PolicySetEvent>> {
        let mut events = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut filter = json!({
                "from_block": { "block_number": EVENT_FROM_BLOCK },
                "to_block": "pending",
                "address": account,
                "keys": [[SET_POLICY_EVENT_SELECTOR]],
                "chunk_size": EVENT_CHUNK_SIZE,
            });
            if let Some(token) = &continuation {
                filter["continuation_token"] = json!(token);
            }

            let result = self
                .rpc_call("starknet_getEvents", json!({ "filter": filter }))
                .await?;
            let page: EventsPage = serde_json::from_value(result)
                .map_err(|e| ProviderError::malformed_response(e.to_string()))?;

            events.extend(page.events.into_iter().map(|raw| PolicySetEvent {
                data: raw.data,
                block_number: raw.block_number,
            }));

            match page.continuation_token {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        tracing::debug!(account, count = events.len(), "fetched policy events");
        Ok(events)
    }
}

#[async_trait]
impl TraceProvider for RpcProvider {
    async fn simulate(&self, tx: &Transaction) -> ProviderResult<InvocationNode> {
        let request = simulate_request(tx)?;
        let result = self
            .rpc_call("starknet_simulateTransactions", request)
            .await?;

        let simulations: Vec<SimulatedTransaction> = serde_json::from_value(result)
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?;
        let simulation = simulations
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed_response("empty simulation result"))?;

        match simulation.transaction_trace.execute_invocation {
            ExecuteInvocation::Success(raw) => Ok(raw.into_node()),
            ExecuteInvocation::Reverted { revert_reason } => Err(ProviderError::rejected(
                format!("transaction reverted: {revert_reason}"),
            )),
        }
    }
}

/// Build the `starknet_simulateTransactions` parameters for `tx`.
///
/// Every numeric field is sanitized into felt decimal form, the one
/// spelling the trace provider accepts. Validation is skipped because
/// the guardian signature the account expects is the very output this
/// service is still deciding on.
fn simulate_request(tx: &Transaction) -> ProviderResult<Value> {
    let calldata = sanitize_calldata(&tx.calldata)
        .map_err(|e| ProviderError::rejected(format!("invalid calldata: {e}")))?;
    let sender = decimal_field("contractAddress", &tx.contract_address)?;
    let nonce = decimal_field("nonce", &tx.nonce)?;
    let version = decimal_field(
        "version",
        tx.version
            .as_deref()
            .unwrap_or(starkward_crypto::DEFAULT_VERSION),
    )?;
    let max_fee = decimal_field(
        "maxFee",
        tx.max_fee
            .as_deref()
            .unwrap_or(starkward_crypto::DEFAULT_MAX_FEE),
    )?;

    Ok(json!({
        "block_id": "pending",
        "transactions": [{
            "type": "INVOKE",
            "version": version,
            "sender_address": sender,
            "calldata": calldata,
            "signature": tx.signature,
            "nonce": nonce,
            "max_fee": max_fee,
        }],
        "simulation_flags": ["SKIP_VALIDATE"],
    }))
}

fn decimal_field(name: &str, value: &str) -> ProviderResult<String> {
    to_decimal(value).map_err(|_| ProviderError::rejected(format!("invalid {name}: {value}")))
}

// ============================================================================
// Wire shapes
// ============================================================================

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct EventsPage {
    #[serde(default)]
    events: Vec<RawEvent>,
    #[serde(default)]
    continuation_token: Option<String>,
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    data: Vec<String>,
    #[serde(default)]
    block_number: Option<u64>,
}

#[derive(Deserialize)]
struct SimulatedTransaction {
    transaction_trace: TransactionTrace,
}

#[derive(Deserialize)]
struct TransactionTrace {
    execute_invocation: ExecuteInvocation,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExecuteInvocation {
    Reverted { revert_reason: String },
    Success(RawInvocation),
}

#[derive(Deserialize)]
struct RawInvocation {
    contract_address: String,
    #[serde(default)]
    caller_address: String,
    #[serde(default)]
    entry_point_selector: Option<String>,
    #[serde(default)]
    calldata: Vec<String>,
    #[serde(default)]
    events: Vec<RawOrderedEvent>,
    #[serde(default)]
    calls: Vec<RawInvocation>,
}

#[derive(Deserialize)]
struct RawOrderedEvent {
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    data: Vec<String>,
}

impl RawInvocation {
    fn into_node(self) -> InvocationNode {
        InvocationNode {
            contract_address: self.contract_address,
            caller_address: self.caller_address,
            selector: self.entry_point_selector,
            calldata: self.calldata,
            events: self
                .events
                .into_iter()
                .map(|e| EmittedEvent {
                    keys: e.keys,
                    data: e.data,
                })
                .collect(),
            internal_calls: self.calls.into_iter().map(RawInvocation::into_node).collect(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        Transaction {
            contract_address: "0x38b6".to_string(),
            calldata: vec!["4096".to_string(), "0x10".to_string()],
            signature: vec!["0x2".to_string(), "0x3".to_string()],
            nonce: "7".to_string(),
            max_fee: None,
            version: None,
        }
    }

    #[test]
    fn simulate_request_sanitizes_every_numeric_field() {
        let request = simulate_request(&sample_tx()).unwrap();
        let tx = &request["transactions"][0];
        assert_eq!(tx["sender_address"], "14518");
        assert_eq!(tx["calldata"][0], "4096");
        assert_eq!(tx["calldata"][1], "16");
        assert_eq!(tx["nonce"], "7");
        assert_eq!(tx["version"], "1");
        assert_eq!(tx["max_fee"], "2000000000");
        assert_eq!(request["simulation_flags"][0], "SKIP_VALIDATE");
    }

    #[test]
    fn simulate_request_rejects_bad_calldata() {
        let mut tx = sample_tx();
        tx.calldata = vec!["not-a-felt".to_string()];
        assert!(matches!(
            simulate_request(&tx).unwrap_err(),
            ProviderError::Rejected { .. }
        ));
    }

    #[test]
    fn execute_invocation_parses_success_and_revert() {
        let success: ExecuteInvocation = serde_json::from_value(json!({
            "contract_address": "0x72df",
            "caller_address": "0x38b6",
            "calldata": [],
            "events": [{"keys": ["0x1"], "data": ["0x2"]}],
            "calls": [{"contract_address": "0x49d3"}],
        }))
        .unwrap();
        match success {
            ExecuteInvocation::Success(raw) => {
                let node = raw.into_node();
                assert_eq!(node.contract_address, "0x72df");
                assert_eq!(node.events.len(), 1);
                assert_eq!(node.internal_calls.len(), 1);
            }
            ExecuteInvocation::Reverted { .. } => panic!("parsed as revert"),
        }

        let reverted: ExecuteInvocation =
            serde_json::from_value(json!({"revert_reason": "assert failed"})).unwrap();
        assert!(matches!(reverted, ExecuteInvocation::Reverted { .. }));
    }

    #[test]
    fn events_page_tolerates_missing_fields() {
        let page: EventsPage = serde_json::from_value(json!({
            "events": [{"data": ["0xsigner", "0x1", "0xchunk"]}],
        }))
        .unwrap();
        assert_eq!(page.events.len(), 1);
        assert!(page.continuation_token.is_none());
        assert!(page.events[0].block_number.is_none());
    }
}
