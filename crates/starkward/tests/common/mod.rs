//! Shared test fixtures for the service integration tests.
//!
//! Provides deterministic in-memory providers so the full pipeline
//! (router, verifier, policy engine, signer) runs without a chain node.

#![allow(dead_code)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;

use starkward::provider::{EventProvider, TraceProvider};
use starkward::verifier::Verifier;
use starkward_core::error::ProviderResult;
use starkward_core::types::{
    EmittedEvent, InvocationNode, Policy, PolicySetEvent, Transaction,
};
use starkward_crypto::{chain_id_felt, GuardianSigner};
use starkward_policy::codec::encode_policy;

/// Guardian private key used across the integration tests.
pub const GUARDIAN_KEY: &str =
    "0x659d923453a4ec03749cb0dba1f1d8ee471d9c9c5760bcb12cb1a7c111157e4";

/// Session signer public key the fixture policies are set for.
pub const SIGNER: &str = "0x5537071ea21b91a3b3743866ea12cf197f0b37a6b83be41dd0bbfec6a2cf8ef";

/// Guarded account address.
pub const ACCOUNT: &str = "0x38b6f1f5e39f5965a28ff2624ab941112d54fe71b8bf1283f565f5c925566c0";

/// ERC-20 token contract the fixture traces move.
pub const TOKEN: &str = "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";

const TRANSFER_EVENT_KEY: &str =
    "0x99cd8bde557814842a3121e8ddfd433a539b8c9f14bf31ebf108d12e6196e9";

/// An event provider returning a fixed event list.
pub struct MockEventProvider(pub Vec<PolicySetEvent>);

#[async_trait]
impl EventProvider for MockEventProvider {
    async fn policy_events(&self, _account: &str) -> ProviderResult<Vec<PolicySetEvent>> {
        Ok(self.0.clone())
    }
}

/// A trace provider returning a fixed invocation tree.
pub struct MockTraceProvider(pub InvocationNode);

#[async_trait]
impl TraceProvider for MockTraceProvider {
    async fn simulate(&self, _tx: &Transaction) -> ProviderResult<InvocationNode> {
        Ok(self.0.clone())
    }
}

/// A policy event as the account contract would emit it: signer, chunk
/// count, then the felt-packed payload.
pub fn policy_event(signer: &str, policy: &[Policy]) -> PolicySetEvent {
    let encoded = encode_policy(policy).expect("fixture policy must encode");
    let mut data = vec![
        signer.to_string(),
        format!("{:#x}", encoded.felt_encoded.len()),
    ];
    data.extend(encoded.felt_encoded);
    PolicySetEvent {
        data,
        block_number: None,
    }
}

/// A token policy for [`TOKEN`], optionally amount-capped, allowing the
/// token contract itself.
pub fn token_policy(cap: Option<&str>) -> Vec<Policy> {
    vec![Policy {
        address: TOKEN.to_string(),
        amount: cap.map(str::to_string),
        ids: None,
        allowlist: Some(vec![TOKEN.to_string()]),
    }]
}

/// A trace in which the account transfers `amount` of [`TOKEN`].
pub fn transfer_trace(amount: &str) -> InvocationNode {
    InvocationNode {
        contract_address: TOKEN.to_string(),
        caller_address: ACCOUNT.to_string(),
        selector: Some(
            "0x83afd3f4caedc6eebf44246fe54e38c95e3179a5ec9ea81740eca5b482d12e".to_string(),
        ),
        calldata: vec![
            "0x11".to_string(),
            amount.to_string(),
            "0x0".to_string(),
        ],
        events: vec![EmittedEvent {
            keys: vec![TRANSFER_EVENT_KEY.to_string()],
            data: vec![ACCOUNT.to_string(), "0x11".to_string(), amount.to_string()],
        }],
        internal_calls: vec![],
    }
}

/// A transaction from the guarded account.
pub fn sample_tx() -> Transaction {
    Transaction {
        contract_address: ACCOUNT.to_string(),
        calldata: vec!["0x1".to_string(), "0x1000".to_string()],
        signature: vec![],
        nonce: "0".to_string(),
        max_fee: None,
        version: None,
    }
}

/// Assemble a verifier over mock providers.
pub fn make_verifier(events: Vec<PolicySetEvent>, trace: InvocationNode) -> Arc<Verifier> {
    Arc::new(Verifier::new(
        Arc::new(MockEventProvider(events)),
        Arc::new(MockTraceProvider(trace)),
        GuardianSigner::from_key_str(GUARDIAN_KEY).expect("fixture key is valid"),
        chain_id_felt("SN_SEPOLIA").expect("chain tag is a short string"),
    ))
}
