//! Core types for the Starkward guardian service.
//!
//! This module provides the data model shared across all Starkward
//! crates:
//!
//! - [`Policy`] - One spending rule attached to an (account, signer) pair
//! - [`Transaction`] - The user-signed invoke transaction under review
//! - [`InvocationNode`] / [`EmittedEvent`] - One frame of a simulated
//!   call tree, as returned by the trace provider
//! - [`PolicySetEvent`] - A historical on-chain policy-setting event
//! - [`Violation`] - One reason a transaction failed policy review
//! - [`GuardianSignature`] - The `(r, s)` co-signature output
//!
//! Trace shapes are externally supplied and loosely typed on the wire;
//! they are validated into these closed records at the provider
//! boundary, never inside the matching engine.

use serde::{Deserialize, Serialize};

/// One policy rule attached to an (account, signer) pair.
///
/// A policy governs a single contract address and constrains either a
/// cumulative per-call amount (ERC-20-style rules), a set of protected
/// token identifiers (NFT-style rules), or carries an allowlist of
/// counterparty addresses the account may touch freely.
///
/// # Well-formedness
///
/// A policy is malformed unless it has a non-empty `address` and either
/// an `ids` sequence or an `amount` field, OR it has a non-empty
/// `allowlist`. This invariant is enforced at the API boundary via
/// [`Policy::is_well_formed`]; the matching engine assumes well-formed
/// input.
///
/// # Examples
///
/// ```
/// use starkward_core::types::Policy;
///
/// let policy = Policy {
///     address: "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7".to_string(),
///     amount: Some("1000000000000000000".to_string()),
///     ids: None,
///     allowlist: None,
/// };
/// assert!(policy.is_well_formed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Contract address this rule governs (canonical chain address).
    pub address: String,

    /// Maximum per-call transfer amount, decimal or hex numeric string.
    ///
    /// Absence means "not an amount-bounded rule".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Whitelisted numeric token identifiers for NFT-style contracts.
    ///
    /// Absence means every identifier under this contract is protected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,

    /// Counterparty/contract addresses the account may touch freely,
    /// independent of per-policy amount/id checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,
}

impl Policy {
    /// Returns `true` if this policy satisfies the structural invariant
    /// required at the API boundary.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let asset_rule =
            !self.address.is_empty() && (self.ids.is_some() || self.amount.is_some());
        let allowlist_rule = self
            .allowlist
            .as_ref()
            .is_some_and(|list| !list.is_empty() && list.iter().all(|a| !a.is_empty()));
        asset_rule || allowlist_rule
    }
}

/// The user-signed invoke transaction under verification.
///
/// Immutable once received: the engine recomputes and separately signs a
/// hash over a subset of these fields, it never modifies or re-signs the
/// user's own signature. JSON uses the chain client's camelCase field
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The account contract sending the transaction.
    pub contract_address: String,

    /// Call array encoded as numeric felt strings (hex forms are
    /// sanitized before simulation).
    #[serde(default)]
    pub calldata: Vec<String>,

    /// The user's own signature; carried through untouched.
    #[serde(default)]
    pub signature: Vec<String>,

    /// Account nonce, numeric felt string.
    pub nonce: String,

    /// Fee ceiling, numeric felt string. Defaults at hashing time when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<String>,

    /// Transaction version, numeric felt string. Defaults to `1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One event emitted by a call frame in a simulated trace.
///
/// The first key identifies the event kind (Transfer, Approval,
/// ApprovalForAll); `data` is positional per chain convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Event keys; `keys[0]` is the event selector.
    #[serde(default)]
    pub keys: Vec<String>,

    /// Event payload. For Transfer: sender, receiver, amount.
    #[serde(default)]
    pub data: Vec<String>,
}

/// One frame of a simulated call: the invocation trace tree node.
///
/// Forms a tree rooted at the outer transaction call; depth is bounded
/// only by actual call depth, so every traversal over it carries an
/// explicit depth ceiling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationNode {
    /// Contract executing this frame.
    pub contract_address: String,

    /// Contract (or account) that initiated this frame.
    #[serde(default)]
    pub caller_address: String,

    /// Entry point selector of the call, when the trace reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Calldata of this frame as numeric felt strings.
    #[serde(default)]
    pub calldata: Vec<String>,

    /// Events emitted directly by this frame.
    #[serde(default)]
    pub events: Vec<EmittedEvent>,

    /// Nested calls made by this frame.
    #[serde(default)]
    pub internal_calls: Vec<InvocationNode>,
}

/// A historical on-chain policy-setting event.
///
/// `data[0]` is the signer public key, `data[1]` the encoded chunk
/// count, and `data[2..]` the felt-packed policy payload chunks. The
/// engine only ever reads the most recent event per signer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySetEvent {
    /// Raw event data words.
    #[serde(default)]
    pub data: Vec<String>,

    /// Block the event was emitted in, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl PolicySetEvent {
    /// The signer public key this event sets a policy for, if present.
    #[must_use]
    pub fn signer(&self) -> Option<&str> {
        self.data.first().map(String::as_str)
    }

    /// The felt-packed policy payload chunks (everything after the
    /// signer and the chunk count).
    #[must_use]
    pub fn policy_chunks(&self) -> &[String] {
        self.data.get(2..).unwrap_or(&[])
    }
}

/// One balance change extracted from a trace, for human-readable
/// reporting only. Never used for policy decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Sending address.
    pub sender: String,
    /// Receiving address.
    pub receiver: String,
    /// Transferred amount, numeric felt string.
    pub amount: String,
    /// Token contract the transfer happened under.
    pub contract_address: String,
}

/// One reason a transaction failed policy review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    /// A contract outside the union allowlist was touched.
    ///
    /// This is the coarse circuit breaker: it takes priority over
    /// per-asset matching.
    #[serde(rename_all = "camelCase")]
    UnlistedContract {
        /// The touched address missing from the allowlist.
        address: String,
    },

    /// An asset-moving sub-call matched no policy.
    #[serde(rename_all = "camelCase")]
    DisallowedCall {
        /// Contract the disallowed call executed on.
        contract_address: String,
        /// Caller that initiated the sub-call.
        caller_address: String,
        /// Entry point selector, when known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        /// Calldata of the disallowed call.
        calldata: Vec<String>,
    },
}

impl Violation {
    /// Build a `DisallowedCall` violation from a trace node.
    #[must_use]
    pub fn disallowed_call(node: &InvocationNode) -> Self {
        Self::DisallowedCall {
            contract_address: node.contract_address.clone(),
            caller_address: node.caller_address.clone(),
            selector: node.selector.clone(),
            calldata: node.calldata.clone(),
        }
    }
}

/// The guardian's co-signature over the recomputed transaction hash.
///
/// An ordered `(r, s)` pair of hex felt strings. Output artifact only;
/// never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianSignature {
    /// Signature `r` component, hex felt string.
    pub r: String,
    /// Signature `s` component, hex felt string.
    pub s: String,
}

/// The most recent policy set for one signer of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerPolicies {
    /// Signer public key the policy applies to.
    pub signer: String,
    /// The decoded policy rules.
    pub policy: Vec<Policy>,
}

/// A policy in its on-chain transport encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPolicy {
    /// Base64 of the JSON policy document.
    pub base64: String,
    /// The base64 split into 31-byte chunks, each packed as a hex felt
    /// string.
    #[serde(rename = "feltEncoded")]
    pub felt_encoded: Vec<String>,
}

// ============================================================================
// Unit Tests
// ============================================================================
