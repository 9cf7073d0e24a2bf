//! Policy matching engine.
//!
//! Applies a signer's policy rules to the asset-movement events found in
//! a simulated trace and returns the list of violations (empty list =
//! approved).
//!
//! # Rule Evaluation Order
//!
//! 1. **Allow-list circuit breaker** - the union of every policy's
//!    `allowlist` entries, plus the account itself, must cover every
//!    contract touched within [`ALLOWLIST_DEPTH`] frames of the root.
//!    Any address outside the set rejects the whole transaction
//!    immediately; fine-grained matching never runs.
//! 2. **Per-asset matching** - each asset-moving sub-call must be
//!    covered by at least one policy: initiated by the account itself,
//!    on the policy's contract, within the amount ceiling, and (for
//!    NFT rules) moving a whitelisted identifier.
//!
//! All numeric comparisons use 256-bit integers; calldata values are up
//! to 252-bit field elements. Matching is pure and synchronous, safe to
//! run concurrently across requests.
//!
//! # Known design gap
//!
//! An `ApprovalForAll` event passes the NFT id check regardless of the
//! policy's `ids`, so an ids-restricted policy does not constrain
//! blanket approvals. Observed behavior of the on-chain protocol this
//! engine mirrors; preserved as-is rather than silently fixed.

use std::collections::HashSet;

use alloy_primitives::U256;
use starkward_core::felt::parse_uint;
use starkward_core::types::{InvocationNode, Policy, Violation};

use crate::address::normalize;
use crate::trace::{emits_approval_for_all, extract_asset_events, extract_contract_addresses};

/// Depth bound for the allow-list address sweep.
///
/// Contracts touched deeper than this (e.g. hops inside an AMM router)
/// are not attributable to user intent and are exempt from the
/// allow-list check.
pub const ALLOWLIST_DEPTH: usize = 2;

/// Index of the amount/id word in transfer/approve calldata, per the
/// ERC-20-like calling convention `(recipient, amount_or_id, ...)`.
///
/// A contract violating this convention is silently mismatched rather
/// than rejected; see the crate documentation.
const AMOUNT_CALLDATA_INDEX: usize = 1;

/// Check a simulated trace against an account's policies.
///
/// Returns the violating events; an empty result means the transaction
/// is approved. Deterministic: identical `(account, policies, trace)`
/// inputs produce the same violation list regardless of policy order.
///
/// The account and the policy-side addresses are normalized here;
/// trace-supplied addresses are assumed canonical.
#[must_use]
pub fn check_trace(
    account: &str,
    policies: &[Policy],
    root: &InvocationNode,
) -> Vec<Violation> {
    let account = normalize(account);
    let policies: Vec<Policy> = policies.iter().map(normalize_policy).collect();

    // Coarse circuit breaker first: every touched contract must be
    // covered by the union allow-list (an account may always call
    // itself).
    let mut allowed: HashSet<String> = policies
        .iter()
        .flat_map(|policy| policy.allowlist.iter().flatten().cloned())
        .collect();
    allowed.insert(account.clone());

    let missing: Vec<String> = extract_contract_addresses(root, ALLOWLIST_DEPTH)
        .into_iter()
        .filter(|address| !allowed.contains(address))
        .collect();
    if !missing.is_empty() {
        return missing
            .into_iter()
            .map(|address| Violation::UnlistedContract { address })
            .collect();
    }

    extract_asset_events(root)
        .into_iter()
        .filter(|node| !policies.iter().any(|policy| permits(&account, policy, node)))
        .map(Violation::disallowed_call)
        .collect()
}

/// Normalize the address-bearing fields of one policy.
fn normalize_policy(policy: &Policy) -> Policy {
    Policy {
        address: normalize(&policy.address),
        amount: policy.amount.clone(),
        ids: policy.ids.clone(),
        allowlist: policy
            .allowlist
            .as_ref()
            .map(|list| list.iter().map(|address| normalize(address)).collect()),
    }
}

/// Returns `true` if `policy` covers the asset-moving sub-call `node`.
fn permits(account: &str, policy: &Policy, node: &InvocationNode) -> bool {
    node.caller_address == account
        && policy.address == node.contract_address
        && amount_within(policy, node)
        && ids_allow(policy, node)
}

/// Amount ceiling check.
///
/// A policy without an amount is not amount-bounded and passes
/// trivially. Otherwise the transfer/approve amount (second calldata
/// word) must not exceed the ceiling. Unparseable values never pass.
fn amount_within(policy: &Policy, node: &InvocationNode) -> bool {
    let Some(cap) = policy.amount.as_deref() else {
        return true;
    };
    let (Ok(cap), Some(Ok(amount))) = (
        parse_uint(cap),
        node.calldata
            .get(AMOUNT_CALLDATA_INDEX)
            .map(|word| parse_uint(word)),
    ) else {
        return false;
    };
    cap >= amount
}

/// NFT identifier whitelist check.
///
/// A policy without `ids` does not restrict identifiers. A sub-call
/// emitting `ApprovalForAll` passes regardless of `ids` (documented
/// design gap). Otherwise the moved identifier must be big-int equal to
/// one of the whitelisted ids.
fn ids_allow(policy: &Policy, node: &InvocationNode) -> bool {
    let Some(ids) = policy.ids.as_deref() else {
        return true;
    };
    if emits_approval_for_all(node) {
        return true;
    }
    let Some(Ok(moved)) = node
        .calldata
        .get(AMOUNT_CALLDATA_INDEX)
        .map(|word| parse_uint(word))
    else {
        return false;
    };
    ids.iter()
        .filter_map(|id| parse_uint(id).ok())
        .any(|id: U256| id == moved)
}

// ============================================================================
// Unit Tests
// ============================================================================
