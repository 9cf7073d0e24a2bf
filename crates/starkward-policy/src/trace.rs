//! Invocation trace traversal.
//!
//! Three independent, read-only, pre-order traversals over the same
//! simulated call tree:
//!
//! - [`extract_asset_events`] - sub-calls emitting watched
//!   asset-movement events (the matcher's working set)
//! - [`extract_contract_addresses`] - the touched-address universe, up
//!   to a caller-supplied depth bound (allow-list enforcement)
//! - [`extract_transfers`] - a flat transfer ledger for reporting
//!
//! Traces are externally supplied, so every traversal carries an
//! explicit depth ceiling rather than trusting the tree to be shallow;
//! frames below the ceiling are simply not visited.

use starkward_core::types::{EmittedEvent, InvocationNode, TransferRecord};

/// Event key of an ERC-20/ERC-721 `Transfer` event.
pub const TRANSFER_EVENT_KEY: &str =
    "0x99cd8bde557814842a3121e8ddfd433a539b8c9f14bf31ebf108d12e6196e9";

/// Event key of an ERC-20/ERC-721 `Approval` event.
pub const APPROVAL_EVENT_KEY: &str =
    "0x134692b230b9e1ffa39098904722134159652b09c5bc41d88d6698779d228ff";

/// Event key of an ERC-721 `ApprovalForAll` event.
pub const APPROVAL_FOR_ALL_EVENT_KEY: &str =
    "0x6ad9ed7b6318f1bcffefe19df9aeb40d22c36bed567e1925a5ccde0536edd";

/// Hard ceiling on trace recursion for the unbounded traversals.
///
/// Real call trees are a handful of frames deep; anything deeper is an
/// adversarial or corrupt trace and is not walked further.
pub const MAX_TRACE_DEPTH: usize = 64;

/// Returns `true` if the event's first key is one of the watched
/// asset-movement selectors (Transfer / Approval / ApprovalForAll).
#[must_use]
pub fn is_watched_event(event: &EmittedEvent) -> bool {
    event.keys.first().is_some_and(|key| {
        key == TRANSFER_EVENT_KEY || key == APPROVAL_EVENT_KEY || key == APPROVAL_FOR_ALL_EVENT_KEY
    })
}

/// Returns `true` if the node directly emits an `ApprovalForAll` event.
#[must_use]
pub fn emits_approval_for_all(node: &InvocationNode) -> bool {
    node.events
        .iter()
        .any(|event| event.keys.first().is_some_and(|key| key == APPROVAL_FOR_ALL_EVENT_KEY))
}

/// Collect every sub-call whose events contain at least one watched
/// asset-movement event.
///
/// Pre-order: a matching node is included once, then its subtree is
/// still searched, since internal calls can emit watched events of
/// their own.
#[must_use]
pub fn extract_asset_events(root: &InvocationNode) -> Vec<&InvocationNode> {
    let mut matches = Vec::new();
    collect_asset_events(root, 0, &mut matches);
    matches
}

fn collect_asset_events<'a>(
    node: &'a InvocationNode,
    depth: usize,
    matches: &mut Vec<&'a InvocationNode>,
) {
    if depth > MAX_TRACE_DEPTH {
        return;
    }
    if node.events.iter().any(is_watched_event) {
        matches.push(node);
    }
    for call in &node.internal_calls {
        collect_asset_events(call, depth + 1, matches);
    }
}

/// Collect the distinct contract addresses of every frame visited up to
/// `max_depth` inclusive, in pre-order.
///
/// The depth bound exists because deep internal calls (e.g. inside AMM
/// routers) are not attributable to user intent; the caller treats the
/// result as a set.
#[must_use]
pub fn extract_contract_addresses(root: &InvocationNode, max_depth: usize) -> Vec<String> {
    let mut addresses = Vec::new();
    collect_contract_addresses(root, 0, max_depth, &mut addresses);
    addresses
}

fn collect_contract_addresses(
    node: &InvocationNode,
    depth: usize,
    max_depth: usize,
    addresses: &mut Vec<String>,
) {
    if depth > max_depth {
        return;
    }
    if !node.contract_address.is_empty() && !addresses.contains(&node.contract_address) {
        addresses.push(node.contract_address.clone());
    }
    for call in &node.internal_calls {
        collect_contract_addresses(call, depth + 1, max_depth, addresses);
    }
}

/// Collect every Transfer event anywhere in the tree whose sender or
/// receiver equals `caller`.
///
/// Used purely for a human-readable balance-change ledger, never for
/// policy decisions, hence no depth bound beyond the hard ceiling.
#[must_use]
pub fn extract_transfers(root: &InvocationNode, caller: &str) -> Vec<TransferRecord> {
    let mut transfers = Vec::new();
    collect_transfers(root, caller, 0, &mut transfers);
    transfers
}

fn collect_transfers(
    node: &InvocationNode,
    caller: &str,
    depth: usize,
    transfers: &mut Vec<TransferRecord>,
) {
    if depth > MAX_TRACE_DEPTH {
        return;
    }
    for event in &node.events {
        if event.keys.first().map_or(true, |key| key != TRANSFER_EVENT_KEY) {
            continue;
        }
        let (Some(sender), Some(receiver)) = (event.data.first(), event.data.get(1)) else {
            continue;
        };
        if sender != caller && receiver != caller {
            continue;
        }
        transfers.push(TransferRecord {
            sender: sender.clone(),
            receiver: receiver.clone(),
            amount: event.data.get(2).cloned().unwrap_or_default(),
            contract_address: node.contract_address.clone(),
        });
    }
    for call in &node.internal_calls {
        collect_transfers(call, caller, depth + 1, transfers);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
