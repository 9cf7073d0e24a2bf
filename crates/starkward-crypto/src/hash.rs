//! Canonical invoke transaction hashing.
//!
//! The guardian does not sign what the user sent; it recomputes the
//! transaction hash from the transaction's own fields and the chain
//! identifier, exactly as the sequencer will, and signs that. If this
//! hash were off by a byte the execution layer would reject the
//! co-signature, so the computation below must match the chain's native
//! rule bit for bit: a Pedersen `compute_hash_on_elements` over
//!
//! ```text
//! ("invoke", version, sender, 0, h(calldata), max_fee, chain_id, nonce)
//! ```

use starknet_core::crypto::compute_hash_on_elements;
use starknet_core::types::Felt;
use starknet_core::utils::cairo_short_string_to_felt;

use starkward_core::error::{SignError, SignResult};
use starkward_core::felt::parse_felt;
use starkward_core::types::Transaction;

/// Transaction version assumed when the transaction does not carry one.
pub const DEFAULT_VERSION: &str = "1";

/// Fee ceiling assumed when the transaction does not carry one.
pub const DEFAULT_MAX_FEE: &str = "2000000000";

/// Felt-encode a chain identifier tag (e.g. `SN_MAIN`).
///
/// # Errors
///
/// Returns [`SignError::InvalidField`] if the tag is not a valid Cairo
/// short string.
pub fn chain_id_felt(tag: &str) -> SignResult<Felt> {
    cairo_short_string_to_felt(tag).map_err(|_| SignError::invalid_field("chain_id", tag))
}

/// Recompute the canonical hash of an invoke transaction.
///
/// Version defaults to [`DEFAULT_VERSION`] and the fee ceiling to
/// [`DEFAULT_MAX_FEE`] when absent, matching the transaction shape the
/// execution layer will reconstruct.
///
/// # Errors
///
/// Returns [`SignError::InvalidField`] naming the first transaction
/// field that is not a valid field element.
pub fn transaction_hash(tx: &Transaction, chain_id: Felt) -> SignResult<Felt> {
    let prefix = cairo_short_string_to_felt("invoke")
        .map_err(|_| SignError::invalid_field("prefix", "invoke"))?;

    let sender = parse_felt(&tx.contract_address)
        .map_err(|_| SignError::invalid_field("contractAddress", &tx.contract_address))?;
    let version_str = tx.version.as_deref().unwrap_or(DEFAULT_VERSION);
    let version = parse_felt(version_str)
        .map_err(|_| SignError::invalid_field("version", version_str))?;
    let max_fee_str = tx.max_fee.as_deref().unwrap_or(DEFAULT_MAX_FEE);
    let max_fee = parse_felt(max_fee_str)
        .map_err(|_| SignError::invalid_field("maxFee", max_fee_str))?;
    let nonce =
        parse_felt(&tx.nonce).map_err(|_| SignError::invalid_field("nonce", &tx.nonce))?;

    let calldata = tx
        .calldata
        .iter()
        .map(|word| {
            parse_felt(word).map_err(|_| SignError::invalid_field("calldata", word))
        })
        .collect::<SignResult<Vec<Felt>>>()?;

    Ok(compute_hash_on_elements(&[
        prefix,
        version,
        sender,
        Felt::ZERO,
        compute_hash_on_elements(&calldata),
        max_fee,
        chain_id,
        nonce,
    ]))
}

// ============================================================================
// Unit Tests
// ============================================================================
