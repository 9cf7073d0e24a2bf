//! # starkward-policy
//!
//! The policy verification engine of the Starkward guardian service.
//!
//! ## Internal Crate Warning
//!
//! **This crate is an internal implementation detail of `starkward`.**
//! The API is unstable and may change without notice between any
//! versions, including patch releases. Do not depend on this crate
//! directly.
//!
//! Everything in this crate is pure and synchronous: no I/O, no shared
//! mutable state, no locks. It is trivially safe to run concurrently
//! across requests.
//!
//! ## Modules
//!
//! - [`codec`] - Policy on-chain transport codec (felt-chunked
//!   base64-of-JSON)
//! - [`address`] - Chain address normalization
//! - [`trace`] - Read-only invocation trace traversals
//! - [`matcher`] - Policy matching engine producing violation lists
//!
//! ## Evaluation model
//!
//! The matcher receives a decoded policy sequence and a simulated call
//! tree, sweeps the touched contracts against the union allow-list,
//! then checks each asset-moving sub-call against the per-asset rules.
//! An empty violation list means the transaction may be co-signed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod address;
pub mod codec;
pub mod matcher;
pub mod trace;

pub use address::normalize;
pub use codec::{decode_policy, encode_policy, SHORT_STRING_WIDTH};
pub use matcher::{check_trace, ALLOWLIST_DEPTH};
pub use trace::{
    extract_asset_events, extract_contract_addresses, extract_transfers, MAX_TRACE_DEPTH,
};
