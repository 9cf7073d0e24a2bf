//! # starkward-crypto
//!
//! Transaction hashing and guardian co-signing for the Starkward
//! guardian service.
//!
//! ## Internal Crate Warning
//!
//! **This crate is an internal implementation detail of `starkward`.**
//! The API is unstable and may change without notice between any
//! versions, including patch releases. Do not depend on this crate
//! directly.
//!
//! ## Modules
//!
//! - [`hash`] - Canonical invoke transaction hashing
//! - [`signer`] - Stark-curve guardian signer with zeroizing key
//!   storage
//!
//! The signer holds the guardian key for the process lifetime and is
//! shared across requests; signing is deterministic, so retries of an
//! approved transaction return byte-identical signatures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod hash;
pub mod signer;

pub use hash::{chain_id_felt, transaction_hash, DEFAULT_MAX_FEE, DEFAULT_VERSION};
pub use signer::GuardianSigner;
