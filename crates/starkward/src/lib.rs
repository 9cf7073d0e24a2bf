//! # starkward
//!
//! Guardian co-signing service for Starknet accounts.
//!
//! A transaction is only valid for a guarded account if it carries both
//! the owner's signature and the guardian's. This service holds the
//! guardian key and decides, per request, whether to add that second
//! signature: it looks up the policy the account published on-chain for
//! the requesting signer, simulates the transaction, matches the
//! resulting call trace against the policy, and co-signs only when no
//! rule is violated.
//!
//! ## Modules
//!
//! - [`provider`] - Chain data providers (events and trace simulation)
//! - [`verifier`] - The verification pipeline
//! - [`server`] - HTTP surface
//! - [`logging`] - Logging initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod logging;
pub mod provider;
pub mod server;
pub mod verifier;

pub use provider::{EventProvider, RpcProvider, TraceProvider};
pub use verifier::Verifier;
