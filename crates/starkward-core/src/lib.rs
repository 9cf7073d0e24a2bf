//! # starkward-core
//!
//! Core types, errors, and configuration for the Starkward guardian
//! service.
//!
//! ## Internal Crate Warning
//!
//! **This crate is an internal implementation detail of `starkward`.**
//! The API is unstable and may change without notice between any
//! versions, including patch releases. Do not depend on this crate
//! directly.
//!
//! This crate provides the foundation shared across all Starkward
//! crates:
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and result aliases
//! - [`types`] - Core data model ([`Policy`], [`Transaction`],
//!   [`InvocationNode`], [`Violation`])
//! - [`felt`] - Numeric field-element string parsing
//! - [`config`] - Process configuration loaded once at startup
//!
//! ## Error Handling
//!
//! ```rust
//! use starkward_core::error::{VerifyError, CodecError};
//!
//! fn resolve(events: &[String]) -> Result<(), VerifyError> {
//!     if events.is_empty() {
//!         return Err(VerifyError::policy_not_found("0xabc"));
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod felt;
pub mod types;

// Re-export commonly used items at the crate root for convenience
pub use config::{Config, Network};
pub use error::{
    CodecError, ConfigError, FeltParseError, ProviderError, Result, SignError, VerifyError,
};
pub use types::{
    EmittedEvent, EncodedPolicy, GuardianSignature, InvocationNode, Policy, PolicySetEvent,
    SignerPolicies, Transaction, TransferRecord, Violation,
};

// Re-export U256 for working with amounts, and Felt for hashing
pub use alloy_primitives::U256;
pub use starknet_core::types::Felt;
