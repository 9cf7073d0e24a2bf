//! Error types for the Starkward guardian service.
//!
//! This module provides the error taxonomy for all failure modes in the
//! system, organized by domain:
//!
//! - [`FeltParseError`] - Numeric field-element parsing failures
//! - [`CodecError`] - On-chain policy payload decoding failures
//! - [`ProviderError`] - Remote RPC provider failures
//! - [`SignError`] - Guardian hashing/signing failures
//! - [`ConfigError`] - Process configuration failures
//! - [`VerifyError`] - Top-level error surfaced by the verification
//!   orchestrator, wrapping the domain errors
//!
//! Every error is terminal for the request that produced it: nothing is
//! retried internally and the orchestrator surfaces errors unchanged to
//! its caller, which maps them to a client-visible status.
//!
//! # Example
//!
//! ```rust
//! use starkward_core::error::{CodecError, VerifyError};
//!
//! fn decode(payload: &[u8]) -> Result<(), VerifyError> {
//!     if payload.is_empty() {
//!         return Err(CodecError::invalid_json("empty policy payload").into());
//!     }
//!     Ok(())
//! }
//! ```

use crate::types::Violation;

// ============================================================================
// FeltParseError
// ============================================================================

/// Error parsing a numeric field-element string.
///
/// Felt strings arrive either as `0x`-prefixed hex or as decimal text;
/// anything else (or anything exceeding 256 bits) fails with this error.
#[derive(Debug, thiserror::Error)]
pub enum FeltParseError {
    /// The string is not a valid decimal or hex field element.
    #[error("invalid field element: {value}")]
    InvalidNumeric {
        /// The string that failed to parse.
        value: String,
    },
}

impl FeltParseError {
    /// Create an `InvalidNumeric` error.
    #[must_use]
    pub fn invalid_numeric(value: impl Into<String>) -> Self {
        Self::InvalidNumeric {
            value: value.into(),
        }
    }
}

// ============================================================================
// CodecError
// ============================================================================

/// Errors raised while decoding or encoding an on-chain policy payload.
///
/// A policy travels on-chain as base64-of-JSON split into felt-packed
/// 31-byte short-string chunks; every stage of that pipeline has a
/// dedicated failure variant.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A chunk is not a valid field element.
    #[error("policy chunk is not a field element: {0}")]
    Felt(#[from] FeltParseError),

    /// A chunk could not be unpacked as a Cairo short string.
    #[error("policy chunk is not a short string: {context}")]
    ShortString {
        /// Context about the offending chunk.
        context: String,
    },

    /// The joined chunks are not valid base64.
    #[error("policy payload is not valid base64")]
    InvalidBase64,

    /// The decoded payload is not valid UTF-8.
    #[error("policy payload is not valid UTF-8")]
    InvalidUtf8,

    /// The decoded payload is not a valid policy JSON document.
    #[error("policy payload is not valid JSON: {context}")]
    InvalidJson {
        /// Context from the JSON parser.
        context: String,
    },

    /// A chunk produced during encoding exceeds the 31-byte felt width.
    #[error("policy chunk exceeds short string width: {context}")]
    ChunkTooWide {
        /// Context about the offending chunk.
        context: String,
    },
}

impl CodecError {
    /// Create a `ShortString` error with context.
    #[must_use]
    pub fn short_string(context: impl Into<String>) -> Self {
        Self::ShortString {
            context: context.into(),
        }
    }

    /// Create an `InvalidJson` error with context.
    #[must_use]
    pub fn invalid_json(context: impl Into<String>) -> Self {
        Self::InvalidJson {
            context: context.into(),
        }
    }

    /// Create a `ChunkTooWide` error with context.
    #[must_use]
    pub fn chunk_too_wide(context: impl Into<String>) -> Self {
        Self::ChunkTooWide {
            context: context.into(),
        }
    }
}

// ============================================================================
// ProviderError
// ============================================================================

/// Errors raised by the remote trace and event providers.
///
/// The orchestrator maps these onto [`VerifyError::ProviderUnavailable`]
/// or [`VerifyError::Simulation`] depending on which provider failed.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider endpoint could not be reached.
    #[error("provider unreachable: {context}")]
    Unavailable {
        /// Transport-level context.
        context: String,
    },

    /// The provider reached the endpoint but rejected the request.
    #[error("provider rejected request: {context}")]
    Rejected {
        /// The provider's error message.
        context: String,
    },

    /// The provider responded with a shape the engine does not accept.
    ///
    /// Malformed traces are never passed through silently; they fail the
    /// request here, at the boundary.
    #[error("malformed provider response: {context}")]
    MalformedResponse {
        /// Context about the unexpected shape.
        context: String,
    },
}

impl ProviderError {
    /// Create an `Unavailable` error with context.
    #[must_use]
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::Unavailable {
            context: context.into(),
        }
    }

    /// Create a `Rejected` error with context.
    #[must_use]
    pub fn rejected(context: impl Into<String>) -> Self {
        Self::Rejected {
            context: context.into(),
        }
    }

    /// Create a `MalformedResponse` error with context.
    #[must_use]
    pub fn malformed_response(context: impl Into<String>) -> Self {
        Self::MalformedResponse {
            context: context.into(),
        }
    }
}

// ============================================================================
// SignError
// ============================================================================

/// Errors raised while hashing or signing a transaction.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The guardian key material is not a valid curve scalar.
    #[error("invalid guardian key material")]
    InvalidKey,

    /// A transaction field is not a valid field element.
    #[error("invalid transaction field {field}: {value}")]
    InvalidField {
        /// The transaction field name.
        field: String,
        /// The offending value.
        value: String,
    },

    /// The ECDSA signing operation itself failed.
    #[error("signature failed: {context}")]
    SignatureFailed {
        /// Context from the curve implementation.
        context: String,
    },
}

impl SignError {
    /// Create an `InvalidField` error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a `SignatureFailed` error with context.
    #[must_use]
    pub fn signature_failed(context: impl Into<String>) -> Self {
        Self::SignatureFailed {
            context: context.into(),
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur while loading process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingVar {
        /// The variable name.
        name: String,
    },

    /// A configuration value is invalid.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// The variable name.
        name: String,
        /// The invalid value.
        value: String,
    },

    /// The configured network is not one the service knows.
    #[error("unknown network: {value}")]
    UnknownNetwork {
        /// The unrecognized network selector.
        value: String,
    },
}

impl ConfigError {
    /// Create a `MissingVar` error.
    #[must_use]
    pub fn missing_var(name: impl Into<String>) -> Self {
        Self::MissingVar { name: name.into() }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// VerifyError
// ============================================================================

/// Top-level error surfaced by the verification orchestrator.
///
/// A verification request yields exactly one signature or exactly one
/// `VerifyError`; there is no partial signing.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The account has never had a policy set on-chain.
    #[error("account {account} does not have any policy set onchain")]
    PolicyNotFound {
        /// The account that was queried.
        account: String,
    },

    /// Policies exist for the account, but none match this signer.
    #[error("account does not have a policy set onchain for signer {signer}")]
    SignerPolicyNotFound {
        /// The signer that was requested.
        signer: String,
    },

    /// The on-chain policy payload could not be decoded.
    #[error("policy decoding failed: {0}")]
    Codec(#[from] CodecError),

    /// The event provider could not be reached.
    #[error("event provider unavailable: {context}")]
    ProviderUnavailable {
        /// Transport-level context.
        context: String,
    },

    /// The trace simulation request failed or was rejected.
    #[error("transaction simulation failed: {context}")]
    Simulation {
        /// Context from the trace provider.
        context: String,
    },

    /// The policy was evaluated and one or more events are disallowed.
    #[error("{count} event(s) found that does not respect the policy")]
    PolicyViolation {
        /// Number of violating events.
        count: usize,
        /// The violations themselves.
        violations: Vec<Violation>,
    },

    /// A request-supplied policy failed structural validation.
    ///
    /// Enforced at the API boundary only; the matching engine assumes
    /// well-formed policies.
    #[error("policy malformed: {context}")]
    MalformedPolicy {
        /// Context about the structural failure.
        context: String,
    },

    /// Guardian hashing or signing failed.
    #[error("guardian signing failed: {0}")]
    Sign(#[from] SignError),
}

impl VerifyError {
    /// Create a `PolicyNotFound` error.
    #[must_use]
    pub fn policy_not_found(account: impl Into<String>) -> Self {
        Self::PolicyNotFound {
            account: account.into(),
        }
    }

    /// Create a `SignerPolicyNotFound` error.
    #[must_use]
    pub fn signer_policy_not_found(signer: impl Into<String>) -> Self {
        Self::SignerPolicyNotFound {
            signer: signer.into(),
        }
    }

    /// Create a `ProviderUnavailable` error with context.
    #[must_use]
    pub fn provider_unavailable(context: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            context: context.into(),
        }
    }

    /// Create a `Simulation` error with context.
    #[must_use]
    pub fn simulation(context: impl Into<String>) -> Self {
        Self::Simulation {
            context: context.into(),
        }
    }

    /// Create a `PolicyViolation` error from the collected violations.
    #[must_use]
    pub fn policy_violation(violations: Vec<Violation>) -> Self {
        Self::PolicyViolation {
            count: violations.len(),
            violations,
        }
    }

    /// Create a `MalformedPolicy` error with context.
    #[must_use]
    pub fn malformed_policy(context: impl Into<String>) -> Self {
        Self::MalformedPolicy {
            context: context.into(),
        }
    }

    /// Returns `true` if this error is a policy violation (as opposed to
    /// an operational failure).
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. })
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// A `Result` alias using [`VerifyError`] as the error type.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// A `Result` alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// A `Result` alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// A `Result` alias for signing operations.
pub type SignResult<T> = std::result::Result<T, SignError>;

/// A `Result` alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Unit Tests
// ============================================================================
