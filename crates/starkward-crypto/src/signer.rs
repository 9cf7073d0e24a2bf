//! Guardian co-signing.
//!
//! The guardian key is loaded once at process start and held in
//! zeroizing memory for the process lifetime; there is no rotation
//! logic. Signing is deterministic (RFC 6979 nonces), so the same
//! approved transaction always yields the same `(r, s)` pair.

use std::fmt;

use starknet_core::crypto::ecdsa_sign;
use starknet_core::types::Felt;
use starknet_crypto::get_public_key;
use zeroize::Zeroizing;

use starkward_core::error::{SignError, SignResult};
use starkward_core::felt::parse_felt;
use starkward_core::types::{GuardianSignature, Transaction};

use crate::hash::transaction_hash;

/// Signs transaction hashes with the guardian's Stark-curve private
/// key.
///
/// Constructed once at startup and shared (behind an `Arc`) by every
/// in-flight request; signing takes `&self` and holds no interior
/// mutability.
pub struct GuardianSigner {
    /// Big-endian scalar bytes, zeroized on drop.
    secret: Zeroizing<[u8; 32]>,
}

impl GuardianSigner {
    /// Build a signer from a private key given as a numeric felt string
    /// (hex or decimal).
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the string is not a field
    /// element or is zero.
    pub fn from_key_str(key: &str) -> SignResult<Self> {
        let felt = parse_felt(key).map_err(|_| SignError::InvalidKey)?;
        if felt == Felt::ZERO {
            return Err(SignError::InvalidKey);
        }
        Ok(Self {
            secret: Zeroizing::new(felt.to_bytes_be()),
        })
    }

    fn secret_scalar(&self) -> Felt {
        Felt::from_bytes_be(&self.secret)
    }

    /// The guardian's public key on the Stark curve.
    #[must_use]
    pub fn public_key(&self) -> Felt {
        get_public_key(&self.secret_scalar())
    }

    /// Recompute the canonical hash of `tx` under `chain_id` and sign
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`SignError`] if a transaction field is not a valid
    /// field element or the curve operation fails.
    pub fn sign_transaction(
        &self,
        tx: &Transaction,
        chain_id: Felt,
    ) -> SignResult<GuardianSignature> {
        let hash = transaction_hash(tx, chain_id)?;
        self.sign_hash(&hash)
    }

    /// Sign a precomputed transaction hash.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::SignatureFailed`] if the curve operation
    /// rejects the input.
    pub fn sign_hash(&self, hash: &Felt) -> SignResult<GuardianSignature> {
        let signature = ecdsa_sign(&self.secret_scalar(), hash)
            .map_err(|e| SignError::signature_failed(e.to_string()))?;
        Ok(GuardianSignature {
            r: format!("{:#x}", signature.r),
            s: format!("{:#x}", signature.s),
        })
    }
}

impl fmt::Debug for GuardianSigner {
    // Key material never reaches logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardianSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
