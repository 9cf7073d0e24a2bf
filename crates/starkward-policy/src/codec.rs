//! Policy transport codec.
//!
//! A policy travels on-chain inside a policy-set event as base64 of its
//! JSON document, split into 31-byte chunks (the maximum payload of one
//! felt-packed Cairo short string), each chunk encoded as a field
//! element.
//!
//! [`decode_policy`] and [`encode_policy`] are exact inverses for any
//! well-formed policy sequence:
//!
//! ```
//! use starkward_core::types::Policy;
//! use starkward_policy::codec::{decode_policy, encode_policy};
//!
//! let policy = vec![Policy {
//!     address: "0x49d3".to_string(),
//!     amount: Some("1000".to_string()),
//!     ids: None,
//!     allowlist: None,
//! }];
//! let encoded = encode_policy(&policy).unwrap();
//! assert_eq!(decode_policy(&encoded.felt_encoded).unwrap(), policy);
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use starknet_core::utils::{cairo_short_string_to_felt, parse_cairo_short_string};

use starkward_core::error::{CodecError, CodecResult};
use starkward_core::felt::parse_felt;
use starkward_core::types::{EncodedPolicy, Policy};

/// Maximum payload width of one felt-packed Cairo short string, in
/// bytes.
pub const SHORT_STRING_WIDTH: usize = 31;

/// Decode a policy sequence from its on-chain chunked transport form.
///
/// Each chunk is a felt numeric string (hex or decimal); chunks are
/// unpacked as Cairo short strings, concatenated in order,
/// base64-decoded, and parsed as JSON.
///
/// # Errors
///
/// Returns [`CodecError`] if any chunk is not a field element or short
/// string, or if the joined payload is not valid base64 / UTF-8 / JSON.
pub fn decode_policy(chunks: &[String]) -> CodecResult<Vec<Policy>> {
    let mut joined = String::with_capacity(chunks.len() * SHORT_STRING_WIDTH);
    for chunk in chunks {
        let felt = parse_felt(chunk)?;
        let text = parse_cairo_short_string(&felt)
            .map_err(|e| CodecError::short_string(format!("{chunk}: {e}")))?;
        joined.push_str(&text);
    }

    let bytes = BASE64
        .decode(joined.as_bytes())
        .map_err(|_| CodecError::InvalidBase64)?;
    let text = String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
    serde_json::from_str(&text).map_err(|e| CodecError::invalid_json(e.to_string()))
}

/// Encode a policy sequence into its on-chain transport form.
///
/// Serializes to JSON, base64-encodes, splits into
/// [`SHORT_STRING_WIDTH`]-byte chunks, and packs each chunk as a hex
/// felt string.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails or a chunk cannot be
/// felt-packed (cannot happen for base64 output, kept as an invariant
/// check).
pub fn encode_policy(policies: &[Policy]) -> CodecResult<EncodedPolicy> {
    let json =
        serde_json::to_string(policies).map_err(|e| CodecError::invalid_json(e.to_string()))?;
    let base64 = BASE64.encode(json.as_bytes());

    let felt_encoded = base64
        .as_bytes()
        .chunks(SHORT_STRING_WIDTH)
        .map(|chunk| {
            // base64 output is pure ASCII, so the chunk is valid UTF-8.
            let text = std::str::from_utf8(chunk).map_err(|_| CodecError::InvalidUtf8)?;
            let felt = cairo_short_string_to_felt(text)
                .map_err(|e| CodecError::chunk_too_wide(format!("{text}: {e}")))?;
            Ok(format!("{felt:#x}"))
        })
        .collect::<CodecResult<Vec<_>>>()?;

    Ok(EncodedPolicy {
        base64,
        felt_encoded,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
