//! Numeric field-element string helpers.
//!
//! Chain data arrives as numeric strings in two spellings: `0x` hex and
//! plain decimal. Everything that compares amounts or identifiers goes
//! through [`parse_uint`] so the two spellings compare equal, and
//! everything handed to the chain goes through [`to_decimal`] so the
//! RPC node only ever sees felt decimal form.
//!
//! All comparisons use 256-bit integers; calldata values are at most
//! 252-bit field elements, so nothing truncates. No floating point
//! anywhere.

use alloy_primitives::U256;
use starknet_core::types::Felt;

use crate::error::FeltParseError;

/// Parse a numeric felt string (decimal or `0x` hex) into a [`U256`].
///
/// # Errors
///
/// Returns [`FeltParseError::InvalidNumeric`] if the string is empty or
/// not a valid number in either spelling.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use starkward_core::felt::parse_uint;
///
/// assert_eq!(parse_uint("0x1000").unwrap(), U256::from(4096u64));
/// assert_eq!(parse_uint("4096").unwrap(), U256::from(4096u64));
/// ```
pub fn parse_uint(value: &str) -> Result<U256, FeltParseError> {
    let trimmed = value.trim();
    let parsed = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        U256::from_str_radix(hex, 16)
    } else {
        U256::from_str_radix(trimmed, 10)
    };
    parsed.map_err(|_| FeltParseError::invalid_numeric(value))
}

/// Parse a numeric felt string (decimal or `0x` hex) into a [`Felt`].
///
/// # Errors
///
/// Returns [`FeltParseError::InvalidNumeric`] if the string is not a
/// valid field element in either spelling.
pub fn parse_felt(value: &str) -> Result<Felt, FeltParseError> {
    let trimmed = value.trim();
    let parsed = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        Felt::from_hex(trimmed)
    } else {
        Felt::from_dec_str(trimmed)
    };
    parsed.map_err(|_| FeltParseError::invalid_numeric(value))
}

/// Convert a numeric felt string into canonical felt decimal form.
///
/// Hex input becomes decimal; decimal input is validated and returned
/// in canonical form. Used to sanitize transaction calldata before it
/// is handed to the trace provider, which only accepts felt decimal
/// strings.
///
/// # Errors
///
/// Returns [`FeltParseError::InvalidNumeric`] for non-numeric input.
pub fn to_decimal(value: &str) -> Result<String, FeltParseError> {
    Ok(parse_uint(value)?.to_string())
}

/// Sanitize a calldata array into felt decimal form, element by element.
///
/// # Errors
///
/// Returns [`FeltParseError::InvalidNumeric`] on the first non-numeric
/// element.
pub fn sanitize_calldata(calldata: &[String]) -> Result<Vec<String>, FeltParseError> {
    calldata.iter().map(|word| to_decimal(word)).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_decimal_equally() {
        assert_eq!(parse_uint("0x38d7ea4c68000").unwrap(), parse_uint("1000000000000000").unwrap());
    }

    #[test]
    fn parses_full_width_field_elements() {
        // A 252-bit address-sized value.
        let value = "0x72df4dc5b6c4df72e4288857317caf2ce9da166ab8719ab8306516a2fddfff7";
        assert!(parse_uint(value).is_ok());
        assert!(parse_felt(value).is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_uint("").is_err());
        assert!(parse_uint("0x").is_err());
        assert!(parse_uint("wagmi").is_err());
        assert!(parse_felt("0xzz").is_err());
    }

    #[test]
    fn to_decimal_normalizes_hex() {
        assert_eq!(to_decimal("0x1000").unwrap(), "4096");
        assert_eq!(to_decimal("4096").unwrap(), "4096");
    }

    #[test]
    fn sanitize_calldata_converts_every_word() {
        let calldata = vec!["0x1".to_string(), "0x1000".to_string(), "3".to_string()];
        assert_eq!(sanitize_calldata(&calldata).unwrap(), vec!["1", "4096", "3"]);
    }

    #[test]
    fn sanitize_calldata_fails_on_first_bad_word() {
        let calldata = vec!["0x1".to_string(), "not-a-felt".to_string()];
        assert!(sanitize_calldata(&calldata).is_err());
    }
}
