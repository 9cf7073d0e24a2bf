//! Chain address normalization.
//!
//! Starknet addresses circulate in two spellings: zero-padded to the
//! full field-element width (`0x049d36...`) and compact (`0x49d36...`).
//! Policies and accounts arrive in either form; traces report the
//! compact form. Matching therefore normalizes only the policy/account
//! side and compares against trace addresses as supplied.

/// Canonicalize a chain address so padded and compact forms compare
/// equal.
///
/// Strips the zero padding after the `0x` prefix. Idempotent, pure.
/// Non-`0x` input is returned unchanged. The all-zero address
/// canonicalizes to `0x0`.
///
/// # Examples
///
/// ```
/// use starkward_policy::address::normalize;
///
/// assert_eq!(normalize("0x0abc"), "0xabc");
/// assert_eq!(normalize("0xabc"), "0xabc");
/// assert_eq!(normalize(&normalize("0x00abc")), normalize("0x00abc"));
/// ```
#[must_use]
pub fn normalize(address: &str) -> String {
    let Some(rest) = address.strip_prefix("0x") else {
        return address.to_string();
    };
    let compact = rest.trim_start_matches('0');
    if compact.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{compact}")
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_leading_zero_padding() {
        assert_eq!(
            normalize("0x072df4dc5b6c4df72e4288857317caf2ce9da166ab8719ab8306516a2fddfff7"),
            "0x72df4dc5b6c4df72e4288857317caf2ce9da166ab8719ab8306516a2fddfff7"
        );
    }

    #[test]
    fn padded_and_compact_forms_compare_equal() {
        assert_eq!(normalize("0x0abc"), normalize("0xabc"));
        assert_eq!(normalize("0x000abc"), normalize("0xabc"));
    }

    #[test]
    fn is_idempotent() {
        for addr in ["0x0abc", "0x00abc", "0xabc", "0x0", "plain"] {
            assert_eq!(normalize(&normalize(addr)), normalize(addr));
        }
    }

    #[test]
    fn zero_address_stays_representable() {
        assert_eq!(normalize("0x0"), "0x0");
        assert_eq!(normalize("0x0000"), "0x0");
    }

    #[test]
    fn non_prefixed_input_unchanged() {
        assert_eq!(normalize("123abc"), "123abc");
    }
}
