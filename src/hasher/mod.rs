use serde_json::Value;
use sha2::{Digest, Sha256};

/// `previous_hash` value of a block with no predecessor (the genesis block).
pub const NO_PREDECESSOR: &str = "0";

/// Compute the canonical SHA-256 digest of a block's fields.
///
/// The preimage is assembled in one fixed order that every caller (sealing,
/// mining and validation alike) must reproduce exactly:
/// `index:timestamp:payload:previous_hash:nonce`, with the payload rendered
/// as compact JSON (deterministic for [`Value`], whose object keys are kept
/// sorted). Output is 64 lowercase hex characters.
pub fn digest(
    index: u64,
    timestamp: i64,
    payload: &Value,
    previous_hash: &str,
    nonce: u64,
) -> String {
    let payload_json = payload.to_string();
    let preimage = format!("{index}:{timestamp}:{payload_json}:{previous_hash}:{nonce}");
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::digest;
    use serde_json::json;

    #[test]
    fn digest_is_deterministic() {
        let a = digest(1, 1_700_000_000, &json!({"amount": 10}), "0", 42);
        let b = digest(1, 1_700_000_000, &json!({"amount": 10}), "0", 42);
        assert_eq!(a, b);
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let h = digest(0, 0, &json!("Genesis Block"), "0", 0);
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn field_order_is_part_of_the_contract() {
        // Swapping index and nonce must change the digest.
        let a = digest(1, 7, &json!("x"), "0", 3);
        let b = digest(3, 7, &json!("x"), "0", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn any_field_change_moves_the_digest() {
        let base = digest(2, 9, &json!("payload"), "abc", 5);
        assert_ne!(base, digest(3, 9, &json!("payload"), "abc", 5));
        assert_ne!(base, digest(2, 10, &json!("payload"), "abc", 5));
        assert_ne!(base, digest(2, 9, &json!("payload!"), "abc", 5));
        assert_ne!(base, digest(2, 9, &json!("payload"), "abd", 5));
        assert_ne!(base, digest(2, 9, &json!("payload"), "abc", 6));
    }
}
