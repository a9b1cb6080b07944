//! Record identifiers.
//!
//! Ids are 24-character lowercase hex strings: a 4-byte big-endian unix
//! timestamp followed by 8 random bytes. The syntax is compatible with the
//! ids the dashboard client already stores, so `507f1f77bcf86cd799439011`
//! is well-formed and `invalid-id` is not.

use chrono::Utc;
use rand::RngCore;

/// Generates a fresh object id.
pub fn generate() -> String {
    let mut bytes = [0u8; 12];
    let timestamp = Utc::now().timestamp() as u32;
    bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
    rand::thread_rng().fill_bytes(&mut bytes[4..]);
    hex::encode(bytes)
}

/// Checks the object id syntax: exactly 24 hex digits.
pub fn is_valid(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid_and_unique() {
        let a = generate();
        let b = generate();
        assert!(is_valid(&a));
        assert!(is_valid(&b));
        assert_ne!(a, b);
        assert_eq!(a.len(), 24);
    }

    #[test]
    fn validates_syntax() {
        assert!(is_valid("507f1f77bcf86cd799439011"));
        assert!(is_valid("507F1F77BCF86CD799439011"));
        assert!(!is_valid("invalid-id"));
        assert!(!is_valid("507f1f77bcf86cd79943901")); // 23 chars
        assert!(!is_valid("507f1f77bcf86cd7994390111")); // 25 chars
        assert!(!is_valid("507f1f77bcf86cd79943901g")); // non-hex
        assert!(!is_valid(""));
    }
}
