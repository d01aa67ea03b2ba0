//! Hashing helpers.
//!
//! Two device-secret derivations exist on the backend side: a static secret
//! (`device_id` + salt) and a time-bound request signature (`device_id` +
//! timestamp + salt). Both are exposed; neither is attached to requests by the
//! pipeline.

use sha2::{Digest, Sha256};

/// SHA-256 digest of `data`.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Lowercase hex SHA-256 digest of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// SHA-256 over the concatenation of `parts`.
#[must_use]
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Static device secret: `hex(SHA-256(device_id || salt))`.
#[must_use]
#[uniffi::export]
pub fn derive_device_secret(device_id: &str, salt: &str) -> String {
    hex::encode(sha256_concat(&[device_id.as_bytes(), salt.as_bytes()]))
}

/// Time-bound device signature: `hex(SHA-256(device_id || ":" || timestamp || ":" || salt))`.
///
/// The separator keeps `("ab", 1)` and `("a", b1)` style inputs from colliding.
#[must_use]
#[uniffi::export]
pub fn device_signature(device_id: &str, timestamp: u64, salt: &str) -> String {
    let timestamp = timestamp.to_string();
    hex::encode(sha256_concat(&[
        device_id.as_bytes(),
        b":",
        timestamp.as_bytes(),
        b":",
        salt.as_bytes(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"", "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855" ; "empty input")]
    #[test_case(b"abc", "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad" ; "abc")]
    fn test_sha256_known_digests(input: &[u8], expected: &str) {
        assert_eq!(sha256_hex(input), expected);
    }

    #[test]
    fn test_concat_matches_single_digest() {
        assert_eq!(sha256_concat(&[b"a", b"bc"]), sha256(b"abc"));
    }

    #[test]
    fn test_device_signature_is_deterministic() {
        let first = device_signature("DEVICE-1", 1_700_000_000, "salt");
        let second = device_signature("DEVICE-1", 1_700_000_000, "salt");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_device_signature_changes_with_each_input() {
        let base = device_signature("DEVICE-1", 1_700_000_000, "salt");
        assert_ne!(base, device_signature("DEVICE-2", 1_700_000_000, "salt"));
        assert_ne!(base, device_signature("DEVICE-1", 1_700_000_001, "salt"));
        assert_ne!(base, device_signature("DEVICE-1", 1_700_000_000, "pepper"));
    }

    #[test]
    fn test_device_secret() {
        assert_eq!(
            derive_device_secret("DEVICE-1", "salt"),
            derive_device_secret("DEVICE-1", "salt")
        );
        assert_ne!(
            derive_device_secret("DEVICE-1", "salt"),
            derive_device_secret("DEVICE-1", "salt2")
        );
        assert_eq!(derive_device_secret("", ""), sha256_hex(b""));
    }
}
