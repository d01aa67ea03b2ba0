//! Pinning, hashing and push token checks through the public API.

use cutie_core::crypto::{derive_device_secret, device_signature, sha256_hex};
use cutie_core::pinning::{PinningGuard, PINNED_SPKI_HASHES};
use cutie_core::push::validate_push_token;

#[test]
fn test_default_guard_scope() {
    let guard = PinningGuard::default();
    assert!(guard.requires_pinning("api.cuti-e.com"));
    assert!(guard.requires_pinning("CUTI-E.COM"));
    assert!(!guard.requires_pinning("cuti-e.com.attacker.com"));
    assert!(!guard.requires_pinning("evil.com"));
    assert!(!guard.validate_chain(&[], true));
    for pin in PINNED_SPKI_HASHES {
        assert!(guard.is_pinned(pin));
    }
}

#[test]
fn test_hashing_vectors() {
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        device_signature("DEVICE", 1_700_000_000, "salt"),
        device_signature("DEVICE", 1_700_000_000, "salt")
    );
    assert_ne!(
        derive_device_secret("DEVICE", "salt"),
        device_signature("DEVICE", 0, "salt")
    );
}

#[test]
fn test_push_token_validation_is_exported() {
    assert!(validate_push_token(&"ab".repeat(32)).is_ok());
    assert!(validate_push_token("zz").is_err());
}
