//! TLS certificate pinning for the CutiE API hosts.
//!
//! Pins are SHA-256 hashes of a certificate's DER `SubjectPublicKeyInfo`,
//! base64 encoded (the HPKP `pin-sha256` format). The hash is rebuilt from the
//! raw public key bits plus the fixed ASN.1 header for the key type, so only the
//! key types listed in [`PinnedKeyType`] can ever match. Anything else fails
//! closed.
//!
//! To regenerate a pin:
//! ```bash
//! openssl s_client -connect api.cuti-e.com:443 -showcerts </dev/null | \
//!   openssl x509 -pubkey -noout | \
//!   openssl pkey -pubin -outform DER | openssl dgst -sha256 -binary | base64
//! ```

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine};
use der::{asn1::ObjectIdentifier, Decode};
use rustls::pki_types::CertificateDer;
use x509_cert::{spki::SubjectPublicKeyInfoOwned, Certificate};

use crate::crypto::sha256_concat;

mod verifier;

pub use verifier::{build_pinned_client, PinnedCertVerifier};

#[cfg(test)]
mod fixtures;

/// Hosts whose connections must present a pinned key. Subdomains are included.
pub const PINNED_HOSTS: &[&str] = &["cuti-e.com", "cuti-e.dev"];

/// Trusted CA keys.
pub const PINNED_SPKI_HASHES: &[&str] = &[
    // ISRG Root X1 (RSA 4096), expires 2035-06-04
    "C5+lpZ7tcVwmwQIMcRtPbsQtWLABXhQzejna0wHFr8M=",
    // ISRG Root X2 (ECDSA P-384), expires 2040-09-17
    "diGVwiVYbubAI3RW4hB9xU8e/CH2GnkuvVFZE8zmgzI=",
    // GTS Root R1 (RSA 4096), expires 2036-06-22
    "hxqRlPTu1bMS/0DITB1SSu0vd4u/8l8TjPgfaAp63Gc=",
    // DigiCert Global Root G2 (RSA 2048), expires 2038-01-15
    "i7WTqTvh0OioIruIfFR4kMPnBqrS2rdiVPl/s2uC/CY=",
    // Amazon Root CA 1 (RSA 2048), expires 2038-01-17
    "++MBgDH5WGvL9Bcn5Be30cRcL0f5O+NyoXuWtQdX1aI=",
];

/// Earliest hard expiry among [`PINNED_SPKI_HASHES`] (ISRG Root X1), unix seconds.
pub const PIN_SET_EXPIRES_AT: u64 = 2_064_567_878;

/// Below this many days left, expiry checks start warning.
pub const EXPIRY_WARNING_DAYS: i64 = 365;

const SECONDS_PER_DAY: i64 = 86_400;

const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

const RSA_2048_HEADER: [u8; 24] = [
    0x30, 0x82, 0x01, 0x22, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01,
    0x01, 0x01, 0x05, 0x00, 0x03, 0x82, 0x01, 0x0f, 0x00,
];
const RSA_4096_HEADER: [u8; 24] = [
    0x30, 0x82, 0x02, 0x22, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01,
    0x01, 0x01, 0x05, 0x00, 0x03, 0x82, 0x02, 0x0f, 0x00,
];
const EC_P256_HEADER: [u8; 26] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08,
    0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00,
];
const EC_P384_HEADER: [u8; 23] = [
    0x30, 0x76, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x22, 0x03, 0x62, 0x00,
];

/// Public key types that can take part in pinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinnedKeyType {
    /// RSA with a 2048-bit modulus and exponent 65537.
    Rsa2048,
    /// RSA with a 4096-bit modulus and exponent 65537.
    Rsa4096,
    /// ECDSA on NIST P-256.
    EcP256,
    /// ECDSA on NIST P-384.
    EcP384,
}

impl PinnedKeyType {
    /// Identifies the key type of `spki`. The raw key length must match the
    /// length baked into the header, otherwise the rebuilt SPKI would differ.
    #[must_use]
    pub fn classify(spki: &SubjectPublicKeyInfoOwned) -> Option<Self> {
        let key_len = spki.subject_public_key.raw_bytes().len();
        let oid = spki.algorithm.oid;

        if oid == RSA_ENCRYPTION {
            return match key_len {
                270 => Some(Self::Rsa2048),
                526 => Some(Self::Rsa4096),
                _ => None,
            };
        }

        if oid == EC_PUBLIC_KEY {
            let curve = spki
                .algorithm
                .parameters
                .as_ref()?
                .decode_as::<ObjectIdentifier>()
                .ok()?;
            return match (curve, key_len) {
                (c, 65) if c == SECP256R1 => Some(Self::EcP256),
                (c, 97) if c == SECP384R1 => Some(Self::EcP384),
                _ => None,
            };
        }

        None
    }

    /// DER `SubjectPublicKeyInfo` prefix for this key type.
    #[must_use]
    pub const fn spki_header(self) -> &'static [u8] {
        match self {
            Self::Rsa2048 => &RSA_2048_HEADER,
            Self::Rsa4096 => &RSA_4096_HEADER,
            Self::EcP256 => &EC_P256_HEADER,
            Self::EcP384 => &EC_P384_HEADER,
        }
    }
}

/// Pin hash of a parsed `SubjectPublicKeyInfo`, or `None` for unsupported keys.
#[must_use]
pub fn spki_info_hash(spki: &SubjectPublicKeyInfoOwned) -> Option<String> {
    let key_type = PinnedKeyType::classify(spki)?;
    let digest = sha256_concat(&[key_type.spki_header(), spki.subject_public_key.raw_bytes()]);
    Some(STANDARD.encode(digest))
}

/// Pin hash of a DER certificate, or `None` if it cannot be parsed or its key
/// type is unsupported.
#[must_use]
pub fn spki_hash(cert_der: &[u8]) -> Option<String> {
    let cert = match Certificate::from_der(cert_der) {
        Ok(cert) => cert,
        Err(e) => {
            log::debug!("Failed to parse certificate for pinning: {e}");
            return None;
        }
    };
    spki_info_hash(&cert.tbs_certificate.subject_public_key_info)
}

/// Decides whether a TLS server trust is acceptable for the pinned hosts.
#[derive(Debug, Clone)]
pub struct PinningGuard {
    hosts: Vec<String>,
    pins: HashSet<String>,
    expires_at: u64,
}

impl Default for PinningGuard {
    fn default() -> Self {
        Self::new(PINNED_HOSTS, PINNED_SPKI_HASHES, PIN_SET_EXPIRES_AT)
    }
}

impl PinningGuard {
    /// Creates a guard for `hosts`, trusting keys whose pin is in `pins`.
    #[must_use]
    pub fn new(hosts: &[&str], pins: &[&str], expires_at: u64) -> Self {
        Self {
            hosts: hosts.iter().map(|h| h.to_ascii_lowercase()).collect(),
            pins: pins.iter().map(ToString::to_string).collect(),
            expires_at,
        }
    }

    /// True iff `host` is one of the pinned hosts or a subdomain of one.
    #[must_use]
    pub fn requires_pinning(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }
        self.hosts.iter().any(|pinned| {
            host == *pinned
                || host
                    .strip_suffix(pinned.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1)
        })
    }

    /// True iff `pin` is in the pinned set.
    #[must_use]
    pub fn is_pinned(&self, pin: &str) -> bool {
        self.pins.contains(pin)
    }

    /// Accepts the chain only if default validation passed and at least one
    /// certificate carries a pinned key.
    #[must_use]
    pub fn validate_chain(&self, chain: &[CertificateDer<'_>], default_trust_passed: bool) -> bool {
        if !default_trust_passed || chain.is_empty() {
            return false;
        }
        chain
            .iter()
            .filter_map(|cert| spki_hash(cert.as_ref()))
            .any(|pin| self.is_pinned(&pin))
    }

    /// Days until the pin set's hard expiry at `now` (unix seconds). Negative once expired.
    #[must_use]
    pub fn days_until_expiry_at(&self, now: u64) -> i64 {
        let expires_at = i64::try_from(self.expires_at).unwrap_or(i64::MAX);
        let now = i64::try_from(now).unwrap_or(i64::MAX);
        (expires_at - now).div_euclid(SECONDS_PER_DAY)
    }

    /// Days until the pin set's hard expiry.
    #[must_use]
    pub fn days_until_expiry(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        self.days_until_expiry_at(now)
    }

    /// Logs when the pin set is close to, or past, its expiry. Never fails:
    /// rejection depends on pin membership only.
    pub fn check_expiry(&self) -> i64 {
        let days = self.days_until_expiry();
        if days < 0 {
            log::error!("Pinned certificate set expired {} days ago; update the SDK", -days);
        } else if days < EXPIRY_WARNING_DAYS {
            log::warn!("Pinned certificate set expires in {days} days; update the SDK");
        } else {
            log::debug!("Pinned certificate set valid for {days} more days");
        }
        days
    }
}
