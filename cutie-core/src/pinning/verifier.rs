use std::sync::Arc;
use std::time::Duration;

use der::{asn1::AnyRef, Decode, Encode, Tag};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, TrustAnchor, UnixTime};
use rustls::{DigitallySignedStruct, RootCertStore, SignatureScheme};
use x509_cert::{spki::SubjectPublicKeyInfoOwned, Certificate};

use super::{spki_info_hash, PinningGuard};
use crate::error::{CutieError, CutieResult};

/// Certificate verifier enforcing [`PinningGuard`] on pinned hosts.
///
/// 1. Runs the standard webpki chain validation (signatures, expiry, name).
/// 2. For pinned hosts, requires a pinned key among the presented certificates
///    or the trust anchor the chain terminates in.
///
/// Non-pinned hosts and IP addresses get step 1 only.
#[derive(Debug)]
pub struct PinnedCertVerifier {
    guard: Arc<PinningGuard>,
    roots: Arc<RootCertStore>,
    inner: Arc<WebPkiServerVerifier>,
}

impl PinnedCertVerifier {
    /// Creates a verifier over the Mozilla root set shipped in `webpki-roots`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the webpki verifier cannot be built.
    pub fn new(guard: Arc<PinningGuard>, provider: Arc<CryptoProvider>) -> CutieResult<Self> {
        let roots = Arc::new(RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        });
        let inner = WebPkiServerVerifier::builder_with_provider(Arc::clone(&roots), provider)
            .build()
            .map_err(|e| CutieError::InvalidRequest {
                reason: format!("failed to build certificate verifier: {e}"),
            })?;
        Ok(Self { guard, roots, inner })
    }

    /// Whether the root that issued `top` (the last presented certificate) carries a pinned key.
    fn anchor_is_pinned(&self, top: &CertificateDer<'_>) -> bool {
        let Ok(cert) = Certificate::from_der(top.as_ref()) else {
            return false;
        };
        let Ok(issuer) = cert.tbs_certificate.issuer.to_der() else {
            return false;
        };
        self.roots
            .roots
            .iter()
            .filter(|anchor| wrap_sequence(anchor.subject.as_ref()).as_deref() == Some(issuer.as_slice()))
            .filter_map(anchor_spki_hash)
            .any(|pin| self.guard.is_pinned(&pin))
    }
}

/// Re-wraps DER content bytes in a SEQUENCE header. Trust anchors store their
/// subject and SPKI without the outer tag.
fn wrap_sequence(contents: &[u8]) -> Option<Vec<u8>> {
    AnyRef::new(Tag::Sequence, contents).ok()?.to_der().ok()
}

fn anchor_spki_hash(anchor: &TrustAnchor<'_>) -> Option<String> {
    let spki_der = wrap_sequence(anchor.subject_public_key_info.as_ref())?;
    let spki = SubjectPublicKeyInfoOwned::from_der(&spki_der).ok()?;
    spki_info_hash(&spki)
}

impl ServerCertVerifier for PinnedCertVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        // Default trust evaluation always runs and must pass.
        let verified =
            self.inner
                .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)?;

        let host = match server_name {
            ServerName::DnsName(name) => name.as_ref(),
            _ => return Ok(verified),
        };
        if !self.guard.requires_pinning(host) {
            return Ok(verified);
        }

        let mut chain = Vec::with_capacity(intermediates.len() + 1);
        chain.push(end_entity.clone());
        chain.extend(intermediates.iter().cloned());

        let top = chain.last().unwrap_or(end_entity);
        if self.guard.validate_chain(&chain, true) || self.anchor_is_pinned(top) {
            return Ok(verified);
        }

        log::error!("Certificate pinning rejected the chain presented by {host}");
        Err(rustls::Error::General(format!(
            "certificate pinning failed for {host}: no pinned key in chain"
        )))
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

/// Creates the HTTP client used for every SDK request.
///
/// TLS goes through [`PinnedCertVerifier`]; `request_timeout` bounds connection
/// setup and `resource_timeout` the whole exchange.
///
/// # Errors
///
/// Returns `InvalidRequest` if the TLS configuration or client cannot be built.
pub fn build_pinned_client(
    guard: Arc<PinningGuard>,
    request_timeout: Duration,
    resource_timeout: Duration,
) -> CutieResult<reqwest::Client> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = PinnedCertVerifier::new(guard, Arc::clone(&provider))?;

    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| CutieError::InvalidRequest {
            reason: format!("failed to configure TLS: {e}"),
        })?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();

    reqwest::Client::builder()
        .use_preconfigured_tls(config)
        .connect_timeout(request_timeout)
        .timeout(resource_timeout)
        .user_agent(format!("cutie-core/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CutieError::InvalidRequest {
            reason: format!("failed to build HTTP client: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine};

    use super::super::fixtures::{
        AMAZON_CA3_ISSUED_CERT, EC_P256_CERT, EC_P256_PIN, ISRG_X1_ISSUED_CERT,
    };
    use super::*;
    use crate::pinning::PIN_SET_EXPIRES_AT;

    fn der(b64: &str) -> CertificateDer<'static> {
        CertificateDer::from(STANDARD.decode(b64).unwrap())
    }

    fn verifier(pins: &[&str]) -> PinnedCertVerifier {
        let guard = Arc::new(PinningGuard::new(&["cuti-e.com"], pins, PIN_SET_EXPIRES_AT));
        PinnedCertVerifier::new(guard, Arc::new(rustls::crypto::ring::default_provider()))
            .expect("verifier")
    }

    #[test]
    fn test_pinned_host_with_untrusted_chain_is_rejected() {
        // The key is pinned, but default validation fails: no fallback.
        let verifier = verifier(&[EC_P256_PIN]);
        let cert = der(EC_P256_CERT);
        let server_name = ServerName::try_from("api.cuti-e.com").unwrap();

        let result =
            verifier.verify_server_cert(&cert, &[], &server_name, &[], UnixTime::now());
        assert!(result.is_err());
    }

    #[test]
    fn test_anchor_spki_hash_rebuilds_spki() {
        let cert = Certificate::from_der(&STANDARD.decode(EC_P256_CERT).unwrap()).unwrap();
        let spki_der = cert.tbs_certificate.subject_public_key_info.to_der().unwrap();
        let contents = AnyRef::from_der(&spki_der).unwrap().value().to_vec();

        let anchor = TrustAnchor {
            subject: contents.clone().into(),
            subject_public_key_info: contents.into(),
            name_constraints: None,
        };
        assert_eq!(anchor_spki_hash(&anchor).as_deref(), Some(EC_P256_PIN));
    }

    #[test]
    fn test_chain_issued_by_pinned_root_is_accepted() {
        // Servers stop at the intermediate; the pinned key lives on the root.
        let verifier = PinnedCertVerifier::new(
            Arc::new(PinningGuard::default()),
            Arc::new(rustls::crypto::ring::default_provider()),
        )
        .unwrap();
        assert!(verifier.anchor_is_pinned(&der(ISRG_X1_ISSUED_CERT)));
    }

    #[test]
    fn test_chain_issued_by_unpinned_root_is_rejected() {
        let verifier = PinnedCertVerifier::new(
            Arc::new(PinningGuard::default()),
            Arc::new(rustls::crypto::ring::default_provider()),
        )
        .unwrap();
        assert!(!verifier.anchor_is_pinned(&der(AMAZON_CA3_ISSUED_CERT)));
    }

    #[test]
    fn test_anchor_must_match_the_pin_set() {
        // Amazon Root CA 1 only: ISRG Root X1 is trusted but no longer pinned.
        let verifier = verifier(&["++MBgDH5WGvL9Bcn5Be30cRcL0f5O+NyoXuWtQdX1aI="]);
        assert!(!verifier.anchor_is_pinned(&der(ISRG_X1_ISSUED_CERT)));
    }

    #[test]
    fn test_build_pinned_client() {
        let client = build_pinned_client(
            Arc::new(PinningGuard::default()),
            Duration::from_secs(30),
            Duration::from_secs(60),
        );
        assert!(client.is_ok());
    }
}
