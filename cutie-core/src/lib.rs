//! Core of the CutiE feedback and support SDK.
//!
//! Every request goes through one pipeline: a rustls client that pins the
//! CutiE hosts, a lazily registered device token that is dropped on 401, and
//! optional hardware attestation assertions. Platform capabilities (secure
//! storage, preferences, App Attest) are foreign traits implemented by the host.

pub mod api;
pub mod attestation;
pub mod client;
pub mod config;
pub mod crypto;
pub mod device_token;
pub mod identity;
pub mod logger;
pub mod models;
pub mod pinning;
pub mod platform;
pub mod push;

mod error;
pub use error::*;

mod http_request;

mod sdk;
pub use sdk::*;

/// SDK version sent in `X-CutiE-SDK-Version` and at registration.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

uniffi::setup_scaffolding!("cutie_core");
