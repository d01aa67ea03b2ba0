//! CutiE SDK for iOS, macOS and Android apps.
//!
//! This crate is the library shipped to hosts: it re-exports `cutie-core` and
//! its `UniFFI` scaffolding so a single `cdylib`/`staticlib` carries the whole API.

pub use cutie_core::*;

cutie_core::uniffi_reexport_scaffolding!();
