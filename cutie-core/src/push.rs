//! Push token validation.

use crate::error::{CutieError, CutieResult};

/// Shortest accepted push token, in hex characters.
pub const MIN_PUSH_TOKEN_LEN: usize = 32;
/// Longest accepted push token, in hex characters.
pub const MAX_PUSH_TOKEN_LEN: usize = 200;

/// Checks that `token` looks like an APNs device token: 32 to 200 hex
/// characters, any letter case.
///
/// # Errors
///
/// Returns `InvalidPushToken` naming the rule that failed.
#[uniffi::export]
pub fn validate_push_token(token: &str) -> CutieResult<()> {
    let reason = if token.is_empty() {
        "token is empty".to_string()
    } else if token.len() < MIN_PUSH_TOKEN_LEN {
        format!("token is shorter than {MIN_PUSH_TOKEN_LEN} characters")
    } else if token.len() > MAX_PUSH_TOKEN_LEN {
        format!("token is longer than {MAX_PUSH_TOKEN_LEN} characters")
    } else if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        "token contains non-hex characters".to_string()
    } else {
        return Ok(());
    };
    Err(CutieError::InvalidPushToken { reason })
}
