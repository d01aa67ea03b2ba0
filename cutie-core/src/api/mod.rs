//! CutiE REST endpoints, one module per resource.
//!
//! Every call goes through [`ApiClient`](crate::client::ApiClient), so it gets
//! the pinned transport, the device token and error classification.

pub mod conversations;
pub mod link;
pub mod notifications;

use crate::error::{CutieError, CutieResult};

/// Checks that `id` can be spliced into a URL path as a single segment.
pub(crate) fn path_segment<'a>(what: &str, id: &'a str) -> CutieResult<&'a str> {
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
        && id != "."
        && id != "..";
    if valid {
        Ok(id)
    } else {
        Err(CutieError::InvalidRequest {
            reason: format!("invalid {what} `{id}`"),
        })
    }
}
