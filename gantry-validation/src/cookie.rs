//! Error cookie codec.
//!
//! Validation errors survive a redirect-after-post through a cookie named
//! `<prefix>_ERRORS`. The value is a URL-escaped concatenation of
//! `\x00<key>:<message>\x00` records; an absent or empty cookie means no
//! persisted errors.

use crate::errors::ValidationError;
use urlencoding::{decode, encode};

/// Name of the error cookie for a configured cookie prefix.
pub fn errors_cookie_name(prefix: &str) -> String {
    format!("{}_ERRORS", prefix)
}

/// Encode errors into the cookie value. Errors with an empty message are
/// skipped.
pub fn encode_errors(errors: &[ValidationError]) -> String {
    let mut raw = String::new();
    for error in errors {
        if error.message.is_empty() {
            continue;
        }
        raw.push('\x00');
        raw.push_str(&error.key);
        raw.push(':');
        raw.push_str(&error.message);
        raw.push('\x00');
    }
    encode(&raw).into_owned()
}

/// Decode a cookie value back into errors, preserving record order.
/// Malformed input yields no errors rather than failing.
pub fn decode_errors(value: &str) -> Vec<ValidationError> {
    let Ok(raw) = decode(value) else {
        return Vec::new();
    };
    raw.split('\x00')
        .filter(|record| !record.is_empty())
        .filter_map(|record| record.split_once(':'))
        .map(|(key, message)| ValidationError::new(key, message))
        .collect()
}
