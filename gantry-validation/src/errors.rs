// Validation errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation error for a single field or variable.
///
/// Immutable once stored in the validation context; the key identifies the
/// bound field so templates can look the error up per input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field or variable the error is keyed by
    pub key: String,

    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Renders the message only; an absent error renders as the empty string
/// on the template side.
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_message() {
        let err = ValidationError::new("name", "Required");
        assert_eq!(err.to_string(), "Required");
    }

    #[test]
    fn test_serde_round_trip() {
        let err = ValidationError::new("name", "Required");
        let json = serde_json::to_string(&err).unwrap();
        let back: ValidationError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
