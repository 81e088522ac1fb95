// Error types for the Gantry framework

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Interceptor error: {0}")]
    Interceptor(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::NotFound(_) => 404,
            Error::Forbidden(_) => 403,
            Error::PayloadTooLarge(_) => 413,
            Error::Deserialization(_) => 400,
            Error::Serialization(_)
            | Error::Config(_)
            | Error::Plugin(_)
            | Error::Interceptor(_)
            | Error::Database(_)
            | Error::Internal(_)
            | Error::Io(_) => 500,
        }
    }

    /// Check if this error maps to a 5xx response
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::BadRequest("x".into()).status_code(), 400);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::Plugin("x".into()).status_code(), 500);
        assert_eq!(Error::Database("x".into()).status_code(), 500);
    }

    #[test]
    fn test_is_server_error() {
        assert!(Error::Internal("x".into()).is_server_error());
        assert!(!Error::BadRequest("x".into()).is_server_error());
    }
}
