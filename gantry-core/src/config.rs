//! Application configuration.
//!
//! Configuration is read once at startup from the environment (a local
//! `.env` file is honored in development). A missing `GANTRY_SECRET` is a
//! fatal startup error; everything else has a sensible default.

use crate::Error;

/// Process-wide application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application secret, used to protect framework cookies.
    pub secret: String,

    /// Prefix for every cookie dropped by the framework.
    pub cookie_prefix: String,

    /// Address the HTTP server binds to.
    pub http_addr: String,

    /// Port the HTTP server binds to.
    pub http_port: u16,

    /// Database URL for the transaction plugin, if any.
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Create a configuration with the given secret and defaults elsewhere.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_prefix: "GANTRY".to_string(),
            http_addr: String::new(),
            http_port: 9000,
            database_url: None,
        }
    }

    /// Read configuration from the environment.
    ///
    /// Environment variables:
    /// - `GANTRY_SECRET`: required application secret
    /// - `GANTRY_COOKIE_PREFIX`: cookie prefix (default: "GANTRY")
    /// - `GANTRY_HTTP_ADDR`: bind address (default: "")
    /// - `GANTRY_HTTP_PORT`: bind port (default: 9000)
    /// - `GANTRY_DATABASE_URL`: database URL for the transaction plugin
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let secret = std::env::var("GANTRY_SECRET")
            .map_err(|_| Error::Config("GANTRY_SECRET not set".to_string()))?;

        let mut config = Self::new(secret);

        if let Ok(prefix) = std::env::var("GANTRY_COOKIE_PREFIX") {
            config.cookie_prefix = prefix;
        }
        if let Ok(addr) = std::env::var("GANTRY_HTTP_ADDR") {
            config.http_addr = addr;
        }
        if let Ok(port) = std::env::var("GANTRY_HTTP_PORT") {
            config.http_port = port
                .parse()
                .map_err(|_| Error::Config("Invalid GANTRY_HTTP_PORT".to_string()))?;
        }
        if let Ok(url) = std::env::var("GANTRY_DATABASE_URL") {
            config.database_url = Some(url);
        }

        Ok(config)
    }

    /// Set the cookie prefix.
    pub fn cookie_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cookie_prefix = prefix.into();
        self
    }

    /// Set the database URL.
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new("s3cret");
        assert_eq!(config.cookie_prefix, "GANTRY");
        assert_eq!(config.http_port, 9000);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::new("s3cret")
            .cookie_prefix("APP")
            .database_url("postgres://localhost/app");
        assert_eq!(config.cookie_prefix, "APP");
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/app"));
    }

    #[test]
    fn test_from_env_requires_secret() {
        // Both cases run in one test; the process env is shared.
        unsafe { std::env::remove_var("GANTRY_SECRET") };
        assert!(matches!(AppConfig::from_env(), Err(Error::Config(_))));

        unsafe { std::env::set_var("GANTRY_SECRET", "s3cret") };
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.secret, "s3cret");
        unsafe { std::env::remove_var("GANTRY_SECRET") };
    }
}
