//! Centralized configuration for the session token service.
//!
//! All configuration is loaded from environment variables (after an optional
//! `.env` file) and validated at startup. Token lifetimes are fixed and not
//! part of configuration.

use crate::error::TokenError;
use rust_common::{LogFormat, TracingConfig};
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Allowed widths for verification codes.
pub const CODE_LENGTH_RANGE: RangeInclusive<usize> = 4..=9;

/// Default verification code width.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Locations of the PEM-encoded signing keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    /// PKCS#1 RSA private key (`RSA PRIVATE KEY`)
    pub private_key: PathBuf,
    /// SubjectPublicKeyInfo RSA public key (`PUBLIC KEY`)
    pub public_key: PathBuf,
}

impl Default for KeyPaths {
    fn default() -> Self {
        Self {
            private_key: PathBuf::from("private.pem"),
            public_key: PathBuf::from("public.pem"),
        }
    }
}

/// Session token service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Signing keypair locations
    pub keys: KeyPaths,
    /// Optional `iss` claim for issued tokens
    pub jwt_issuer: Option<String>,
    /// Number of digits in verification codes
    pub code_length: usize,
    /// Logging configuration
    pub tracing: TracingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys: KeyPaths::default(),
            jwt_issuer: None,
            code_length: DEFAULT_CODE_LENGTH,
            tracing: TracingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok();

        let keys = KeyPaths {
            private_key: env::var("PRIVATE_KEY_PATH")
                .map_or_else(|_| KeyPaths::default().private_key, PathBuf::from),
            public_key: env::var("PUBLIC_KEY_PATH")
                .map_or_else(|_| KeyPaths::default().public_key, PathBuf::from),
        };

        let jwt_issuer = env::var("JWT_ISSUER").ok().filter(|s| !s.trim().is_empty());
        let code_length = parse_env("VERIFICATION_CODE_LENGTH", DEFAULT_CODE_LENGTH)?;

        let tracing = TracingConfig::default()
            .with_log_level(env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
            .with_format(parse_env("LOG_FORMAT", LogFormat::Text)?);

        let config = Self {
            keys,
            jwt_issuer,
            code_length,
            tracing,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<(), TokenError> {
        if !CODE_LENGTH_RANGE.contains(&self.code_length) {
            return Err(TokenError::config(format!(
                "VERIFICATION_CODE_LENGTH must be between {} and {}, got {}",
                CODE_LENGTH_RANGE.start(),
                CODE_LENGTH_RANGE.end(),
                self.code_length
            )));
        }
        if self.keys.private_key.as_os_str().is_empty() {
            return Err(TokenError::config("PRIVATE_KEY_PATH must not be empty"));
        }
        if self.keys.public_key.as_os_str().is_empty() {
            return Err(TokenError::config("PUBLIC_KEY_PATH must not be empty"));
        }
        Ok(())
    }
}

/// Parse environment variable with default value.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, TokenError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| TokenError::config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
