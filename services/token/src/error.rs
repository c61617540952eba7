//! Error taxonomy for the session token core.

use rust_common::PlatformError;
use thiserror::Error;

/// Errors produced by key loading, token issuance, refresh, and verification
/// code recording.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Key file could not be read
    #[error("Failed to load key from {path}: {reason}")]
    KeyLoad {
        /// Path of the key file
        path: String,
        /// Underlying I/O or PEM framing failure
        reason: String,
    },

    /// PEM block carried an unexpected label
    #[error("Invalid key format in {path}: expected {expected}, found {found}")]
    KeyFormat {
        /// Path of the key file
        path: String,
        /// Label the loader requires
        expected: &'static str,
        /// Label found in the file
        found: String,
    },

    /// PEM body is not a valid key structure
    #[error("Failed to parse key in {path}: {reason}")]
    KeyParse {
        /// Path of the key file
        path: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Public key is not an RSA key
    #[error("Key in {path} is not an RSA key (found {found})")]
    KeyType {
        /// Path of the key file
        path: String,
        /// Algorithm family found in the key
        found: String,
    },

    /// RSA modulus size the signing stack cannot use
    #[error("RSA-{bits} key in {path} is not supported (supported: 2048, 3072 or 4096 bits)")]
    KeySize {
        /// Path of the key file
        path: String,
        /// Modulus size in bits
        bits: usize,
    },

    /// Public key does not verify signatures of the private key
    #[error("Public key does not match private key")]
    KeyMismatch,

    /// Signing attempted before the key store was initialized
    #[error("Signing key unavailable: key store not initialized")]
    KeyUnavailable,

    /// Signature computation failed
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Token failed signature or claim validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Secure random source failed
    #[error("Entropy source failure: {0}")]
    Entropy(String),

    /// Persistence port reported a failure
    #[error("Persistence error: {0}")]
    Persistence(#[from] PlatformError),

    /// Subject does not exist
    #[error("Subject {user_id} not found")]
    NotFound {
        /// Requested user ID
        user_id: i32,
    },

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TokenError {
    /// Create a signing error.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create an invalid token error.
    #[must_use]
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    /// Create an entropy error.
    #[must_use]
    pub fn entropy(msg: impl Into<String>) -> Self {
        Self::Entropy(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Key material errors abort startup and are never retried.
    #[must_use]
    pub const fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::KeyLoad { .. }
                | Self::KeyFormat { .. }
                | Self::KeyParse { .. }
                | Self::KeyType { .. }
                | Self::KeySize { .. }
                | Self::KeyMismatch
        )
    }

    /// Only transient persistence failures are retryable, and only by the
    /// caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Persistence(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::KeyLoad { .. } => KEY_LOAD_FAILED,
            Self::KeyFormat { .. } => KEY_FORMAT_INVALID,
            Self::KeyParse { .. } => KEY_PARSE_FAILED,
            Self::KeyType { .. } => KEY_TYPE_INVALID,
            Self::KeySize { .. } => KEY_SIZE_UNSUPPORTED,
            Self::KeyMismatch => KEY_MISMATCH,
            Self::KeyUnavailable => KEY_UNAVAILABLE,
            Self::Signing(_) => TOKEN_SIGNING_FAILED,
            Self::InvalidToken(_) => TOKEN_INVALID,
            Self::Entropy(_) => ENTROPY_FAILURE,
            Self::Persistence(_) => PERSISTENCE_FAILURE,
            Self::NotFound { .. } => SUBJECT_NOT_FOUND,
            Self::Config(_) => CONFIG_INVALID,
        }
    }
}

// Error codes for callers that map errors onto a transport
pub const KEY_LOAD_FAILED: &str = "KEY_LOAD_FAILED";
pub const KEY_FORMAT_INVALID: &str = "KEY_FORMAT_INVALID";
pub const KEY_PARSE_FAILED: &str = "KEY_PARSE_FAILED";
pub const KEY_TYPE_INVALID: &str = "KEY_TYPE_INVALID";
pub const KEY_SIZE_UNSUPPORTED: &str = "KEY_SIZE_UNSUPPORTED";
pub const KEY_MISMATCH: &str = "KEY_MISMATCH";
pub const KEY_UNAVAILABLE: &str = "KEY_UNAVAILABLE";
pub const TOKEN_SIGNING_FAILED: &str = "TOKEN_SIGNING_FAILED";
pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
pub const ENTROPY_FAILURE: &str = "ENTROPY_FAILURE";
pub const PERSISTENCE_FAILURE: &str = "PERSISTENCE_FAILURE";
pub const SUBJECT_NOT_FOUND: &str = "SUBJECT_NOT_FOUND";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
