//! Session token library.
//!
//! Loads an RSA signing keypair, mints and refreshes RS512 access and
//! refresh tokens, and records one-time verification codes through a
//! persistence port.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod jwt;
pub mod keys;
pub mod metrics;
pub mod models;
pub mod refresh;
pub mod service;
pub mod store;
pub mod verification;

// Re-exports for convenience
pub use config::Config;
pub use error::TokenError;
pub use models::{Role, SessionIdentity};
pub use service::SessionTokenService;
