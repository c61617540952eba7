//! Startup wiring for the session token core.
//!
//! [`SessionTokenService::bootstrap`] loads the signing keys once and hands
//! the shared key store to every component. Key errors are returned to the
//! caller, which decides whether to abort the process.

use crate::config::Config;
use crate::error::TokenError;
use crate::jwt::{TokenIssuer, TokenVerifier};
use crate::keys::KeyStore;
use crate::refresh::TokenRefresher;
use crate::store::IdentityStore;
use crate::verification::{CodeGenerator, VerificationIssuer};
use std::sync::Arc;
use tracing::info;

/// All token and verification components, sharing one key store.
#[derive(Debug, Clone)]
pub struct SessionTokenService {
    keys: Arc<KeyStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    refresher: TokenRefresher,
    verification: VerificationIssuer,
}

impl SessionTokenService {
    /// Load keys from the configured paths and wire the components.
    ///
    /// # Errors
    ///
    /// Returns a startup-fatal key error or a configuration error.
    pub fn bootstrap(config: &Config, store: Arc<dyn IdentityStore>) -> Result<Self, TokenError> {
        config.validate()?;
        let keys = Arc::new(KeyStore::new(config.keys.clone()));
        keys.initialize()?;

        let service = Self::with_key_store(config, keys, store)?;
        info!("Session token service ready");
        Ok(service)
    }

    /// Wire the components around an existing key store.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Config`] for an invalid code length.
    pub fn with_key_store(
        config: &Config,
        keys: Arc<KeyStore>,
        store: Arc<dyn IdentityStore>,
    ) -> Result<Self, TokenError> {
        let issuer = TokenIssuer::new(Arc::clone(&keys)).with_issuer(config.jwt_issuer.clone());
        let verifier =
            TokenVerifier::new(Arc::clone(&keys)).with_issuer(config.jwt_issuer.as_deref());
        let refresher = TokenRefresher::new(Arc::clone(&store), issuer.clone(), verifier.clone());
        let verification = VerificationIssuer::new(CodeGenerator::new(config.code_length)?, store);

        Ok(Self {
            keys,
            issuer,
            verifier,
            refresher,
            verification,
        })
    }

    #[must_use]
    pub const fn keys(&self) -> &Arc<KeyStore> {
        &self.keys
    }

    #[must_use]
    pub const fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    #[must_use]
    pub const fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    #[must_use]
    pub const fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    #[must_use]
    pub const fn verification(&self) -> &VerificationIssuer {
        &self.verification
    }
}
