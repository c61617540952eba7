//! Access and refresh token minting.
//!
//! Tokens are compact JWS strings signed with RS512 (RSASSA-PKCS1-v1_5 with
//! SHA-512). That scheme is deterministic: identical claims signed with the
//! same key produce identical tokens, but every token carries a fresh `jti`.

use crate::error::TokenError;
use crate::jwt::claims::{AccessClaims, RefreshClaims, TokenUse};
use crate::keys::KeyStore;
use crate::metrics;
use crate::models::SessionIdentity;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Header, encode};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Signature algorithm for every issued token.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS512;

/// Access and refresh tokens minted from one timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// One-hour token carrying roles
    pub access_token: String,
    /// 24-hour token without roles
    pub refresh_token: String,
}

/// Mints signed access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyStore>,
    issuer: Option<String>,
}

impl TokenIssuer {
    #[must_use]
    pub const fn new(keys: Arc<KeyStore>) -> Self {
        Self { keys, issuer: None }
    }

    /// Stamp issued tokens with an `iss` claim.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    /// Mint an access token valid for one hour.
    ///
    /// # Errors
    ///
    /// [`TokenError::KeyUnavailable`] before key initialization,
    /// [`TokenError::Signing`] if signing fails.
    pub fn create_access_token(&self, identity: &SessionIdentity) -> Result<String, TokenError> {
        self.create_access_token_at(identity, Utc::now())
    }

    /// Mint an access token as of `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenIssuer::create_access_token`].
    pub fn create_access_token_at(
        &self,
        identity: &SessionIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.ensure_keys()?;
        let claims = AccessClaims::new(identity, self.issuer.clone(), now);
        self.sign(&claims, TokenUse::Access, identity.user_id)
    }

    /// Mint a refresh token valid for 24 hours.
    ///
    /// # Errors
    ///
    /// See [`TokenIssuer::create_access_token`].
    pub fn create_refresh_token(&self, identity: &SessionIdentity) -> Result<String, TokenError> {
        self.create_refresh_token_at(identity, Utc::now())
    }

    /// Mint a refresh token as of `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenIssuer::create_access_token`].
    pub fn create_refresh_token_at(
        &self,
        identity: &SessionIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.ensure_keys()?;
        let claims = RefreshClaims::new(identity, self.issuer.clone(), now);
        self.sign(&claims, TokenUse::Refresh, identity.user_id)
    }

    /// Mint both tokens with a single captured timestamp.
    ///
    /// # Errors
    ///
    /// See [`TokenIssuer::create_access_token`].
    pub fn issue_pair(&self, identity: &SessionIdentity) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.create_access_token_at(identity, now)?,
            refresh_token: self.create_refresh_token_at(identity, now)?,
        })
    }

    fn ensure_keys(&self) -> Result<(), TokenError> {
        if self.keys.is_initialized() {
            Ok(())
        } else {
            Err(TokenError::KeyUnavailable)
        }
    }

    fn sign<T: Serialize>(
        &self,
        claims: &T,
        token_use: TokenUse,
        user_id: i32,
    ) -> Result<String, TokenError> {
        let keys = self.keys.get().ok_or(TokenError::KeyUnavailable)?;

        let token = encode(&Header::new(SIGNING_ALGORITHM), claims, keys.encoding_key())
            .map_err(|e| TokenError::signing(e.to_string()))?;

        metrics::record_token_issued(token_use.as_str());
        debug!(user_id, token_type = token_use.as_str(), "Issued token");

        Ok(token)
    }
}
