//! Signature and claim validation for tokens issued by [`TokenIssuer`].
//!
//! [`TokenIssuer`]: crate::jwt::TokenIssuer

use crate::error::TokenError;
use crate::jwt::claims::{AccessClaims, RefreshClaims, TokenUse};
use crate::jwt::issuer::SIGNING_ALGORITHM;
use crate::keys::KeyStore;
use jsonwebtoken::{Validation, decode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Verifies tokens against the public half of the signing keypair.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: Arc<KeyStore>,
    validation: Validation,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(keys: Arc<KeyStore>) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_required_spec_claims(&["exp", "iat"]);
        validation.validate_exp = true;
        Self { keys, validation }
    }

    /// Require a matching `iss` claim.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Option<&str>) -> Self {
        if let Some(issuer) = issuer {
            self.validation.set_issuer(&[issuer]);
            self.validation
                .set_required_spec_claims(&["exp", "iat", "iss"]);
        }
        self
    }

    /// Allowed clock skew when checking `exp`.
    #[must_use]
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.validation.leeway = seconds;
        self
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidToken`] for bad signatures, expired tokens, or
    /// refresh tokens; [`TokenError::KeyUnavailable`] before key
    /// initialization.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.decode(token)?;
        expect_use(claims.token_use, TokenUse::Access)?;
        Ok(claims)
    }

    /// Verify a refresh token and return its claims.
    ///
    /// # Errors
    ///
    /// See [`TokenVerifier::verify_access`].
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self.decode(token)?;
        expect_use(claims.token_use, TokenUse::Refresh)?;
        Ok(claims)
    }

    fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let keys = self.keys.get().ok_or(TokenError::KeyUnavailable)?;
        decode::<T>(token, keys.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::invalid_token(e.to_string()))
    }
}

fn expect_use(found: TokenUse, expected: TokenUse) -> Result<(), TokenError> {
    if found == expected {
        Ok(())
    } else {
        Err(TokenError::invalid_token(format!(
            "expected {} token, got {}",
            expected.as_str(),
            found.as_str()
        )))
    }
}
