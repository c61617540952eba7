use crate::error::TokenError;
use crate::jwt::{TokenIssuer, TokenVerifier};
use crate::metrics;
use crate::models::SessionIdentity;
use crate::store::IdentityStore;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Mints access tokens from the subject's current stored state.
///
/// Identity and roles are re-read on every refresh, never copied from an
/// earlier token, so role changes take effect without a new login.
#[derive(Clone)]
pub struct TokenRefresher {
    store: Arc<dyn IdentityStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl TokenRefresher {
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>, issuer: TokenIssuer, verifier: TokenVerifier) -> Self {
        Self {
            store,
            issuer,
            verifier,
        }
    }

    /// Mint a fresh access token for `user_id`.
    ///
    /// # Errors
    ///
    /// [`TokenError::NotFound`] for an unknown subject (nothing is signed),
    /// [`TokenError::Persistence`] if a lookup fails, or any issuance error.
    #[instrument(skip(self))]
    pub async fn refresh(&self, user_id: i32) -> Result<String, TokenError> {
        let result = self.refresh_inner(user_id).await;
        metrics::record_refresh(match &result {
            Ok(_) => "success",
            Err(TokenError::NotFound { .. }) => "not_found",
            Err(_) => "error",
        });
        result
    }

    /// Verify `refresh_token` and mint an access token for its subject.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidToken`] if the refresh token is forged, expired,
    /// or an access token; otherwise as [`TokenRefresher::refresh`].
    pub async fn refresh_with_token(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.verifier.verify_refresh(refresh_token)?;
        self.refresh(claims.user_id).await
    }

    async fn refresh_inner(&self, user_id: i32) -> Result<String, TokenError> {
        let Some(record) = self.store.get_identity(user_id).await? else {
            warn!("Refresh requested for unknown subject");
            return Err(TokenError::NotFound { user_id });
        };

        let roles = self.store.get_roles(record.id).await?;
        let identity = SessionIdentity::new(record.id, record.email, roles);

        let token = self.issuer.create_access_token(&identity)?;
        info!(roles = identity.roles.len(), "Access token refreshed");
        Ok(token)
    }
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
