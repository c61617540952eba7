use crate::models::{Role, SessionIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access token lifetime in seconds.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Refresh token lifetime in seconds.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Distinguishes access tokens from refresh tokens signed by the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    /// Short-lived API credential
    Access,
    /// Long-lived credential exchanged for access tokens
    Refresh,
}

impl TokenUse {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    /// Validity window for this token type.
    #[must_use]
    pub const fn ttl_secs(self) -> i64 {
        match self {
            Self::Access => ACCESS_TOKEN_TTL_SECS,
            Self::Refresh => REFRESH_TOKEN_TTL_SECS,
        }
    }
}

/// Registered claims shared by both token types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl RegisteredClaims {
    /// Claims valid from `now` for `ttl_secs`.
    pub fn new(issuer: Option<String>, now: DateTime<Utc>, ttl_secs: i64) -> Self {
        let iat = now.timestamp();
        Self {
            iss: issuer,
            iat,
            exp: iat + ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Lifetime in seconds.
    pub const fn lifetime_secs(&self) -> i64 {
        self.exp - self.iat
    }

    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

/// Payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i32,
    pub email: String,
    pub roles: Vec<Role>,
    pub token_use: TokenUse,
    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

impl AccessClaims {
    pub fn new(identity: &SessionIdentity, issuer: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email.clone(),
            roles: identity.roles.clone(),
            token_use: TokenUse::Access,
            registered: RegisteredClaims::new(issuer, now, ACCESS_TOKEN_TTL_SECS),
        }
    }
}

/// Payload of a refresh token. Carries no roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_id: i32,
    pub email: String,
    pub token_use: TokenUse,
    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

impl RefreshClaims {
    pub fn new(identity: &SessionIdentity, issuer: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email.clone(),
            token_use: TokenUse::Refresh,
            registered: RegisteredClaims::new(issuer, now, REFRESH_TOKEN_TTL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SessionIdentity {
        SessionIdentity::new(7, "a@b.com", vec![Role::new(1, "admin")])
    }

    #[test]
    fn test_access_claims_window() {
        let now = Utc::now();
        let claims = AccessClaims::new(&identity(), None, now);

        assert_eq!(claims.registered.iat, now.timestamp());
        assert_eq!(claims.registered.lifetime_secs(), 3600);
        assert!(!claims.registered.is_expired());
    }

    #[test]
    fn test_refresh_claims_window() {
        let now = Utc::now();
        let claims = RefreshClaims::new(&identity(), None, now);

        assert_eq!(claims.registered.lifetime_secs(), 86_400);
        assert_eq!(claims.token_use, TokenUse::Refresh);
    }

    #[test]
    fn test_refresh_payload_has_no_roles() {
        let claims = RefreshClaims::new(&identity(), Some("issuer".to_string()), Utc::now());
        let json = serde_json::to_value(&claims).unwrap();

        assert!(json.get("roles").is_none());
        assert_eq!(json["token_use"], "refresh");
        assert_eq!(json["iss"], "issuer");
    }

    #[test]
    fn test_access_payload_is_flat() {
        let claims = AccessClaims::new(&identity(), None, Utc::now());
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["user_id"], 7);
        assert_eq!(json["roles"][0]["name"], "admin");
        assert!(json.get("iat").is_some());
        assert!(json.get("registered").is_none());
        assert!(json.get("iss").is_none());
    }

    #[test]
    fn test_expired_claims() {
        let past = Utc::now() - chrono::Duration::hours(2);
        let claims = AccessClaims::new(&identity(), None, past);
        assert!(claims.registered.is_expired());
    }
}
