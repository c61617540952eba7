//! Identity, role, and verification code records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A role assignment as returned by the persistence port.
///
/// Carried verbatim in access token payloads; this crate does not evaluate
/// roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier
    pub id: i32,
    /// Role name, e.g. `admin`
    pub name: String,
}

impl Role {
    /// Create a role record.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Subject of an issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// User identifier
    pub user_id: i32,
    /// Contact address
    pub email: String,
    /// Ordered role assignments
    pub roles: Vec<Role>,
}

impl SessionIdentity {
    /// Create a session identity.
    #[must_use]
    pub fn new(user_id: i32, email: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id,
            email: email.into(),
            roles,
        }
    }
}

/// Identity row as read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// User identifier
    pub id: i32,
    /// Contact address
    pub email: String,
}

/// A stored verification code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Storage-assigned row identifier
    pub id: i64,
    /// The code as delivered to the user
    pub code: String,
    /// Address the code was issued for
    pub email: String,
    /// Storage-assigned creation time
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for VerificationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationRecord")
            .field("id", &self.id)
            .field("code", &"<redacted>")
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let role = Role::new(3, "admin");
        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "name": "admin"}));
    }

    #[test]
    fn test_verification_record_debug_redacts_code() {
        let record = VerificationRecord {
            id: 1,
            code: "482913".to_string(),
            email: "a@b.com".to_string(),
            created_at: Utc::now(),
        };
        let debug = format!("{record:?}");
        assert!(!debug.contains("482913"));
        assert!(debug.contains("a@b.com"));
    }
}
