//! In-memory [`IdentityStore`] with failure injection.

use crate::models::{IdentityRecord, Role, VerificationRecord};
use crate::store::IdentityStore;
use async_trait::async_trait;
use chrono::Utc;
use rust_common::PlatformError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    identities: HashMap<i32, IdentityRecord>,
    roles: HashMap<i32, Vec<Role>>,
    codes: Vec<VerificationRecord>,
}

/// In-memory storage backend.
///
/// `fail_with` makes every call fail until cleared; `fail_roles_with`
/// fails only role lookups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failure: RwLock<Option<PlatformError>>,
    roles_failure: RwLock<Option<PlatformError>>,
    role_lookups: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an identity.
    pub async fn insert_identity(&self, user_id: i32, email: impl Into<String>) {
        let record = IdentityRecord {
            id: user_id,
            email: email.into(),
        };
        self.tables.write().await.identities.insert(user_id, record);
    }

    /// Replace the role set of a user.
    pub async fn set_roles(&self, user_id: i32, roles: Vec<Role>) {
        self.tables.write().await.roles.insert(user_id, roles);
    }

    /// Make every subsequent call fail with `err`.
    pub async fn fail_with(&self, err: PlatformError) {
        *self.failure.write().await = Some(err);
    }

    /// Make subsequent `get_roles` calls fail with `err`.
    pub async fn fail_roles_with(&self, err: PlatformError) {
        *self.roles_failure.write().await = Some(err);
    }

    /// Stop injecting failures.
    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
        *self.roles_failure.write().await = None;
    }

    /// All stored verification codes, oldest first.
    pub async fn verification_codes(&self) -> Vec<VerificationRecord> {
        self.tables.read().await.codes.clone()
    }

    /// Stored verification codes for one address, oldest first.
    pub async fn codes_for(&self, email: &str) -> Vec<VerificationRecord> {
        self.tables
            .read()
            .await
            .codes
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect()
    }

    /// Number of `get_roles` calls served, failed ones included.
    #[must_use]
    pub fn role_lookups(&self) -> usize {
        self.role_lookups.load(Ordering::Relaxed)
    }

    async fn check_failure(&self) -> Result<(), PlatformError> {
        injected(&self.failure).await
    }
}

async fn injected(slot: &RwLock<Option<PlatformError>>) -> Result<(), PlatformError> {
    match slot.read().await.as_ref() {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn create_verification_code(
        &self,
        code: &str,
        email: &str,
    ) -> Result<VerificationRecord, PlatformError> {
        self.check_failure().await?;

        let mut tables = self.tables.write().await;
        let id = i64::try_from(tables.codes.len())
            .map_err(|e| PlatformError::Internal(e.to_string()))?
            + 1;
        let record = VerificationRecord {
            id,
            code: code.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.codes.push(record.clone());
        Ok(record)
    }

    async fn get_identity(&self, user_id: i32) -> Result<Option<IdentityRecord>, PlatformError> {
        self.check_failure().await?;
        Ok(self.tables.read().await.identities.get(&user_id).cloned())
    }

    async fn get_roles(&self, user_id: i32) -> Result<Vec<Role>, PlatformError> {
        self.role_lookups.fetch_add(1, Ordering::Relaxed);
        self.check_failure().await?;
        injected(&self.roles_failure).await?;
        Ok(self
            .tables
            .read()
            .await
            .roles
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_code_insert_creates_a_row() {
        let store = MemoryStore::new();

        let first = store.create_verification_code("111111", "a@b.com").await.unwrap();
        let second = store.create_verification_code("111111", "a@b.com").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.codes_for("a@b.com").await.len(), 2);
    }

    #[tokio::test]
    async fn test_identity_lookup() {
        let store = MemoryStore::new();
        store.insert_identity(7, "a@b.com").await;

        let found = store.get_identity(7).await.unwrap();
        assert_eq!(found.map(|r| r.email), Some("a@b.com".to_string()));
        assert!(store.get_identity(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_roles_default_to_empty() {
        let store = MemoryStore::new();
        assert!(store.get_roles(1).await.unwrap().is_empty());
        assert_eq!(store.role_lookups(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_until_cleared() {
        let store = MemoryStore::new();
        store.fail_with(PlatformError::unavailable("down")).await;

        let err = store.get_identity(1).await.unwrap_err();
        assert_eq!(err, PlatformError::unavailable("down"));

        store.clear_failure().await;
        assert!(store.get_identity(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_role_failure_leaves_identity_lookups_working() {
        let store = MemoryStore::new();
        store.insert_identity(1, "a@b.com").await;
        store.fail_roles_with(PlatformError::timeout("replica lag")).await;

        assert!(store.get_identity(1).await.unwrap().is_some());
        assert_eq!(
            store.get_roles(1).await.unwrap_err(),
            PlatformError::timeout("replica lag")
        );

        store.clear_failure().await;
        assert!(store.get_roles(1).await.is_ok());
    }
}
