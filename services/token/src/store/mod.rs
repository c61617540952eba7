//! Persistence port consumed by the token core.
//!
//! The relational storage layer lives outside this crate; it plugs in by
//! implementing [`IdentityStore`]. [`MemoryStore`] is an in-process
//! implementation for tests and local development.

pub mod memory;

pub use memory::MemoryStore;

use crate::models::{IdentityRecord, Role, VerificationRecord};
use async_trait::async_trait;
use rust_common::PlatformError;

/// Storage operations the token core depends on.
///
/// Implementations own timeouts, retries, and connection management.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Durably record a verification code for `email`.
    ///
    /// Every call inserts a new record.
    async fn create_verification_code(
        &self,
        code: &str,
        email: &str,
    ) -> Result<VerificationRecord, PlatformError>;

    /// Look up an identity by user ID. Returns `Ok(None)` when absent.
    async fn get_identity(&self, user_id: i32) -> Result<Option<IdentityRecord>, PlatformError>;

    /// Current role assignments of a user, in storage order.
    async fn get_roles(&self, user_id: i32) -> Result<Vec<Role>, PlatformError>;
}
