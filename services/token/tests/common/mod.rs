//! Shared fixtures and proptest strategies.

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use session_token::config::KeyPaths;
use session_token::keys::KeyStore;
use session_token::{Role, SessionIdentity};
use std::path::PathBuf;
use std::sync::Arc;

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Key paths for a private/public fixture combination.
pub fn key_paths(private: &str, public: &str) -> KeyPaths {
    KeyPaths {
        private_key: fixture(private),
        public_key: fixture(public),
    }
}

/// Key store loaded once from the valid fixture pair.
pub static KEYS: Lazy<Arc<KeyStore>> = Lazy::new(|| {
    let store = KeyStore::new(key_paths("private.pem", "public.pem"));
    store.initialize().unwrap();
    Arc::new(store)
});

/// Key store holding the unrelated second pair.
pub static OTHER_KEYS: Lazy<Arc<KeyStore>> = Lazy::new(|| {
    let store = KeyStore::new(key_paths("other_private.pem", "other_public.pem"));
    store.initialize().unwrap();
    Arc::new(store)
});

/// Key store that was never initialized.
pub fn empty_keys() -> Arc<KeyStore> {
    Arc::new(KeyStore::new(key_paths("private.pem", "public.pem")))
}

/// Decode a JWT segment without verifying anything.
pub fn decode_segment(token: &str, index: usize) -> serde_json::Value {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "JWT must have 3 parts");
    let bytes = URL_SAFE_NO_PAD.decode(parts[index]).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Decoded JWT payload.
pub fn payload(token: &str) -> serde_json::Value {
    decode_segment(token, 1)
}

/// Generate arbitrary user IDs.
pub fn arb_user_id() -> impl Strategy<Value = i32> {
    1i32..i32::MAX
}

/// Generate arbitrary email addresses.
pub fn arb_email() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9._]{0,15}", "[a-z]{2,10}", "[a-z]{2,4}")
        .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
}

/// Generate arbitrary role sets.
pub fn arb_roles() -> impl Strategy<Value = Vec<Role>> {
    prop::collection::vec(
        (1i32..10_000, "[a-z][a-z_]{0,15}").prop_map(|(id, name)| Role::new(id, name)),
        0..6,
    )
}

/// Generate arbitrary session identities.
pub fn arb_identity() -> impl Strategy<Value = SessionIdentity> {
    (arb_user_id(), arb_email(), arb_roles())
        .prop_map(|(user_id, email, roles)| SessionIdentity::new(user_id, email, roles))
}
