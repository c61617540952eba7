//! Key store loading tests.
//!
//! Valid keypairs load and verify each other; every malformed, mislabeled,
//! or mistyped input fails with its specific error and leaves no key state.

mod common;

use common::{fixture, key_paths};
use jsonwebtoken::{Algorithm, Header, Validation};
use session_token::TokenError;
use session_token::config::KeyPaths;
use session_token::keys::{KeyStore, PRIVATE_KEY_LABEL, PUBLIC_KEY_LABEL, SigningKeyPair};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn temp_key(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file
}

fn assert_rejected(store: &KeyStore, check: impl Fn(&TokenError) -> bool) {
    let err = store.initialize().unwrap_err();
    assert!(check(&err), "unexpected error: {err:?}");
    assert!(err.is_startup_fatal());
    assert!(!store.is_initialized());
    assert!(store.get().is_none());
}

#[test]
fn test_valid_pair_signs_and_verifies() {
    let store = KeyStore::new(key_paths("private.pem", "public.pem"));
    let pair = store.initialize().unwrap();

    let claims = serde_json::json!({"sub": "probe", "exp": 4_102_444_800_i64});
    let token =
        jsonwebtoken::encode(&Header::new(Algorithm::RS512), &claims, pair.encoding_key()).unwrap();

    let decoded = jsonwebtoken::decode::<serde_json::Value>(
        &token,
        pair.decoding_key(),
        &Validation::new(Algorithm::RS512),
    )
    .unwrap();
    assert_eq!(decoded.claims["sub"], "probe");
}

#[test]
fn test_foreign_public_key_does_not_verify() {
    let ours = KeyStore::new(key_paths("private.pem", "public.pem"));
    let theirs = KeyStore::new(key_paths("other_private.pem", "other_public.pem"));
    let ours = ours.initialize().unwrap();
    let theirs = theirs.initialize().unwrap();

    let claims = serde_json::json!({"sub": "probe", "exp": 4_102_444_800_i64});
    let token =
        jsonwebtoken::encode(&Header::new(Algorithm::RS512), &claims, ours.encoding_key()).unwrap();

    let result = jsonwebtoken::decode::<serde_json::Value>(
        &token,
        theirs.decoding_key(),
        &Validation::new(Algorithm::RS512),
    );
    assert!(result.is_err());
}

#[test]
fn test_missing_private_key_file() {
    let store = KeyStore::new(KeyPaths {
        private_key: fixture("does-not-exist.pem"),
        public_key: fixture("public.pem"),
    });
    assert_rejected(&store, |e| matches!(e, TokenError::KeyLoad { .. }));
}

#[test]
fn test_missing_public_key_file() {
    let store = KeyStore::new(KeyPaths {
        private_key: fixture("private.pem"),
        public_key: fixture("does-not-exist.pem"),
    });
    assert_rejected(&store, |e| matches!(e, TokenError::KeyLoad { .. }));
}

#[test]
fn test_pkcs8_private_key_is_format_error() {
    let store = KeyStore::new(key_paths("pkcs8_private.pem", "public.pem"));
    assert_rejected(&store, |e| {
        matches!(e, TokenError::KeyFormat { expected, found, .. }
            if *expected == PRIVATE_KEY_LABEL && found == "PRIVATE KEY")
    });
}

#[test]
fn test_private_key_in_public_slot_is_format_error() {
    let store = KeyStore::new(key_paths("private.pem", "private.pem"));
    assert_rejected(&store, |e| {
        matches!(e, TokenError::KeyFormat { expected, .. } if *expected == PUBLIC_KEY_LABEL)
    });
}

#[test]
fn test_non_pem_file_is_format_error() {
    let garbage = temp_key(b"this is not a key\n");
    let store = KeyStore::new(KeyPaths {
        private_key: garbage.path().to_path_buf(),
        public_key: fixture("public.pem"),
    });
    assert_rejected(&store, |e| matches!(e, TokenError::KeyFormat { .. }));
}

#[test]
fn test_corrupt_private_key_body_is_parse_error() {
    let body = pem::encode(&pem::Pem::new(PRIVATE_KEY_LABEL, vec![0x30, 0x82, 0x01, 0x00]));
    let corrupt = temp_key(body.as_bytes());
    let store = KeyStore::new(KeyPaths {
        private_key: corrupt.path().to_path_buf(),
        public_key: fixture("public.pem"),
    });
    assert_rejected(&store, |e| matches!(e, TokenError::KeyParse { .. }));
}

#[test]
fn test_corrupt_public_key_body_is_parse_error() {
    let body = pem::encode(&pem::Pem::new(PUBLIC_KEY_LABEL, b"definitely not DER".to_vec()));
    let corrupt = temp_key(body.as_bytes());
    let store = KeyStore::new(KeyPaths {
        private_key: fixture("private.pem"),
        public_key: corrupt.path().to_path_buf(),
    });
    assert_rejected(&store, |e| matches!(e, TokenError::KeyParse { .. }));
}

#[test]
fn test_ec_public_key_is_type_error() {
    let store = KeyStore::new(key_paths("private.pem", "ec_public.pem"));
    assert_rejected(&store, |e| matches!(e, TokenError::KeyType { .. }));
}

#[test]
fn test_1024_bit_key_is_size_error() {
    let store = KeyStore::new(key_paths("rsa1024_private.pem", "rsa1024_public.pem"));
    assert_rejected(&store, |e| matches!(e, TokenError::KeySize { bits: 1024, .. }));

    let message = store.initialize().unwrap_err().to_string();
    assert!(message.contains("RSA-1024"), "{message}");
    assert!(message.contains("2048, 3072 or 4096"), "{message}");
}

#[test]
fn test_8192_bit_key_is_size_error() {
    let store = KeyStore::new(key_paths("rsa8192_private.pem", "rsa8192_public.pem"));
    assert_rejected(&store, |e| matches!(e, TokenError::KeySize { bits: 8192, .. }));
}

#[test]
fn test_3072_bit_key_loads() {
    let store = KeyStore::new(key_paths("rsa3072_private.pem", "rsa3072_public.pem"));
    let pair = store.initialize().unwrap();
    assert_eq!(pair.modulus_bits(), 3072);
}

#[test]
fn test_unrelated_public_key_is_mismatch() {
    let store = KeyStore::new(key_paths("private.pem", "other_public.pem"));
    assert_rejected(&store, |e| matches!(e, TokenError::KeyMismatch));
}

#[test]
fn test_failed_load_can_be_retried_after_fix() {
    let dir = tempfile::tempdir().unwrap();
    let private = dir.path().join("private.pem");
    let public = dir.path().join("public.pem");
    std::fs::copy(fixture("private.pem"), &private).unwrap();

    let store = KeyStore::new(KeyPaths {
        private_key: private,
        public_key: public.clone(),
    });
    assert!(store.initialize().is_err());
    assert!(!store.is_initialized());

    std::fs::copy(fixture("public.pem"), &public).unwrap();
    assert!(store.initialize().is_ok());
    assert!(store.is_initialized());
}

#[test]
fn test_concurrent_initialize_yields_one_pair() {
    let store = Arc::new(KeyStore::new(key_paths("private.pem", "public.pem")));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.initialize().unwrap())
        })
        .collect();

    let pairs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for pair in &pairs[1..] {
        assert!(Arc::ptr_eq(&pairs[0], pair));
    }
}

#[test]
fn test_from_pem_matches_file_load() {
    let private = std::fs::read(fixture("private.pem")).unwrap();
    let public = std::fs::read(fixture("public.pem")).unwrap();

    let pair = SigningKeyPair::from_pem(&private, &public).unwrap();
    assert_eq!(pair.modulus_bits(), 2048);

    let store = KeyStore::with_pair(pair);
    assert!(store.is_initialized());
}
