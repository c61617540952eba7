//! Process-lifetime signing key state.

use crate::config::KeyPaths;
use crate::error::TokenError;
use crate::keys::loader::{parse_private_key, parse_public_key, read_key_file, verify_pair};
use jsonwebtoken::{DecodingKey, EncodingKey};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A validated RSA keypair: the private key signs, the public key verifies.
///
/// Only constructed after both keys parsed and the public key verified a
/// probe signature of the private key.
pub struct SigningKeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    modulus_bits: usize,
}

impl SigningKeyPair {
    /// Build a keypair from PEM text.
    ///
    /// # Errors
    ///
    /// Returns the key error of the first check that fails.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, TokenError> {
        Self::from_sources("<private key>", private_pem, "<public key>", public_pem)
    }

    /// Read and validate the keypair at `paths`.
    ///
    /// # Errors
    ///
    /// Returns the key error of the first check that fails.
    pub fn load(paths: &KeyPaths) -> Result<Self, TokenError> {
        let private_pem = read_key_file(&paths.private_key)?;
        let public_pem = read_key_file(&paths.public_key)?;

        Self::from_sources(
            &paths.private_key.display().to_string(),
            private_pem.as_slice(),
            &paths.public_key.display().to_string(),
            public_pem.as_slice(),
        )
    }

    fn from_sources(
        private_source: &str,
        private_pem: &[u8],
        public_source: &str,
        public_pem: &[u8],
    ) -> Result<Self, TokenError> {
        let private_key = parse_private_key(private_source, private_pem)?;
        let public_key = parse_public_key(public_source, public_pem)?;
        verify_pair(&private_key, &public_key)?;

        Ok(Self {
            encoding: EncodingKey::from_rsa_der(&private_key.der),
            decoding: DecodingKey::from_rsa_der(&public_key.der),
            modulus_bits: private_key.key_pair.public_modulus_len() * 8,
        })
    }

    /// Key used to sign tokens.
    #[must_use]
    pub const fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Key used to verify tokens.
    #[must_use]
    pub const fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    /// RSA modulus size in bits.
    #[must_use]
    pub const fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }
}

impl fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("modulus_bits", &self.modulus_bits)
            .finish_non_exhaustive()
    }
}

/// Load-once holder for the signing keypair.
///
/// `initialize` is idempotent: the first successful call loads the keys and
/// every later call returns the same pair. A failed load stores nothing, so
/// readers never see partial key state.
#[derive(Debug)]
pub struct KeyStore {
    paths: KeyPaths,
    keys: OnceCell<Arc<SigningKeyPair>>,
}

impl KeyStore {
    /// Create an uninitialized key store.
    #[must_use]
    pub fn new(paths: KeyPaths) -> Self {
        Self {
            paths,
            keys: OnceCell::new(),
        }
    }

    /// Create a key store that already holds `pair`.
    #[must_use]
    pub fn with_pair(pair: SigningKeyPair) -> Self {
        Self {
            paths: KeyPaths::default(),
            keys: OnceCell::with_value(Arc::new(pair)),
        }
    }

    /// Load the keypair if not already loaded.
    ///
    /// # Errors
    ///
    /// Returns a startup-fatal key error if either file is missing,
    /// malformed, of the wrong type, or the two keys do not match.
    pub fn initialize(&self) -> Result<Arc<SigningKeyPair>, TokenError> {
        self.keys
            .get_or_try_init(|| {
                let pair = SigningKeyPair::load(&self.paths)?;
                info!(
                    private_key = %self.paths.private_key.display(),
                    public_key = %self.paths.public_key.display(),
                    modulus_bits = pair.modulus_bits(),
                    "Signing keypair loaded"
                );
                Ok(Arc::new(pair))
            })
            .cloned()
    }

    /// The loaded keypair, if `initialize` has succeeded.
    #[must_use]
    pub fn get(&self) -> Option<Arc<SigningKeyPair>> {
        self.keys.get().cloned()
    }

    /// Whether a keypair is loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.keys.get().is_some()
    }

    /// Configured key file locations.
    #[must_use]
    pub const fn paths(&self) -> &KeyPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = KeyStore::new(KeyPaths {
            private_key: fixture("private.pem"),
            public_key: fixture("public.pem"),
        });
        assert!(!store.is_initialized());

        let first = store.initialize().unwrap();
        let second = store.initialize().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.modulus_bits(), 2048);
    }

    #[test]
    fn test_failed_initialize_leaves_store_empty() {
        let store = KeyStore::new(KeyPaths {
            private_key: fixture("private.pem"),
            public_key: fixture("ec_public.pem"),
        });

        let err = store.initialize().unwrap_err();
        assert!(matches!(err, TokenError::KeyType { .. }));
        assert!(store.get().is_none());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let pair = SigningKeyPair::from_pem(
            include_bytes!("../../tests/fixtures/private.pem"),
            include_bytes!("../../tests/fixtures/public.pem"),
        )
        .unwrap();
        assert_eq!(
            format!("{pair:?}"),
            "SigningKeyPair { modulus_bits: 2048, .. }"
        );
    }
}
