//! RSA signing key loading and storage.

pub mod loader;
pub mod store;

pub use loader::{PRIVATE_KEY_LABEL, PUBLIC_KEY_LABEL, SUPPORTED_MODULUS_BITS};
pub use store::{KeyStore, SigningKeyPair};
