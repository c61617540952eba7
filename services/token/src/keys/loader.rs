//! PEM decoding and RSA key parsing.
//!
//! Private keys must be PKCS#1 (`RSA PRIVATE KEY`), public keys must be
//! SubjectPublicKeyInfo (`PUBLIC KEY`) wrapping an RSA key.

use crate::error::TokenError;
use ring::rand::SystemRandom;
use ring::signature::{
    RSA_PKCS1_2048_8192_SHA512, RSA_PKCS1_SHA512, RsaKeyPair, UnparsedPublicKey,
};
use std::path::Path;
use x509_parser::der_parser::parse_der;
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;
use x509_parser::x509::SubjectPublicKeyInfo;
use zeroize::Zeroizing;

/// PEM label of a PKCS#1 RSA private key.
pub const PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// PEM label of a SubjectPublicKeyInfo public key.
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// RSA modulus sizes the signer accepts.
pub const SUPPORTED_MODULUS_BITS: [usize; 3] = [2048, 3072, 4096];

const PAIR_PROBE: &[u8] = b"session-token keypair probe";

/// Parsed private key: the ring keypair plus its PKCS#1 DER encoding.
pub struct PrivateKeyMaterial {
    pub(crate) key_pair: RsaKeyPair,
    pub(crate) der: Zeroizing<Vec<u8>>,
}

/// Parsed public key as PKCS#1 `RSAPublicKey` DER.
pub struct PublicKeyMaterial {
    pub(crate) der: Vec<u8>,
}

/// Read a key file into a buffer that is wiped on drop.
///
/// # Errors
///
/// Returns [`TokenError::KeyLoad`] if the file cannot be read.
pub fn read_key_file(path: &Path) -> Result<Zeroizing<Vec<u8>>, TokenError> {
    std::fs::read(path)
        .map(Zeroizing::new)
        .map_err(|e| TokenError::KeyLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Decode the first PEM block of `input` and require `expected` as its label.
fn decode_block(
    source: &str,
    input: &[u8],
    expected: &'static str,
) -> Result<Zeroizing<Vec<u8>>, TokenError> {
    let block = pem::parse(input).map_err(|e| TokenError::KeyFormat {
        path: source.to_string(),
        expected,
        found: format!("no decodable PEM block ({e})"),
    })?;

    if block.tag() != expected {
        return Err(TokenError::KeyFormat {
            path: source.to_string(),
            expected,
            found: block.tag().to_string(),
        });
    }

    Ok(Zeroizing::new(block.into_contents()))
}

/// Parse a PEM-encoded PKCS#1 RSA private key.
///
/// # Errors
///
/// [`TokenError::KeyFormat`] for a missing or mislabeled block,
/// [`TokenError::KeyParse`] for a malformed key body,
/// [`TokenError::KeySize`] for a modulus outside [`SUPPORTED_MODULUS_BITS`].
pub fn parse_private_key(source: &str, input: &[u8]) -> Result<PrivateKeyMaterial, TokenError> {
    let der = decode_block(source, input, PRIVATE_KEY_LABEL)?;

    let parse_err = |reason: String| TokenError::KeyParse {
        path: source.to_string(),
        reason,
    };

    let modulus = private_modulus(&der)
        .ok_or_else(|| parse_err("not a PKCS#1 RSAPrivateKey structure".to_string()))?;
    check_modulus(source, modulus_bits(modulus))?;

    let key_pair = RsaKeyPair::from_der(&der).map_err(|e| parse_err(e.to_string()))?;

    Ok(PrivateKeyMaterial { key_pair, der })
}

/// Parse a PEM-encoded SubjectPublicKeyInfo and require an RSA key.
///
/// # Errors
///
/// [`TokenError::KeyFormat`] for a missing or mislabeled block,
/// [`TokenError::KeyParse`] for a malformed structure,
/// [`TokenError::KeyType`] when the key is not RSA,
/// [`TokenError::KeySize`] for a modulus outside [`SUPPORTED_MODULUS_BITS`].
pub fn parse_public_key(source: &str, input: &[u8]) -> Result<PublicKeyMaterial, TokenError> {
    let der = decode_block(source, input, PUBLIC_KEY_LABEL)?;

    let parse_err = |reason: String| TokenError::KeyParse {
        path: source.to_string(),
        reason,
    };

    let (_, spki) = SubjectPublicKeyInfo::from_der(&der).map_err(|e| parse_err(e.to_string()))?;

    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => {
            check_modulus(source, modulus_bits(rsa.modulus))?;
            Ok(PublicKeyMaterial {
                der: spki.subject_public_key.data.to_vec(),
            })
        }
        Ok(_) => Err(TokenError::KeyType {
            path: source.to_string(),
            found: spki.algorithm.algorithm.to_id_string(),
        }),
        Err(e) => Err(parse_err(e.to_string())),
    }
}

/// Modulus field of a PKCS#1 `RSAPrivateKey`.
fn private_modulus(der: &[u8]) -> Option<&[u8]> {
    let (_, key) = parse_der(der).ok()?;
    key.as_sequence().ok()?.get(1)?.as_slice().ok()
}

/// Bit length of a big-endian unsigned integer.
fn modulus_bits(modulus: &[u8]) -> usize {
    modulus.iter().position(|&b| b != 0).map_or(0, |first| {
        (modulus.len() - first) * 8 - modulus[first].leading_zeros() as usize
    })
}

fn check_modulus(source: &str, bits: usize) -> Result<(), TokenError> {
    if SUPPORTED_MODULUS_BITS.contains(&bits) {
        Ok(())
    } else {
        Err(TokenError::KeySize {
            path: source.to_string(),
            bits,
        })
    }
}

/// Check that `public` verifies a signature made by `private`.
///
/// # Errors
///
/// [`TokenError::KeyMismatch`] if verification fails,
/// [`TokenError::Signing`] if the probe cannot be signed.
pub fn verify_pair(
    private: &PrivateKeyMaterial,
    public: &PublicKeyMaterial,
) -> Result<(), TokenError> {
    let rng = SystemRandom::new();
    let mut signature = vec![0u8; private.key_pair.public_modulus_len()];

    private
        .key_pair
        .sign(&RSA_PKCS1_SHA512, &rng, PAIR_PROBE, &mut signature)
        .map_err(|_| TokenError::signing("keypair probe could not be signed"))?;

    UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA512, &public.der)
        .verify(PAIR_PROBE, &signature)
        .map_err(|_| TokenError::KeyMismatch)
}
