use crate::config::{CODE_LENGTH_RANGE, DEFAULT_CODE_LENGTH};
use crate::error::TokenError;
use rand::RngCore;
use rand::rngs::OsRng;

/// A freshly generated verification code.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Numeric value, below `10^length`
    pub raw: u32,
    /// Zero-padded decimal rendering of `raw`
    pub display: String,
}

impl std::fmt::Debug for GeneratedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedCode").finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)]
const DEFAULT_MODULUS: u32 = 10u32.pow(DEFAULT_CODE_LENGTH as u32);

/// Produces fixed-width numeric codes from the operating system RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeGenerator {
    length: usize,
    modulus: u32,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            modulus: DEFAULT_MODULUS,
        }
    }
}

impl CodeGenerator {
    /// Generator for codes of `length` digits.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Config`] if `length` is outside 4..=9.
    pub fn new(length: usize) -> Result<Self, TokenError> {
        if !CODE_LENGTH_RANGE.contains(&length) {
            return Err(TokenError::config(format!(
                "verification code length {length} outside {CODE_LENGTH_RANGE:?}"
            )));
        }
        let exponent = u32::try_from(length).map_err(|e| TokenError::config(e.to_string()))?;
        Ok(Self {
            length,
            modulus: 10u32.pow(exponent),
        })
    }

    /// Number of digits per code.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Draw a uniformly distributed code.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Entropy`] if the OS random source fails.
    pub fn generate(&self) -> Result<GeneratedCode, TokenError> {
        self.generate_with(&mut OsRng)
    }

    /// Draw a code from `rng`.
    ///
    /// Values at or above the largest multiple of the modulus are rejected
    /// so every code is equally likely.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Entropy`] if `rng` fails.
    pub fn generate_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<GeneratedCode, TokenError> {
        let zone = u32::MAX - (u32::MAX % self.modulus);
        let mut buf = [0u8; 4];

        loop {
            rng.try_fill_bytes(&mut buf)
                .map_err(|e| TokenError::entropy(e.to_string()))?;
            let value = u32::from_le_bytes(buf);
            if value < zone {
                let raw = value % self.modulus;
                return Ok(GeneratedCode {
                    raw,
                    display: format!("{raw:0width$}", width = self.length),
                });
            }
        }
    }
}
