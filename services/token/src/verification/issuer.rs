use crate::error::TokenError;
use crate::metrics;
use crate::store::IdentityStore;
use crate::verification::generator::CodeGenerator;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Message returned when a code has been recorded.
pub const VERIFICATION_SENT: &str = "OTP send successfully";

/// Generates verification codes and records them through the persistence
/// port.
///
/// Every call stores a new independent record. Earlier codes for the same
/// address are neither expired nor invalidated here, and issuance is not
/// rate limited; both belong to the storage collaborator. Delivery of the
/// code to the user happens outside this crate.
#[derive(Clone)]
pub struct VerificationIssuer {
    generator: CodeGenerator,
    store: Arc<dyn IdentityStore>,
}

impl VerificationIssuer {
    #[must_use]
    pub fn new(generator: CodeGenerator, store: Arc<dyn IdentityStore>) -> Self {
        Self { generator, store }
    }

    /// Generate a code for `email` and persist it.
    ///
    /// # Errors
    ///
    /// [`TokenError::Entropy`] if no code could be drawn,
    /// [`TokenError::Persistence`] if the store rejects the record.
    #[instrument(skip(self))]
    pub async fn issue(&self, email: &str) -> Result<&'static str, TokenError> {
        let code = self.generator.generate()?;

        match self
            .store
            .create_verification_code(&code.display, email)
            .await
        {
            Ok(record) => {
                metrics::record_verification_code("issued");
                info!(record_id = record.id, "Verification code recorded");
                Ok(VERIFICATION_SENT)
            }
            Err(e) => {
                metrics::record_verification_code("failed");
                warn!(error = %e, "Failed to record verification code");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for VerificationIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationIssuer")
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}
