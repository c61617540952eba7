//! Startup check for the configured signing keypair.
//!
//! Loads the keys, then signs, verifies, and refreshes a probe session.
//! Exits non-zero if any step fails.

use anyhow::Context;
use rust_common::init_tracing;
use session_token::store::MemoryStore;
use session_token::{Config, Role, SessionIdentity, SessionTokenService};
use std::sync::Arc;
use tracing::{error, info};

const PROBE_USER_ID: i32 = 0;
const PROBE_EMAIL: &str = "keycheck@localhost";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(&config.tracing);

    info!(
        private_key = %config.keys.private_key.display(),
        public_key = %config.keys.public_key.display(),
        "Checking signing keypair"
    );

    let store = Arc::new(MemoryStore::new());
    store.insert_identity(PROBE_USER_ID, PROBE_EMAIL).await;
    store
        .set_roles(PROBE_USER_ID, vec![Role::new(0, "keycheck")])
        .await;

    let service = match SessionTokenService::bootstrap(&config, store) {
        Ok(service) => service,
        Err(e) => {
            error!(code = e.code(), error = %e, "Signing keypair rejected");
            return Err(e).context("key store initialization failed");
        }
    };

    let identity = SessionIdentity::new(PROBE_USER_ID, PROBE_EMAIL, Vec::new());
    let pair = service.issuer().issue_pair(&identity)?;

    service
        .verifier()
        .verify_access(&pair.access_token)
        .context("access token failed verification")?;

    let refreshed = service
        .refresher()
        .refresh_with_token(&pair.refresh_token)
        .await
        .context("refresh round trip failed")?;
    let claims = service.verifier().verify_access(&refreshed)?;

    info!(
        roles = claims.roles.len(),
        "Signing keypair verified: tokens sign, verify, and refresh"
    );
    Ok(())
}
