//! Prometheus metrics for the session token service.

use once_cell::sync::Lazy;
use prometheus::{CounterVec, register_counter_vec};

/// Tokens issued counter.
pub static TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_token_tokens_issued_total",
        "Total number of tokens issued",
        &["token_type"]
    )
    .expect("Failed to register tokens_issued metric")
});

/// Refresh attempts counter.
pub static REFRESHES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_token_refreshes_total",
        "Total number of access token refreshes",
        &["status"]
    )
    .expect("Failed to register refreshes metric")
});

/// Verification codes counter.
pub static VERIFICATION_CODES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_token_verification_codes_total",
        "Total number of verification codes issued",
        &["status"]
    )
    .expect("Failed to register verification_codes metric")
});

/// Record a token issuance.
pub fn record_token_issued(token_type: &str) {
    TOKENS_ISSUED.with_label_values(&[token_type]).inc();
}

/// Record a refresh outcome.
pub fn record_refresh(status: &str) {
    REFRESHES.with_label_values(&[status]).inc();
}

/// Record a verification code outcome.
pub fn record_verification_code(status: &str) {
    VERIFICATION_CODES.with_label_values(&[status]).inc();
}
