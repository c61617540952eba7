pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::{
    ACCESS_TOKEN_TTL_SECS, AccessClaims, REFRESH_TOKEN_TTL_SECS, RefreshClaims, RegisteredClaims,
    TokenUse,
};
pub use issuer::{SIGNING_ALGORITHM, TokenIssuer, TokenPair};
pub use verifier::TokenVerifier;
