pub mod generator;
pub mod issuer;

pub use generator::{CodeGenerator, GeneratedCode};
pub use issuer::{VERIFICATION_SENT, VerificationIssuer};
