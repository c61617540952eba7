//! Shared library for cross-cutting concerns in session-token Rust services.
//!
//! This crate provides centralized implementations for:
//! - The error type reported by persistence adapters, with retryability
//!   classification
//! - Structured logging bootstrap on top of `tracing-subscriber`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod tracing_config;

pub use error::PlatformError;
pub use tracing_config::{LogFormat, TracingConfig, init_tracing};
