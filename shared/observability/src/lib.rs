//! Mentora Observability Library
//!
//! Unified logging and tracing infrastructure for the Mentora services.
//!
//! # Features
//! - Structured JSON logging with consistent schema
//! - Request ID propagation via the `x-request-id` header
//! - HTTP middleware for request/response logging
//! - Slow request detection

pub mod init;
pub mod middleware;

pub use init::*;
pub use middleware::*;

// Re-export tracing for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Instrument, Level};
