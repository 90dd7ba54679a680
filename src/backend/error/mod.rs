//! Backend error handling
//!
//! REST-facing error types with HTTP status mapping and structured JSON
//! response bodies.

pub mod conversion;
pub mod types;

pub use types::BackendError;
