//! HTTP middleware
//!
//! JWT bearer-token authentication for the protected REST routes.

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
