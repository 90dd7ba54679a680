//! HTTP routing
//!
//! Router assembly for the WebSocket endpoint, the REST surface, and
//! static files.

pub mod api_routes;
pub mod router;

pub use router::create_router;
