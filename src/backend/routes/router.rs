/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * Routes are added in a specific order:
 * 1. The real-time WebSocket endpoint
 * 2. API routes (auth, maps)
 * 3. Static file serving
 * 4. Fallback handler (404)
 */
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::hub::ws_handler;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Routes
///
/// - `GET /ws` - WebSocket upgrade for the collaboration channel
/// - `/api/...` - REST endpoints (see `api_routes`)
/// - `/static/...` - static assets from the public directory
///
/// CORS is wide open, matching the original deployment where the browser
/// client may be served from a different origin.
pub fn create_router(app_state: AppState) -> Router<()> {
    // Real-time collaboration channel
    let router = Router::new().route("/ws", axum::routing::get(ws_handler));

    // Add API routes
    let router = configure_api_routes(router, app_state.clone());

    // Add static file serving
    let router = router.nest_service("/static", ServeDir::new("public"));

    // Fallback handler for 404
    let router = router.fallback(|| async { "404 Not Found" });

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
