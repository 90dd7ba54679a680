/**
 * API Route Handlers
 *
 * This module wires the REST endpoints into the router:
 *
 * ## Authentication (public)
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/auth/me` - Get current user info (token checked in handler)
 *
 * ## Maps (bearer token required)
 * - `GET  /api/maps` - List maps owned by or shared with the user
 * - `POST /api/maps` - Create a map
 * - `GET  /api/maps/{id}` - Fetch a map
 * - `PUT  /api/maps/{id}` - Update title/nodes/edges
 * - `DELETE /api/maps/{id}` - Delete a map
 * - `POST /api/maps/{id}/invite` - Invite a collaborator by email
 */
use axum::{middleware, Router};

use crate::backend::auth::{get_me, login, signup};
use crate::backend::maps::{
    create_map, delete_map, get_map, invite_collaborator, list_maps, update_map,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// The map routes are wrapped in the JWT middleware; the auth routes stay
/// public so users can obtain a token in the first place.
pub fn configure_api_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    let map_routes = Router::new()
        .route(
            "/api/maps",
            axum::routing::get(list_maps).post(create_map),
        )
        .route(
            "/api/maps/{id}",
            axum::routing::get(get_map).put(update_map).delete(delete_map),
        )
        .route(
            "/api/maps/{id}/invite",
            axum::routing::post(invite_collaborator),
        )
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware));

    router
        // Authentication endpoints
        .route("/api/auth/signup", axum::routing::post(signup))
        .route("/api/auth/login", axum::routing::post(login))
        .route("/api/auth/me", axum::routing::get(get_me))
        // Document lifecycle endpoints
        .merge(map_routes)
}
