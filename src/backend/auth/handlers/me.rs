/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * information about the currently authenticated user.
 */
use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;

/// Get current user handler
///
/// Extracts the JWT token from the Authorization header, verifies it, and
/// returns the user's information.
///
/// # Errors
///
/// * `401 Unauthorized` - Missing header or invalid token
/// * `404 Not Found` - Token valid but user no longer exists
/// * `503 Service Unavailable` - Database not configured
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    headers: axum::http::HeaderMap,
) -> Result<Json<UserResponse>, BackendError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        BackendError::unavailable("Database not configured")
    })?;

    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing authorization header");
            BackendError::unauthorized("No token provided")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid authorization header format");
        BackendError::unauthorized("Invalid authorization header format")
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Unauthorized: Invalid or expired token")
    })?;

    let user_id = uuid::Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::error!("Invalid user ID in token: {:?}", e);
        BackendError::unauthorized("Unauthorized: Invalid or expired token")
    })?;

    let user = crate::backend::auth::users::get_user_by_id(&pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            BackendError::Store(e.into())
        })?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", user_id);
            BackendError::not_found("User not found")
        })?;

    Ok(Json(UserResponse {
        id: user.id.to_string(),
        username: user.username,
        email: user.email,
    }))
}
