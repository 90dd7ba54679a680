/**
 * Login Handler
 *
 * This module implements the user authentication handler for
 * POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Invalid credentials return 401 Unauthorized
 * - User passwords are never returned in responses
 */
use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::BackendError;

/// Login handler
///
/// Verifies the email and password and returns a JWT token if
/// authentication succeeds.
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown user or incorrect password
/// * `503 Service Unavailable` - Database not configured
/// * `500 Internal Server Error` - Query or token generation failure
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        BackendError::unavailable("Database not configured")
    })?;
    tracing::info!("Login request for: {}", request.email);

    let email = request.email.trim().to_lowercase();
    let user = get_user_by_email(&pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            BackendError::Store(e.into())
        })?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", email);
            BackendError::unauthorized("User not found. Please register.")
        })?;

    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::internal("Server error")
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::unauthorized("Invalid password."));
    }

    let token = create_token(user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("Server error")
    })?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
        },
    }))
}
