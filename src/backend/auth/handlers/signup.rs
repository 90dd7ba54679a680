/**
 * Signup Handler
 *
 * This module implements the user registration handler for
 * POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate username, email format, and password length
 * 2. Check if username or email is already taken
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate JWT token
 * 6. Return token and user info
 *
 * # Security
 *
 * - Passwords are hashed using bcrypt with DEFAULT_COST
 * - Passwords are never returned in responses
 */
use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::BackendError;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    // First character must be a letter
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    // Rest can be alphanumeric or underscore
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate email shape: non-empty local part, non-empty domain with a dot,
/// no whitespace anywhere
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Sign up handler
///
/// Validates the input, creates a new user account, and returns a JWT
/// token for immediate authentication.
///
/// # Errors
///
/// * `400 Bad Request` - Invalid username, email format, or short password
/// * `409 Conflict` - Username or email already registered
/// * `503 Service Unavailable` - Database not configured
/// * `500 Internal Server Error` - Hashing, insertion, or token failure
pub async fn signup(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        BackendError::unavailable("Database not configured")
    })?;
    tracing::info!(
        "Signup request for username: {}, email: {}",
        request.username,
        request.email
    );

    if !is_valid_username(&request.username) {
        tracing::warn!("Invalid username format: {}", request.username);
        return Err(BackendError::validation(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    let email = request.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err(BackendError::validation("Invalid email address format."));
    }

    if request.password.len() < 8 {
        tracing::warn!("Password too short");
        return Err(BackendError::validation(
            "Password must be at least 8 characters",
        ));
    }

    if let Ok(Some(_)) = get_user_by_username(&pool, &request.username).await {
        tracing::warn!("Username already exists: {}", request.username);
        return Err(BackendError::conflict("Username already taken"));
    }

    if let Ok(Some(_)) = get_user_by_email(&pool, &email).await {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::conflict("User already exists."));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("Server error")
    })?;

    let user = create_user(&pool, request.username.clone(), email, password_hash)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            BackendError::Store(e.into())
        })?;

    let token = create_token(user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("Server error")
    })?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse {
                id: user.id.to_string(),
                username: user.username,
                email: user.email,
            },
        }),
    ))
}
