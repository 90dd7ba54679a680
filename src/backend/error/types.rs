/**
 * Backend Error Types
 *
 * This module defines error types for the REST surface. Each variant maps
 * to an HTTP status code and a human-readable message; the `IntoResponse`
 * implementation in `conversion.rs` renders them as structured JSON bodies.
 *
 * Real-time operation handling deliberately does NOT use these: errors at
 * the hub boundary are logged and swallowed so one bad operation cannot
 * take down the relay loop for other participants.
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Errors surfaced by REST handlers
#[derive(Debug, Error)]
pub enum BackendError {
    /// Requested resource does not exist
    #[error("{message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid credentials
    #[error("{message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Authenticated but not allowed to perform this action
    #[error("{message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Request payload failed validation
    #[error("{message}")]
    Validation {
        /// Human-readable error message
        message: String,
    },

    /// Resource already exists (duplicate signup, duplicate collaborator)
    #[error("{message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// A required backing service is not configured
    #[error("{message}")]
    Unavailable {
        /// Human-readable error message
        message: String,
    },

    /// Unexpected server-side failure
    #[error("{message}")]
    Internal {
        /// Human-readable error message
        message: String,
    },

    /// Document store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Shared error (from the shared module)
    #[error(transparent)]
    Shared(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a service-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shared(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } | SharedError::ProtocolError { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Validation { message }
            | Self::Conflict { message }
            | Self::Unavailable { message }
            | Self::Internal { message } => message.clone(),
            Self::Store(err) => err.to_string(),
            Self::Shared(err) => err.to_string(),
            Self::Serialization(err) => err.to_string(),
        }
    }
}
