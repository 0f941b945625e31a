// ABOUTME: Application error type shared by every HTTP handler
// ABOUTME: Maps failures to status codes, machine-readable codes and sanitized messages

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use intake_ai::ErrorCategory;
use intake_auth::AuthError;

/// Main application error type that all handlers should return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The completion API key is absent or still the template placeholder
    #[error("Completion API key is not configured")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Another message is already being processed for this session")]
    SessionBusy,

    /// The completion call failed after the turn was recorded
    #[error("Upstream {category:?} error: {detail}")]
    Upstream {
        category: ErrorCategory,
        detail: String,
    },

    #[error("Auth provider error: {0}")]
    AuthProvider(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl AppError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::MissingApiKey | AppError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            AppError::SessionBusy => (StatusCode::CONFLICT, "SESSION_BUSY"),
            AppError::Upstream { category, .. } => (StatusCode::BAD_GATEWAY, category.code()),
            AppError::AuthProvider(_) => (StatusCode::BAD_GATEWAY, "AUTH_PROVIDER_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// User-facing message (sanitized for external consumption)
    fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation failed: {}", msg),
            AppError::Unauthorized => "No autorizado. Debes iniciar sesión.".to_string(),
            AppError::InvalidCredentials => "Email o contraseña incorrectos.".to_string(),
            AppError::MissingApiKey => {
                "OPENAI_API_KEY no está configurada correctamente. Por favor, configura tu API key en el archivo .env"
                    .to_string()
            }
            AppError::Configuration(_) => "Server configuration error".to_string(),
            AppError::SessionBusy => {
                "Todavía estoy respondiendo tu mensaje anterior. Espera un momento.".to_string()
            }
            AppError::Upstream { category, .. } => category.user_message().to_string(),
            AppError::AuthProvider(msg) => msg.clone(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();
        let user_message = self.to_user_message();

        // Log internal errors with full context but don't expose details
        match &self {
            AppError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = %err,
                    "Internal server error occurred"
                );
            }
            AppError::Configuration(msg) => {
                error!(
                    request_id = %request_id,
                    config_error = %msg,
                    "Configuration error"
                );
            }
            AppError::MissingApiKey => {
                error!(request_id = %request_id, "Completion API key missing or placeholder");
            }
            AppError::Upstream { category, detail } => {
                warn!(
                    request_id = %request_id,
                    category = ?category,
                    upstream_error = %detail,
                    "Completion call failed"
                );
            }
            AppError::AuthProvider(msg) => {
                warn!(
                    request_id = %request_id,
                    provider_error = %msg,
                    "Auth provider request failed"
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let error_response = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message: user_message,
            },
            request_id,
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::SessionInvalid => AppError::Unauthorized,
            AuthError::InvalidInput(msg) => AppError::Validation(msg),
            AuthError::Configuration(msg) => AppError::Configuration(msg),
            AuthError::Provider(msg) => AppError::AuthProvider(msg),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn upstream(category: ErrorCategory, detail: impl Into<String>) -> Self {
        Self::Upstream {
            category,
            detail: detail.into(),
        }
    }
}
