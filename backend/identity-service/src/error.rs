use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use resilience::TimeoutError;
use thiserror::Error;

use crate::http::ApiResponse;

pub type Result<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email is required")]
    EmailRequired,

    #[error("email is invalid")]
    InvalidEmail,

    #[error("password is empty")]
    PasswordEmpty,

    #[error("password length must be greater than or equal to 6")]
    PasswordTooShort,

    #[error("email already used")]
    EmailAlreadyUsed,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user is already a merchant")]
    UserAlreadyMerchant,

    #[error("unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Coarse classification used for logging and response shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input, rejected before any I/O
    Validation,
    /// Expected, user-facing outcome of a business rule
    Business,
    /// Store, cache or signing failure; opaque to the caller
    Infrastructure,
}

impl IdentityError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IdentityError::EmailRequired
            | IdentityError::InvalidEmail
            | IdentityError::PasswordEmpty
            | IdentityError::PasswordTooShort => ErrorCategory::Validation,
            IdentityError::EmailAlreadyUsed
            | IdentityError::InvalidCredentials
            | IdentityError::UserAlreadyMerchant
            | IdentityError::Unauthorized => ErrorCategory::Business,
            IdentityError::Database(_)
            | IdentityError::Cache(_)
            | IdentityError::Token(_)
            | IdentityError::Timeout(_)
            | IdentityError::Internal(_) => ErrorCategory::Infrastructure,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            IdentityError::EmailRequired
            | IdentityError::InvalidEmail
            | IdentityError::PasswordEmpty
            | IdentityError::PasswordTooShort
            | IdentityError::UserAlreadyMerchant => StatusCode::BAD_REQUEST,
            IdentityError::InvalidCredentials | IdentityError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::EmailAlreadyUsed => StatusCode::CONFLICT,
            IdentityError::Database(_)
            | IdentityError::Cache(_)
            | IdentityError::Token(_)
            | IdentityError::Timeout(_)
            | IdentityError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code, one per error kind
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::EmailRequired => "40001",
            IdentityError::InvalidEmail => "40002",
            IdentityError::PasswordEmpty => "40003",
            IdentityError::PasswordTooShort => "40004",
            IdentityError::UserAlreadyMerchant => "40005",
            IdentityError::InvalidCredentials => "40101",
            IdentityError::Unauthorized => "40102",
            IdentityError::EmailAlreadyUsed => "40901",
            IdentityError::Database(_) => "50001",
            IdentityError::Cache(_)
            | IdentityError::Token(_)
            | IdentityError::Timeout(_)
            | IdentityError::Internal(_) => "99999",
        }
    }

    /// Short status phrase for the response envelope
    pub fn message(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => "bad request",
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::CONFLICT => "duplicate entry",
            _ => "internal server error",
        }
    }

    /// Error text safe to show the caller.
    ///
    /// Infrastructure detail never leaves the process.
    pub fn public_detail(&self) -> String {
        match self.category() {
            ErrorCategory::Infrastructure => match self {
                IdentityError::Database(_) => "error repository".to_string(),
                _ => "unknown error".to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.category() {
            ErrorCategory::Infrastructure => {
                tracing::error!(code = self.code(), error = %self, "request failed");
            }
            ErrorCategory::Validation | ErrorCategory::Business => {
                tracing::debug!(code = self.code(), error = %self, "request rejected");
            }
        }

        ApiResponse::<()>::failure(self.message(), self.public_detail(), self.code())
            .with_status(status)
            .into_response()
    }
}

// Conversions from external error types
impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        IdentityError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for IdentityError {
    fn from(err: redis::RedisError) -> Self {
        IdentityError::Cache(err.to_string())
    }
}

impl<E> From<TimeoutError<E>> for IdentityError
where
    E: Into<IdentityError>,
{
    fn from(err: TimeoutError<E>) -> Self {
        match err {
            TimeoutError::Elapsed { operation, elapsed } => {
                IdentityError::Timeout(format!("{} exceeded {:?}", operation, elapsed))
            }
            TimeoutError::Inner(inner) => inner.into(),
        }
    }
}
