//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sentra_shared::ErrorResponse;
use std::fmt;

use sentra_core::DomainError;
use sentra_core::domain::AuthFailure;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(&'static str),
    Forbidden(&'static str),
    Conflict(String),
    Gone(String),
    BadGateway(String),
    Internal(String),
    Validation(Vec<String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Gone(msg) => write!(f, "Gone: {}", msg),
            AppError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gone(_) => StatusCode::GONE,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => {
                ErrorResponse::unauthorized().with_detail(*detail)
            }
            AppError::Forbidden(detail) => ErrorResponse::forbidden().with_detail(*detail),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Gone(detail) => ErrorResponse::new(410, "Gone").with_detail(detail),
            AppError::BadGateway(detail) => {
                ErrorResponse::new(502, "Bad Gateway").with_detail(detail)
            }
            AppError::Internal(detail) => {
                // Log internal errors, hide the detail from clients
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::new(422, "Validation Failed")
                .with_violations(errors.clone()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// Map a business rejection to its HTTP shape. Messages are distinct per
/// reason but deliberately not enumerable by probing.
pub fn auth_failure_error(reason: AuthFailure) -> AppError {
    match reason {
        AuthFailure::UserNotRegistered => AppError::Unauthorized("Account is not registered"),
        AuthFailure::InvalidCredentials => AppError::Unauthorized("Invalid credentials"),
        AuthFailure::EmailNotVerified => AppError::Forbidden("E-mail address is not verified"),
        AuthFailure::RefreshTokenInvalid => {
            AppError::Unauthorized("Refresh token is invalid or expired")
        }
    }
}

// Infrastructure faults all collapse to opaque 5xx responses.
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Store(e) => AppError::Internal(format!("user store: {e}")),
            DomainError::Cache(e) => AppError::Internal(format!("token cache: {e}")),
            DomainError::Auth(e) => AppError::Internal(format!("auth backend: {e}")),
            DomainError::Mail(e) => AppError::BadGateway(e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
