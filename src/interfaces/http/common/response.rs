//! Response envelope and error-to-status mapping

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every REST endpoint wraps its payload in this type.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's `Result`.
pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

/// Map a [`DomainError`] onto an HTTP status and envelope.
///
/// Infrastructure failures are logged here and reported to the client
/// without their internal detail.
pub fn domain_error_response<T>(e: DomainError) -> ApiError<T> {
    let status = match &e {
        DomainError::DuplicateAccount(_) => StatusCode::CONFLICT,
        DomainError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        DomainError::Infra(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if e.is_infrastructure() {
        error!(error = %e, "Request failed on infrastructure error");
        "internal server error".to_string()
    } else {
        e.to_string()
    };

    (status, Json(ApiResponse::error(message)))
}
