use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Every failure the service can surface to a caller.
///
/// Each variant maps to exactly one HTTP status (see [`AppError::status`]);
/// store and hashing internals are never exposed and arrive here already
/// wrapped as [`AppError::Internal`].
///
/// Ownership mismatches on links are deliberately reported as
/// [`AppError::NotFound`] so that the existence of another user's link does
/// not leak. The only role/identity hard block is [`AppError::Forbidden`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input: bad destination URL, bad credentials, bad patch.
    #[error("{message}")]
    InvalidArgument { message: String, details: Value },
    /// Expiry timestamp not strictly in the future at submission time.
    #[error("{message}")]
    InvalidExpiry { message: String, details: Value },
    /// Missing resource, or a link owned by someone else.
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// The link exists but its expiry has passed.
    #[error("{message}")]
    Expired { message: String, details: Value },
    /// Missing or wrong link password, or failed bearer auth.
    #[error("{message}")]
    Unauthorized { message: String, details: Value },
    /// Role/identity hard block (admin self-delete, role gates).
    #[error("{message}")]
    Forbidden { message: String, details: Value },
    /// Uniqueness violation surfaced to the caller.
    #[error("{message}")]
    Conflict { message: String, details: Value },
    /// Code generation exhausted its bounded retries.
    #[error("{message}")]
    ServiceUnavailable { message: String, details: Value },
    /// Opaque wrapper for store/hash internals.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_argument(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_expiry(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidExpiry {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn expired(message: impl Into<String>, details: Value) -> Self {
        Self::Expired {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn service_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code serialized in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { .. } => "invalid_argument",
            AppError::InvalidExpiry { .. } => "invalid_expiry",
            AppError::NotFound { .. } => "not_found",
            AppError::Expired { .. } => "expired",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::Forbidden { .. } => "forbidden",
            AppError::Conflict { .. } => "conflict",
            AppError::ServiceUnavailable { .. } => "service_unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument { .. } | AppError::InvalidExpiry { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Expired { .. } | AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_parts(self) -> (StatusCode, &'static str, String, Value) {
        let status = self.status();
        let code = self.code();
        match self {
            AppError::InvalidArgument { message, details }
            | AppError::InvalidExpiry { message, details }
            | AppError::NotFound { message, details }
            | AppError::Expired { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Forbidden { message, details }
            | AppError::Conflict { message, details }
            | AppError::ServiceUnavailable { message, details }
            | AppError::Internal { message, details } => (status, code, message, details),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.into_parts();

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Wraps store failures. A unique-constraint violation becomes
/// [`AppError::Conflict`] so callers (code-collision retry, signup) can
/// react to it; everything else is reported opaquely.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        tracing::error!(error = %e, "database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::invalid_argument(
            "Request validation failed",
            serde_json::to_value(&e).unwrap_or_else(|_| json!({})),
        )
    }
}
