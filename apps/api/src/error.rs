mod types;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use vigil_core::AppError;

pub use types::ErrorResponse;

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    status: StatusCode,
}

impl ApiError {
    /// Wraps an error with an explicit response status.
    #[must_use]
    pub fn with_status(error: AppError, status: StatusCode) -> Self {
        Self { error, status }
    }

    /// Returns the response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the wrapped application error.
    #[must_use]
    pub fn app_error(&self) -> &AppError {
        &self.error
    }
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        let status = match value {
            AppError::Validation(_) | AppError::SecurityPolicy(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            error: value,
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = %self.error, "request failed");
        }

        let payload = Json(ErrorResponse::new(
            self.status.as_u16(),
            self.status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_owned(),
            self.error.to_string(),
        ));

        (self.status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use vigil_core::AppError;

    use super::ApiError;

    #[test]
    fn default_mapping_follows_error_category() {
        let cases = [
            (AppError::Validation("bad".to_owned()), StatusCode::BAD_REQUEST),
            (
                AppError::SecurityPolicy("denied".to_owned()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound("gone".to_owned()), StatusCode::NOT_FOUND),
            (AppError::Conflict("taken".to_owned()), StatusCode::CONFLICT),
            (
                AppError::Unauthorized("who".to_owned()),
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::Forbidden("no".to_owned()), StatusCode::FORBIDDEN),
            (
                AppError::Internal("boom".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn explicit_status_overrides_mapping() {
        let error = ApiError::with_status(
            AppError::NotFound("index".to_owned()),
            StatusCode::INTERNAL_SERVER_ERROR,
        );

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(error.app_error(), AppError::NotFound(_)));
    }
}
