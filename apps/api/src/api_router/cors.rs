use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use vigil_core::AppError;

use crate::middleware::{API_VERSION_HEADER, REMOTE_USER_HEADER, SPACE_ID_HEADER};

pub(super) fn build_cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(allowed_origin).map_err(|error| {
            AppError::Validation(format!("invalid CORS_ALLOWED_ORIGIN: {error}"))
        })?)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderName::from_static(REMOTE_USER_HEADER),
            HeaderName::from_static(SPACE_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(API_VERSION_HEADER)]))
}
