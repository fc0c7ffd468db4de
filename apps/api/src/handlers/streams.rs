use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use vigil_core::AppError;

use crate::dto::{EnableStreamsResponse, StreamsStatusResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[cfg(test)]
mod tests;

/// Provisions the streams index and root stream definition.
///
/// Security policy rejections from the store surface as `400`; every
/// other failure surfaces as `500`.
pub async fn enable_streams_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<EnableStreamsResponse>> {
    state
        .streams_service
        .enable()
        .await
        .map_err(provisioning_error)?;

    Ok(Json(EnableStreamsResponse { acknowledged: true }))
}

pub async fn streams_status_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<StreamsStatusResponse>> {
    let status = state.streams_service.status().await?;
    Ok(Json(StreamsStatusResponse::from(status)))
}

fn provisioning_error(error: AppError) -> ApiError {
    let status = match error {
        AppError::SecurityPolicy(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    ApiError::with_status(error, status)
}
