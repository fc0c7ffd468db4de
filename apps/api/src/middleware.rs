use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use vigil_core::{AppError, Namespace, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

pub const API_VERSION_HEADER: &str = "elastic-api-version";
pub const SUPPORTED_API_VERSION: &str = "2023-10-31";
pub const REMOTE_USER_HEADER: &str = "x-remote-user";
pub const SPACE_ID_HEADER: &str = "x-space-id";

/// Rejects unsupported API versions and echoes the served version.
pub async fn require_api_version(request: Request, next: Next) -> ApiResult<Response> {
    if let Some(version) = header_text(request.headers(), API_VERSION_HEADER)?
        && version != SUPPORTED_API_VERSION
    {
        return Err(AppError::Validation(format!(
            "unsupported {API_VERSION_HEADER} '{version}', expected '{SUPPORTED_API_VERSION}'"
        ))
        .into());
    }

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_static(SUPPORTED_API_VERSION),
    );
    Ok(response)
}

/// Resolves the caller forwarded by the host platform.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let subject = header_text(request.headers(), REMOTE_USER_HEADER)?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("{REMOTE_USER_HEADER} header is required")))?;

    let namespace = match header_text(request.headers(), SPACE_ID_HEADER)? {
        Some(space_id) => Namespace::new(space_id)?,
        None => state.default_namespace.clone(),
    };

    request
        .extensions_mut()
        .insert(UserIdentity::new(subject, namespace));
    Ok(next.run(request).await)
}

fn header_text(headers: &HeaderMap, name: &str) -> Result<Option<String>, AppError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| AppError::Validation(format!("{name} header must be visible ASCII")))
        })
        .transpose()
}
