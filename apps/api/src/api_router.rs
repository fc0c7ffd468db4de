mod cors;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use vigil_core::AppError;

use crate::state::AppState;
use crate::{handlers, middleware};

use cors::build_cors_layer;

pub fn build_router(
    app_state: AppState,
    cors_allowed_origin: Option<&str>,
) -> Result<Router, AppError> {
    let anonymization_field_routes = Router::new()
        .route(
            "/api/security_ai_assistant/anonymization_fields/_bulk_action",
            post(handlers::anonymization_fields::perform_bulk_action_handler),
        )
        .route(
            "/api/security_ai_assistant/anonymization_fields/_find",
            get(handlers::anonymization_fields::find_anonymization_fields_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::resolve_identity,
        ));

    let streams_routes = Router::new()
        .route(
            "/api/streams/_enable",
            post(handlers::streams::enable_streams_handler),
        )
        .route(
            "/api/streams/_status",
            get(handlers::streams::streams_status_handler),
        );

    let api_routes = Router::new()
        .merge(anonymization_field_routes)
        .merge(streams_routes)
        .route_layer(from_fn(middleware::require_api_version));

    let router = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    match cors_allowed_origin {
        Some(origin) => Ok(router.layer(build_cors_layer(origin)?)),
        None => Ok(router),
    }
}
