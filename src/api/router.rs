use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::users;
use crate::config::ServerConfig;
use crate::infrastructure::observability::{
    create_metrics_router, MetricsConfig, PrometheusMetrics,
};

/// Create the full router with application state
pub fn create_router(
    state: AppState,
    server: &ServerConfig,
    metrics: Option<(PrometheusMetrics, &MetricsConfig)>,
) -> Router {
    let mut router = Router::new()
        .route("/createUser", post(users::create_user))
        .route("/getId", get(users::get_id))
        .route("/healthCheck", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .with_state(state);

    if let Some((handle, config)) = metrics {
        router = router.merge(create_metrics_router(handle, &config.path));
    }

    router = router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if server.cors_allow_any_origin {
        router = router.layer(CorsLayer::permissive());
    }

    router
}
