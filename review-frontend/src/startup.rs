use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::tracing::request_id_middleware;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, metrics},
    auth::{login_handler, login_page, logout_handler},
    dashboard::{action_handler, dashboard_handler, dashboard_root},
    dialogs::{current_dialog, respond_dialog, upload_document},
    documents::document_handler,
    session::session_handler,
};
use crate::middleware::{
    auth::auth_middleware, metrics::metrics_middleware, role_guard::role_guard_middleware,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            state.settings.auth.session_inactivity_hours,
        )));

    let role_routes = Router::new()
        .route("/dashboard/:child", get(dashboard_handler))
        .route("/dashboard/:child/actions", post(action_handler))
        .route_layer(from_fn_with_state(state.clone(), role_guard_middleware));

    let protected = Router::new()
        .route("/dashboard", get(dashboard_root))
        .route("/document/:id", get(document_handler))
        .route("/dialog", get(current_dialog).post(respond_dialog))
        .route("/dialog/upload", post(upload_document))
        .merge(role_routes)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler))
        .route("/session", get(session_handler))
        .merge(protected)
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
