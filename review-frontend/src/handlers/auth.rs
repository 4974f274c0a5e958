use super::session::SessionView;
use crate::models::Credentials;
use crate::services::auth::LOGIN_ROUTE;
use crate::services::{ErrorReporter, Navigator};
use crate::session::CurrentSession;
use crate::AppState;
use axum::{
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use serde_json::json;
use service_core::error::AppError;
use validator::Validate;

/// Where a logged-out browser lands; tells the client whether to show the form.
pub async fn login_page(CurrentSession(session): CurrentSession) -> Json<SessionView> {
    Json(SessionView::of(&session))
}

/// Accepts credentials as a urlencoded form or as JSON.
pub async fn login_handler(
    CurrentSession(session): CurrentSession,
    request: Request,
) -> Result<Response, AppError> {
    let credentials = read_credentials(request).await?;
    credentials
        .validate()
        .map_err(|e| AppError::Unprocessable(e.to_string()))?;

    if let Err(e) = session.auth.login(&credentials).await {
        tracing::warn!(email = %credentials.email, error = %e, "Login failed");
        session.notifications.report(&e.to_string(), Some("AuthService"));
        return Err(e.into());
    }

    let location = session.navigator.current();
    tracing::info!(client_id = %session.id, location = %location, "Session logged in");

    Ok((
        StatusCode::OK,
        [("HX-Redirect", location.clone())],
        Json(json!({ "location": location })),
    )
        .into_response())
}

/// Ends the client runtime; the next request starts a fresh one.
pub async fn logout_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Redirect {
    session.auth.logout();
    state.sessions.remove(&session.id);
    tracing::info!(client_id = %session.id, "Session logged out");
    Redirect::to(LOGIN_ROUTE)
}

async fn read_credentials(request: Request) -> Result<Credentials, AppError> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json {
        Json::<Credentials>::from_request(request, &())
            .await
            .map(|Json(credentials)| credentials)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))
    } else {
        Form::<Credentials>::from_request(request, &())
            .await
            .map(|Form(credentials)| credentials)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))
    }
}
