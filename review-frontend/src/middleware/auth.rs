use crate::services::auth::LOGIN_ROUTE;
use crate::services::Navigator;
use crate::session::CurrentSession;
use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Sends browsers without a valid access token to the login page.
pub async fn auth_middleware(
    CurrentSession(session): CurrentSession,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !session.auth.is_authenticated() {
        tracing::debug!(path = %request.uri().path(), "Unauthenticated request, redirecting");
        session.navigator.navigate_to(LOGIN_ROUTE);
        return Redirect::to(LOGIN_ROUTE).into_response();
    }

    next.run(request).await
}
