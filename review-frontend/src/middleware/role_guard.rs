use crate::guard::{GuardDecision, RouteGroup};
use crate::services::Navigator;
use crate::session::CurrentSession;
use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Runs the role guard before any `/dashboard/{child}` handler.
///
/// Unknown children are 404s; a child that belongs to another role redirects
/// to the caller's own dashboard.
pub async fn role_guard_middleware(
    CurrentSession(session): CurrentSession,
    Path(child): Path<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let group = RouteGroup::dashboard();
    if group.child(&child).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }

    match session.guard.can_activate_child(&group, &child).await {
        GuardDecision::Allow => {
            session.navigator.navigate_to(&group.url_for(&child));
            next.run(request).await
        }
        GuardDecision::Redirect(target) => {
            session.navigator.navigate_to(&target);
            Redirect::to(&target).into_response()
        }
    }
}
