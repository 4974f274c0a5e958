use crate::models::{Role, User};
use crate::services::{IdentityState, Navigator, Notification};
use crate::session::{ClientSession, CurrentSession};
use axum::response::Json;
use serde::Serialize;

/// Client-visible session state. Reading it drains pending notifications.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub location: String,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub notifications: Vec<Notification>,
}

impl SessionView {
    pub fn of(session: &ClientSession) -> Self {
        Self {
            location: session.navigator.current(),
            authenticated: session.auth.is_authenticated(),
            role: session.users.role(),
            user: match session.users.state() {
                IdentityState::Resolved(user) => Some(user),
                _ => None,
            },
            notifications: session.notifications.drain(),
        }
    }
}

pub async fn session_handler(CurrentSession(session): CurrentSession) -> Json<SessionView> {
    Json(SessionView::of(&session))
}
