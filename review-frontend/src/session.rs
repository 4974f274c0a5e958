//! Per-browser client state: tokens, identity, dialogs and dashboards.
//!
//! A tower session cookie carries only a `client_id`; everything else lives in
//! the [`SessionRegistry`] on the server.

use crate::commands::CommandContext;
use crate::config::Settings;
use crate::dashboard::{DashboardProfile, DocumentTable};
use crate::guard::RoleRedirectGuard;
use crate::modal::{DialogQueue, ModalOrchestrator};
use crate::models::Role;
use crate::services::auth::LOGIN_ROUTE;
use crate::services::{
    AuthService, BackendClient, NotificationCenter, SessionNavigator, TokenStore, UserService,
};
use crate::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use dashmap::DashMap;
use service_core::error::AppError;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_sessions::Session;
use uuid::Uuid;

const CLIENT_ID_KEY: &str = "client_id";

pub struct ClientSession {
    pub id: Uuid,
    pub tokens: Arc<TokenStore>,
    pub backend: Arc<BackendClient>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub notifications: Arc<NotificationCenter>,
    pub navigator: Arc<SessionNavigator>,
    pub dialogs: Arc<DialogQueue>,
    pub guard: RoleRedirectGuard,
    submitter: Arc<DocumentTable>,
    reviewer: Arc<DocumentTable>,
    last_seen: AtomicI64,
    watcher: JoinHandle<()>,
}

impl ClientSession {
    /// Wire a fresh, logged-out session. Must run inside a tokio runtime.
    pub fn new(id: Uuid, settings: &Settings, http: reqwest::Client) -> Self {
        let tokens = Arc::new(TokenStore::new());
        let backend = Arc::new(BackendClient::new(
            http,
            settings.backend.url.clone(),
            tokens.clone(),
        ));
        let navigator = Arc::new(SessionNavigator::new(LOGIN_ROUTE));
        let notifications = Arc::new(NotificationCenter::new());

        let auth = Arc::new(AuthService::new(
            tokens.clone(),
            backend.clone(),
            navigator.clone(),
            settings.auth.accept_tokens_without_expiry,
        ));
        let users = Arc::new(UserService::new(
            backend.clone(),
            auth.clone(),
            notifications.clone(),
        ));
        let watcher = users.spawn_auth_watcher(&tokens);

        let dialogs = Arc::new(DialogQueue::new());
        let ctx = CommandContext {
            api: backend.clone(),
            modals: Arc::new(ModalOrchestrator::new(dialogs.clone())),
            reporter: notifications.clone(),
            navigator: navigator.clone(),
        };
        let table = |profile: DashboardProfile| {
            let registry = profile.registry(&ctx);
            Arc::new(DocumentTable::new(
                profile,
                registry,
                backend.clone(),
                notifications.clone(),
                settings.dashboard.initial_query(),
            ))
        };
        let submitter = table(DashboardProfile::submitter());
        let reviewer = table(DashboardProfile::reviewer());

        let guard = RoleRedirectGuard::new(users.clone(), notifications.clone());

        Self {
            id,
            tokens,
            backend,
            auth,
            users,
            notifications,
            navigator,
            dialogs,
            guard,
            submitter,
            reviewer,
            last_seen: AtomicI64::new(Utc::now().timestamp()),
            watcher,
        }
    }

    pub fn table(&self, role: Role) -> &Arc<DocumentTable> {
        match role {
            Role::User => &self.submitter,
            Role::Reviewer => &self.reviewer,
        }
    }

    fn touch(&self) {
        self.last_seen.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    fn idle_seconds(&self, now: i64) -> i64 {
        now - self.last_seen.load(Ordering::Relaxed)
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Live client sessions keyed by the id stored in the session cookie.
pub struct SessionRegistry {
    settings: Arc<Settings>,
    http: reqwest::Client,
    sessions: DashMap<Uuid, Arc<ClientSession>>,
}

impl SessionRegistry {
    pub fn new(settings: Arc<Settings>, http: reqwest::Client) -> Self {
        Self {
            settings,
            http,
            sessions: DashMap::new(),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<ClientSession>> {
        let session = self.sessions.get(id).map(|entry| entry.value().clone())?;
        session.touch();
        Some(session)
    }

    pub fn create(&self) -> Arc<ClientSession> {
        let id = Uuid::new_v4();
        let session = Arc::new(ClientSession::new(id, &self.settings, self.http.clone()));
        self.sessions.insert(id, session.clone());
        tracing::debug!(client_id = %id, "Client session created");
        session
    }

    pub fn remove(&self, id: &Uuid) {
        self.sessions.remove(id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Forget sessions idle for longer than the cookie inactivity window.
    pub fn prune_idle(&self) -> usize {
        let max_idle = self.settings.auth.session_inactivity_hours * 3600;
        let now = Utc::now().timestamp();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.idle_seconds(now) <= max_idle);
        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            tracing::info!(pruned, "Pruned idle client sessions");
        }
        pruned
    }
}

/// The calling browser's [`ClientSession`], created on first contact.
pub struct CurrentSession(pub Arc<ClientSession>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookie = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::InternalError(anyhow::anyhow!(message)))?;

        let known = cookie
            .get::<Uuid>(CLIENT_ID_KEY)
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("session store: {}", e)))?
            .and_then(|id| state.sessions.get(&id));

        if let Some(session) = known {
            return Ok(CurrentSession(session));
        }

        let session = state.sessions.create();
        cookie
            .insert(CLIENT_ID_KEY, session.id)
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("session store: {}", e)))?;
        Ok(CurrentSession(session))
    }
}
