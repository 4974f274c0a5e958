//! Identity of the signed-in user, resolved from `GET /user`.

use crate::error::ClientError;
use crate::guard::RoleSource;
use crate::models::{Role, User};
use crate::services::auth::{AuthService, TokenStore};
use crate::services::auth_client::AccountApi;
use crate::services::error_reporter::ErrorReporter;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const SOURCE: &str = "UserService";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    /// A profile request is in flight.
    Unresolved,
    /// No valid token.
    Anonymous,
    Resolved(User),
    Failed(String),
}

impl IdentityState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, IdentityState::Unresolved)
    }
}

pub struct UserService {
    state: watch::Sender<IdentityState>,
    accounts: Arc<dyn AccountApi>,
    auth: Arc<AuthService>,
    reporter: Arc<dyn ErrorReporter>,
    generation: AtomicU64,
}

impl UserService {
    pub fn new(
        accounts: Arc<dyn AccountApi>,
        auth: Arc<AuthService>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            state: watch::channel(IdentityState::Unresolved).0,
            accounts,
            auth,
            reporter,
            generation: AtomicU64::new(0),
        }
    }

    /// Re-resolve the identity for the current token.
    ///
    /// Only the latest refresh may publish. A failed profile load ends the
    /// session: it is reported and the user is logged out.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.auth.is_authenticated() {
            self.publish(generation, IdentityState::Anonymous);
            return;
        }

        self.publish(generation, IdentityState::Unresolved);

        match self.accounts.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "Identity resolved");
                self.publish(generation, IdentityState::Resolved(user));
            }
            Err(e) => {
                let message = format!("Failed to load user profile: {}", e);
                if self.publish(generation, IdentityState::Failed(message.clone())) {
                    self.reporter.report(&message, Some(SOURCE));
                    self.auth.logout();
                }
            }
        }
    }

    /// Follow token changes for as long as the service is alive.
    pub fn spawn_auth_watcher(self: &Arc<Self>, tokens: &TokenStore) -> JoinHandle<()> {
        let mut changes = tokens.subscribe();
        let service = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                match service.upgrade() {
                    Some(service) => service.refresh().await,
                    None => break,
                }
                if changes.changed().await.is_err() {
                    break;
                }
            }
            tracing::debug!("Identity watcher stopped");
        })
    }

    pub fn state(&self) -> IdentityState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        match &*self.state.borrow() {
            IdentityState::Resolved(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|user| user.role)
    }

    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.state.subscribe()
    }

    fn publish(&self, generation: u64, state: IdentityState) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Dropping stale identity result");
            return false;
        }
        self.state.send_replace(state);
        true
    }
}

#[async_trait]
impl RoleSource for UserService {
    async fn resolve_role(&self) -> Result<Role, ClientError> {
        let mut states = self.state.subscribe();

        // First settled value only; later changes do not affect this call.
        // An anonymous state left over from before a login is not settled yet:
        // the watcher has still to pick up the new token.
        let settled = {
            let state = states
                .wait_for(|state| match state {
                    IdentityState::Anonymous => !self.auth.is_authenticated(),
                    other => other.is_settled(),
                })
                .await
                .map_err(|_| ClientError::Identity("identity source closed".to_string()))?;
            state.clone()
        };

        match settled {
            IdentityState::Resolved(user) => Ok(user.role),
            IdentityState::Anonymous => Err(ClientError::NotAuthenticated),
            IdentityState::Failed(message) => Err(ClientError::Identity(message)),
            IdentityState::Unresolved => Err(ClientError::Identity(
                "identity still unresolved".to_string(),
            )),
        }
    }
}
