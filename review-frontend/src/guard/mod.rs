//! Role navigation guard for role-partitioned route groups.

pub mod routes;

pub use routes::{ProtectedRoute, RouteGroup};

use crate::error::ClientError;
use crate::models::Role;
use crate::services::auth::LOGIN_ROUTE;
use crate::services::error_reporter::ErrorReporter;
use crate::services::metrics;
use async_trait::async_trait;
use std::sync::Arc;

const SOURCE: &str = "RoleRedirectGuard";

/// Asynchronously resolved role of the current user.
#[async_trait]
pub trait RoleSource: Send + Sync {
    /// Waits for the first settled identity and yields its role.
    async fn resolve_role(&self) -> Result<Role, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

pub struct RoleRedirectGuard {
    roles: Arc<dyn RoleSource>,
    reporter: Arc<dyn ErrorReporter>,
    fallback: String,
}

impl RoleRedirectGuard {
    pub fn new(roles: Arc<dyn RoleSource>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            roles,
            reporter,
            fallback: LOGIN_ROUTE.to_string(),
        }
    }

    pub fn with_fallback(self, fallback: &str) -> Self {
        Self {
            fallback: fallback.to_string(),
            ..self
        }
    }

    /// Decide entry into child `entering` of `group`.
    ///
    /// Waits once for the role; a failure to resolve it sends the user to the
    /// fallback route, never through.
    pub async fn can_activate_child(&self, group: &RouteGroup, entering: &str) -> GuardDecision {
        let decision = match self.roles.resolve_role().await {
            Ok(role) => self.decide_for_role(group, entering, role),
            Err(e) => {
                tracing::error!(entering = %entering, error = %e, "Error while obtaining user role");
                self.reporter
                    .report(&format!("Unable to resolve user role: {}", e), Some(SOURCE));
                self.fallback()
            }
        };

        let label = match &decision {
            GuardDecision::Allow => "allow",
            GuardDecision::Redirect(target) if *target == self.fallback => "fallback",
            GuardDecision::Redirect(_) => "redirect",
        };
        metrics::record_guard(label);
        tracing::info!(entering = %entering, decision = ?decision, "Role guard decision");

        decision
    }

    /// Decision for an already resolved role.
    pub fn decide_for_role(&self, group: &RouteGroup, entering: &str, role: Role) -> GuardDecision {
        match group.route_for(role) {
            None => {
                self.reporter.report(
                    &format!("No available routes for current role: \"{}\"", role),
                    Some(SOURCE),
                );
                self.fallback()
            }
            Some(route) if route.path == entering => GuardDecision::Allow,
            Some(route) => GuardDecision::Redirect(group.url_for(&route.path)),
        }
    }

    fn fallback(&self) -> GuardDecision {
        GuardDecision::Redirect(self.fallback.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::error_reporter::NotificationCenter;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::watch;

    /// Role source with a fixed answer.
    pub(crate) struct FixedRole(pub Result<Role, u16>);

    #[async_trait]
    impl RoleSource for FixedRole {
        async fn resolve_role(&self) -> Result<Role, ClientError> {
            self.0.map_err(|status| ClientError::Upstream {
                status,
                message: "identity lookup failed".to_string(),
            })
        }
    }

    /// Role source that settles when the test publishes a value.
    struct PendingRole {
        role: watch::Sender<Option<Role>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RoleSource for PendingRole {
        async fn resolve_role(&self) -> Result<Role, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rx = self.role.subscribe();
            let role = {
                let settled = rx
                    .wait_for(Option::is_some)
                    .await
                    .map_err(|_| ClientError::NotAuthenticated)?;
                *settled
            };
            role.ok_or(ClientError::NotAuthenticated)
        }
    }

    fn guard(roles: Arc<dyn RoleSource>) -> (RoleRedirectGuard, Arc<NotificationCenter>) {
        let reporter = Arc::new(NotificationCenter::new());
        (RoleRedirectGuard::new(roles, reporter.clone()), reporter)
    }

    #[tokio::test]
    async fn reviewer_is_moved_to_own_route() {
        let (guard, _) = guard(Arc::new(FixedRole(Ok(Role::Reviewer))));
        let group = RouteGroup::dashboard();

        assert_eq!(
            guard.can_activate_child(&group, "user").await,
            GuardDecision::Redirect("/dashboard/reviewer".to_string())
        );
        assert_eq!(
            guard.can_activate_child(&group, "reviewer").await,
            GuardDecision::Allow
        );
    }

    #[tokio::test]
    async fn every_role_lands_on_its_route_from_any_sibling() {
        let group = RouteGroup::dashboard();
        for role in [Role::User, Role::Reviewer] {
            let (guard, _) = guard(Arc::new(FixedRole(Ok(role))));
            let own = group.route_for(role).unwrap().path.clone();

            for entering in ["user", "reviewer"] {
                let expected = if entering == own {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(group.url_for(&own))
                };
                assert_eq!(guard.can_activate_child(&group, entering).await, expected);
            }
        }
    }

    #[tokio::test]
    async fn failing_role_source_always_falls_back_to_login() {
        for status in [401, 403, 500, 502] {
            let (guard, reporter) = guard(Arc::new(FixedRole(Err(status))));
            for entering in ["user", "reviewer", ""] {
                assert_eq!(
                    guard
                        .can_activate_child(&RouteGroup::dashboard(), entering)
                        .await,
                    GuardDecision::Redirect("/login".to_string())
                );
            }
            assert_eq!(reporter.drain().len(), 3);
        }
    }

    #[tokio::test]
    async fn role_without_route_is_reported_and_sent_to_login() {
        let (guard, reporter) = guard(Arc::new(FixedRole(Ok(Role::Reviewer))));
        let group = RouteGroup {
            path: "dashboard".to_string(),
            default_child: "user".to_string(),
            children: vec![ProtectedRoute::new("user", Role::User)],
        };

        assert_eq!(
            guard.can_activate_child(&group, "user").await,
            GuardDecision::Redirect("/login".to_string())
        );

        let notifications = reporter.drain();
        assert_eq!(notifications[0].title, "RoleRedirectGuard");
        assert_eq!(
            notifications[0].message,
            "No available routes for current role: \"REVIEWER\""
        );
    }

    #[tokio::test]
    async fn decision_waits_for_resolution_and_uses_first_value() {
        let source = Arc::new(PendingRole {
            role: watch::channel(None).0,
            calls: AtomicUsize::new(0),
        });
        let (guard, _) = guard(source.clone());
        let guard = Arc::new(guard);

        let pending = {
            let guard = guard.clone();
            tokio::spawn(async move {
                guard
                    .can_activate_child(&RouteGroup::dashboard(), "reviewer")
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        source.role.send_replace(Some(Role::Reviewer));
        let decision = pending.await.unwrap();
        source.role.send_replace(Some(Role::User));

        assert_eq!(decision, GuardDecision::Allow);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
