use crate::models::Role;

/// Child route of a role-partitioned group. A child without a role is never
/// selected by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub path: String,
    pub role: Option<Role>,
}

impl ProtectedRoute {
    pub fn new(path: &str, role: Role) -> Self {
        Self {
            path: path.to_string(),
            role: Some(role),
        }
    }
}

/// A parent route whose children are split by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGroup {
    pub path: String,
    /// Child the bare group path redirects to before the guard runs.
    pub default_child: String,
    pub children: Vec<ProtectedRoute>,
}

impl RouteGroup {
    /// `/dashboard` with its submitter and reviewer views.
    pub fn dashboard() -> Self {
        Self {
            path: "dashboard".to_string(),
            default_child: "user".to_string(),
            children: vec![
                ProtectedRoute::new("user", Role::User),
                ProtectedRoute::new("reviewer", Role::Reviewer),
            ],
        }
    }

    /// First child declared for `role`; declaration order breaks ties.
    pub fn route_for(&self, role: Role) -> Option<&ProtectedRoute> {
        self.children.iter().find(|route| route.role == Some(role))
    }

    pub fn child(&self, path: &str) -> Option<&ProtectedRoute> {
        self.children.iter().find(|route| route.path == path)
    }

    pub fn url_for(&self, child: &str) -> String {
        format!("/{}/{}", self.path, child)
    }
}
