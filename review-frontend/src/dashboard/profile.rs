use crate::commands::{CommandContext, CommandRegistry};
use crate::models::{ActionDescriptor, Document, DocumentStatus, DocumentViewModel, Role};

/// What differs between the role dashboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardProfile {
    pub role: Role,
    /// Child path under `/dashboard`.
    pub path: &'static str,
    pub columns: Vec<&'static str>,
    pub allowed_statuses: Vec<DocumentStatus>,
    pub extra_filters: Vec<&'static str>,
    pub flatten_creator: bool,
}

impl DashboardProfile {
    pub fn submitter() -> Self {
        Self {
            role: Role::User,
            path: "user",
            columns: vec!["name", "status", "createdAt", "updatedAt"],
            allowed_statuses: DocumentStatus::ALL.to_vec(),
            extra_filters: Vec::new(),
            flatten_creator: false,
        }
    }

    /// Reviewers never see drafts and can filter by creator.
    pub fn reviewer() -> Self {
        Self {
            role: Role::Reviewer,
            path: "reviewer",
            columns: vec![
                "creatorId",
                "creatorEmail",
                "name",
                "status",
                "createdAt",
                "updatedAt",
            ],
            allowed_statuses: DocumentStatus::ALL
                .into_iter()
                .filter(|status| *status != DocumentStatus::Draft)
                .collect(),
            extra_filters: vec!["creatorId", "creatorEmail"],
            flatten_creator: true,
        }
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::User => Self::submitter(),
            Role::Reviewer => Self::reviewer(),
        }
    }

    pub fn registry(&self, ctx: &CommandContext) -> CommandRegistry {
        match self.role {
            Role::User => CommandRegistry::for_submitter(ctx),
            Role::Reviewer => CommandRegistry::for_reviewer(ctx),
        }
    }

    pub fn project(&self, document: &Document, actions: Vec<ActionDescriptor>) -> DocumentViewModel {
        if self.flatten_creator {
            DocumentViewModel::with_creator(document, actions)
        } else {
            DocumentViewModel::without_creator(document, actions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviewer_statuses_exclude_drafts() {
        let reviewer = DashboardProfile::reviewer();
        assert!(!reviewer.allowed_statuses.contains(&DocumentStatus::Draft));
        assert_eq!(reviewer.allowed_statuses.len(), 5);
        assert_eq!(DashboardProfile::submitter().allowed_statuses.len(), 6);
    }

    #[test]
    fn profiles_match_roles() {
        assert_eq!(DashboardProfile::for_role(Role::Reviewer).path, "reviewer");
        assert!(DashboardProfile::submitter().extra_filters.is_empty());
    }
}
