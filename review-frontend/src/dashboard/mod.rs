//! Role dashboards: a document table plus the actions offered around it.

pub mod profile;
pub mod table;

pub use profile::DashboardProfile;
pub use table::{DocumentTable, TableState};

use crate::models::{ActionDescriptor, ActionType, DocumentQuery, DocumentStatus, Role};
use serde::Serialize;

/// Everything a client needs to render one dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub role: Role,
    pub columns: Vec<&'static str>,
    pub allowed_statuses: Vec<DocumentStatus>,
    pub extra_filters: Vec<&'static str>,
    /// Actions not bound to a row, such as adding a document.
    pub toolbar_actions: Vec<ActionDescriptor>,
    pub query: DocumentQuery,
    #[serde(flatten)]
    pub table: TableState,
}

impl DashboardView {
    pub fn of(table: &DocumentTable) -> Self {
        let profile = table.profile();
        Self {
            role: profile.role,
            columns: profile.columns.clone(),
            allowed_statuses: profile.allowed_statuses.clone(),
            extra_filters: profile.extra_filters.clone(),
            toolbar_actions: table
                .registry()
                .command_for(ActionType::Add)
                .map(|command| vec![command.related_action().clone()])
                .unwrap_or_default(),
            query: table.query(),
            table: table.state(),
        }
    }
}
