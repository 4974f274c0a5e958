//! Paginated, filterable document table shared by both role dashboards.

use super::DashboardProfile;
use crate::commands::CommandRegistry;
use crate::error::ClientError;
use crate::models::{ActionType, Document, DocumentPage, DocumentQuery, DocumentViewModel};
use crate::services::document_client::DocumentApi;
use crate::services::error_reporter::ErrorReporter;
use dashmap::DashSet;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

const SOURCE: &str = "DocumentTable";

/// What the table currently shows.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub data: DocumentPage<DocumentViewModel>,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Backend rows behind `data`, handed to commands.
    #[serde(skip)]
    pub documents: Vec<Document>,
}

pub struct DocumentTable {
    profile: DashboardProfile,
    registry: CommandRegistry,
    api: Arc<dyn DocumentApi>,
    reporter: Arc<dyn ErrorReporter>,
    query: watch::Sender<DocumentQuery>,
    state: watch::Sender<TableState>,
    generation: AtomicU64,
    loaded: AtomicBool,
    in_flight: DashSet<(ActionType, Option<String>)>,
}

impl DocumentTable {
    pub fn new(
        profile: DashboardProfile,
        registry: CommandRegistry,
        api: Arc<dyn DocumentApi>,
        reporter: Arc<dyn ErrorReporter>,
        initial_query: DocumentQuery,
    ) -> Self {
        Self {
            profile,
            registry,
            api,
            reporter,
            query: watch::channel(initial_query).0,
            state: watch::channel(TableState::default()).0,
            generation: AtomicU64::new(0),
            loaded: AtomicBool::new(false),
            in_flight: DashSet::new(),
        }
    }

    pub fn profile(&self) -> &DashboardProfile {
        &self.profile
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn query(&self) -> DocumentQuery {
        self.query.borrow().clone()
    }

    pub fn state(&self) -> TableState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TableState> {
        self.state.subscribe()
    }

    /// Apply a new request state. Fetches only when it differs by value from
    /// the current one, or when nothing was loaded yet.
    pub async fn set_query(&self, query: DocumentQuery) {
        let changed = self.query.send_if_modified(|current| {
            if *current == query {
                return false;
            }
            *current = query;
            true
        });

        if changed || !self.loaded.load(Ordering::SeqCst) {
            self.reload().await;
        } else {
            tracing::debug!(role = %self.profile.role, "Query unchanged, keeping current page");
        }
    }

    /// Refetch the current query. Results of superseded fetches are dropped.
    pub async fn reload(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.query();
        self.loaded.store(true, Ordering::SeqCst);
        self.state.send_modify(|state| state.is_loading = true);

        let result = self.api.list_documents(&query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                role = %self.profile.role,
                page = query.page,
                "Discarding superseded document page"
            );
            return;
        }

        match result {
            Ok(page) => {
                let data = DocumentPage {
                    count: page.count,
                    results: page
                        .results
                        .iter()
                        .map(|document| {
                            self.profile
                                .project(document, self.registry.compute_actions(document))
                        })
                        .collect(),
                };
                tracing::debug!(
                    role = %self.profile.role,
                    page = query.page,
                    rows = data.results.len(),
                    count = data.count,
                    "Loaded document page"
                );
                self.state.send_replace(TableState {
                    data,
                    is_loading: false,
                    error: None,
                    documents: page.results,
                });
            }
            Err(e) => {
                tracing::error!(role = %self.profile.role, error = %e, "Failed to load documents");
                self.reporter.report(&e.to_string(), Some(SOURCE));
                self.state.send_replace(TableState {
                    error: Some(e.to_string()),
                    ..TableState::default()
                });
            }
        }
    }

    /// Run an action chosen in the table and reload when it changed data.
    ///
    /// A second request for the same action on the same row is ignored while
    /// the first one is still running. Returns whether the table was reloaded.
    pub async fn handle_action(&self, action: ActionType, document_id: Option<&str>) -> bool {
        let key = (action, document_id.map(str::to_string));
        if !self.in_flight.insert(key.clone()) {
            tracing::warn!(action = %action, document_id = ?document_id, "Action already running");
            return false;
        }
        let _running = InFlight {
            set: &self.in_flight,
            key,
        };

        let document = match document_id {
            Some(id) => match self.find_document(id).await {
                Some(document) => Some(document),
                None => return false,
            },
            None => None,
        };

        if let Some(document) = &document {
            if !self.registry.allows(action, document) {
                let err = ClientError::ActionNotAvailable {
                    action,
                    status: document.status,
                };
                tracing::warn!(document_id = %document.id, "{}", err);
                self.reporter.report(&err.to_string(), Some(SOURCE));
                return false;
            }
        }

        let refresh = self.registry.dispatch(action, document.as_ref()).await;
        if refresh {
            self.reload().await;
        }
        refresh
    }

    /// Row from the current page, falling back to the backend for rows that
    /// scrolled away since the action was chosen.
    async fn find_document(&self, id: &str) -> Option<Document> {
        let cached = self
            .state
            .borrow()
            .documents
            .iter()
            .find(|document| document.id == id)
            .cloned();
        if cached.is_some() {
            return cached;
        }

        match self.api.get_document(id).await {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::error!(document_id = %id, error = %e, "Failed to load document for action");
                self.reporter.report(&e.to_string(), Some(SOURCE));
                None
            }
        }
    }
}

struct InFlight<'a> {
    set: &'a DashSet<(ActionType, Option<String>)>,
    key: (ActionType, Option<String>),
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.key);
    }
}
