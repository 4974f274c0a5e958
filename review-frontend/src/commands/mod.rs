//! Document action commands and the per-role registries that dispatch them.

pub mod add_document;
pub mod change_name;
pub mod change_status;
pub mod delete_document;
pub mod registry;
pub mod revoke_document;
pub mod view_document;

pub use add_document::AddDocumentCommand;
pub use change_name::ChangeNameCommand;
pub use change_status::ChangeStatusCommand;
pub use delete_document::DeleteDocumentCommand;
pub use registry::{CommandRegistry, RegistryError};
pub use revoke_document::RevokeDocumentCommand;
pub use view_document::ViewDocumentCommand;

use crate::error::ClientError;
use crate::modal::{DialogControl, ModalOrchestrator};
use crate::models::{ActionDescriptor, ActionType, Document};
use crate::services::document_client::DocumentApi;
use crate::services::error_reporter::ErrorReporter;
use crate::services::navigation::Navigator;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// One document operation: when it is offered and what it does.
#[async_trait]
pub trait DocumentCommand: Send + Sync {
    fn related_action(&self) -> &ActionDescriptor;

    /// Whether the action is offered for `document` in the row menu.
    fn is_available(&self, document: Option<&Document>) -> bool;

    /// Run the operation. Returns whether the caller must reload its list.
    ///
    /// Cancellation and failures resolve to `false`; failures are reported.
    async fn execute(&self, document: Option<&Document>) -> bool;
}

/// Collaborators shared by every command of a session.
#[derive(Clone)]
pub struct CommandContext {
    pub api: Arc<dyn DocumentApi>,
    pub modals: Arc<ModalOrchestrator>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub navigator: Arc<dyn Navigator>,
}

impl CommandContext {
    /// The target document, or a reported error when the row is missing.
    fn require<'a>(
        &self,
        document: Option<&'a Document>,
        action: ActionType,
        source: &str,
    ) -> Option<&'a Document> {
        if document.is_none() {
            let err = ClientError::MissingDocument { action };
            tracing::error!(action = %action, "{}", err);
            self.reporter.report(&err.to_string(), Some(source));
        }
        document
    }

    /// Finish a dialog-driven mutation.
    ///
    /// Without dialog output nothing is sent to the backend. Otherwise the
    /// dialog shows as busy during `mutate` and is closed whatever its outcome.
    async fn complete<T, F, Fut>(
        &self,
        data: Option<T>,
        mut control: DialogControl,
        source: &str,
        mutate: F,
    ) -> bool
    where
        T: Send,
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = Result<(), ClientError>> + Send,
    {
        let Some(value) = data else {
            control.close_dialog();
            return false;
        };

        control.set_loading(true);
        let outcome = mutate(value).await;
        control.close_dialog();

        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(source = %source, error = %e, "Document command failed");
                self.reporter.report(&e.to_string(), Some(source));
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::modal::{DialogHost, DialogResponse, OpenDialog};
    use crate::models::{DocumentPage, DocumentQuery, DocumentStatus, NewDocument};
    use crate::services::error_reporter::NotificationCenter;
    use crate::services::navigation::SessionNavigator;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub(crate) fn document(id: &str, status: DocumentStatus) -> Document {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Document {}", id),
            "status": status,
            "creator": {
                "id": "u-1",
                "email": "sam@example.com",
                "fullName": "Sam Submitter",
                "role": "USER"
            },
            "createdAt": "2025-01-10T10:00:00Z",
            "updatedAt": "2025-01-11T10:00:00Z"
        }))
        .unwrap()
    }

    /// In-memory backend recording every mutation.
    #[derive(Default)]
    pub(crate) struct FakeDocuments {
        pub documents: Mutex<Vec<Document>>,
        pub calls: Mutex<Vec<String>>,
        pub fail_with: Mutex<Option<u16>>,
    }

    impl FakeDocuments {
        pub(crate) fn with(documents: Vec<Document>) -> Self {
            Self {
                documents: Mutex::new(documents),
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(call);
            match *self.fail_with.lock().unwrap() {
                Some(status) => Err(ClientError::Upstream {
                    status,
                    message: "backend failure".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl DocumentApi for FakeDocuments {
        async fn list_documents(&self, query: &DocumentQuery) -> Result<DocumentPage, ClientError> {
            self.record(format!("list page={} size={}", query.page, query.size))?;
            let results = self.documents.lock().unwrap().clone();
            Ok(DocumentPage {
                count: results.len() as u64,
                results,
            })
        }

        async fn get_document(&self, document_id: &str) -> Result<Document, ClientError> {
            self.record(format!("get {}", document_id))?;
            self.documents
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.id == document_id)
                .cloned()
                .ok_or(ClientError::Upstream {
                    status: 404,
                    message: "not found".to_string(),
                })
        }

        async fn create_document(&self, document: NewDocument) -> Result<Document, ClientError> {
            self.record(format!("create {} {}", document.name, document.status))?;
            Ok(Document {
                name: document.name,
                status: document.status,
                ..super::testing::document("new", DocumentStatus::Draft)
            })
        }

        async fn rename_document(&self, document_id: &str, name: &str) -> Result<(), ClientError> {
            self.record(format!("rename {} {}", document_id, name))
        }

        async fn delete_document(&self, document_id: &str) -> Result<(), ClientError> {
            self.record(format!("delete {}", document_id))
        }

        async fn change_status(
            &self,
            document_id: &str,
            status: DocumentStatus,
        ) -> Result<(), ClientError> {
            self.record(format!("status {} {}", document_id, status))
        }

        async fn revoke(&self, document_id: &str) -> Result<(), ClientError> {
            self.record(format!("revoke {}", document_id))
        }
    }

    pub(crate) enum Script {
        Respond(DialogResponse),
        Dismiss,
    }

    /// Host that answers each presented dialog from a script and keeps it
    /// around so tests can check it was closed.
    #[derive(Default)]
    pub(crate) struct ScriptedHost {
        script: Mutex<VecDeque<Script>>,
        pub presented: Mutex<Vec<OpenDialog>>,
    }

    impl ScriptedHost {
        pub(crate) fn answering(script: Vec<Script>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                presented: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn all_closed(&self) -> bool {
            self.presented.lock().unwrap().iter().all(OpenDialog::is_closed)
        }

        pub(crate) fn presented_count(&self) -> usize {
            self.presented.lock().unwrap().len()
        }
    }

    impl DialogHost for ScriptedHost {
        fn present(&self, mut dialog: OpenDialog) {
            let step = self.script.lock().unwrap().pop_front();
            match step {
                Some(Script::Respond(response)) => {
                    dialog.respond(response).unwrap();
                    self.presented.lock().unwrap().push(dialog);
                }
                Some(Script::Dismiss) | None => drop(dialog),
            }
        }
    }

    pub(crate) struct Harness {
        pub ctx: CommandContext,
        pub api: Arc<FakeDocuments>,
        pub host: Arc<ScriptedHost>,
        pub reporter: Arc<NotificationCenter>,
        pub navigator: Arc<SessionNavigator>,
    }

    pub(crate) fn harness(documents: Vec<Document>, script: Vec<Script>) -> Harness {
        let api = Arc::new(FakeDocuments::with(documents));
        let host = Arc::new(ScriptedHost::answering(script));
        let reporter = Arc::new(NotificationCenter::new());
        let navigator = Arc::new(SessionNavigator::new("/dashboard/user"));
        let ctx = CommandContext {
            api: api.clone(),
            modals: Arc::new(ModalOrchestrator::new(host.clone())),
            reporter: reporter.clone(),
            navigator: navigator.clone(),
        };
        Harness {
            ctx,
            api,
            host,
            reporter,
            navigator,
        }
    }
}
