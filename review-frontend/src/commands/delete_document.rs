use super::{CommandContext, DocumentCommand};
use crate::models::{ActionDescriptor, ActionStyle, ActionType, Document, DocumentStatus};
use async_trait::async_trait;

const SOURCE: &str = "DeleteDocumentCommand";
const CONFIRMATION: &str = "Are you sure you want to delete the document?";

/// Deletes drafts and revoked documents.
pub struct DeleteDocumentCommand {
    action: ActionDescriptor,
    ctx: CommandContext,
}

impl DeleteDocumentCommand {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            action: ActionDescriptor::new(ActionType::Delete, "Delete Document")
                .with_icon("delete")
                .with_style(ActionStyle::Error),
            ctx,
        }
    }
}

#[async_trait]
impl DocumentCommand for DeleteDocumentCommand {
    fn related_action(&self) -> &ActionDescriptor {
        &self.action
    }

    fn is_available(&self, document: Option<&Document>) -> bool {
        document.is_some_and(|d| matches!(d.status, DocumentStatus::Revoke | DocumentStatus::Draft))
    }

    async fn execute(&self, document: Option<&Document>) -> bool {
        let Some(document) = self.ctx.require(document, ActionType::Delete, SOURCE) else {
            return false;
        };

        let (confirmed, control) = self
            .ctx
            .modals
            .open_confirmation(CONFIRMATION)
            .await
            .into_parts();
        let api = &self.ctx.api;
        let id = document.id.as_str();

        self.ctx
            .complete(confirmed.filter(|yes| *yes), control, SOURCE, |_| async move {
                api.delete_document(id).await
            })
            .await
    }
}
