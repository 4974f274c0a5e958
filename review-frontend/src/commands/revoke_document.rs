use super::{CommandContext, DocumentCommand};
use crate::models::{ActionDescriptor, ActionStyle, ActionType, Document, DocumentStatus};
use async_trait::async_trait;

const SOURCE: &str = "RevokeDocumentCommand";
const CONFIRMATION: &str = "Are you sure you want to revoke the document?";

/// Pulls a submitted document back out of the review queue.
pub struct RevokeDocumentCommand {
    action: ActionDescriptor,
    ctx: CommandContext,
}

impl RevokeDocumentCommand {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            action: ActionDescriptor::new(ActionType::Revoke, "Revoke")
                .with_icon("undo")
                .with_style(ActionStyle::Warn),
            ctx,
        }
    }
}

#[async_trait]
impl DocumentCommand for RevokeDocumentCommand {
    fn related_action(&self) -> &ActionDescriptor {
        &self.action
    }

    fn is_available(&self, document: Option<&Document>) -> bool {
        document.is_some_and(|d| d.status == DocumentStatus::ReadyForReview)
    }

    async fn execute(&self, document: Option<&Document>) -> bool {
        let Some(document) = self.ctx.require(document, ActionType::Revoke, SOURCE) else {
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
                api.revoke(id).await
            })
            .await
    }
}
