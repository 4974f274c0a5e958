use super::{CommandContext, DocumentCommand};
use crate::models::{ActionDescriptor, ActionStyle, ActionType, Document, DocumentStatus};
use async_trait::async_trait;

const SOURCE: &str = "ChangeStatusCommand";

/// Reviewer decision on a document that is waiting for or in review.
pub struct ChangeStatusCommand {
    action: ActionDescriptor,
    ctx: CommandContext,
}

impl ChangeStatusCommand {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            action: ActionDescriptor::new(ActionType::ChangeStatus, "Change Status")
                .with_icon("change_circle")
                .with_style(ActionStyle::Primary),
            ctx,
        }
    }
}

#[async_trait]
impl DocumentCommand for ChangeStatusCommand {
    fn related_action(&self) -> &ActionDescriptor {
        &self.action
    }

    fn is_available(&self, document: Option<&Document>) -> bool {
        document.is_some_and(|d| {
            matches!(
                d.status,
                DocumentStatus::UnderReview | DocumentStatus::ReadyForReview
            )
        })
    }

    async fn execute(&self, document: Option<&Document>) -> bool {
        let Some(document) = self.ctx.require(document, ActionType::ChangeStatus, SOURCE) else {
            return false;
        };

        let (data, control) = self
            .ctx
            .modals
            .open_change_status(document)
            .await
            .into_parts();
        let api = &self.ctx.api;
        let id = document.id.as_str();

        self.ctx
            .complete(data, control, SOURCE, |status| async move {
                api.change_status(id, status).await
            })
            .await
    }
}
