use super::{CommandContext, DocumentCommand};
use crate::models::{ActionDescriptor, ActionType, Document};
use async_trait::async_trait;

const SOURCE: &str = "ChangeNameCommand";

pub struct ChangeNameCommand {
    action: ActionDescriptor,
    ctx: CommandContext,
}

impl ChangeNameCommand {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            action: ActionDescriptor::new(ActionType::ChangeName, "Edit Name").with_icon("edit"),
            ctx,
        }
    }
}

#[async_trait]
impl DocumentCommand for ChangeNameCommand {
    fn related_action(&self) -> &ActionDescriptor {
        &self.action
    }

    fn is_available(&self, _document: Option<&Document>) -> bool {
        true
    }

    async fn execute(&self, document: Option<&Document>) -> bool {
        let Some(document) = self.ctx.require(document, ActionType::ChangeName, SOURCE) else {
            return false;
        };

        let (data, control) = self.ctx.modals.open_rename(document).await.into_parts();
        let api = &self.ctx.api;
        let id = document.id.as_str();

        self.ctx
            .complete(data, control, SOURCE, |name: String| async move {
                api.rename_document(id, &name).await
            })
            .await
    }
}
