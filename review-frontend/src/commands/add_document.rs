use super::{CommandContext, DocumentCommand};
use crate::models::{ActionDescriptor, ActionType, Document};
use async_trait::async_trait;

const SOURCE: &str = "AddDocumentCommand";

/// Toolbar action; never offered per row.
pub struct AddDocumentCommand {
    action: ActionDescriptor,
    ctx: CommandContext,
}

impl AddDocumentCommand {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            action: ActionDescriptor::new(ActionType::Add, "Add Document"),
            ctx,
        }
    }
}

#[async_trait]
impl DocumentCommand for AddDocumentCommand {
    fn related_action(&self) -> &ActionDescriptor {
        &self.action
    }

    fn is_available(&self, _document: Option<&Document>) -> bool {
        false
    }

    async fn execute(&self, _document: Option<&Document>) -> bool {
        let (data, control) = self.ctx.modals.open_add_document().await.into_parts();
        let api = &self.ctx.api;

        self.ctx
            .complete(data, control, SOURCE, |new_document| async move {
                api.create_document(new_document).await.map(|_| ())
            })
            .await
    }
}
