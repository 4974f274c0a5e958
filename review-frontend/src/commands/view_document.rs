use super::{CommandContext, DocumentCommand};
use crate::models::{ActionDescriptor, ActionType, Document};
use async_trait::async_trait;

const SOURCE: &str = "ViewDocumentCommand";

pub struct ViewDocumentCommand {
    action: ActionDescriptor,
    ctx: CommandContext,
}

impl ViewDocumentCommand {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            action: ActionDescriptor::new(ActionType::View, "View Document").with_icon("visibility"),
            ctx,
        }
    }
}

#[async_trait]
impl DocumentCommand for ViewDocumentCommand {
    fn related_action(&self) -> &ActionDescriptor {
        &self.action
    }

    fn is_available(&self, _document: Option<&Document>) -> bool {
        true
    }

    /// Opens the document view; the list is left as it is.
    async fn execute(&self, document: Option<&Document>) -> bool {
        if let Some(document) = self.ctx.require(document, ActionType::View, SOURCE) {
            self.ctx
                .navigator
                .navigate_to(&format!("/document/{}", document.id));
        }
        false
    }
}
