use super::{
    AddDocumentCommand, ChangeNameCommand, ChangeStatusCommand, CommandContext,
    DeleteDocumentCommand, DocumentCommand, RevokeDocumentCommand, ViewDocumentCommand,
};
use crate::models::{ActionDescriptor, ActionType, Document};
use crate::services::metrics;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Action {0} is registered more than once")]
    DuplicateAction(ActionType),
}

/// Ordered commands of one dashboard. Action types are unique.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn DocumentCommand>>,
}

impl CommandRegistry {
    pub fn new(commands: Vec<Arc<dyn DocumentCommand>>) -> Result<Self, RegistryError> {
        for (index, command) in commands.iter().enumerate() {
            let action = command.related_action().action_type;
            if commands[..index]
                .iter()
                .any(|earlier| earlier.related_action().action_type == action)
            {
                return Err(RegistryError::DuplicateAction(action));
            }
        }
        Ok(Self { commands })
    }

    /// Submitter dashboard: add, view, rename, revoke, delete.
    pub fn for_submitter(ctx: &CommandContext) -> Self {
        Self {
            commands: vec![
                Arc::new(AddDocumentCommand::new(ctx.clone())) as Arc<dyn DocumentCommand>,
                Arc::new(ViewDocumentCommand::new(ctx.clone())) as Arc<dyn DocumentCommand>,
                Arc::new(ChangeNameCommand::new(ctx.clone())) as Arc<dyn DocumentCommand>,
                Arc::new(RevokeDocumentCommand::new(ctx.clone())) as Arc<dyn DocumentCommand>,
                Arc::new(DeleteDocumentCommand::new(ctx.clone())) as Arc<dyn DocumentCommand>,
            ],
        }
    }

    /// Reviewer dashboard: view, change status.
    pub fn for_reviewer(ctx: &CommandContext) -> Self {
        Self {
            commands: vec![
                Arc::new(ViewDocumentCommand::new(ctx.clone())) as Arc<dyn DocumentCommand>,
                Arc::new(ChangeStatusCommand::new(ctx.clone())) as Arc<dyn DocumentCommand>,
            ],
        }
    }

    /// Row actions for `document`, in registration order.
    pub fn compute_actions(&self, document: &Document) -> Vec<ActionDescriptor> {
        self.commands
            .iter()
            .filter(|command| command.is_available(Some(document)))
            .map(|command| command.related_action().clone())
            .collect()
    }

    pub fn command_for(&self, action: ActionType) -> Option<&Arc<dyn DocumentCommand>> {
        self.commands
            .iter()
            .find(|command| command.related_action().action_type == action)
    }

    /// Whether `action` may run on `document`. Unregistered actions pass
    /// through so that dispatch can log them.
    pub fn allows(&self, action: ActionType, document: &Document) -> bool {
        self.command_for(action)
            .map_or(true, |command| command.is_available(Some(document)))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.commands.iter().map(|command| command.related_action())
    }

    /// Run the command registered for `action`. Returns whether to reload.
    ///
    /// An unregistered action does nothing and is logged as an error.
    pub async fn dispatch(&self, action: ActionType, document: Option<&Document>) -> bool {
        let Some(command) = self.command_for(action) else {
            tracing::error!(action = %action, "No command registered for action");
            metrics::record_command(action, "unmatched");
            return false;
        };

        let document_id = document.map(|d| d.id.as_str()).unwrap_or("-");
        tracing::info!(action = %action, document_id = %document_id, "Dispatching document command");

        let refresh = command.execute(document).await;

        metrics::record_command(action, if refresh { "refresh" } else { "no_refresh" });
        tracing::info!(
            action = %action,
            document_id = %document_id,
            refresh,
            "Document command finished"
        );
        refresh
    }
}
