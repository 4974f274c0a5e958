use crate::modal::DialogError;
use crate::models::{ActionType, DocumentStatus, QueryError};
use service_core::error::AppError;
use thiserror::Error;

/// Failure talking to the document backend or resolving the session identity.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Code {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Identity unavailable: {0}")]
    Identity(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Action {action} requires a document")]
    MissingDocument { action: ActionType },

    #[error("Action {action} is not available for status {status}")]
    ActionNotAvailable {
        action: ActionType,
        status: DocumentStatus,
    },
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated | ClientError::Upstream { status: 401, .. }
        )
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotAuthenticated => AppError::Unauthorized(anyhow::anyhow!("Not authenticated")),
            ClientError::Upstream { status: 401, message } => {
                AppError::Unauthorized(anyhow::anyhow!(message))
            }
            ClientError::Upstream { status: 403, message } => {
                AppError::Forbidden(anyhow::anyhow!(message))
            }
            ClientError::Upstream { status: 404, message } => {
                AppError::NotFound(anyhow::anyhow!(message))
            }
            ClientError::Upstream { status, message } => {
                AppError::BadGateway(format!("Code {}: {}", status, message))
            }
            ClientError::Transport(e) if e.is_connect() || e.is_timeout() => {
                tracing::error!(error = %e, "Document backend unreachable");
                AppError::ServiceUnavailable
            }
            ClientError::Transport(e) => AppError::BadGateway(e.to_string()),
            ClientError::InvalidResponse(msg) => AppError::BadGateway(msg),
            ClientError::Identity(msg) => AppError::Unauthorized(anyhow::anyhow!(msg)),
            ClientError::MissingDocument { action } => {
                AppError::BadRequest(anyhow::anyhow!("Action {} requires a document", action))
            }
            err @ ClientError::ActionNotAvailable { .. } => {
                AppError::Conflict(anyhow::Error::new(err))
            }
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

impl From<DialogError> for AppError {
    fn from(err: DialogError) -> Self {
        match err {
            DialogError::Busy | DialogError::AlreadyEmitted => {
                AppError::Conflict(anyhow::Error::new(err))
            }
            DialogError::Closed => AppError::NotFound(anyhow::anyhow!("No dialog is open")),
            DialogError::Invalid(errors) => AppError::Unprocessable(errors.to_string()),
            DialogError::UnsupportedStatus(_) | DialogError::WrongKind => {
                AppError::BadRequest(anyhow::Error::new(err))
            }
        }
    }
}
