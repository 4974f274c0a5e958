use crate::modal::{AddDocumentIntent, DialogResponse, DialogView};
use crate::models::FileUpload;
use crate::session::CurrentSession;
use axum::{
    extract::{Multipart, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use service_core::error::AppError;
use std::time::Duration;

const LONG_POLL: Duration = Duration::from_secs(25);

#[derive(Debug, Default, Deserialize)]
pub struct DialogParams {
    /// Long-poll until a dialog opens.
    #[serde(default)]
    pub wait: bool,
}

/// The dialog the browser should show, or 204 when none is open.
pub async fn current_dialog(
    CurrentSession(session): CurrentSession,
    Query(params): Query<DialogParams>,
) -> Response {
    let view: Option<DialogView> = if params.wait {
        tokio::time::timeout(LONG_POLL, session.dialogs.wait_for_open())
            .await
            .ok()
    } else {
        session.dialogs.current_view()
    };

    match view {
        Some(view) => Json(view).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn respond_dialog(
    CurrentSession(session): CurrentSession,
    Json(response): Json<DialogResponse>,
) -> Result<StatusCode, AppError> {
    session.dialogs.respond(response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit the add-document dialog with its file.
///
/// Fields: `intent` (`save_as_draft` or `send_to_review`), optional `name`
/// and `file`.
pub async fn upload_document(
    CurrentSession(session): CurrentSession,
    mut multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let mut intent = None;
    let mut name = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("intent") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))?;
                intent = Some(parse_intent(&value)?);
            }
            Some("name") => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))?;
                tracing::debug!(file_name = %file_name, size = bytes.len(), "File received");
                file = Some(FileUpload::new(file_name, content_type, bytes.to_vec()));
            }
            other => tracing::debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let intent =
        intent.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Missing 'intent' field")))?;
    session
        .dialogs
        .respond(DialogResponse::AddDocument { intent, name, file })?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_intent(value: &str) -> Result<AddDocumentIntent, AppError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_string()))
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Unknown intent '{}'", value)))
}
