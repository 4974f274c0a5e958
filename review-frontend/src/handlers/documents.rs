use crate::models::Document;
use crate::services::DocumentApi;
use crate::session::CurrentSession;
use axum::{extract::Path, response::Json};
use service_core::error::AppError;

/// Target of the view action.
pub async fn document_handler(
    CurrentSession(session): CurrentSession,
    Path(document_id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let document = session.backend.get_document(&document_id).await?;
    Ok(Json(document))
}
