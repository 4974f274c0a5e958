use crate::dashboard::{DashboardView, DocumentTable};
use crate::guard::RouteGroup;
use crate::models::{ActionType, DocumentQuery};
use crate::session::{ClientSession, CurrentSession};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{Json, Redirect},
};
use serde::Deserialize;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;

/// `/dashboard` has no view of its own.
pub async fn dashboard_root() -> Redirect {
    let group = RouteGroup::dashboard();
    Redirect::to(&group.url_for(&group.default_child))
}

pub async fn dashboard_handler(
    CurrentSession(session): CurrentSession,
    Path(child): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DashboardView>, AppError> {
    let table = table_for(&session, &child)?;
    let profile = table.profile();
    let query = DocumentQuery::from_params(
        &params,
        &table.query(),
        &profile.extra_filters,
        &profile.allowed_statuses,
    )?;

    table.set_query(query).await;
    Ok(Json(DashboardView::of(table)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: ActionType,
    #[serde(default)]
    pub document_id: Option<String>,
}

/// Start an action. Its dialogs show up under `/dialog`; the table reloads
/// in the background when the action changed data.
pub async fn action_handler(
    CurrentSession(session): CurrentSession,
    Path(child): Path<String>,
    Json(request): Json<ActionRequest>,
) -> Result<StatusCode, AppError> {
    let table = table_for(&session, &child)?.clone();
    tracing::info!(
        action = %request.action,
        document_id = ?request.document_id,
        dashboard = %child,
        "Action requested"
    );

    tokio::spawn(async move {
        table
            .handle_action(request.action, request.document_id.as_deref())
            .await;
    });

    Ok(StatusCode::ACCEPTED)
}

fn table_for<'a>(
    session: &'a ClientSession,
    child: &str,
) -> Result<&'a Arc<DocumentTable>, AppError> {
    RouteGroup::dashboard()
        .child(child)
        .and_then(|route| route.role)
        .map(|role| session.table(role))
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No dashboard at '{}'", child)))
}
