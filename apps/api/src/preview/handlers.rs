//! Axum route handlers for the read-only preview and downloads.

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::preview::export::ExportFormat;
use crate::preview::projector::PreviewView;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewToggleResponse {
    pub preview_visible: bool,
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewView>, AppError> {
    let view = state.sessions.read(id, |session| session.preview()).await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/preview/toggle
pub async fn handle_toggle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewToggleResponse>, AppError> {
    let preview_visible = state
        .sessions
        .update(id, |session| Ok(session.toggle_preview()))
        .await?;
    Ok(Json(PreviewToggleResponse { preview_visible }))
}

/// GET /api/v1/sessions/:id/export?format=json|text|pdf
///
/// The document is snapshotted under the lock; rendering runs after it is released.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ExportFormat>()?,
        None => ExportFormat::default(),
    };
    let bundle = state.sessions.read(id, |session| session.export_bundle()).await?;

    let exporter = match format {
        ExportFormat::Json => return Ok(Json(bundle).into_response()),
        ExportFormat::Text => state.text_exporter.clone(),
        ExportFormat::Pdf => state.pdf_exporter.clone(),
    };

    let artifact = exporter.export(&bundle).await?;
    info!(session_id = %id, format = ?format, bytes = artifact.body.len(), "CV exported");

    let disposition = content_disposition(&artifact.file_name)?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(artifact.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.body,
    )
        .into_response())
}

/// A file name that cannot form a header is an internal error.
fn content_disposition(file_name: &str) -> Result<HeaderValue, AppError> {
    let value = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .with_context(|| format!("Exporter produced an unusable file name {file_name:?}"))?;
    Ok(value)
}
