//! Axum route handlers for session lifecycle and wizard navigation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::wizard::session::SessionSnapshot;
use crate::wizard::steps::{Wizard, WizardView};

#[derive(Debug, Deserialize)]
pub struct GoToRequest {
    pub index: usize,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let snapshot = state.sessions.create().await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state.sessions.read(id, |session| session.snapshot()).await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/wizard
pub async fn handle_get_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>, AppError> {
    let view = state.sessions.read(id, |session| session.wizard().view()).await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/wizard/next
pub async fn handle_wizard_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>, AppError> {
    navigate(&state, id, Wizard::next).await
}

/// POST /api/v1/sessions/:id/wizard/previous
pub async fn handle_wizard_previous(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>, AppError> {
    navigate(&state, id, Wizard::previous).await
}

/// POST /api/v1/sessions/:id/wizard/go-to
///
/// Out-of-range indices clamp to the last step.
pub async fn handle_wizard_go_to(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GoToRequest>,
) -> Result<Json<WizardView>, AppError> {
    navigate(&state, id, |wizard| wizard.go_to(req.index)).await
}

async fn navigate(
    state: &AppState,
    id: Uuid,
    transition: impl FnOnce(&mut Wizard) + Send,
) -> Result<Json<WizardView>, AppError> {
    let view = state
        .sessions
        .update(id, |session| {
            transition(session.wizard_mut());
            session.touch();
            Ok(session.wizard().view())
        })
        .await?;
    debug!(
        session_id = %id,
        step = view.current_index,
        progress = view.progress_percent,
        "Wizard moved"
    );
    Ok(Json(view))
}
