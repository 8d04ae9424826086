//! Axum route handlers for editing the document and analyzing the job description.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cv::keywords::{KeywordHints, KeywordSet};
use crate::cv::models::{
    Additional, AdditionalField, Entry, FieldName, PersonalField, PersonalInfo, SectionKind,
    Skills, SkillsField,
};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Sets one field of a record. A missing `value` clears the field.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate<F> {
    pub field: F,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryUpdate {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub professional_summary: String,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionUpdate {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionResponse {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: KeywordSet,
    pub hints: Option<KeywordHints>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesResponse<T> {
    pub section: SectionKind,
    pub entries: Vec<T>,
    /// Remove controls are only offered while more than one entry exists.
    pub can_remove: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse<T> {
    pub imported: usize,
    #[serde(flatten)]
    pub section: EntriesResponse<T>,
}

fn entries_response<T: Entry>(entries: &[T]) -> EntriesResponse<T> {
    EntriesResponse {
        section: T::SECTION,
        entries: entries.to_vec(),
        can_remove: entries.len() > 1,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed records
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/sessions/:id/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldUpdate<PersonalField>>,
) -> Result<Json<PersonalInfo>, AppError> {
    let info = state
        .sessions
        .update(id, |session| {
            let value = req.value.unwrap_or_default();
            Ok(session.edit(|doc| {
                doc.set_personal_info(req.field, value);
                doc.personal_info().clone()
            }))
        })
        .await?;
    debug!(session_id = %id, field = req.field.as_str(), "Personal info updated");
    Ok(Json(info))
}

/// PUT /api/v1/sessions/:id/summary
pub async fn handle_update_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SummaryUpdate>,
) -> Result<Json<SummaryResponse>, AppError> {
    let professional_summary = state
        .sessions
        .update(id, |session| {
            let value = req.value.unwrap_or_default();
            Ok(session.edit(|doc| {
                doc.set_professional_summary(value);
                doc.professional_summary().to_string()
            }))
        })
        .await?;
    Ok(Json(SummaryResponse {
        professional_summary,
    }))
}

/// PATCH /api/v1/sessions/:id/skills
pub async fn handle_update_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldUpdate<SkillsField>>,
) -> Result<Json<Skills>, AppError> {
    let skills = state
        .sessions
        .update(id, |session| {
            let value = req.value.unwrap_or_default();
            Ok(session.edit(|doc| {
                doc.set_skill(req.field, value);
                doc.skills().clone()
            }))
        })
        .await?;
    Ok(Json(skills))
}

/// PATCH /api/v1/sessions/:id/additional
pub async fn handle_update_additional(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldUpdate<AdditionalField>>,
) -> Result<Json<Additional>, AppError> {
    let additional = state
        .sessions
        .update(id, |session| {
            let value = req.value.unwrap_or_default();
            Ok(session.edit(|doc| {
                doc.set_additional(req.field, value);
                doc.additional().clone()
            }))
        })
        .await?;
    Ok(Json(additional))
}

// ────────────────────────────────────────────────────────────────────────────
// Repeatable sections (generic over the entry type)
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/{section}/entries
pub async fn handle_list_entries<T: Entry>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntriesResponse<T>>, AppError> {
    let response = state
        .sessions
        .read(id, |session| entries_response(session.document().entries::<T>()))
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/{section}/entries
pub async fn handle_append_entry<T: Entry>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntriesResponse<T>>, AppError> {
    let response = state
        .sessions
        .update(id, |session| {
            session.append_entry::<T>();
            Ok(entries_response(session.document().entries::<T>()))
        })
        .await?;
    debug!(
        session_id = %id,
        section = T::SECTION.as_str(),
        len = response.entries.len(),
        "Entry appended"
    );
    Ok(Json(response))
}

/// PATCH /api/v1/sessions/:id/{section}/entries/:index
pub async fn handle_update_entry<T: Entry>(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<FieldUpdate<T::Field>>,
) -> Result<Json<EntriesResponse<T>>, AppError> {
    let response = state
        .sessions
        .update(id, |session| {
            let value = req.value.unwrap_or_default();
            session.update_entry::<T>(index, req.field, &value)?;
            Ok(entries_response(session.document().entries::<T>()))
        })
        .await?;
    Ok(Json(response))
}

/// DELETE /api/v1/sessions/:id/{section}/entries/:index
pub async fn handle_remove_entry<T: Entry>(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<EntriesResponse<T>>, AppError> {
    let response = state
        .sessions
        .update(id, |session| {
            session.remove_entry::<T>(index)?;
            Ok(entries_response(session.document().entries::<T>()))
        })
        .await?;
    debug!(
        session_id = %id,
        section = T::SECTION.as_str(),
        index,
        len = response.entries.len(),
        "Entry removed"
    );
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/{section}/import
///
/// Body is raw CSV text with a header row of field names.
pub async fn handle_import_entries<T: Entry>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: String,
) -> Result<Json<ImportResponse<T>>, AppError> {
    let response = state
        .sessions
        .update(id, |session| {
            let imported = session.import_entries::<T>(&body)?;
            Ok(ImportResponse {
                imported,
                section: entries_response(session.document().entries::<T>()),
            })
        })
        .await?;
    debug!(
        session_id = %id,
        section = T::SECTION.as_str(),
        imported = response.imported,
        "Entries imported"
    );
    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Job description
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/sessions/:id/job-description
///
/// Stores the text only; keywords stay stale until the next analyze call.
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobDescriptionUpdate>,
) -> Result<Json<JobDescriptionResponse>, AppError> {
    let job_description = state
        .sessions
        .update(id, |session| {
            session.set_job_description(req.text.unwrap_or_default());
            Ok(session.job_description().to_string())
        })
        .await?;
    Ok(Json(JobDescriptionResponse { job_description }))
}

/// POST /api/v1/sessions/:id/keywords/analyze
pub async fn handle_analyze_keywords(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let vocabulary = &state.config.vocabulary;
    let response = state
        .sessions
        .update(id, |session| {
            let keywords = session.analyze_keywords(vocabulary).clone();
            Ok(KeywordsResponse {
                keywords,
                hints: session.hints(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/keywords
///
/// Returns the last analyzed keyword set without recomputing it.
pub async fn handle_get_keywords(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let response = state
        .sessions
        .read(id, |session| KeywordsResponse {
            keywords: session.keywords().clone(),
            hints: session.hints(),
        })
        .await?;
    Ok(Json(response))
}
