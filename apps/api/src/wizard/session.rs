//! Editing sessions: each owns exactly one document and one wizard.
//!
//! Sessions live only in memory. Every request takes the store lock, runs a
//! single synchronous operation against one session, and releases it.
//! Sessions nobody has read or written for the idle TTL are evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cv::import::parse_entries;
use crate::cv::keywords::{keyword_hints, match_keywords, KeywordHints, KeywordSet, Vocabulary};
use crate::cv::models::{Document, Entry};
use crate::errors::AppError;
use crate::preview::export::ExportBundle;
use crate::preview::projector::{project, PreviewView};
use crate::wizard::steps::{Wizard, WizardView};

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    document: Document,
    wizard: Wizard,
    job_description: String,
    keywords: KeywordSet,
    preview_visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_active: Instant,
}

/// Everything a client needs to redraw the wizard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub document: Document,
    pub wizard: WizardView,
    pub job_description: String,
    pub keywords: KeywordSet,
    pub hints: Option<KeywordHints>,
    pub preview_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            document: Document::default(),
            wizard: Wizard::default(),
            job_description: String::new(),
            keywords: KeywordSet::default(),
            preview_visible: false,
            created_at: now,
            updated_at: now,
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    /// Applies a change to the document. Bumps `updated_at`.
    pub fn edit<R>(&mut self, change: impl FnOnce(&mut Document) -> R) -> R {
        let out = change(&mut self.document);
        self.touch();
        out
    }

    pub fn wizard_mut(&mut self) -> &mut Wizard {
        &mut self.wizard
    }

    /// Stores the text without re-running keyword analysis.
    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
        self.touch();
    }

    /// Re-runs the keyword matcher over the stored job description.
    pub fn analyze_keywords(&mut self, vocabulary: &Vocabulary) -> &KeywordSet {
        self.keywords = match_keywords(&self.job_description, vocabulary);
        self.touch();
        debug!(session_id = %self.id, matched = self.keywords.len(), "Keywords analyzed");
        &self.keywords
    }

    pub fn hints(&self) -> Option<KeywordHints> {
        keyword_hints(&self.keywords)
    }

    pub fn append_entry<T: Entry>(&mut self) {
        self.edit(|doc| doc.append_entry::<T>());
    }

    pub fn remove_entry<T: Entry>(&mut self, index: usize) -> Result<(), AppError> {
        self.check_index::<T>(index)?;
        self.edit(|doc| doc.remove_entry::<T>(index));
        Ok(())
    }

    pub fn update_entry<T: Entry>(
        &mut self,
        index: usize,
        field: T::Field,
        value: &str,
    ) -> Result<(), AppError> {
        self.check_index::<T>(index)?;
        self.edit(|doc| doc.update_entry::<T>(index, field, value));
        Ok(())
    }

    /// Parses CSV rows and adds them to the section. Returns how many were imported.
    pub fn import_entries<T: Entry>(&mut self, csv_text: &str) -> Result<usize, AppError> {
        let imported = parse_entries::<T>(csv_text)?;
        let count = imported.len();
        self.edit(|doc| doc.import_entries(imported));
        Ok(count)
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview_visible = !self.preview_visible;
        self.touch();
        self.preview_visible
    }

    pub fn preview(&self) -> PreviewView {
        project(&self.document, Some(&self.keywords))
    }

    pub fn export_bundle(&self) -> ExportBundle {
        ExportBundle::snapshot(&self.document, Some(&self.keywords))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            document: self.document.clone(),
            wizard: self.wizard.view(),
            job_description: self.job_description.clone(),
            keywords: self.keywords.clone(),
            hints: self.hints(),
            preview_visible: self.preview_visible,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.mark_active();
    }

    /// Resets the idle clock without recording a change.
    fn mark_active(&mut self) {
        self.last_active = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    fn check_index<T: Entry>(&self, index: usize) -> Result<(), AppError> {
        let len = self.document.entries::<T>().len();
        if index >= len {
            return Err(AppError::Validation(format!(
                "{} entry index {index} is out of range (section has {len})",
                T::SECTION.as_str()
            )));
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
            idle_ttl,
        }
    }

    /// Evicts idle sessions before the capacity check.
    pub async fn create(&self) -> Result<SessionSnapshot, AppError> {
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, self.idle_ttl);
        if sessions.len() >= self.max_sessions {
            return Err(AppError::CapacityExceeded(self.max_sessions));
        }

        let session = Session::new();
        let snapshot = session.snapshot();
        sessions.insert(session.id(), session);
        info!(session_id = %snapshot.session_id, active = sessions.len(), "Session created");
        Ok(snapshot)
    }

    /// Takes the write lock: reading counts as activity.
    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> Result<R, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.mark_active();
        Ok(f(session))
    }

    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.mark_active();
        f(session)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&id).ok_or_else(|| not_found(id))?;
        info!(session_id = %id, active = sessions.len(), "Session ended");
        Ok(())
    }

    /// Drops every session idle for at least the TTL. Returns how many went.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, self.idle_ttl)
    }

    /// Sweeps on a fixed period (the TTL, at most a minute) until the runtime shuts down.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let store = self.clone();
        let period = self.idle_ttl.min(MAX_SWEEP_PERIOD);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.sweep().await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn evict_idle(sessions: &mut HashMap<Uuid, Session>, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|id, session| {
        let keep = session.idle_for() < ttl;
        if !keep {
            debug!(session_id = %id, "Session expired");
        }
        keep
    });
    let evicted = before - sessions.len();
    if evicted > 0 {
        info!(evicted, active = sessions.len(), "Idle sessions evicted");
    }
    evicted
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
