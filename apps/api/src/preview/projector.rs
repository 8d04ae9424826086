//! Preview projector: pure function from a `Document` to a read-only view.
//!
//! # Section presence
//! - header: always present, name falls back to [`NAME_PLACEHOLDER`]
//! - summary: present iff the summary is non-empty
//! - education / experience / projects: present iff the FIRST entry's key
//!   field (institution / organisation / title) is non-empty; when present,
//!   every entry is projected, blank or not
//! - skills / additional: present iff any of their fields is non-empty
//!
//! Date ranges are only shown when both ends are non-empty.

use serde::Serialize;

use crate::cv::keywords::{KeywordSet, REVIEW_HINT_COUNT};
use crate::cv::models::{
    Additional, Document, EducationEntry, Entry, ExperienceEntry, PersonalInfo, ProjectEntry,
    Skills,
};

pub const NAME_PLACEHOLDER: &str = "Your Name";

// ────────────────────────────────────────────────────────────────────────────
// View types
// ────────────────────────────────────────────────────────────────────────────

/// A section that is either shown with content or omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum Section<T> {
    Present(T),
    Absent,
}

impl<T> Section<T> {
    fn gated(present: bool, build: impl FnOnce() -> T) -> Self {
        if present {
            Section::Present(build())
        } else {
            Section::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Section::Present(_))
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            Section::Present(content) => Some(content),
            Section::Absent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub name: String,
    /// Email, phone, location: non-empty ones only, in that order.
    pub contact: Vec<String>,
    /// LinkedIn, portfolio: non-empty ones only.
    pub links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationView {
    pub institution: String,
    pub location: Option<String>,
    pub degree: String,
    pub classification: Option<String>,
    pub dates: Option<DateRange>,
    pub relevant_modules: Option<String>,
    pub dissertation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceView {
    pub organisation: String,
    pub location: Option<String>,
    pub title: String,
    pub dates: Option<DateRange>,
    pub responsibilities: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub skills: Option<String>,
    pub results: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillsView {
    pub technical: Option<String>,
    pub soft: Option<String>,
    pub languages: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdditionalView {
    pub certifications: Option<String>,
    pub extracurricular: Option<String>,
    pub awards: Option<String>,
}

/// Display-ready projection of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewView {
    pub header: HeaderView,
    pub summary: Section<String>,
    pub education: Section<Vec<EducationView>>,
    pub skills: Section<SkillsView>,
    pub experience: Section<Vec<ExperienceView>>,
    pub projects: Section<Vec<ProjectView>>,
    pub additional: Section<AdditionalView>,
    /// Leading job-description keywords to double-check before export.
    pub keyword_reminders: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

pub fn project(document: &Document, keywords: Option<&KeywordSet>) -> PreviewView {
    PreviewView {
        header: project_header(document.personal_info()),
        summary: Section::gated(!document.professional_summary().is_empty(), || {
            document.professional_summary().to_string()
        }),
        education: project_entries(document.education(), project_education),
        skills: project_skills(document.skills()),
        experience: project_entries(document.experience(), project_experience),
        projects: project_entries(document.projects(), project_project),
        additional: project_additional(document.additional()),
        keyword_reminders: keywords
            .map(|k| k.leading(REVIEW_HINT_COUNT))
            .unwrap_or_default(),
    }
}

/// Shown iff the first entry's key field is set; then every entry is projected.
fn project_entries<T: Entry, V>(entries: &[T], view: fn(&T) -> V) -> Section<Vec<V>> {
    let present = entries
        .first()
        .map(|first| !first.key_field().is_empty())
        .unwrap_or(false);
    Section::gated(present, || entries.iter().map(view).collect())
}

fn project_header(info: &PersonalInfo) -> HeaderView {
    let name = if info.full_name.is_empty() {
        NAME_PLACEHOLDER.to_string()
    } else {
        info.full_name.clone()
    };

    HeaderView {
        name,
        contact: non_empty_all(&[&info.email, &info.phone, &info.location]),
        links: non_empty_all(&[&info.linked_in, &info.portfolio]),
    }
}

fn project_education(entry: &EducationEntry) -> EducationView {
    EducationView {
        institution: entry.institution.clone(),
        location: non_empty(&entry.location),
        degree: entry.degree.clone(),
        classification: non_empty(&entry.classification),
        dates: date_range(&entry.start_date, &entry.end_date),
        relevant_modules: non_empty(&entry.relevant_modules),
        dissertation: non_empty(&entry.dissertation),
    }
}

fn project_experience(entry: &ExperienceEntry) -> ExperienceView {
    ExperienceView {
        organisation: entry.organisation.clone(),
        location: non_empty(&entry.location),
        title: entry.title.clone(),
        dates: date_range(&entry.start_date, &entry.end_date),
        responsibilities: entry.responsibilities.clone(),
    }
}

fn project_project(entry: &ProjectEntry) -> ProjectView {
    ProjectView {
        title: entry.title.clone(),
        description: entry.description.clone(),
        skills: non_empty(&entry.skills),
        results: non_empty(&entry.results),
    }
}

fn project_skills(skills: &Skills) -> Section<SkillsView> {
    let view = SkillsView {
        technical: non_empty(&skills.technical),
        soft: non_empty(&skills.soft),
        languages: non_empty(&skills.languages),
    };
    let present = view.technical.is_some() || view.soft.is_some() || view.languages.is_some();
    Section::gated(present, || view)
}

fn project_additional(additional: &Additional) -> Section<AdditionalView> {
    let view = AdditionalView {
        certifications: non_empty(&additional.certifications),
        extracurricular: non_empty(&additional.extracurricular),
        awards: non_empty(&additional.awards),
    };
    let present =
        view.certifications.is_some() || view.extracurricular.is_some() || view.awards.is_some();
    Section::gated(present, || view)
}

fn date_range(start: &str, end: &str) -> Option<DateRange> {
    if start.is_empty() || end.is_empty() {
        return None;
    }
    Some(DateRange {
        start: start.to_string(),
        end: end.to_string(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_empty_all(values: &[&String]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
