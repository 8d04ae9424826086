//! Export: turns a document snapshot into a downloadable artifact.
//!
//! Default: `TextExporter` (plain-text CV).
//! `PdfExporter` is a stub until a PDF renderer is wired in.
//!
//! `AppState` holds one `Arc<dyn CvExporter>` per downloadable format.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cv::keywords::KeywordSet;
use crate::cv::models::Document;
use crate::errors::AppError;
use crate::preview::projector::{project, PreviewView, Section};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Text,
    Pdf,
}

impl std::str::FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(AppError::Validation(format!(
                "Unknown export format '{other}' (expected json, text or pdf)"
            ))),
        }
    }
}

/// Deep copy of the document taken under the session lock, plus its projection.
#[derive(Debug, Clone, Serialize)]
pub struct ExportBundle {
    pub document: Document,
    pub preview: PreviewView,
}

impl ExportBundle {
    pub fn snapshot(document: &Document, keywords: Option<&KeywordSet>) -> Self {
        Self {
            document: document.clone(),
            preview: project(document, keywords),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub content_type: &'static str,
    pub file_name: String,
    pub body: Vec<u8>,
}

/// Implement this to add a download format without touching the handlers.
#[async_trait]
pub trait CvExporter: Send + Sync {
    async fn export(&self, bundle: &ExportBundle) -> Result<ExportArtifact, AppError>;
}

pub struct TextExporter;

#[async_trait]
impl CvExporter for TextExporter {
    async fn export(&self, bundle: &ExportBundle) -> Result<ExportArtifact, AppError> {
        Ok(ExportArtifact {
            content_type: "text/plain; charset=utf-8",
            file_name: "cv.txt".to_string(),
            body: render_text(&bundle.preview).into_bytes(),
        })
    }
}

pub struct PdfExporter;

#[async_trait]
impl CvExporter for PdfExporter {
    async fn export(&self, _bundle: &ExportBundle) -> Result<ExportArtifact, AppError> {
        Err(AppError::NotImplemented(
            "PDF export is not available yet".to_string(),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Plain-text rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders a projection as a plain-text CV. Absent sections are omitted.
pub fn render_text(view: &PreviewView) -> String {
    let mut out = String::new();

    out.push_str(&view.header.name);
    out.push('\n');
    if !view.header.contact.is_empty() {
        out.push_str(&view.header.contact.join(" | "));
        out.push('\n');
    }
    if !view.header.links.is_empty() {
        out.push_str(&view.header.links.join(" | "));
        out.push('\n');
    }

    if let Section::Present(summary) = &view.summary {
        heading(&mut out, "Professional Summary");
        let _ = writeln!(out, "{summary}");
    }

    if let Section::Present(entries) = &view.education {
        heading(&mut out, "Education");
        for edu in entries {
            let _ = writeln!(
                out,
                "{}{}",
                with_suffix(&edu.institution, edu.location.as_deref()),
                dates_suffix(edu.dates.as_ref().map(|d| d.to_string()))
            );
            let _ = writeln!(out, "{}", with_suffix(&edu.degree, edu.classification.as_deref()));
            if let Some(modules) = &edu.relevant_modules {
                let _ = writeln!(out, "Relevant Modules: {modules}");
            }
            if let Some(dissertation) = &edu.dissertation {
                let _ = writeln!(out, "Dissertation: {dissertation}");
            }
        }
    }

    if let Section::Present(skills) = &view.skills {
        heading(&mut out, "Skills");
        labelled(&mut out, "Technical Skills:", skills.technical.as_deref());
        labelled(&mut out, "Soft Skills:", skills.soft.as_deref());
        labelled(&mut out, "Languages:", skills.languages.as_deref());
    }

    if let Section::Present(entries) = &view.experience {
        heading(&mut out, "Experience");
        for exp in entries {
            let _ = writeln!(
                out,
                "{}{}",
                with_suffix(&exp.organisation, exp.location.as_deref()),
                dates_suffix(exp.dates.as_ref().map(|d| d.to_string()))
            );
            let _ = writeln!(out, "{}", exp.title);
            if !exp.responsibilities.is_empty() {
                let _ = writeln!(out, "{}", exp.responsibilities);
            }
        }
    }

    if let Section::Present(entries) = &view.projects {
        heading(&mut out, "Projects");
        for project in entries {
            let _ = writeln!(out, "{}", project.title);
            if !project.description.is_empty() {
                let _ = writeln!(out, "{}", project.description);
            }
            labelled(&mut out, "Skills:", project.skills.as_deref());
            labelled(&mut out, "Results:", project.results.as_deref());
        }
    }

    if let Section::Present(additional) = &view.additional {
        heading(&mut out, "Additional Information");
        block(&mut out, "Certifications & Courses", additional.certifications.as_deref());
        block(&mut out, "Extracurricular Activities", additional.extracurricular.as_deref());
        block(&mut out, "Awards & Honors", additional.awards.as_deref());
    }

    out
}

fn heading(out: &mut String, title: &str) {
    let _ = write!(out, "\n{title}\n{}\n", "-".repeat(title.chars().count()));
}

fn labelled(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(out, "{label} {value}");
    }
}

fn block(out: &mut String, title: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(out, "{title}\n{value}");
    }
}

fn with_suffix(head: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{head}, {suffix}"),
        None => head.to_string(),
    }
}

fn dates_suffix(dates: Option<String>) -> String {
    dates.map(|d| format!(" ({d})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::models::{
        EducationEntry, EducationField, ExperienceEntry, ExperienceField, PersonalField,
        ProjectEntry, ProjectField, SkillsField,
    };

    fn sample_document() -> Document {
        let mut doc = Document::default();
        doc.set_personal_info(PersonalField::FullName, "Ada Lovelace");
        doc.set_personal_info(PersonalField::Email, "ada@example.com");
        doc.set_personal_info(PersonalField::Phone, "07700 900000");
        doc.set_professional_summary("Final-year BSc Psychology student.");
        doc.update_entry::<EducationEntry>(0, EducationField::Institution, "University of Leeds");
        doc.update_entry::<EducationEntry>(0, EducationField::Location, "Leeds");
        doc.update_entry::<EducationEntry>(0, EducationField::Degree, "BSc Psychology");
        doc.update_entry::<EducationEntry>(0, EducationField::Classification, "First");
        doc.update_entry::<EducationEntry>(0, EducationField::StartDate, "2021");
        doc.update_entry::<EducationEntry>(0, EducationField::EndDate, "2024");
        doc.update_entry::<EducationEntry>(0, EducationField::RelevantModules, "Statistics");
        doc.set_skill(SkillsField::Technical, "SPSS, Excel");
        doc.update_entry::<ExperienceEntry>(0, ExperienceField::Organisation, "Acme Ltd");
        doc.update_entry::<ExperienceEntry>(0, ExperienceField::Title, "HR Intern");
        doc
    }

    #[test]
    fn test_render_text_includes_present_sections_only() {
        let bundle = ExportBundle::snapshot(&sample_document(), None);
        let text = render_text(&bundle.preview);

        assert!(text.starts_with("Ada Lovelace\nada@example.com | 07700 900000\n"));
        assert!(text.contains("Professional Summary\n--------------------\n"));
        assert!(text.contains("University of Leeds, Leeds (2021 - 2024)\n"));
        assert!(text.contains("BSc Psychology, First\n"));
        assert!(text.contains("Relevant Modules: Statistics\n"));
        assert!(text.contains("Technical Skills: SPSS, Excel\n"));
        assert!(!text.contains("Soft Skills:"));
        assert!(text.contains("Acme Ltd\nHR Intern\n"));
        assert!(!text.contains("Projects"));
        assert!(!text.contains("Additional Information"));
    }

    #[test]
    fn test_render_text_for_empty_document_is_placeholder_only() {
        let bundle = ExportBundle::snapshot(&Document::default(), None);
        assert_eq!(render_text(&bundle.preview), "Your Name\n");
    }

    #[test]
    fn test_bundle_is_independent_snapshot() {
        let mut doc = sample_document();
        let bundle = ExportBundle::snapshot(&doc, None);
        doc.update_entry::<ProjectEntry>(0, ProjectField::Title, "Later edit");
        assert!(bundle.document.projects()[0].title.is_empty());
        assert!(!bundle.preview.projects.is_present());
    }

    #[test]
    fn test_export_format_parses_lowercase() {
        let format: ExportFormat = serde_json::from_str(r#""pdf""#).unwrap();
        assert_eq!(format, ExportFormat::Pdf);
        assert_eq!(ExportFormat::default(), ExportFormat::Json);
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_text_exporter_produces_attachment() {
        let bundle = ExportBundle::snapshot(&sample_document(), None);
        let artifact = TextExporter.export(&bundle).await.unwrap();
        assert_eq!(artifact.file_name, "cv.txt");
        assert!(artifact.content_type.starts_with("text/plain"));
        assert!(String::from_utf8(artifact.body).unwrap().contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_pdf_exporter_is_not_implemented() {
        let bundle = ExportBundle::snapshot(&Document::default(), None);
        let result = PdfExporter.export(&bundle).await;
        assert!(matches!(result, Err(AppError::NotImplemented(_))));
    }
}
