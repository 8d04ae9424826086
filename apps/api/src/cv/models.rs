//! Document model: the in-progress CV owned by one editing session.
//!
//! Fixed records (personal info, skills, additional) are plain structs with
//! one `String` per field. Repeatable sections (education, experience,
//! projects) are `Vec`s that never drop below one entry; all mutation of them
//! goes through [`crate::cv::collection`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cv::collection;

// ────────────────────────────────────────────────────────────────────────────
// Field addressing
// ────────────────────────────────────────────────────────────────────────────

/// A closed set of field identifiers for one record type.
///
/// Wire names are the camelCase names used in request bodies and CSV headers.
pub trait FieldName: Copy + Eq + DeserializeOwned + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

/// A record whose fields are all free-text strings.
pub trait Record {
    type Field: FieldName;

    fn get(&self, field: Self::Field) -> &str;

    fn slot(&mut self, field: Self::Field) -> &mut String;

    fn set(&mut self, field: Self::Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }
}

/// Which repeatable section an entry type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Education,
    Experience,
    Projects,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
        }
    }
}

/// One element of a repeatable section.
pub trait Entry:
    Record + Clone + Default + PartialEq + Serialize + Send + Sync + 'static
{
    const SECTION: SectionKind;

    /// The field whose presence on the first entry gates the whole section in previews.
    fn key_field(&self) -> &str;

    fn entries(doc: &Document) -> &[Self];

    fn entries_mut(doc: &mut Document) -> &mut Vec<Self>;

    fn blank() -> Self {
        Self::default()
    }

    fn is_blank(&self) -> bool {
        *self == Self::blank()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linked_in: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    LinkedIn,
    Portfolio,
}

impl FieldName for PersonalField {
    const ALL: &'static [Self] = &[
        PersonalField::FullName,
        PersonalField::Email,
        PersonalField::Phone,
        PersonalField::Location,
        PersonalField::LinkedIn,
        PersonalField::Portfolio,
    ];

    fn as_str(self) -> &'static str {
        match self {
            PersonalField::FullName => "fullName",
            PersonalField::Email => "email",
            PersonalField::Phone => "phone",
            PersonalField::Location => "location",
            PersonalField::LinkedIn => "linkedIn",
            PersonalField::Portfolio => "portfolio",
        }
    }
}

impl Record for PersonalInfo {
    type Field = PersonalField;

    fn get(&self, field: PersonalField) -> &str {
        match field {
            PersonalField::FullName => &self.full_name,
            PersonalField::Email => &self.email,
            PersonalField::Phone => &self.phone,
            PersonalField::Location => &self.location,
            PersonalField::LinkedIn => &self.linked_in,
            PersonalField::Portfolio => &self.portfolio,
        }
    }

    fn slot(&mut self, field: PersonalField) -> &mut String {
        match field {
            PersonalField::FullName => &mut self.full_name,
            PersonalField::Email => &mut self.email,
            PersonalField::Phone => &mut self.phone,
            PersonalField::Location => &mut self.location,
            PersonalField::LinkedIn => &mut self.linked_in,
            PersonalField::Portfolio => &mut self.portfolio,
        }
    }
}

/// Skills are free text per category, not structured lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: String,
    pub soft: String,
    pub languages: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillsField {
    Technical,
    Soft,
    Languages,
}

impl FieldName for SkillsField {
    const ALL: &'static [Self] = &[
        SkillsField::Technical,
        SkillsField::Soft,
        SkillsField::Languages,
    ];

    fn as_str(self) -> &'static str {
        match self {
            SkillsField::Technical => "technical",
            SkillsField::Soft => "soft",
            SkillsField::Languages => "languages",
        }
    }
}

impl Record for Skills {
    type Field = SkillsField;

    fn get(&self, field: SkillsField) -> &str {
        match field {
            SkillsField::Technical => &self.technical,
            SkillsField::Soft => &self.soft,
            SkillsField::Languages => &self.languages,
        }
    }

    fn slot(&mut self, field: SkillsField) -> &mut String {
        match field {
            SkillsField::Technical => &mut self.technical,
            SkillsField::Soft => &mut self.soft,
            SkillsField::Languages => &mut self.languages,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Additional {
    pub certifications: String,
    pub extracurricular: String,
    pub awards: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdditionalField {
    Certifications,
    Extracurricular,
    Awards,
}

impl FieldName for AdditionalField {
    const ALL: &'static [Self] = &[
        AdditionalField::Certifications,
        AdditionalField::Extracurricular,
        AdditionalField::Awards,
    ];

    fn as_str(self) -> &'static str {
        match self {
            AdditionalField::Certifications => "certifications",
            AdditionalField::Extracurricular => "extracurricular",
            AdditionalField::Awards => "awards",
        }
    }
}

impl Record for Additional {
    type Field = AdditionalField;

    fn get(&self, field: AdditionalField) -> &str {
        match field {
            AdditionalField::Certifications => &self.certifications,
            AdditionalField::Extracurricular => &self.extracurricular,
            AdditionalField::Awards => &self.awards,
        }
    }

    fn slot(&mut self, field: AdditionalField) -> &mut String {
        match field {
            AdditionalField::Certifications => &mut self.certifications,
            AdditionalField::Extracurricular => &mut self.extracurricular,
            AdditionalField::Awards => &mut self.awards,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Repeatable entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub location: String,
    pub degree: String,
    pub classification: String,
    pub start_date: String,
    pub end_date: String,
    pub relevant_modules: String,
    pub dissertation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationField {
    Institution,
    Location,
    Degree,
    Classification,
    StartDate,
    EndDate,
    RelevantModules,
    Dissertation,
}

impl FieldName for EducationField {
    const ALL: &'static [Self] = &[
        EducationField::Institution,
        EducationField::Location,
        EducationField::Degree,
        EducationField::Classification,
        EducationField::StartDate,
        EducationField::EndDate,
        EducationField::RelevantModules,
        EducationField::Dissertation,
    ];

    fn as_str(self) -> &'static str {
        match self {
            EducationField::Institution => "institution",
            EducationField::Location => "location",
            EducationField::Degree => "degree",
            EducationField::Classification => "classification",
            EducationField::StartDate => "startDate",
            EducationField::EndDate => "endDate",
            EducationField::RelevantModules => "relevantModules",
            EducationField::Dissertation => "dissertation",
        }
    }
}

impl Record for EducationEntry {
    type Field = EducationField;

    fn get(&self, field: EducationField) -> &str {
        match field {
            EducationField::Institution => &self.institution,
            EducationField::Location => &self.location,
            EducationField::Degree => &self.degree,
            EducationField::Classification => &self.classification,
            EducationField::StartDate => &self.start_date,
            EducationField::EndDate => &self.end_date,
            EducationField::RelevantModules => &self.relevant_modules,
            EducationField::Dissertation => &self.dissertation,
        }
    }

    fn slot(&mut self, field: EducationField) -> &mut String {
        match field {
            EducationField::Institution => &mut self.institution,
            EducationField::Location => &mut self.location,
            EducationField::Degree => &mut self.degree,
            EducationField::Classification => &mut self.classification,
            EducationField::StartDate => &mut self.start_date,
            EducationField::EndDate => &mut self.end_date,
            EducationField::RelevantModules => &mut self.relevant_modules,
            EducationField::Dissertation => &mut self.dissertation,
        }
    }
}

impl Entry for EducationEntry {
    const SECTION: SectionKind = SectionKind::Education;

    fn key_field(&self) -> &str {
        &self.institution
    }

    fn entries(doc: &Document) -> &[Self] {
        &doc.education
    }

    fn entries_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.education
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub organisation: String,
    pub location: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub responsibilities: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExperienceField {
    Organisation,
    Location,
    Title,
    StartDate,
    EndDate,
    Responsibilities,
}

impl FieldName for ExperienceField {
    const ALL: &'static [Self] = &[
        ExperienceField::Organisation,
        ExperienceField::Location,
        ExperienceField::Title,
        ExperienceField::StartDate,
        ExperienceField::EndDate,
        ExperienceField::Responsibilities,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ExperienceField::Organisation => "organisation",
            ExperienceField::Location => "location",
            ExperienceField::Title => "title",
            ExperienceField::StartDate => "startDate",
            ExperienceField::EndDate => "endDate",
            ExperienceField::Responsibilities => "responsibilities",
        }
    }
}

impl Record for ExperienceEntry {
    type Field = ExperienceField;

    fn get(&self, field: ExperienceField) -> &str {
        match field {
            ExperienceField::Organisation => &self.organisation,
            ExperienceField::Location => &self.location,
            ExperienceField::Title => &self.title,
            ExperienceField::StartDate => &self.start_date,
            ExperienceField::EndDate => &self.end_date,
            ExperienceField::Responsibilities => &self.responsibilities,
        }
    }

    fn slot(&mut self, field: ExperienceField) -> &mut String {
        match field {
            ExperienceField::Organisation => &mut self.organisation,
            ExperienceField::Location => &mut self.location,
            ExperienceField::Title => &mut self.title,
            ExperienceField::StartDate => &mut self.start_date,
            ExperienceField::EndDate => &mut self.end_date,
            ExperienceField::Responsibilities => &mut self.responsibilities,
        }
    }
}

impl Entry for ExperienceEntry {
    const SECTION: SectionKind = SectionKind::Experience;

    fn key_field(&self) -> &str {
        &self.organisation
    }

    fn entries(doc: &Document) -> &[Self] {
        &doc.experience
    }

    fn entries_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.experience
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub skills: String,
    pub results: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectField {
    Title,
    Description,
    Skills,
    Results,
}

impl FieldName for ProjectField {
    const ALL: &'static [Self] = &[
        ProjectField::Title,
        ProjectField::Description,
        ProjectField::Skills,
        ProjectField::Results,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ProjectField::Title => "title",
            ProjectField::Description => "description",
            ProjectField::Skills => "skills",
            ProjectField::Results => "results",
        }
    }
}

impl Record for ProjectEntry {
    type Field = ProjectField;

    fn get(&self, field: ProjectField) -> &str {
        match field {
            ProjectField::Title => &self.title,
            ProjectField::Description => &self.description,
            ProjectField::Skills => &self.skills,
            ProjectField::Results => &self.results,
        }
    }

    fn slot(&mut self, field: ProjectField) -> &mut String {
        match field {
            ProjectField::Title => &mut self.title,
            ProjectField::Description => &mut self.description,
            ProjectField::Skills => &mut self.skills,
            ProjectField::Results => &mut self.results,
        }
    }
}

impl Entry for ProjectEntry {
    const SECTION: SectionKind = SectionKind::Projects;

    fn key_field(&self) -> &str {
        &self.title
    }

    fn entries(doc: &Document) -> &[Self] {
        &doc.projects
    }

    fn entries_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.projects
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// The whole CV. Every repeatable section holds at least one entry.
///
/// Collections are private so the `>= 1 entry` invariant can only be touched
/// through the collection operations below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    personal_info: PersonalInfo,
    professional_summary: String,
    education: Vec<EducationEntry>,
    skills: Skills,
    experience: Vec<ExperienceEntry>,
    projects: Vec<ProjectEntry>,
    additional: Additional,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            professional_summary: String::new(),
            education: vec![EducationEntry::blank()],
            skills: Skills::default(),
            experience: vec![ExperienceEntry::blank()],
            projects: vec![ProjectEntry::blank()],
            additional: Additional::default(),
        }
    }
}

impl Document {
    pub fn personal_info(&self) -> &PersonalInfo {
        &self.personal_info
    }

    pub fn set_personal_info(&mut self, field: PersonalField, value: impl Into<String>) {
        self.personal_info.set(field, value);
    }

    pub fn professional_summary(&self) -> &str {
        &self.professional_summary
    }

    pub fn set_professional_summary(&mut self, value: impl Into<String>) {
        self.professional_summary = value.into();
    }

    pub fn skills(&self) -> &Skills {
        &self.skills
    }

    pub fn set_skill(&mut self, field: SkillsField, value: impl Into<String>) {
        self.skills.set(field, value);
    }

    pub fn additional(&self) -> &Additional {
        &self.additional
    }

    pub fn set_additional(&mut self, field: AdditionalField, value: impl Into<String>) {
        self.additional.set(field, value);
    }

    pub fn education(&self) -> &[EducationEntry] {
        &self.education
    }

    pub fn experience(&self) -> &[ExperienceEntry] {
        &self.experience
    }

    pub fn projects(&self) -> &[ProjectEntry] {
        &self.projects
    }

    /// Entries of the section `T` belongs to.
    pub fn entries<T: Entry>(&self) -> &[T] {
        T::entries(self)
    }

    pub fn append_entry<T: Entry>(&mut self) {
        let next = collection::append(T::entries(self));
        *T::entries_mut(self) = next;
    }

    /// # Panics
    /// If `index` is out of bounds for the section.
    pub fn remove_entry<T: Entry>(&mut self, index: usize) {
        let next = collection::remove_at(T::entries(self), index);
        *T::entries_mut(self) = next;
    }

    /// # Panics
    /// If `index` is out of bounds for the section.
    pub fn update_entry<T: Entry>(&mut self, index: usize, field: T::Field, value: &str) {
        let next = collection::update_field(T::entries(self), index, field, value);
        *T::entries_mut(self) = next;
    }

    /// Adds imported entries to a section. A section still holding only its
    /// blank placeholder is replaced rather than appended to.
    pub fn import_entries<T: Entry>(&mut self, imported: Vec<T>) {
        if imported.is_empty() {
            return;
        }
        let current = T::entries_mut(self);
        if current.len() == 1 && current[0].is_blank() {
            *current = imported;
        } else {
            current.extend(imported);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_has_one_blank_entry_per_section() {
        let doc = Document::default();
        assert_eq!(doc.education(), &[EducationEntry::blank()]);
        assert_eq!(doc.experience(), &[ExperienceEntry::blank()]);
        assert_eq!(doc.projects(), &[ProjectEntry::blank()]);
        assert!(doc.professional_summary().is_empty());
    }

    #[test]
    fn test_fixed_record_setters_touch_only_their_field() {
        let mut doc = Document::default();
        doc.set_personal_info(PersonalField::Email, "ada@example.com");
        doc.set_skill(SkillsField::Languages, "English (Native)");
        doc.set_additional(AdditionalField::Awards, "Dean's List");

        assert_eq!(doc.personal_info().email, "ada@example.com");
        assert!(doc.personal_info().full_name.is_empty());
        assert_eq!(doc.skills().languages, "English (Native)");
        assert!(doc.skills().technical.is_empty());
        assert_eq!(doc.additional().awards, "Dean's List");
        assert!(doc.additional().certifications.is_empty());
    }

    #[test]
    fn test_field_names_round_trip_through_from_name() {
        for field in EducationField::ALL {
            assert_eq!(EducationField::from_name(field.as_str()), Some(*field));
        }
        for field in PersonalField::ALL {
            assert_eq!(PersonalField::from_name(field.as_str()), Some(*field));
        }
        assert_eq!(ProjectField::from_name("Title"), None);
    }

    #[test]
    fn test_field_enum_serde_matches_as_str() {
        let field: EducationField = serde_json::from_str(r#""relevantModules""#).unwrap();
        assert_eq!(field, EducationField::RelevantModules);
        let field: PersonalField = serde_json::from_str(r#""linkedIn""#).unwrap();
        assert_eq!(field.as_str(), "linkedIn");
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let mut doc = Document::default();
        doc.set_personal_info(PersonalField::LinkedIn, "linkedin.com/in/ada");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["personalInfo"]["linkedIn"], "linkedin.com/in/ada");
        assert_eq!(json["education"][0]["startDate"], "");
        assert_eq!(json["projects"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_import_replaces_lone_blank_entry() {
        let mut doc = Document::default();
        let imported = vec![ProjectEntry {
            title: "Thesis tooling".to_string(),
            ..Default::default()
        }];
        doc.import_entries(imported.clone());
        assert_eq!(doc.projects(), imported.as_slice());
    }

    #[test]
    fn test_import_appends_after_existing_content() {
        let mut doc = Document::default();
        doc.update_entry::<ProjectEntry>(0, ProjectField::Title, "First");
        doc.import_entries(vec![ProjectEntry {
            title: "Second".to_string(),
            ..Default::default()
        }]);
        let titles: Vec<_> = doc.projects().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_import_of_nothing_is_noop() {
        let mut doc = Document::default();
        doc.import_entries::<EducationEntry>(vec![]);
        assert_eq!(doc, Document::default());
    }
}
