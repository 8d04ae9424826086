//! Keyword matcher: finds which vocabulary terms appear in a job description.
//!
//! Matching is case-insensitive substring containment: no stemming, no
//! tokenization, no word boundaries ("react" matches inside "reacting").
//! Output order is vocabulary order, never input order.

use serde::{Deserialize, Serialize};

/// Reference vocabulary of common UK job-description terms.
pub const REFERENCE_VOCABULARY: &[&str] = &[
    "teamwork",
    "communication",
    "leadership",
    "analytical",
    "problem-solving",
    "project management",
    "time management",
    "data analysis",
    "research",
    "python",
    "excel",
    "javascript",
    "react",
    "customer service",
    "organisation",
    "planning",
    "presentation",
    "detail-oriented",
    "collaboration",
    "adaptability",
];

/// Terms surfaced as hints next to the technical skills field.
const TECHNICAL_HINT_TERMS: &[&str] = &["python", "excel", "javascript", "data analysis"];

/// Terms surfaced as hints next to the soft skills field.
const SOFT_HINT_TERMS: &[&str] = &["teamwork", "communication", "leadership", "problem-solving"];

const SUMMARY_HINT_COUNT: usize = 3;
const EXPERIENCE_HINT_COUNT: usize = 3;
pub const REVIEW_HINT_COUNT: usize = 5;

/// Ordered list of distinct candidate terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Vocabulary(Vec<String>);

impl Vocabulary {
    pub fn reference() -> Self {
        Self(REFERENCE_VOCABULARY.iter().map(|t| t.to_string()).collect())
    }

    /// Builds a vocabulary from arbitrary terms: trims each, drops empties and
    /// case-insensitive duplicates, keeps first-occurrence order.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            let lower = term.to_lowercase();
            if seen.contains(&lower) {
                continue;
            }
            seen.push(lower);
            out.push(term.to_string());
        }
        Self(out)
    }

    /// Parses a comma-separated list, e.g. from `KEYWORD_VOCABULARY`.
    pub fn parse_list(raw: &str) -> Self {
        Self::from_terms(raw.split(','))
    }

    pub fn terms(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::reference()
    }
}

/// Vocabulary terms found in a job description, in vocabulary order.
///
/// Not reactive: it is only recomputed when analysis is requested again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The first `n` keywords (fewer if the set is smaller).
    pub fn leading(&self, n: usize) -> Vec<String> {
        self.0.iter().take(n).cloned().collect()
    }

    fn filtered(&self, allowed: &[&str]) -> Vec<String> {
        self.0
            .iter()
            .filter(|k| {
                let lower = k.to_lowercase();
                allowed.iter().any(|a| *a == lower)
            })
            .cloned()
            .collect()
    }
}

/// Returns the vocabulary terms contained in `text`, in vocabulary order.
///
/// Empty or whitespace-only text short-circuits to an empty set.
pub fn match_keywords(text: &str, vocabulary: &Vocabulary) -> KeywordSet {
    if text.trim().is_empty() {
        return KeywordSet::default();
    }

    let haystack = text.to_lowercase();
    let matched = vocabulary
        .terms()
        .iter()
        .filter(|term| haystack.contains(&term.to_lowercase()))
        .cloned()
        .collect();

    KeywordSet(matched)
}

/// Per-step suggestions derived from the current keyword set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordHints {
    pub summary: Vec<String>,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub experience: Vec<String>,
    pub review: Vec<String>,
}

/// Builds editing hints, or `None` when there are no keywords to hint with.
pub fn keyword_hints(keywords: &KeywordSet) -> Option<KeywordHints> {
    if keywords.is_empty() {
        return None;
    }

    Some(KeywordHints {
        summary: keywords.leading(SUMMARY_HINT_COUNT),
        technical_skills: keywords.filtered(TECHNICAL_HINT_TERMS),
        soft_skills: keywords.filtered(SOFT_HINT_TERMS),
        experience: keywords.leading(EXPERIENCE_HINT_COUNT),
        review: keywords.leading(REVIEW_HINT_COUNT),
    })
}
