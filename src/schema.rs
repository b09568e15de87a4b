//! Response data model for the extraction pipeline.
//!
//! Every type here is part of the stable output contract: a parsed resume is
//! a `ParseResponse` holding the candidate profile, an evidence map that ties
//! each extracted field back to the exact source lines it came from, per-field
//! confidence metadata, and an overall parse quality rating.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable top-level keys of the evidence map. Every response carries all of
/// them, even when a field was not found (empty evidence list).
pub const EVIDENCE_KEYS: [&str; 8] = [
    "full_name",
    "email",
    "phone",
    "location",
    "links",
    "skills",
    "experiences",
    "education",
];

/// Where a line of resume text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// DOCX paragraph extraction
    Docx,
    /// PDF extraction (geometric or word-level)
    Pdf,
    /// Plain text / markdown input
    Text,
    /// Text supplied directly by a user
    User,
}

impl SourceKind {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Docx => "docx",
            SourceKind::Pdf => "pdf",
            SourceKind::Text => "text",
            SourceKind::User => "user",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single input line: a locator identifying where the text came from
/// (e.g. `pdf:page:1:line:3` or `docx:paragraph:0`) plus the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    /// Position of this line in the original document
    pub locator: String,
    /// Raw extracted text, corruption and all
    pub text: String,
}

impl SourceLine {
    /// Create a new source line.
    pub fn new(locator: impl Into<String>, text: impl Into<String>) -> Self {
        SourceLine {
            locator: locator.into(),
            text: text.into(),
        }
    }
}

/// A supporting snippet for an extracted field.
///
/// Evidence text is always the ORIGINAL line text, never a normalized form,
/// so a consumer can audit what the extractor actually saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Which extractor produced the source line
    pub source: SourceKind,
    /// Where the snippet came from (page, line, paragraph index)
    pub locator: String,
    /// Exact supporting snippet
    pub text: String,
    /// Confidence in this evidence (1.0 = exact match, <1.0 = inferred/repaired)
    pub confidence: f64,
}

impl EvidenceItem {
    /// Exact-match evidence with confidence 1.0.
    pub fn exact(source: SourceKind, locator: impl Into<String>, text: &str) -> Self {
        EvidenceItem {
            source,
            locator: locator.into(),
            text: text.trim().to_string(),
            confidence: 1.0,
        }
    }
}

/// Per-field confidence metadata. Tracks why confidence is what it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfidence {
    /// Name of the field this score applies to
    pub field_name: String,
    /// 0.0 (no confidence) to 1.0 (absolute certainty)
    pub confidence: f64,
    /// How the field was extracted (e.g. "regex_exact_single", "heuristic_window")
    pub extraction_method: String,
    /// Why confidence is this value
    pub reasons: Vec<String>,
    /// Is this field required for "high" parse quality?
    pub required: bool,
}

/// An education entry in the candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    /// University, school, or institute name
    pub institution: Option<String>,
    /// Bachelor of Science, M.S., etc.
    pub degree: Option<String>,
    /// Computer Science, Engineering, etc.
    pub field_of_study: Option<String>,
    /// City, State
    pub location: Option<String>,
    /// YYYY or MM/YYYY
    pub start_date: Option<String>,
    /// YYYY or MM/YYYY
    pub end_date: Option<String>,
    /// GPA if present
    pub gpa: Option<String>,
    /// Major, minor, focus, honors, coursework
    pub details: Vec<String>,
}

impl EducationEntry {
    /// An entry is only worth keeping if it names an institution or a degree.
    pub fn is_substantial(&self) -> bool {
        self.institution.is_some() || self.degree.is_some()
    }

    /// Populated-field score used when deduplicating entries that share the
    /// same (institution, degree) key: field_of_study, start, end count one
    /// point each, plus one per detail line.
    pub fn populated_score(&self) -> usize {
        usize::from(self.field_of_study.is_some())
            + usize::from(self.start_date.is_some())
            + usize::from(self.end_date.is_some())
            + self.details.len()
    }
}

/// A work experience entry in the candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    /// Employer name
    pub company: Option<String>,
    /// Job title
    pub job_title: Option<String>,
    /// City, State
    pub location: Option<String>,
    /// Start of employment
    pub start_date: Option<String>,
    /// End of employment ("Present" for current roles)
    pub end_date: Option<String>,
    /// Prose describing the company, when the entry carries one
    pub company_description: Option<String>,
    /// Prose describing the role, collected before any bullets
    pub job_description: Option<String>,
    /// Bullet achievements, normalized
    pub achievements: Vec<String>,
}

impl ExperienceEntry {
    /// An entry is only worth keeping if it names a company or a job title.
    pub fn is_substantial(&self) -> bool {
        self.company.is_some() || self.job_title.is_some()
    }
}

/// The extracted candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub links: Vec<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

/// Overall parse quality, derived from the core-field confidences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseQuality {
    /// Core fields (name, email, phone) average >= 0.85
    High,
    /// Core fields average >= 0.65
    Medium,
    /// Everything else
    Low,
}

impl ParseQuality {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseQuality::High => "high",
            ParseQuality::Medium => "medium",
            ParseQuality::Low => "low",
        }
    }
}

/// Full response for a parsed resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    /// Extracted profile fields
    pub candidate_profile: CandidateProfile,
    /// Field name -> supporting snippets (all `EVIDENCE_KEYS` always present)
    pub evidence_map: BTreeMap<String, Vec<EvidenceItem>>,
    /// Field name -> confidence metadata
    pub confidence_scores: BTreeMap<String, FieldConfidence>,
    /// Overall quality tier
    pub parse_quality: ParseQuality,
    /// Human-readable warnings (missing fields, removed junk, fallbacks taken)
    pub warnings: Vec<String>,
}

impl ParseResponse {
    /// Serialize the response to a JSON string.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
