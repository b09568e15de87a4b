//! Final routing pass: education entries that were parsed as experience are
//! detected and converted, so education never ships inside `experiences`.

use log::debug;

use crate::schema::{EducationEntry, ExperienceEntry};

const DEGREE_TERMS: &[&str] = &[
    "bachelor", "master", "associate", "phd", "ph.d", "doctorate", "b.s.", "b.a.",
    "m.s.", "m.a.", "m.b.a.", "b.sc", "m.sc", "undergraduate", "graduate", "diploma",
];

const INSTITUTION_TERMS: &[&str] = &[
    "university", "college", "institute", "academy", "high school", "school", "polytechnic",
];

const STUDY_ABROAD_TERMS: &[&str] = &[
    "study abroad", "dis study", "isa study", "semester abroad", "exchange program",
];

/// Does this experience entry carry strong education signals in its company,
/// title, or location?
pub fn looks_like_education_entry(exp: &ExperienceEntry) -> bool {
    let text = format!(
        "{} {} {}",
        exp.company.as_deref().unwrap_or("").to_lowercase(),
        exp.job_title.as_deref().unwrap_or("").to_lowercase(),
        exp.location.as_deref().unwrap_or("").to_lowercase(),
    );

    DEGREE_TERMS.iter().any(|t| text.contains(t))
        || INSTITUTION_TERMS.iter().any(|t| text.contains(t))
        || STUDY_ABROAD_TERMS.iter().any(|t| text.contains(t))
}

fn title_contains_any(title_lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| title_lower.contains(t))
}

/// Convert an experience-shaped entry into an education entry. The company
/// becomes the institution; the job title becomes the degree when it names
/// one, or the field of study for "X Major" titles.
pub fn convert_experience_to_education(exp: ExperienceEntry) -> EducationEntry {
    let title = exp.job_title.clone().unwrap_or_default();
    let title_lower = title.to_lowercase();

    let mut degree = None;
    let mut field_of_study = None;

    if title_contains_any(&title_lower, &["bachelor", "b.s.", "b.a.", "b.sc"])
        || title_contains_any(&title_lower, &["master", "m.s.", "m.a.", "m.b.a.", "m.sc"])
        || title_contains_any(&title_lower, &["associate", "a.a.", "a.s."])
        || title_contains_any(&title_lower, &["ph.d", "phd", "doctorate"])
    {
        degree = Some(title);
    } else if title_lower.contains("major") {
        // "Applied Communications Major" names the field, not a degree.
        field_of_study = Some(title.replace("Major", "").replace("major", "").trim().to_string());
    }

    EducationEntry {
        institution: exp.company,
        degree,
        field_of_study,
        location: exp.location,
        start_date: exp.start_date,
        end_date: exp.end_date,
        gpa: None,
        details: exp.achievements,
    }
}

/// Split a parsed experience list into true experiences and reclassified
/// education entries.
pub fn split_experience_and_education(
    experiences: Vec<ExperienceEntry>,
) -> (Vec<ExperienceEntry>, Vec<EducationEntry>) {
    let mut true_experiences = Vec::new();
    let mut reclassified = Vec::new();

    for exp in experiences {
        if looks_like_education_entry(&exp) {
            debug!(
                "reclassification: moving '{}' from experience to education",
                exp.company.as_deref().unwrap_or("")
            );
            reclassified.push(convert_experience_to_education(exp));
        } else {
            true_experiences.push(exp);
        }
    }

    (true_experiences, reclassified)
}

/// Merge parsed and reclassified education entries, deduplicating on
/// (institution, degree). Entries with neither institution nor degree are
/// dropped; on a duplicate key the entry with more populated fields wins.
pub fn merge_education_entries(entries: Vec<EducationEntry>) -> Vec<EducationEntry> {
    let mut unique: Vec<EducationEntry> = Vec::new();

    for edu in entries {
        let key = (
            edu.institution.clone().unwrap_or_default(),
            edu.degree.clone().unwrap_or_default(),
        );

        let existing_idx = unique.iter().position(|e| {
            (
                e.institution.clone().unwrap_or_default(),
                e.degree.clone().unwrap_or_default(),
            ) == key
        });

        match existing_idx {
            None => {
                if edu.is_substantial() {
                    unique.push(edu);
                }
            }
            Some(i) => {
                if edu.populated_score() > unique[i].populated_score() {
                    unique[i] = edu;
                }
            }
        }
    }

    unique
}
