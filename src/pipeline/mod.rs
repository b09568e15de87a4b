//! Pipeline orchestration: lines in, [`ParseResponse`] out.
//!
//! The stages run in a fixed order — phone, email, name, location, links,
//! skills, section scan, experience, education, education safety net,
//! reclassification, confidence scoring. No stage can abort the parse; a
//! field that cannot be found is an empty value with confidence 0.0.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::confidence::ConfidenceCalculator;
use crate::error::{Error, Result};
use crate::extractors::{
    extract_email, extract_links, extract_location, extract_name, extract_phone, extract_skills,
};
use crate::parsers::{
    classify_entry_as_education, looks_like_education_line, merge_education_entries,
    parse_education_entry, parse_experience_entry, split_experience_and_education,
};
use crate::schema::{
    CandidateProfile, EducationEntry, EvidenceItem, FieldConfidence, ParseResponse, SourceKind,
    SourceLine, EVIDENCE_KEYS,
};
use crate::segmenter::{
    detect_section_type, group_education_entries, group_experience_entries, is_header_line,
    SectionType, BULLET_RE,
};
use crate::vocab::Vocabulary;

/// The deterministic extraction pipeline. Holds the injected vocabulary; a
/// default pipeline carries the built-in keyword sets.
#[derive(Debug, Clone, Default)]
pub struct ResumePipeline {
    vocab: Vocabulary,
}

impl ResumePipeline {
    /// Pipeline with the built-in vocabulary.
    pub fn new() -> Self {
        ResumePipeline::default()
    }

    /// Pipeline with a custom vocabulary (tests use reduced sets).
    pub fn with_vocab(vocab: Vocabulary) -> Self {
        ResumePipeline { vocab }
    }

    /// Parse raw text, one resume line per text line. Locators take the form
    /// `text:line:<n>` (1-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use resume_oxide::pipeline::ResumePipeline;
    /// use resume_oxide::schema::SourceKind;
    ///
    /// let pipeline = ResumePipeline::new();
    /// let response = pipeline
    ///     .parse_text("JOHN DOE\njohn.doe@example.com", SourceKind::Text)
    ///     .unwrap();
    /// assert_eq!(
    ///     response.candidate_profile.email.as_deref(),
    ///     Some("john.doe@example.com")
    /// );
    /// ```
    pub fn parse_text(&self, text: &str, source: SourceKind) -> Result<ParseResponse> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let lines: Vec<SourceLine> = text
            .lines()
            .enumerate()
            .map(|(i, line)| SourceLine::new(format!("text:line:{}", i + 1), line))
            .collect();

        self.parse_lines(&lines, source)
    }

    /// Run the full extraction over pre-split lines.
    pub fn parse_lines(&self, lines: &[SourceLine], source: SourceKind) -> Result<ParseResponse> {
        if lines.is_empty() {
            return Err(Error::EmptyInput);
        }

        let vocab = &self.vocab;
        let mut candidate = CandidateProfile::default();
        let mut evidence_map: BTreeMap<String, Vec<EvidenceItem>> = BTreeMap::new();
        let mut warnings: Vec<String> = Vec::new();

        let add_ev = |map: &mut BTreeMap<String, Vec<EvidenceItem>>, key: &str, line: &SourceLine| {
            map.entry(key.to_string())
                .or_default()
                .push(EvidenceItem::exact(source, line.locator.as_str(), &line.text));
        };

        // Phone runs before email so phone digits never end up inside an
        // email's user portion when both share a line.
        let phone_hit = extract_phone(lines, source);
        candidate.phone = phone_hit.value;
        evidence_map
            .entry("phone".to_string())
            .or_default()
            .extend(phone_hit.evidence);

        let email_hit = extract_email(lines, source);
        let email_idx = email_hit.line_index;
        candidate.email = email_hit.value;
        evidence_map
            .entry("email".to_string())
            .or_default()
            .extend(email_hit.evidence);

        let name_hit = extract_name(lines, email_idx, candidate.email.as_deref(), source, vocab);
        candidate.full_name = name_hit.full_name;
        evidence_map
            .entry("full_name".to_string())
            .or_default()
            .extend(name_hit.evidence);

        let location_hit = extract_location(lines, source, vocab);
        candidate.location = location_hit.location;
        evidence_map
            .entry("location".to_string())
            .or_default()
            .extend(location_hit.evidence);

        let links_hit = extract_links(lines, source);
        candidate.links = links_hit.links;
        evidence_map
            .entry("links".to_string())
            .or_default()
            .extend(links_hit.evidence);

        let skills_hit = extract_skills(lines, source, vocab);
        candidate.skills = skills_hit.skills;
        evidence_map
            .entry("skills".to_string())
            .or_default()
            .extend(skills_hit.evidence);

        // Section scan. When a header type repeats, the last occurrence wins.
        let mut edu_section_idx: Option<usize> = None;
        let mut exp_section_idx: Option<usize> = None;
        for (idx, line) in lines.iter().enumerate() {
            match detect_section_type(&line.text, vocab) {
                Some(SectionType::Education) => {
                    debug!("section header at line {}: education", idx);
                    edu_section_idx = Some(idx);
                }
                Some(SectionType::Experience) => {
                    debug!("section header at line {}: experience", idx);
                    exp_section_idx = Some(idx);
                }
                None => {}
            }
        }
        debug!(
            "section detection: education={:?} experience={:?}",
            edu_section_idx, exp_section_idx
        );

        // Experience parsing. The grouper stops on its own at the next major
        // section header, so an education section after it is never consumed.
        let mut experiences = Vec::new();
        if let Some(exp_start) = exp_section_idx {
            for entry_lines in group_experience_entries(lines, exp_start, vocab) {
                let exp = parse_experience_entry(&entry_lines, vocab);
                if exp.is_substantial() {
                    debug!(
                        "experience entry: company={:?} title={:?}",
                        exp.company, exp.job_title
                    );
                    for line in &entry_lines {
                        add_ev(&mut evidence_map, "experiences", line);
                    }
                    experiences.push(exp);
                }
            }
        } else {
            debug!("skipping experience parsing: no experience section found");
        }

        // Education parsing, section-gated.
        let mut educations: Vec<EducationEntry> = Vec::new();
        if let Some(edu_start) = edu_section_idx {
            debug!("starting education parsing from line {}", edu_start);
            for entry_lines in group_education_entries(lines, edu_start, vocab) {
                if !classify_entry_as_education(&entry_lines, Some(SectionType::Education), vocab) {
                    continue;
                }

                let (entry, edu_warnings) = parse_education_entry(&entry_lines, vocab);
                if entry.is_substantial() {
                    debug!(
                        "education entry: institution={:?} degree={:?}",
                        entry.institution, entry.degree
                    );
                    for line in &entry_lines {
                        add_ev(&mut evidence_map, "education", line);
                    }
                    educations.push(entry);
                    warnings.extend(edu_warnings);
                }
            }
        }

        if edu_section_idx.is_some() && educations.is_empty() {
            warnings.push("EDUCATION header found but no education entries parsed".to_string());
        }

        // Safety net: no EDUCATION header anywhere, so scan pre-experience
        // lines for strong education signals.
        if educations.is_empty() && edu_section_idx.is_none() {
            warn!("education fallback triggered: no EDUCATION header found");
            self.education_fallback_scan(
                lines,
                exp_section_idx,
                &mut educations,
                &mut evidence_map,
                source,
            );
        }

        // Reclassification runs only when education parsing yielded nothing;
        // otherwise its cruder conversions would shadow properly parsed
        // entries.
        let mut reclassified = Vec::new();
        if educations.is_empty() {
            debug!("running experience-to-education reclassification");
            let (kept, moved) = split_experience_and_education(experiences);
            experiences = kept;
            reclassified = moved;
        }

        candidate.experiences = experiences;

        let mut all_education = educations;
        all_education.extend(reclassified);
        candidate.education = merge_education_entries(all_education);

        if candidate.education.is_empty() {
            warnings.push("No education entries detected in resume".to_string());
        }

        // Confidence scoring.
        let confidence_scores =
            self.score_confidences(&candidate, email_idx, &evidence_map, &mut warnings);

        let parse_quality = ConfidenceCalculator::calculate_overall_parse_quality(
            confidence_scores
                .get("full_name")
                .map_or(0.0, |c| c.confidence),
            confidence_scores.get("email").map_or(0.0, |c| c.confidence),
            confidence_scores.get("phone").map_or(0.0, |c| c.confidence),
        );

        // Stable contract: every evidence key is present, found or not.
        for key in EVIDENCE_KEYS {
            evidence_map.entry(key.to_string()).or_default();
        }

        Ok(ParseResponse {
            candidate_profile: candidate,
            evidence_map,
            confidence_scores,
            parse_quality,
            warnings,
        })
    }

    /// Scan pre-experience lines for education-signal blocks, group them on
    /// signal lines, and keep parsed entries not already present.
    fn education_fallback_scan(
        &self,
        lines: &[SourceLine],
        exp_section_idx: Option<usize>,
        educations: &mut Vec<EducationEntry>,
        evidence_map: &mut BTreeMap<String, Vec<EvidenceItem>>,
        source: SourceKind,
    ) {
        let vocab = &self.vocab;
        let mut block_lines: Vec<SourceLine> = Vec::new();
        let mut in_block = false;

        for (idx, line) in lines.iter().enumerate() {
            if let Some(exp_start) = exp_section_idx {
                if idx >= exp_start {
                    break;
                }
            }

            let t = line.text.trim();
            if t.is_empty() {
                in_block = false;
                continue;
            }
            if is_header_line(&line.text, vocab) {
                in_block = false;
                continue;
            }

            if looks_like_education_line(t) && !BULLET_RE.is_match(t) {
                in_block = true;
                block_lines.push(line.clone());
            } else if in_block {
                block_lines.push(line.clone());
            }
        }

        if block_lines.is_empty() {
            return;
        }

        let flush = |group: &[SourceLine],
                         educations: &mut Vec<EducationEntry>,
                         evidence_map: &mut BTreeMap<String, Vec<EvidenceItem>>| {
            if group.is_empty() {
                return;
            }
            let (entry, _) = parse_education_entry(group, vocab);
            if !entry.is_substantial() {
                return;
            }
            let is_duplicate = educations
                .iter()
                .any(|e| e.institution == entry.institution && e.degree == entry.degree);
            if !is_duplicate {
                debug!("fallback education entry: {:?}", entry.institution);
                for line in group {
                    evidence_map
                        .entry("education".to_string())
                        .or_default()
                        .push(EvidenceItem::exact(source, line.locator.as_str(), &line.text));
                }
                educations.push(entry);
            }
        };

        let mut current_group: Vec<SourceLine> = Vec::new();
        for line in block_lines {
            let t = line.text.trim();
            let is_new_entry_marker = looks_like_education_line(t) && !BULLET_RE.is_match(t);

            if is_new_entry_marker && !current_group.is_empty() {
                flush(&current_group, educations, evidence_map);
                current_group = vec![line];
            } else {
                current_group.push(line);
            }
        }
        flush(&current_group, educations, evidence_map);
    }

    /// Build the per-field confidence map and append low-confidence warnings
    /// for the core contact fields.
    fn score_confidences(
        &self,
        candidate: &CandidateProfile,
        email_idx: Option<usize>,
        evidence_map: &BTreeMap<String, Vec<EvidenceItem>>,
        warnings: &mut Vec<String>,
    ) -> BTreeMap<String, FieldConfidence> {
        let mut scores: BTreeMap<String, FieldConfidence> = BTreeMap::new();

        let evidence_count =
            |key: &str| evidence_map.get(key).map_or(0, |evidence| evidence.len());

        let field = |name: &str,
                     confidence: f64,
                     method: &str,
                     reasons: Vec<String>,
                     required: bool| FieldConfidence {
            field_name: name.to_string(),
            confidence,
            extraction_method: method.to_string(),
            reasons,
            required,
        };

        match candidate.email.as_deref() {
            Some(email) => {
                let (conf, method) = ConfidenceCalculator::email(email, evidence_count("email"));
                scores.insert(
                    "email".to_string(),
                    field(
                        "email",
                        conf,
                        &method,
                        vec!["Found via regex extraction".to_string()],
                        true,
                    ),
                );
            }
            None => {
                scores.insert(
                    "email".to_string(),
                    field(
                        "email",
                        0.0,
                        "not_found",
                        vec!["No email found in resume".to_string()],
                        true,
                    ),
                );
            }
        }

        match candidate.phone.as_deref() {
            Some(phone) => {
                let (conf, method) = ConfidenceCalculator::phone(phone, evidence_count("phone"));
                scores.insert(
                    "phone".to_string(),
                    field(
                        "phone",
                        conf,
                        &method,
                        vec!["Found via regex extraction".to_string()],
                        true,
                    ),
                );
            }
            None => {
                scores.insert(
                    "phone".to_string(),
                    field(
                        "phone",
                        0.0,
                        "not_found",
                        vec!["No phone number found in resume".to_string()],
                        true,
                    ),
                );
            }
        }

        match candidate.full_name.as_deref() {
            Some(full_name) => {
                let near_email = email_idx.is_some();
                let is_top = evidence_map.get("full_name").is_some_and(|evidence| {
                    evidence.iter().any(|ev| {
                        ev.locator.starts_with("docx:paragraph:0")
                            || ev.locator.starts_with("pdf:page:1:line:")
                    })
                });
                let has_middle_initial =
                    full_name.contains(' ') && full_name.split_whitespace().count() >= 3;

                let (conf, method) = ConfidenceCalculator::full_name(
                    full_name,
                    near_email,
                    is_top,
                    true,
                    has_middle_initial,
                );
                scores.insert(
                    "full_name".to_string(),
                    field(
                        "full_name",
                        conf,
                        &method,
                        vec![
                            "Extracted from resume header area".to_string(),
                            format!("Near email: {}", near_email),
                            format!("At top: {}", is_top),
                        ],
                        true,
                    ),
                );
            }
            None => {
                scores.insert(
                    "full_name".to_string(),
                    field(
                        "full_name",
                        0.0,
                        "not_found",
                        vec!["No candidate name found".to_string()],
                        true,
                    ),
                );
            }
        }

        match candidate.location.as_deref() {
            Some(location) => {
                let has_comma = location.contains(',');
                let (conf, method) = ConfidenceCalculator::location(
                    location,
                    "regex_pattern",
                    has_comma,
                    has_comma,
                );
                scores.insert(
                    "location".to_string(),
                    field(
                        "location",
                        conf,
                        &method,
                        vec!["Extracted from geographic pattern".to_string()],
                        false,
                    ),
                );
            }
            None => {
                scores.insert(
                    "location".to_string(),
                    field(
                        "location",
                        0.0,
                        "not_found",
                        vec!["No location found".to_string()],
                        false,
                    ),
                );
            }
        }

        if candidate.links.is_empty() {
            scores.insert(
                "links".to_string(),
                field(
                    "links",
                    0.0,
                    "not_found",
                    vec!["No URLs found".to_string()],
                    false,
                ),
            );
        } else {
            scores.insert(
                "links".to_string(),
                field(
                    "links",
                    0.95,
                    "regex_url_extraction",
                    vec![format!("Found {} URL(s) via regex", candidate.links.len())],
                    false,
                ),
            );
        }

        if candidate.skills.is_empty() {
            scores.insert(
                "skills".to_string(),
                field(
                    "skills",
                    0.0,
                    "not_found",
                    vec!["No skills found".to_string()],
                    false,
                ),
            );
        } else {
            scores.insert(
                "skills".to_string(),
                field(
                    "skills",
                    0.85,
                    "section_extraction",
                    vec![format!("Found {} skills", candidate.skills.len())],
                    false,
                ),
            );
        }

        if candidate.experiences.is_empty() {
            scores.insert(
                "experiences".to_string(),
                field(
                    "experiences",
                    0.0,
                    "not_found",
                    vec!["No experience section found".to_string()],
                    false,
                ),
            );
        } else {
            scores.insert(
                "experiences".to_string(),
                field(
                    "experiences",
                    0.85,
                    "multi_line_experience_parsing",
                    vec![format!(
                        "Found {} experience entries",
                        candidate.experiences.len()
                    )],
                    false,
                ),
            );
        }

        // Low-confidence warnings for the two core identity fields.
        let email_conf = scores.get("email").map_or(0.0, |c| c.confidence);
        if email_conf < 0.8 {
            if candidate.email.is_none() {
                warnings.push("Could not extract email. User clarification needed.".to_string());
            } else {
                warnings.push(format!(
                    "Email extraction has low confidence: {:.2}",
                    email_conf
                ));
            }
        }

        let name_conf = scores.get("full_name").map_or(0.0, |c| c.confidence);
        if name_conf < 0.8 {
            if candidate.full_name.is_none() {
                warnings.push(
                    "Could not extract candidate name. User clarification needed.".to_string(),
                );
            } else {
                warnings.push(format!(
                    "Name extraction has low confidence: {:.2}",
                    name_conf
                ));
            }
        }

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParseQuality;

    #[test]
    fn test_empty_input_is_an_error() {
        let pipeline = ResumePipeline::new();
        assert!(matches!(
            pipeline.parse_text("   \n  ", SourceKind::Text),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            pipeline.parse_lines(&[], SourceKind::Text),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_full_parse_of_contact_block_resume() {
        let pipeline = ResumePipeline::new();
        let text = "JOHN DOE\n\
                    New York, New York\n\
                    john.doe@example.com | (555) 123-4567\n\
                    \n\
                    EXPERIENCE\n\
                    Bausch & Lomb, Phoenix Valley, AZ\n\
                    TERRITORY MANAGER 04/2020 - 04/2022\n\
                    ● Grew the territory by 40% in 5 months\n\
                    \n\
                    EDUCATION\n\
                    Gonzaga University: Bachelor of Science in Communication Studies\n\
                    Spokane, Washington";

        let response = pipeline.parse_text(text, SourceKind::Text).unwrap();
        let profile = &response.candidate_profile;

        assert_eq!(profile.full_name.as_deref(), Some("John Doe"));
        assert_eq!(profile.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(profile.phone.as_deref(), Some("(555) 123-4567"));
        assert_eq!(profile.location.as_deref(), Some("New York, New York"));

        assert_eq!(profile.experiences.len(), 1);
        assert_eq!(
            profile.experiences[0].company.as_deref(),
            Some("Bausch & Lomb")
        );
        assert_eq!(
            profile.experiences[0].job_title.as_deref(),
            Some("Territory Manager")
        );

        assert_eq!(profile.education.len(), 1);
        assert_eq!(
            profile.education[0].institution.as_deref(),
            Some("Gonzaga University")
        );
        assert_eq!(
            profile.education[0].degree.as_deref(),
            Some("Bachelor of Science")
        );

        assert_eq!(response.parse_quality, ParseQuality::High);
    }

    #[test]
    fn test_evidence_map_always_carries_all_keys() {
        let pipeline = ResumePipeline::new();
        let response = pipeline
            .parse_text("just one line of nothing useful", SourceKind::Text)
            .unwrap();

        for key in EVIDENCE_KEYS {
            assert!(response.evidence_map.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn test_missing_core_fields_produce_warnings_and_low_quality() {
        let pipeline = ResumePipeline::new();
        let response = pipeline
            .parse_text("just one line of nothing useful", SourceKind::Text)
            .unwrap();

        assert_eq!(response.parse_quality, ParseQuality::Low);
        assert!(response
            .warnings
            .iter()
            .any(|w| w == "Could not extract email. User clarification needed."));
        assert!(response
            .warnings
            .iter()
            .any(|w| w == "No education entries detected in resume"));
    }

    #[test]
    fn test_education_fallback_without_header() {
        let pipeline = ResumePipeline::new();
        let text = "JANE SMITH\n\
                    jane.smith@example.com\n\
                    \n\
                    Gonzaga University: Bachelor of Science in Communication Studies\n\
                    Spokane, Washington\n\
                    \n\
                    EXPERIENCE\n\
                    Bausch & Lomb, Phoenix Valley, AZ\n\
                    TERRITORY MANAGER 04/2020 - 04/2022";

        let response = pipeline.parse_text(text, SourceKind::Text).unwrap();
        let profile = &response.candidate_profile;

        assert_eq!(profile.education.len(), 1);
        assert_eq!(
            profile.education[0].institution.as_deref(),
            Some("Gonzaga University")
        );
        assert_eq!(profile.experiences.len(), 1);
    }
}
