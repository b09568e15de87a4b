#![allow(dead_code)]
//! End-to-end pipeline tests over whole-resume inputs.

use resume_oxide::pipeline::ResumePipeline;
use resume_oxide::schema::{ParseQuality, SourceKind, EVIDENCE_KEYS};
use resume_oxide::Error;

// ============ Helper Functions for Creating Mock Data ============

fn parse(text: &str) -> resume_oxide::schema::ParseResponse {
    ResumePipeline::new()
        .parse_text(text, SourceKind::Text)
        .unwrap()
}

const FULL_RESUME: &str = "\
JOHN DOE
New York, New York
john.doe@example.com | (555) 123-4567
linkedin.com/in/johndoe

SKILLS
• Salesforce
• Microsoft Office

EXPERIENCE
Bausch & Lomb, Phoenix Valley, AZ
TERRITORY MANAGER 04/2020 - 04/2022
● Grew the territory by 40% in 5 months

EDUCATION
Gonzaga University: Bachelor of Science in Communication Studies
Spokane, Washington";

// ============ Full Parse ============

#[test]
fn test_full_resume_profile_fields() {
    let response = parse(FULL_RESUME);
    let profile = &response.candidate_profile;

    assert_eq!(profile.full_name.as_deref(), Some("John Doe"));
    assert_eq!(profile.email.as_deref(), Some("john.doe@example.com"));
    assert_eq!(profile.phone.as_deref(), Some("(555) 123-4567"));
    assert_eq!(profile.location.as_deref(), Some("New York, New York"));
    assert_eq!(profile.links, vec!["linkedin.com/in/johndoe"]);
    assert_eq!(profile.skills, vec!["Salesforce", "Microsoft Office"]);
}

#[test]
fn test_full_resume_experience_entry() {
    let response = parse(FULL_RESUME);
    let experiences = &response.candidate_profile.experiences;

    assert_eq!(experiences.len(), 1);
    let exp = &experiences[0];
    assert_eq!(exp.company.as_deref(), Some("Bausch & Lomb"));
    assert_eq!(exp.job_title.as_deref(), Some("Territory Manager"));
    assert_eq!(exp.location.as_deref(), Some("Phoenix Valley, AZ"));
    assert_eq!(exp.start_date.as_deref(), Some("04/2020"));
    assert_eq!(exp.end_date.as_deref(), Some("04/2022"));
    assert_eq!(
        exp.achievements,
        vec!["Grew the territory by 40% in 5 months"]
    );
}

#[test]
fn test_full_resume_education_entry() {
    let response = parse(FULL_RESUME);
    let education = &response.candidate_profile.education;

    assert_eq!(education.len(), 1);
    let edu = &education[0];
    assert_eq!(edu.institution.as_deref(), Some("Gonzaga University"));
    assert_eq!(edu.degree.as_deref(), Some("Bachelor of Science"));
    assert_eq!(edu.field_of_study.as_deref(), Some("Communication Studies"));
    assert_eq!(edu.location.as_deref(), Some("Spokane, Washington"));
}

#[test]
fn test_full_resume_quality_and_confidence() {
    let response = parse(FULL_RESUME);

    // name 0.75 (near email, not geometrically top for text input),
    // email 1.0, phone 1.0 -> mean 0.9167
    assert_eq!(response.parse_quality, ParseQuality::High);

    let email = &response.confidence_scores["email"];
    assert_eq!(email.confidence, 1.0);
    assert_eq!(email.extraction_method, "regex_exact_single");
    assert!(email.required);

    let name = &response.confidence_scores["full_name"];
    assert_eq!(name.confidence, 0.75);
    assert_eq!(name.extraction_method, "heuristic_window");

    assert_eq!(response.confidence_scores["links"].confidence, 0.95);
    assert_eq!(response.confidence_scores["skills"].confidence, 0.85);
    assert_eq!(response.confidence_scores["experiences"].confidence, 0.85);
    assert!(!response.confidence_scores.contains_key("education"));
}

#[test]
fn test_full_resume_warnings() {
    let response = parse(FULL_RESUME);

    assert!(response
        .warnings
        .iter()
        .any(|w| w == "Name extraction has low confidence: 0.75"));
    assert!(!response
        .warnings
        .iter()
        .any(|w| w == "No education entries detected in resume"));
}

// ============ Evidence Map ============

#[test]
fn test_evidence_map_contract() {
    let response = parse(FULL_RESUME);

    for key in EVIDENCE_KEYS {
        assert!(response.evidence_map.contains_key(key), "missing {}", key);
    }

    // Evidence lines keep the raw text, not the normalized value.
    let name_ev = &response.evidence_map["full_name"];
    assert_eq!(name_ev.len(), 1);
    assert_eq!(name_ev[0].text, "JOHN DOE");
    assert_eq!(name_ev[0].locator, "text:line:1");
    assert_eq!(name_ev[0].confidence, 1.0);

    assert_eq!(response.evidence_map["experiences"].len(), 3);
    assert_eq!(response.evidence_map["education"].len(), 2);
}

#[test]
fn test_evidence_keys_present_even_when_nothing_found() {
    let response = parse("just one line of nothing useful");

    for key in EVIDENCE_KEYS {
        assert!(response.evidence_map.contains_key(key), "missing {}", key);
        if key != "full_name" {
            assert!(
                response.evidence_map[key].is_empty(),
                "unexpected evidence for {}",
                key
            );
        }
    }
}

// ============ Degraded Inputs ============

#[test]
fn test_empty_input_is_rejected() {
    let pipeline = ResumePipeline::new();
    assert!(matches!(
        pipeline.parse_text("", SourceKind::Text),
        Err(Error::EmptyInput)
    ));
    assert!(matches!(
        pipeline.parse_text("   \n\t\n", SourceKind::Text),
        Err(Error::EmptyInput)
    ));
    assert!(matches!(
        pipeline.parse_lines(&[], SourceKind::Text),
        Err(Error::EmptyInput)
    ));
}

#[test]
fn test_missing_core_fields_never_abort_the_parse() {
    let response = parse("just one line of nothing useful");

    assert!(response.candidate_profile.email.is_none());
    assert!(response.candidate_profile.phone.is_none());
    assert_eq!(response.parse_quality, ParseQuality::Low);

    assert!(response
        .warnings
        .iter()
        .any(|w| w == "Could not extract email. User clarification needed."));
    assert!(response
        .warnings
        .iter()
        .any(|w| w == "No education entries detected in resume"));

    assert_eq!(response.confidence_scores["email"].confidence, 0.0);
    assert_eq!(response.confidence_scores["email"].extraction_method, "not_found");
}

// ============ Education Routing ============

#[test]
fn test_education_fallback_without_section_header() {
    let response = parse(
        "JANE SMITH\n\
         jane.smith@example.com\n\
         \n\
         Gonzaga University: Bachelor of Science in Communication Studies\n\
         Spokane, Washington\n\
         \n\
         EXPERIENCE\n\
         Bausch & Lomb, Phoenix Valley, AZ\n\
         TERRITORY MANAGER 04/2020 - 04/2022",
    );
    let profile = &response.candidate_profile;

    assert_eq!(profile.education.len(), 1);
    assert_eq!(
        profile.education[0].institution.as_deref(),
        Some("Gonzaga University")
    );
    assert_eq!(profile.experiences.len(), 1);
}

#[test]
fn test_education_entry_inside_experience_section_is_reclassified() {
    let response = parse(
        "JOHN DOE\n\
         john.doe@example.com\n\
         EXPERIENCE\n\
         Bausch & Lomb, Phoenix Valley, AZ\n\
         TERRITORY MANAGER 04/2020 - 04/2022\n\
         ● Grew the territory by 40% in 5 months\n\
         ● Won back a key account this year\n\
         Gonzaga University, Spokane, WA\n\
         STUDENT 09/2012 - 05/2016",
    );
    let profile = &response.candidate_profile;

    assert_eq!(profile.experiences.len(), 1);
    assert_eq!(
        profile.experiences[0].company.as_deref(),
        Some("Bausch & Lomb")
    );

    assert_eq!(profile.education.len(), 1);
    let edu = &profile.education[0];
    assert_eq!(edu.institution.as_deref(), Some("Gonzaga University"));
    assert_eq!(edu.location.as_deref(), Some("Spokane, WA"));
    assert_eq!(edu.start_date.as_deref(), Some("09/2012"));
    assert_eq!(edu.end_date.as_deref(), Some("05/2016"));
}

// ============ JSON Output ============

#[test]
fn test_response_serializes_to_json() {
    let response = parse(FULL_RESUME);
    let json = response.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["parse_quality"], "high");
    assert_eq!(value["candidate_profile"]["full_name"], "John Doe");
    assert_eq!(
        value["evidence_map"]["email"][0]["source"],
        "text"
    );
    assert!(value["confidence_scores"]["phone"]["required"]
        .as_bool()
        .unwrap());
}
