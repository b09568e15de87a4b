#![allow(dead_code)]
//! Integration tests for the contact-field extractors: phone, email, name,
//! location, and links.

use resume_oxide::extractors::{
    extract_email, extract_email_flexible, extract_links, extract_location, extract_name,
    extract_phone,
};
use resume_oxide::schema::{SourceKind, SourceLine};
use resume_oxide::vocab::Vocabulary;

// ============ Helper Functions for Creating Mock Data ============

fn lines(texts: &[&str]) -> Vec<SourceLine> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| SourceLine::new(format!("text:line:{}", i + 1), *t))
        .collect()
}

// ============ Email ============

#[test]
fn test_email_on_shared_contact_line() {
    let input = lines(&["JOHN DOE", "john.doe@example.com | (555) 123-4567"]);
    let hit = extract_email(&input, SourceKind::Text);

    assert_eq!(hit.value.as_deref(), Some("john.doe@example.com"));
    assert_eq!(hit.line_index, Some(1));
    assert_eq!(hit.evidence.len(), 1);
    // Evidence keeps the whole original line.
    assert_eq!(hit.evidence[0].text, "john.doe@example.com | (555) 123-4567");
    assert_eq!(hit.evidence[0].locator, "text:line:2");
}

#[test]
fn test_email_recovered_from_spaced_out_characters() {
    let input = lines(&["j o h n . d o e @ e x a m p l e . c o m"]);
    let hit = extract_email(&input, SourceKind::Text);
    assert_eq!(hit.value.as_deref(), Some("john.doe@example.com"));
}

#[test]
fn test_flexible_email_tolerates_stray_spaces() {
    assert_eq!(
        extract_email_flexible("annaford0719 @ gmail . com"),
        Some("annaford0719@gmail.com".to_string())
    );
    assert_eq!(
        extract_email_flexible("anna ford@gm ail.com"),
        Some("annaford@gmail.com".to_string())
    );
}

#[test]
fn test_flexible_email_rejects_phone_concatenation() {
    // A glued "(856)366-5713k.o.harbaugh@gmail.com" must not produce an
    // email whose user portion is the phone number.
    assert_eq!(
        extract_email_flexible("(856)366-5713k.o.harbaugh@gmail.com"),
        None
    );
}

// ============ Phone ============

#[test]
fn test_phone_preserves_original_formatting() {
    let input = lines(&["JOHN DOE", "(555) 123-4567"]);
    let hit = extract_phone(&input, SourceKind::Text);
    assert_eq!(hit.value.as_deref(), Some("(555) 123-4567"));
    assert_eq!(hit.line_index, Some(1));

    let dotted = lines(&["555.123.4567"]);
    assert_eq!(
        extract_phone(&dotted, SourceKind::Text).value.as_deref(),
        Some("555.123.4567")
    );
}

#[test]
fn test_no_contact_in_prose() {
    let input = lines(&["JOHN DOE", "Territory Manager"]);
    assert!(extract_phone(&input, SourceKind::Text).value.is_none());
    assert!(extract_email(&input, SourceKind::Text).value.is_none());
    assert!(extract_email(&input, SourceKind::Text).line_index.is_none());
}

// ============ Name ============

#[test]
fn test_name_window_above_email() {
    let vocab = Vocabulary::default();
    let input = lines(&["JOHN DOE", "john.doe@example.com"]);
    let hit = extract_name(
        &input,
        Some(1),
        Some("john.doe@example.com"),
        SourceKind::Text,
        &vocab,
    );

    assert_eq!(hit.full_name.as_deref(), Some("John Doe"));
    // Display form is title-cased; evidence keeps the raw ALL-CAPS line.
    assert_eq!(hit.evidence[0].text, "JOHN DOE");
}

#[test]
fn test_name_top_lines_fallback_without_email() {
    let vocab = Vocabulary::default();
    let input = lines(&["", "Jane Smith", "Territory Manager 04/2020 - 04/2022"]);
    let hit = extract_name(&input, None, None, SourceKind::Text, &vocab);
    assert_eq!(hit.full_name.as_deref(), Some("Jane Smith"));
}

#[test]
fn test_name_from_glued_header_line() {
    let vocab = Vocabulary::default();
    let input = lines(&["JOHN DOE New York, New York john.doe@example.com 555.123.4567"]);
    let hit = extract_name(
        &input,
        Some(0),
        Some("john.doe@example.com"),
        SourceKind::Text,
        &vocab,
    );
    assert_eq!(hit.full_name.as_deref(), Some("John Doe"));
}

#[test]
fn test_section_headers_are_not_names() {
    let vocab = Vocabulary::default();
    let input = lines(&["EXPERIENCE", "Work Experience", "john.doe@example.com"]);
    let hit = extract_name(
        &input,
        Some(2),
        Some("john.doe@example.com"),
        SourceKind::Text,
        &vocab,
    );
    assert!(hit.full_name.is_none());
}

// ============ Location ============

#[test]
fn test_location_city_state_line() {
    let vocab = Vocabulary::default();
    let input = lines(&["JOHN DOE", "New York, New York"]);
    let hit = extract_location(&input, SourceKind::Text, &vocab);
    assert_eq!(hit.location.as_deref(), Some("New York, New York"));
}

#[test]
fn test_location_glued_commas_normalized() {
    let vocab = Vocabulary::default();
    let input = lines(&["NewYork,NewYork"]);
    let hit = extract_location(&input, SourceKind::Text, &vocab);
    assert_eq!(hit.location.as_deref(), Some("New York, New York"));
}

#[test]
fn test_location_inside_glued_header_line() {
    let vocab = Vocabulary::default();
    let input = lines(&["JOHN DOE New York, New York john.doe@example.com"]);
    let hit = extract_location(&input, SourceKind::Text, &vocab);
    assert_eq!(hit.location.as_deref(), Some("New York, New York"));
}

// ============ Links ============

#[test]
fn test_links_without_protocol_and_dedup() {
    let input = lines(&[
        "linkedin.com/in/johndoe",
        "Portfolio: https://johndoe.dev",
        "See https://johndoe.dev for samples",
    ]);
    let hit = extract_links(&input, SourceKind::Text);

    assert_eq!(
        hit.links,
        vec!["linkedin.com/in/johndoe", "https://johndoe.dev"]
    );
    // One evidence line per distinct link.
    assert_eq!(hit.evidence.len(), 2);
}

#[test]
fn test_known_hosts_listed_before_generic_urls() {
    let input = lines(&["https://example.com and linkedin.com/in/johndoe"]);
    let hit = extract_links(&input, SourceKind::Text);
    assert_eq!(
        hit.links,
        vec!["linkedin.com/in/johndoe", "https://example.com"]
    );
}
