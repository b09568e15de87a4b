#![allow(dead_code)]
//! Integration tests for the confidence calculator, including bounds
//! properties over arbitrary inputs.

use proptest::prelude::*;

use resume_oxide::confidence::ConfidenceCalculator;
use resume_oxide::schema::ParseQuality;

// ============ Email and Phone ============

#[test]
fn test_email_tiers() {
    let (conf, method) = ConfidenceCalculator::email("john.doe@example.com", 1);
    assert_eq!(conf, 1.0);
    assert_eq!(method, "regex_exact_single");

    let (conf, _) = ConfidenceCalculator::email("john.doe@example.com", 2);
    assert_eq!(conf, 0.85);

    let (conf, method) = ConfidenceCalculator::email("john.doe@example.com", 5);
    assert_eq!(conf, 0.6);
    assert_eq!(method, "too_many_email_candidates");

    let (conf, method) = ConfidenceCalculator::email("not-an-email", 1);
    assert_eq!(conf, 0.4);
    assert_eq!(method, "invalid_email_format");

    assert_eq!(ConfidenceCalculator::email("", 0).0, 0.0);
}

#[test]
fn test_phone_requires_seven_digits() {
    let (conf, _) = ConfidenceCalculator::phone("(555) 123-4567", 1);
    assert_eq!(conf, 1.0);

    let (conf, method) = ConfidenceCalculator::phone("12345", 1);
    assert_eq!(conf, 0.3);
    assert_eq!(method, "too_few_digits");
}

// ============ Name ============

#[test]
fn test_name_signal_stacking() {
    // baseline 0.5 + near email 0.25 + top of resume 0.25
    let (conf, method) = ConfidenceCalculator::full_name("John Doe", true, true, true, false);
    assert_eq!(conf, 1.0);
    assert_eq!(method, "heuristic_multivariate");

    let (conf, method) = ConfidenceCalculator::full_name("John Doe", true, false, true, false);
    assert_eq!(conf, 0.75);
    assert_eq!(method, "heuristic_window");
}

#[test]
fn test_degenerate_names_short_circuit() {
    let (conf, method) = ConfidenceCalculator::full_name("John", true, true, true, false);
    assert_eq!(conf, 0.2);
    assert_eq!(method, "no_space_in_name");

    let (conf, method) = ConfidenceCalculator::full_name("John Doe 42", true, true, true, false);
    assert_eq!(conf, 0.3);
    assert_eq!(method, "name_contains_digits");
}

// ============ Location, URLs, Skills ============

#[test]
fn test_location_missing_comma_penalty() {
    let (with_comma, _) = ConfidenceCalculator::location("Austin, TX", "regex_pattern", true, true);
    let (without_comma, _) = ConfidenceCalculator::location("Austin", "regex_pattern", false, true);
    assert_eq!(with_comma, 0.95);
    assert!((with_comma - without_comma - 0.1).abs() < 1e-9);
}

#[test]
fn test_url_type_scoring() {
    let (conf, method) = ConfidenceCalculator::url("https://linkedin.com/in/x", "linkedin");
    assert_eq!(conf, 0.95);
    assert_eq!(method, "linkedin_exact");

    let (conf, method) = ConfidenceCalculator::url("linkedin.com/in/x", "linkedin");
    assert_eq!(conf, 0.3);
    assert_eq!(method, "missing_protocol");

    let (conf, method) = ConfidenceCalculator::url("https://www.example.com", "generic");
    assert_eq!(conf, 0.9);
    assert_eq!(method, "generic_url_valid");
}

#[test]
fn test_skill_source_ranking() {
    let (inline, _) = ConfidenceCalculator::skill("Python", "inline", false);
    let (bullet, _) = ConfidenceCalculator::skill("Python", "bullet", false);
    let (subheading, _) = ConfidenceCalculator::skill("Python", "section_subheading", false);
    assert!(inline > bullet);
    assert!(bullet > subheading);

    let (recognized, _) = ConfidenceCalculator::skill("Python", "bullet", true);
    assert!((recognized - bullet - 0.02).abs() < 1e-9);
}

// ============ Experience Fields ============

#[test]
fn test_experience_field_scoring() {
    let (conf, _) =
        ConfidenceCalculator::experience_field("company", Some("Acme"), Some("single_line"), false);
    assert_eq!(conf, 0.9);

    let (conf, _) = ConfidenceCalculator::experience_field("start_date", Some("04/2020"), None, true);
    assert_eq!(conf, 0.95);

    let (conf, _) = ConfidenceCalculator::experience_field("start_date", Some("soon"), None, false);
    assert_eq!(conf, 0.4);

    let (conf, method) = ConfidenceCalculator::experience_field("company", None, None, false);
    assert_eq!(conf, 0.0);
    assert_eq!(method, "no_company_found");
}

// ============ Overall Quality ============

#[test]
fn test_quality_tiers() {
    assert_eq!(
        ConfidenceCalculator::calculate_overall_parse_quality(1.0, 1.0, 1.0),
        ParseQuality::High
    );
    assert_eq!(
        ConfidenceCalculator::calculate_overall_parse_quality(0.75, 1.0, 1.0),
        ParseQuality::High
    );
    assert_eq!(
        ConfidenceCalculator::calculate_overall_parse_quality(0.7, 0.7, 0.7),
        ParseQuality::Medium
    );
    assert_eq!(
        ConfidenceCalculator::calculate_overall_parse_quality(0.0, 0.5, 0.5),
        ParseQuality::Low
    );
}

// ============ Properties ============

proptest! {
    #[test]
    fn prop_email_confidence_bounded(value in ".*", count in 0usize..20) {
        let (conf, _) = ConfidenceCalculator::email(&value, count);
        prop_assert!((0.0..=1.0).contains(&conf));
    }

    #[test]
    fn prop_phone_confidence_bounded(value in ".*", count in 0usize..20) {
        let (conf, _) = ConfidenceCalculator::phone(&value, count);
        prop_assert!((0.0..=1.0).contains(&conf));
    }

    #[test]
    fn prop_name_confidence_bounded(
        value in ".*",
        near_email in any::<bool>(),
        is_top in any::<bool>(),
        passes_blacklist in any::<bool>(),
        middle in any::<bool>(),
    ) {
        let (conf, _) =
            ConfidenceCalculator::full_name(&value, near_email, is_top, passes_blacklist, middle);
        prop_assert!((0.0..=1.0).contains(&conf));
    }

    #[test]
    fn prop_location_confidence_bounded(
        value in ".*",
        method_idx in 0usize..4,
        has_comma in any::<bool>(),
        valid in any::<bool>(),
    ) {
        let methods = ["regex_pattern", "heuristic", "after_title", "unknown"];
        let (conf, _) =
            ConfidenceCalculator::location(&value, methods[method_idx], has_comma, valid);
        prop_assert!((0.0..=1.0).contains(&conf));
    }

    #[test]
    fn prop_skill_confidence_bounded(
        value in ".*",
        source_idx in 0usize..4,
        recognized in any::<bool>(),
    ) {
        let sources = ["inline", "bullet", "section_subheading", "prose"];
        let (conf, _) = ConfidenceCalculator::skill(&value, sources[source_idx], recognized);
        prop_assert!((0.0..=1.0).contains(&conf));
    }

    #[test]
    fn prop_quality_matches_core_mean(
        name in 0.0f64..=1.0,
        email in 0.0f64..=1.0,
        phone in 0.0f64..=1.0,
    ) {
        let quality = ConfidenceCalculator::calculate_overall_parse_quality(name, email, phone);
        let mean = (name + email + phone) / 3.0;
        match quality {
            ParseQuality::High => prop_assert!(mean >= 0.85),
            ParseQuality::Medium => prop_assert!((0.65..0.85).contains(&mean)),
            ParseQuality::Low => prop_assert!(mean < 0.65),
        }
    }
}
