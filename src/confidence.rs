//! Per-field confidence scoring.
//!
//! Confidence lets downstream consumers decide whether an extracted field
//! is reliable or needs candidate clarification. The scale:
//!
//! - `1.0` exact match (regex, known value)
//! - `0.9` very high (minor normalization needed)
//! - `0.8` high (inferred but validated)
//! - `0.7` medium-high (heuristic with good signals)
//! - `0.6` medium (multiple signals, some uncertainty)
//! - `0.5` low-medium (ambiguous but extractable)
//! - below `0.5`, prompt for clarification

use lazy_static::lazy_static;
use regex::Regex;

use crate::schema::ParseQuality;

lazy_static! {
    static ref STRICT_EMAIL_RE: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
}

fn clamp(confidence: f64) -> f64 {
    confidence.clamp(0.0, 1.0)
}

/// Central place for all extraction confidence logic. Every method returns
/// the score together with the extraction-method label recorded in the
/// response.
pub struct ConfidenceCalculator;

impl ConfidenceCalculator {
    /// Email confidence: exact single regex match is 1.0, multiple
    /// occurrences lower it, a malformed value caps at 0.4.
    pub fn email(email_value: &str, evidence_count: usize) -> (f64, String) {
        if email_value.is_empty() {
            return (0.0, "no_email_found".to_string());
        }

        if !STRICT_EMAIL_RE.is_match(email_value) {
            return (0.4, "invalid_email_format".to_string());
        }

        if evidence_count == 1 {
            (1.0, "regex_exact_single".to_string())
        } else if evidence_count <= 3 {
            (0.85, "regex_exact_multiple_occurrences".to_string())
        } else {
            (0.6, "too_many_email_candidates".to_string())
        }
    }

    /// Phone confidence: at least seven digits required for a real number.
    pub fn phone(phone_value: &str, evidence_count: usize) -> (f64, String) {
        if phone_value.is_empty() {
            return (0.0, "no_phone_found".to_string());
        }

        let digit_count = phone_value.chars().filter(|c| c.is_ascii_digit()).count();
        if digit_count < 7 {
            return (0.3, "too_few_digits".to_string());
        }

        if evidence_count == 1 {
            (1.0, "regex_exact_single".to_string())
        } else if evidence_count <= 2 {
            (0.85, "regex_exact_multiple".to_string())
        } else {
            (0.6, "ambiguous_multiple_phones".to_string())
        }
    }

    /// Name confidence is additive: baseline 0.5, plus proximity to the
    /// email and position at the top of the document, minus a blacklist hit.
    /// Degenerate shapes (too long, digits, single word) short-circuit low.
    pub fn full_name(
        name_value: &str,
        near_email: bool,
        is_top_of_resume: bool,
        passes_blacklist: bool,
        has_middle_initial: bool,
    ) -> (f64, String) {
        if name_value.is_empty() {
            return (0.0, "no_name_found".to_string());
        }

        if name_value.chars().count() > 60 {
            return (0.2, "name_too_long".to_string());
        }
        if name_value.chars().any(|c| c.is_ascii_digit()) {
            return (0.3, "name_contains_digits".to_string());
        }

        let mut confidence = 0.5;
        if !passes_blacklist {
            confidence -= 0.2;
        }
        if near_email {
            confidence += 0.25;
        }
        if is_top_of_resume {
            confidence += 0.25;
        }
        if has_middle_initial {
            confidence += 0.05;
        }

        // A bare single word is never a reliable full name.
        if !name_value.contains(' ') {
            return (0.2, "no_space_in_name".to_string());
        }

        let method = if near_email && is_top_of_resume {
            "heuristic_multivariate"
        } else {
            "heuristic_window"
        };

        (clamp(confidence), method.to_string())
    }

    /// Location confidence keyed on how the value was found. A missing comma
    /// (no state part) costs 0.1.
    pub fn location(
        location_value: &str,
        extraction_method: &str,
        has_comma: bool,
        is_valid_format: bool,
    ) -> (f64, String) {
        if location_value.is_empty() {
            return (0.0, "no_location_found".to_string());
        }

        let mut confidence = match extraction_method {
            "regex_pattern" => {
                if is_valid_format {
                    0.95
                } else {
                    0.7
                }
            }
            "heuristic" => 0.75,
            "after_title" => 0.65,
            _ => 0.6,
        };

        if !has_comma {
            confidence -= 0.1;
        }

        (clamp(confidence), extraction_method.to_string())
    }

    /// URL confidence: known hosts (LinkedIn, GitHub) score highest; generic
    /// URLs need a plausible domain.
    pub fn url(url_value: &str, url_type: &str) -> (f64, String) {
        if url_value.is_empty() {
            return (0.0, "no_url_found".to_string());
        }

        if !url_value.starts_with("http://") && !url_value.starts_with("https://") {
            return (0.3, "missing_protocol".to_string());
        }

        match url_type {
            "linkedin" => {
                if url_value.contains("linkedin.com") {
                    (0.95, "linkedin_exact".to_string())
                } else {
                    (0.5, "linkedin_invalid".to_string())
                }
            }
            "github" => {
                if url_value.contains("github.com") {
                    (0.95, "github_exact".to_string())
                } else {
                    (0.5, "github_invalid".to_string())
                }
            }
            _ => {
                if url_value.matches('.').count() >= 2 {
                    (0.9, "generic_url_valid".to_string())
                } else {
                    (0.6, "generic_url_questionable".to_string())
                }
            }
        }
    }

    /// Skill confidence depends on where it was found: inline lists beat
    /// bullets beat subheadings. Recognized skills get a small boost.
    pub fn skill(skill_value: &str, extraction_source: &str, is_recognized: bool) -> (f64, String) {
        if skill_value.is_empty() {
            return (0.0, "empty_skill".to_string());
        }

        let len = skill_value.chars().count();
        if len < 2 || len > 100 {
            return (0.2, "skill_length_invalid".to_string());
        }

        let mut confidence: f64 = match extraction_source {
            "inline" => 0.95,
            "bullet" => 0.85,
            "section_subheading" => 0.80,
            _ => 0.75,
        };

        if is_recognized {
            confidence = (confidence + 0.02).min(1.0);
        }

        (confidence, format!("{}_extracted", extraction_source))
    }

    /// Per-field experience confidence. Companies extract cleanly, titles
    /// are ambiguous, and dates are only trusted when a pattern matched.
    pub fn experience_field(
        field_name: &str,
        field_value: Option<&str>,
        line_format: Option<&str>,
        matched_pattern: bool,
    ) -> (f64, String) {
        let value = match field_value {
            Some(v) if !v.is_empty() => v,
            _ => return (0.0, format!("no_{}_found", field_name)),
        };

        match field_name {
            "company" => {
                let confidence = if line_format == Some("single_line") {
                    0.9
                } else {
                    0.85
                };
                (confidence, "company_extracted".to_string())
            }
            "job_title" => {
                let confidence = if line_format == Some("single_line") {
                    if matched_pattern {
                        0.9
                    } else {
                        0.7
                    }
                } else if value.chars().count() < 100 {
                    0.85
                } else {
                    0.6
                };
                (confidence, "job_title_extracted".to_string())
            }
            "start_date" | "end_date" => {
                let confidence = if matched_pattern { 0.95 } else { 0.4 };
                (confidence, "date_extracted".to_string())
            }
            "location" => (0.7, "location_experience_field".to_string()),
            _ => (0.6, format!("field_{}_unknown", field_name)),
        }
    }

    /// Overall quality from the mean of the core-field confidences
    /// (name, email, phone): >= 0.85 is high, >= 0.65 is medium.
    pub fn calculate_overall_parse_quality(
        name_confidence: f64,
        email_confidence: f64,
        phone_confidence: f64,
    ) -> ParseQuality {
        let avg_core = (name_confidence + email_confidence + phone_confidence) / 3.0;

        if avg_core >= 0.85 {
            ParseQuality::High
        } else if avg_core >= 0.65 {
            ParseQuality::Medium
        } else {
            ParseQuality::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_confidence() {
        let (conf, method) = ConfidenceCalculator::email("john.doe@example.com", 1);
        assert_eq!(conf, 1.0);
        assert_eq!(method, "regex_exact_single");

        let (conf, method) = ConfidenceCalculator::email("john.doe@example.com", 3);
        assert_eq!(conf, 0.85);
        assert_eq!(method, "regex_exact_multiple_occurrences");

        let (conf, method) = ConfidenceCalculator::email("not-an-email", 1);
        assert_eq!(conf, 0.4);
        assert_eq!(method, "invalid_email_format");
    }

    #[test]
    fn test_phone_confidence() {
        let (conf, _) = ConfidenceCalculator::phone("(555) 123-4567", 1);
        assert_eq!(conf, 1.0);

        let (conf, method) = ConfidenceCalculator::phone("12345", 1);
        assert_eq!(conf, 0.3);
        assert_eq!(method, "too_few_digits");
    }

    #[test]
    fn test_full_name_signals() {
        let (conf, method) = ConfidenceCalculator::full_name("John Doe", true, true, true, false);
        assert_eq!(conf, 1.0);
        assert_eq!(method, "heuristic_multivariate");

        let (conf, method) = ConfidenceCalculator::full_name("John", true, true, true, false);
        assert_eq!(conf, 0.2);
        assert_eq!(method, "no_space_in_name");

        let (conf, _) = ConfidenceCalculator::full_name("John Doe 42", true, true, true, false);
        assert_eq!(conf, 0.3);
    }

    #[test]
    fn test_location_comma_penalty() {
        let (with_comma, _) =
            ConfidenceCalculator::location("Austin, TX", "regex_pattern", true, true);
        let (without_comma, _) =
            ConfidenceCalculator::location("Austin", "regex_pattern", false, true);
        assert_eq!(with_comma, 0.95);
        assert!((with_comma - without_comma - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_skill_sources() {
        let (inline, method) = ConfidenceCalculator::skill("Python", "inline", false);
        assert_eq!(inline, 0.95);
        assert_eq!(method, "inline_extracted");

        let (bullet, _) = ConfidenceCalculator::skill("Python", "bullet", false);
        assert_eq!(bullet, 0.85);

        let (short, method) = ConfidenceCalculator::skill("X", "inline", false);
        assert_eq!(short, 0.2);
        assert_eq!(method, "skill_length_invalid");
    }

    #[test]
    fn test_overall_quality_tiers() {
        assert_eq!(
            ConfidenceCalculator::calculate_overall_parse_quality(1.0, 1.0, 1.0),
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
}
