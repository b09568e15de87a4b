//! Education entry parsing.
//!
//! Handles the "Institution: Degree" colon format, study-abroad programs
//! with abbreviation expansion, location/date lines (including the
//! "City, Country, Term – Year" study-abroad shape), trimester dates, and
//! detail bullets. Junk details such as "References available upon request"
//! are filtered out with a warning.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::normalize_pdf_wordbreaks;
use crate::schema::{EducationEntry, SourceLine};
use crate::segmenter::{extract_location_from_line, SectionType, DATE_RANGE_RE};
use crate::vocab::Vocabulary;

lazy_static! {
    /// Education bullets also cover the arrow marker seen in some exports.
    static ref EDU_BULLET_RE: Regex = Regex::new(r"^[\s•●\-*→>]+").unwrap();

    /// "Copenhagen, Denmark, Spring Trimester – 2015"
    static ref STUDY_ABROAD_LOC_LINE: Regex = Regex::new(
        r"(?i)^(?P<city>[^,]+),\s*(?P<country>[^,]+),\s*(?P<term>.+?)\s*[–-]\s*(?P<year>(?:19|20)\d{2})\s*$"
    ).unwrap();

    static ref TRIMESTER_RE: Regex =
        Regex::new(r"(?i)(Spring|Fall|Winter|Summer)\s+(Trimester|Semester|Term)\s+(\d{4})").unwrap();

    static ref DATE_SPLIT_RE: Regex = Regex::new(r"(?i)\s*(?:-|–|to)\s*").unwrap();

    /// "in <field>", stopping at a comma or end of line.
    static ref FIELD_IN_RE: Regex =
        Regex::new(r"(?i)\bin\s+([A-Za-z\s&/\-]+?)(?:\s*(?:,|$|[\n\r]))").unwrap();

    /// Same, but a bullet marker also terminates the field.
    static ref FIELD_IN_DELIM_RE: Regex =
        Regex::new(r"(?i)\bin\s+([A-Za-z\s&/\-]+?)(?:\s*(?:,|$|[\n\r●•\-*]))").unwrap();

    static ref FIELD_FALLBACK_RE: Regex = Regex::new(
        r"(?i)(?:bachelor|master|associate|phd|doctorate)\s+(?:of\s+)?[a-z]+\s+([A-Za-z\s&/\-]+?)(?:,|$)"
    ).unwrap();

    /// Longer degree names tried first so the longest match wins.
    static ref DEGREE_FULL_RE: Regex = Regex::new(
        r"(?i)(bachelor of science|bachelor's degree|master of science|master's degree|associate of|bachelor of arts|master of arts|doctor of philosophy)"
    ).unwrap();
    static ref DEGREE_ABBREV_RE: Regex = Regex::new(
        r"(?i)(b\.s\.(?:\s+in)?|b\.a\.(?:\s+in)?|m\.s\.(?:\s+in)?|m\.a\.(?:\s+in)?|m\.b\.a\.(?:\s+in)?|ph\.d\.(?:\s+in)?)"
    ).unwrap();
    static ref DEGREE_BARE_RE: Regex = Regex::new(
        r"(?i)(bachelor|master|associate|doctorate|doctoral|phd|graduate degree|postgraduate degree)"
    ).unwrap();

    /// "DIS Study Abroad, Copenhagen" -> city after the last comma.
    static ref STUDY_ABROAD_CITY_RE: Regex =
        Regex::new(r",\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)$").unwrap();

    static ref YEAR_ONLY_RE: Regex = Regex::new(r"^\d{4}$").unwrap();
}

/// Details matching these are contact noise, not education content.
const JUNK_DETAIL_TERMS: &[&str] = &[
    "references available upon request",
    "available upon request",
    "contact",
    "phone",
    "email",
];

/// Extract a degree name from text, preserving the original casing.
///
/// # Examples
///
/// ```
/// use resume_oxide::parsers::extract_degree_from_text;
/// assert_eq!(
///     extract_degree_from_text("Bachelor of Science in Computer Science").as_deref(),
///     Some("Bachelor of Science")
/// );
/// assert_eq!(extract_degree_from_text("Territory Manager"), None);
/// ```
pub fn extract_degree_from_text(text: &str) -> Option<String> {
    for rx in [&*DEGREE_FULL_RE, &*DEGREE_ABBREV_RE, &*DEGREE_BARE_RE] {
        if let Some(m) = rx.find(text) {
            return Some(m.as_str().trim().to_string());
        }
    }

    None
}

/// Extract the field of study from a degree line: the "in <field>" pattern
/// first, then title-cased words after a degree keyword.
pub fn extract_field_of_study_from_degree_line(text: &str) -> Option<String> {
    if let Some(caps) = FIELD_IN_RE.captures(text) {
        let field = caps[1].trim().to_string();
        let lower = field.to_lowercase();
        if field.chars().count() > 2 && lower != "states" && lower != "united states" {
            // A trailing comma segment is location, not field.
            let field = match field.split_once(',') {
                Some((head, _)) => head.trim().to_string(),
                None => field,
            };
            return Some(field);
        }
    }

    if let Some(caps) = FIELD_FALLBACK_RE.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    None
}

/// Classify a grouped entry as education or experience.
///
/// Degree keywords, high school, and study abroad always win; otherwise an
/// education section context decides.
pub fn classify_entry_as_education(
    entry_lines: &[SourceLine],
    current_section: Option<SectionType>,
    vocab: &Vocabulary,
) -> bool {
    let combined: Vec<&str> = entry_lines.iter().map(|l| l.text.as_str()).collect();
    let combined_text = combined.join(" ").to_lowercase();

    if vocab.has_degree_keyword(&combined_text) {
        return true;
    }
    if vocab.is_high_school(&combined_text) {
        return true;
    }
    if vocab.is_study_abroad(&combined_text) {
        return true;
    }

    if current_section == Some(SectionType::Education) {
        // Inside an education section, institution keywords or just the
        // section context are enough.
        return true;
    }

    false
}

/// Does this line carry a strong, unambiguous education signal? Used by the
/// whole-document fallback scan when no education section header exists.
pub fn looks_like_education_line(line: &str) -> bool {
    let lower = line.to_lowercase();

    const DEGREE_TERMS: &[&str] = &[
        "bachelor of", "bachelor's", "master of", "master's", "associate of",
        "associate's", "doctorate", "doctoral", "phd", "ph.d.", "b.s.", "b.a.",
        "m.s.", "m.a.", "m.b.a.", "graduate degree", "postgraduate",
    ];
    const INSTITUTION_TERMS: &[&str] = &[
        "university", "college", "institute", "academy", "high school",
        "secondary school", "prep school", "polytechnic", "school",
    ];
    const STUDY_ABROAD_TERMS: &[&str] =
        &["study abroad", "dis study", "isa study", "semester abroad", "year abroad"];

    DEGREE_TERMS.iter().any(|t| lower.contains(t))
        || INSTITUTION_TERMS.iter().any(|t| lower.contains(t))
        || STUDY_ABROAD_TERMS.iter().any(|t| lower.contains(t))
}

/// Extract a single city name after the comma in a study-abroad line, even
/// without a state ("DIS Study Abroad, Copenhagen" -> "Copenhagen").
fn extract_location_from_study_abroad(text: &str) -> Option<String> {
    let caps = STUDY_ABROAD_CITY_RE.captures(text)?;
    let location = caps[1].trim().to_string();
    if location.chars().count() >= 3 && !location.chars().any(|c| c.is_ascii_digit()) {
        Some(location)
    } else {
        None
    }
}

/// Parse one grouped education block into a structured entry plus warnings
/// for any details that were dropped.
pub fn parse_education_entry(
    entry_lines: &[SourceLine],
    vocab: &Vocabulary,
) -> (EducationEntry, Vec<String>) {
    let mut education = EducationEntry::default();
    let mut warnings: Vec<String> = Vec::new();

    if entry_lines.is_empty() {
        return (education, warnings);
    }

    // PDF word-break artifacts are repaired before any structure parsing.
    let lines_text: Vec<String> = entry_lines
        .iter()
        .map(|l| normalize_pdf_wordbreaks(l.text.trim(), vocab))
        .collect();
    let first_text = lines_text[0].clone();
    let remaining_lines = &lines_text[1..];
    let combined_text = lines_text.join(" ");

    // A bullet first line is a detail, never an "Institution: Degree" header.
    let is_first_line_bullet = EDU_BULLET_RE.is_match(&first_text);

    let mut institution_part: Option<String> = Some(first_text.clone());
    let mut degree_part: Option<String> = None;

    if is_first_line_bullet {
        institution_part = None;
    } else if let Some((inst, deg)) = first_text.split_once(':') {
        institution_part = Some(inst.trim().to_string());
        degree_part = Some(deg.trim().to_string());
    }

    // Degree from the text after the colon, if any.
    if let Some(dp) = degree_part.as_deref().filter(|s| !s.is_empty()) {
        if let Some(degree) = extract_degree_from_text(dp) {
            education.degree = Some(degree);
            if let Some(caps) = FIELD_IN_RE.captures(dp) {
                let field = caps[1].trim().to_string();
                if field.chars().count() > 2 {
                    education.field_of_study = Some(field);
                }
            } else if let Some(field) = extract_field_of_study_from_degree_line(dp) {
                education.field_of_study = Some(field);
            }
        } else {
            // No standard degree but there is text after the colon; keep it
            // as-is ("DANISH INSTITUTE OF STUDY ABROAD: STUDENT").
            education.degree = Some(dp.to_string());
        }
    }

    if education.degree.is_none() {
        if let Some(degree) = extract_degree_from_text(&combined_text) {
            education.degree = Some(degree);
            if let Some(caps) = FIELD_IN_DELIM_RE.captures(&combined_text) {
                let field = caps[1].trim().to_string();
                if field.chars().count() > 2 {
                    education.field_of_study = Some(field);
                }
            }
        }

        if education.field_of_study.is_none() {
            let degree_line = degree_part.as_deref().unwrap_or(&first_text);
            if let Some(field) = extract_field_of_study_from_degree_line(degree_line) {
                education.field_of_study = Some(field);
            }
        }
    }

    // Last resort: scan every line for "<degree> in <field>".
    if education.field_of_study.is_none() {
        if let Some(degree) = education.degree.clone() {
            let degree_lower = degree.to_lowercase();
            let pattern = format!(
                r"(?i){}\s+in\s+([A-Za-z\s&/\-]+?)(?:\s*(?:,|$|[\n\r●•\-*]))",
                regex::escape(&degree)
            );
            if let Ok(rx) = Regex::new(&pattern) {
                for line in &lines_text {
                    if line.contains(" in ") && line.to_lowercase().contains(&degree_lower) {
                        if let Some(caps) = rx.captures(line) {
                            let field = caps[1].trim().to_string();
                            if field.chars().count() > 2 {
                                education.field_of_study = Some(field);
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    // Institution name, with study-abroad expansion and location split.
    if let Some(inst_part) = institution_part.as_deref().filter(|s| !s.is_empty()) {
        if vocab.is_study_abroad(inst_part) {
            if let Some(loc) = extract_location_from_study_abroad(inst_part) {
                let inst_name = match inst_part.find(&loc) {
                    Some(i) => inst_part[..i].trim().trim_end_matches(',').trim().to_string(),
                    None => inst_part.to_string(),
                };
                education.institution = Some(vocab.expand_study_abroad_abbreviation(&inst_name));
                education.location = Some(loc);
            } else {
                education.institution = Some(vocab.expand_study_abroad_abbreviation(inst_part));
            }
        } else if let Some(loc) = extract_location_from_line(inst_part, vocab) {
            let inst_name = match inst_part.find(&loc) {
                Some(i) => inst_part[..i].trim().trim_end_matches(',').to_string(),
                None => inst_part.to_string(),
            };
            education.institution = Some(inst_name);
            education.location = Some(loc);
        } else {
            education.institution = Some(inst_part.to_string());
        }
    }

    // Remaining lines carry location, dates, and details. A bullet first
    // line joins them as a detail.
    let mut lines_to_process: Vec<&str> = Vec::new();
    if is_first_line_bullet {
        lines_to_process.push(&first_text);
    }
    lines_to_process.extend(remaining_lines.iter().map(|s| s.as_str()));

    for text in lines_to_process {
        let t = text.trim();
        if t.is_empty() {
            continue;
        }

        // Bullets are always details, never structure.
        if EDU_BULLET_RE.is_match(t) {
            let detail_text = EDU_BULLET_RE.replace(t, "").trim().to_string();
            let n = detail_text.chars().count();
            if n > 5 && n < 500 {
                education.details.push(detail_text);
            }
            continue;
        }

        // "City, Country, Term – Year" must be checked before plain location
        // extraction, which would otherwise match "Denmark, Spring".
        if education.location.is_none() {
            if let Some(caps) = STUDY_ABROAD_LOC_LINE.captures(t) {
                let city = caps.name("city").map_or("", |m| m.as_str()).trim();
                let country = caps.name("country").map_or("", |m| m.as_str()).trim();
                let term = caps.name("term").map_or("", |m| m.as_str()).trim();
                let year = caps.name("year").map_or("", |m| m.as_str()).trim();

                education.location = Some(format!("{}, {}", city, country));
                education.start_date = Some(year.to_string());
                education.end_date = Some(year.to_string());
                education.details.push(term.to_string());
                continue;
            }
        }

        let mut has_location = false;
        let mut has_dates = false;

        if education.location.is_none() {
            if let Some(loc) = extract_location_from_line(t, vocab) {
                education.location = Some(loc);
                has_location = true;
            }
        }

        if let Some(m) = DATE_RANGE_RE.find(t) {
            let parts: Vec<&str> = DATE_SPLIT_RE.split(m.as_str().trim()).collect();
            if parts.len() >= 2 {
                if education.start_date.is_none() {
                    education.start_date = Some(parts[0].trim().to_string());
                }
                // The latest range on the entry wins the end date.
                education.end_date = Some(parts[1].trim().to_string());
            }
            has_dates = true;
        }

        // "Spring Trimester 2015" style single-term dates.
        if !has_dates && education.end_date.is_none() {
            if let Some(caps) = TRIMESTER_RE.captures(t) {
                let year = caps[3].to_string();
                education.end_date = Some(year.clone());
                education
                    .details
                    .push(format!("{} {} {}", &caps[1], &caps[2], year));
                has_dates = true;
            }
        }

        if has_location || has_dates {
            // Whatever is left after removing the location and dates is a
            // detail in its own right.
            let mut remaining_text = t.to_string();
            if has_location {
                if let Some(loc) = education.location.as_deref() {
                    if let Some(i) = remaining_text.find(loc) {
                        let after = i + loc.len();
                        remaining_text =
                            format!("{}{}", &remaining_text[..i], &remaining_text[after..]);
                    }
                }
            }
            if has_dates {
                remaining_text = DATE_RANGE_RE.replace_all(&remaining_text, "").to_string();
            }
            let remaining_text = remaining_text.trim();
            let n = remaining_text.chars().count();
            if n > 5 && n < 500 {
                education.details.push(remaining_text.to_string());
            }
            continue;
        }

        let n = t.chars().count();
        if n > 5 && n < 500 {
            education.details.push(t.to_string());
        }
    }

    // Drop contact noise and orphaned year-only details.
    let details = std::mem::take(&mut education.details);
    let mut cleaned: Vec<String> = Vec::new();
    for detail in details {
        let lower = detail.to_lowercase();
        if JUNK_DETAIL_TERMS.iter().any(|p| lower.contains(p)) {
            warnings.push(format!("Removed junk detail from education entry: {}", detail));
            continue;
        }
        let trimmed = detail.trim();
        if YEAR_ONLY_RE.is_match(trimmed) {
            warnings.push(format!(
                "Removed orphaned year from education details: {}",
                detail
            ));
        } else if !trimmed.is_empty() {
            cleaned.push(detail);
        }
    }
    education.details = cleaned;

    (education, warnings)
}
