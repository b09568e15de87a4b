//! Experience entry parsing.
//!
//! Takes a grouped block of lines and fills an [`ExperienceEntry`]:
//! company, title, location, dates, descriptions, and bullet achievements.
//! Achievements run through the full repair pipeline (word-break fixes,
//! token normalization, and the fragmentation repairer when a bullet still
//! shows single-letter runs).

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::{
    fix_word_breaks_aggressive, format_location, is_all_caps, normalize_bullet_text,
    normalize_field_text, normalize_for_search, repair_achievement, title_case_words,
};
use crate::schema::{ExperienceEntry, SourceLine};
use crate::segmenter::{
    extract_date_range, extract_location_from_line, is_company_with_location_header,
    is_header_line, is_job_title_header, BULLET_RE, DATE_RANGE_RE, SINGLE_LINE_EXPERIENCE_RE,
    TWO_PART_EXPERIENCE_RE,
};
use crate::vocab::Vocabulary;

lazy_static! {
    static ref NUMERIC_DATE_RE: Regex = Regex::new(r"\d{1,2}[-/]\d{1,4}").unwrap();
    static ref TITLE_DATE_TAIL_RE: Regex = Regex::new(
        r"(?i)\s+\d{1,2}[-/]\d{1,4}\s*(?:-|–|to)\s*(?:Present|Current|\d{1,2}[-/]\d{1,4})?"
    ).unwrap();
    /// Three single lowercase letters in a row: character fragmentation.
    static ref FRAGMENT_RUN_RE: Regex = Regex::new(r"\b[a-z]\s+[a-z]\s+[a-z]\b").unwrap();
    /// A bullet that reads like a sentence rather than flowing prose.
    static ref SENTENCE_BULLET_RE: Regex = Regex::new(r"^[•\-*].*[.:;!?]$").unwrap();
}

/// Fields recovered from a colon-delimited entry line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleLineParts {
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
}

fn maybe_title_case(text: &str) -> String {
    if is_all_caps(text) {
        title_case_words(text)
    } else {
        text.to_string()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Parse a single-line entry: "Company: Title: Location" or "Company: Title".
///
/// ALL-CAPS input is title-cased word by word, and each field gets the
/// whitelist-only field normalization.
///
/// # Examples
///
/// ```
/// use resume_oxide::parsers::parse_single_line_experience;
/// let parts = parse_single_line_experience("NEODENT: TERRITORYMANAGEROREGON:");
/// assert_eq!(parts.company.as_deref(), Some("Neodent"));
/// assert_eq!(parts.job_title.as_deref(), Some("Territory Manager Oregon"));
/// ```
pub fn parse_single_line_experience(text: &str) -> SingleLineParts {
    let text_clean = BULLET_RE.replace(text, "").trim().to_string();
    let was_all_caps = text_clean.chars().any(|c| c.is_ascii_uppercase())
        && !text_clean.chars().any(|c| c.is_ascii_lowercase());

    let t = normalize_for_search(&text_clean);

    let finish = |field: &str| -> String {
        let mut v = field.trim().to_string();
        if was_all_caps && !v.is_empty() {
            v = title_case_words(&v);
        }
        if !v.is_empty() {
            v = normalize_field_text(&v);
        }
        v
    };

    if let Some(caps) = SINGLE_LINE_EXPERIENCE_RE.captures(&t) {
        return SingleLineParts {
            company: non_empty(finish(&caps[1])),
            job_title: non_empty(finish(&caps[2])),
            location: non_empty(finish(&caps[3])),
        };
    }

    if let Some(caps) = TWO_PART_EXPERIENCE_RE.captures(&t) {
        return SingleLineParts {
            company: non_empty(finish(&caps[1])),
            job_title: non_empty(finish(&caps[2])),
            location: None,
        };
    }

    SingleLineParts::default()
}

/// Split "Company, City, ST" into (company, formatted location).
fn split_company_and_location(t: &str, vocab: &Vocabulary) -> (Option<String>, Option<String>) {
    let location_text = match extract_location_from_line(t, vocab) {
        Some(l) => l,
        None => return (None, None),
    };

    let location = Some(format_location(&location_text));
    let company = t
        .find(&location_text)
        .map(|loc_start| t[..loc_start].trim().trim_end_matches(',').to_string())
        .filter(|c| !c.is_empty())
        .map(|c| maybe_title_case(&c));

    (company, location)
}

/// Full bullet repair: word breaks, token normalization, and the
/// fragmentation repairer when single-letter runs remain.
fn finalize_achievement(text: &str, vocab: &Vocabulary) -> String {
    let mut a = fix_word_breaks_aggressive(text);
    a = normalize_bullet_text(&a);
    if FRAGMENT_RUN_RE.is_match(&a) {
        a = repair_achievement(&a, vocab);
        a = normalize_bullet_text(&a);
    }
    a
}

fn push_if_valid(achievements: &mut Vec<String>, current: Option<String>, vocab: &Vocabulary) {
    if let Some(cur) = current {
        let len = cur.chars().count();
        if len > 10 && len < 500 {
            achievements.push(finalize_achievement(&cur, vocab));
        }
    }
}

/// Parse one grouped experience block into a structured entry.
///
/// Layout handling, in order: a colon-delimited first line, an H2
/// "Company, Location" header, or a bare company line. Description lines
/// collect until the job-title header; dates come from the title line or
/// the line after it; everything past the job description is treated as
/// wrapped bullet achievements.
pub fn parse_experience_entry(entry_lines: &[SourceLine], vocab: &Vocabulary) -> ExperienceEntry {
    let mut exp = ExperienceEntry::default();
    if entry_lines.is_empty() {
        return exp;
    }

    let mut idx = 0usize;

    // Line 1: company/location or single-line format.
    {
        let t = entry_lines[0].text.trim();
        let parsed = parse_single_line_experience(t);
        if parsed.company.is_some() || parsed.job_title.is_some() {
            exp.company = parsed.company;
            exp.job_title = parsed.job_title;
            exp.location = parsed.location;
            idx += 1;
        } else if is_company_with_location_header(t, vocab) {
            let (company, location) = split_company_and_location(t, vocab);
            exp.company = company;
            exp.location = location;
            idx += 1;
        } else {
            let (company, location) = split_company_and_location(t, vocab);
            if location.is_some() {
                exp.company = company;
                exp.location = location;
            } else {
                exp.company = Some(maybe_title_case(t));
            }
            idx += 1;
        }
    }

    // Company description lines run from here to the job-title header.
    let mut company_desc_lines: Vec<String> = Vec::new();
    while idx < entry_lines.len() {
        let text = &entry_lines[idx].text;
        let t = text.trim();

        if t.is_empty() {
            idx += 1;
            continue;
        }

        // Bullets are achievements, never descriptions.
        if BULLET_RE.is_match(text) {
            break;
        }

        if is_job_title_header(t, vocab) {
            if !company_desc_lines.is_empty() {
                let raw = company_desc_lines.join(" ");
                exp.company_description =
                    Some(normalize_bullet_text(&fix_word_breaks_aggressive(&raw)));
            }

            let (start, end) = extract_date_range(t);
            let found_dates = start.is_some();
            if found_dates {
                exp.start_date = start;
                exp.end_date = end;
            }

            let title_part = if NUMERIC_DATE_RE.is_match(t) {
                TITLE_DATE_TAIL_RE.replace_all(t, "").trim().to_string()
            } else {
                t.to_string()
            };
            if !title_part.is_empty() {
                exp.job_title = Some(maybe_title_case(&title_part));
            }

            idx += 1;

            // Dates or location may sit on their own line right after the title.
            if idx < entry_lines.len() && !found_dates {
                let t_next = entry_lines[idx].text.trim();
                let (start_next, end_next) = extract_date_range(t_next);
                let has_dates = start_next.is_some();
                let has_location = extract_location_from_line(t_next, vocab).is_some();
                let is_just_dates = (has_dates || has_location)
                    && !is_job_title_header(t_next, vocab)
                    && !is_company_with_location_header(t_next, vocab);

                if is_just_dates {
                    if has_dates {
                        exp.start_date = start_next;
                        exp.end_date = end_next;
                    }
                    if let Some(loc) = extract_location_from_line(t_next, vocab) {
                        exp.location = Some(format_location(&loc));
                    }
                    idx += 1;
                }
            }
            break;
        } else if t.chars().any(|c| c.is_uppercase()) || t.chars().any(|c| c.is_ascii_digit()) {
            company_desc_lines.push(t.to_string());
            idx += 1;
        } else {
            idx += 1;
        }
    }

    // Job description: non-bullet, non-header lines before the first bullet.
    let mut job_desc_lines: Vec<String> = Vec::new();
    let mut temp_idx = idx;
    while temp_idx < entry_lines.len() {
        let check_text = &entry_lines[temp_idx].text;
        let check_t = check_text.trim();

        if check_t.is_empty() {
            temp_idx += 1;
            continue;
        }
        if BULLET_RE.is_match(check_text) {
            break;
        }
        if is_header_line(check_text, vocab) {
            break;
        }

        let is_company_header = is_company_with_location_header(check_t, vocab);
        if is_company_header && !job_desc_lines.is_empty() {
            break;
        }
        if !is_company_header {
            job_desc_lines.push(check_t.to_string());
            idx = temp_idx + 1;
        }

        temp_idx += 1;
    }
    if !job_desc_lines.is_empty() {
        let raw = job_desc_lines.join(" ");
        exp.job_description = Some(normalize_bullet_text(&fix_word_breaks_aggressive(&raw)));
    }

    // Remaining lines: achievements, with non-bullet lines treated as
    // continuations of the previous bullet.
    let mut current: Option<String> = None;
    for line in &entry_lines[idx.min(entry_lines.len())..] {
        let text = &line.text;
        let t = text.trim();

        if t.is_empty() {
            continue;
        }

        // Another job-title header means the next entry has started.
        if is_job_title_header(t, vocab) {
            push_if_valid(&mut exp.achievements, current.take(), vocab);
            break;
        }

        let is_bullet_line = BULLET_RE.is_match(text);

        // Company:role headers and location/date lines are structure, not text.
        if TWO_PART_EXPERIENCE_RE.is_match(t) && t.contains(':') {
            continue;
        }
        let line_location = extract_location_from_line(t, vocab);
        if line_location.is_some() && DATE_RANGE_RE.is_match(t) {
            continue;
        }
        if line_location.is_some()
            && t.chars().count() < 60
            && !t.contains(':')
            && !t.chars().any(|c| c.is_ascii_digit())
        {
            continue;
        }

        // Long flowing prose before the first bullet is leftover description.
        if !is_bullet_line
            && current.is_none()
            && t.chars().count() > 80
            && !SENTENCE_BULLET_RE.is_match(t)
        {
            continue;
        }

        let achievement = BULLET_RE.replace(t, "").trim().to_string();

        if !is_bullet_line && current.is_some() && !achievement.is_empty() {
            if let Some(cur) = current.as_mut() {
                cur.push(' ');
                cur.push_str(&achievement);
            }
            continue;
        }

        push_if_valid(&mut exp.achievements, current.take(), vocab);

        current = if achievement.chars().count() > 10 {
            Some(achievement)
        } else {
            None
        };
    }

    push_if_valid(&mut exp.achievements, current, vocab);

    exp
}
