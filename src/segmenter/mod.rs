//! Line-oriented document segmentation.
//!
//! Resumes arrive as a flat list of [`SourceLine`]s. This module finds the
//! section structure in that list: which line opens the experience or
//! education section, which lines are headers, bullets, or date ranges, and
//! how consecutive lines group into entry blocks. Grouping runs as an
//! explicit two-state machine ([`GroupState`]) so entry boundaries are
//! decided in one place.
//!
//! Everything here classifies; the entry parsers in [`crate::parsers`] turn
//! the grouped blocks into structured data.

use std::ops::ControlFlow;

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::{
    collapse_whitespace, is_all_caps, normalize_for_search, normalize_pdf_wordbreaks,
};
use crate::schema::SourceLine;
use crate::vocab::Vocabulary;

lazy_static! {
    /// Bullet/achievement line detector.
    pub static ref BULLET_RE: Regex = Regex::new(r"^[\s•●\-*>+]+").unwrap();

    /// Experience section headers, including variants like "Career
    /// Experience" and "Work History".
    pub static ref EXPERIENCE_HEADER_RE: Regex =
        Regex::new(r"(?i)^\s*(career\s+)?(work\s+)?(professional\s+)?(experience|employment|history)").unwrap();

    /// Single-line format: "Company: Title: Location". Colon-delimited only,
    /// so slashes in dates like "02/2019 - 04/2025" never trip it.
    pub static ref SINGLE_LINE_EXPERIENCE_RE: Regex =
        Regex::new(r"^(.+?):\s*(.+?):\s*(.+)$").unwrap();

    /// Two-part format: "Company: Job Title", optionally with a trailing
    /// colon left over from extraction.
    pub static ref TWO_PART_EXPERIENCE_RE: Regex =
        Regex::new(r"^(.+?):\s*([A-Z][A-Za-z\s&'-]*)(?::\s*)?$").unwrap();

    /// Relaxed date-range matcher: "January 2024-Present", "01/2024 -
    /// 12/2025", "2020 - 2021", and friends.
    pub static ref DATE_RANGE_RE: Regex = Regex::new(
        r"(?i)(\d{1,2}[-/]?\d{1,2}[-/]?\d{2,4}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec|January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}|\d{4})\s*(?:-|–|to)\s*(?:Present|Current|(\d{1,2}[-/]?\d{1,2}[-/]?\d{2,4}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec|January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}|\d{4}))"
    ).unwrap();

    /// A line that is nothing but a numeric date range, e.g. "04/2025 - PRESENT".
    static ref DATE_ONLY_RE: Regex = Regex::new(
        r"(?i)^\d{1,2}[-/]\d{1,4}\s*(?:-|–|to)\s*(?:\d{1,2}[-/]\d{1,4}|Present|Current)"
    ).unwrap();

    /// Splitter for the two halves of a matched date range.
    static ref DATE_SPLIT_RE: Regex = Regex::new(r"(?i)\s*(?:-|–|to)\s*").unwrap();

    /// Presence check for a numeric date in a job-title line.
    static ref NUMERIC_DATE_RE: Regex = Regex::new(r"\d{1,2}[-/]\d{1,4}").unwrap();

    /// Strips a trailing numeric date range off a job-title line.
    static ref TITLE_DATE_STRIP_RE: Regex = Regex::new(
        r"(?i)\s*\d{1,2}[-/]\d{1,4}\s*(?:-|–|to)\s*(?:Present|Current|\d{1,2}[-/]\d{1,4})?"
    ).unwrap();

    /// A section-stopping header: capitalized, short, no punctuation beyond
    /// slashes and ampersands.
    static ref SECTION_STOP_RE: Regex = Regex::new(r"^[A-Z][A-Za-z\s/&-]*$").unwrap();

    /// Title Case or ALL CAPS job-title shape.
    static ref TITLE_CASE_RE: Regex = Regex::new(r"^[A-Z][A-Za-z\s&'-]*$").unwrap();

    /// A plausible company-name opening character.
    static ref COMPANY_START_RE: Regex = Regex::new(r"^[A-Z&\s'-]").unwrap();

    /// A capitalized city-name word.
    static ref CITY_WORD_RE: Regex = Regex::new(r"^[A-Z][a-z]*$").unwrap();

    /// A capitalized state/country word.
    static ref STATE_WORD_RE: Regex = Regex::new(r"^[A-Z][a-z]+$").unwrap();
}

/// The two resume sections whose entries get structured parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Education,
    Experience,
}

/// Detect whether a line is a known section header.
///
/// PDF word breaks ("educati on") are repaired before matching, and the
/// comparison runs against the lowercased, whitespace-collapsed form.
pub fn detect_section_type(line: &str, vocab: &Vocabulary) -> Option<SectionType> {
    let normalized = normalize_pdf_wordbreaks(line.trim(), vocab);
    let key = collapse_whitespace(&normalized).to_lowercase();

    if vocab.education_headers.contains(key.as_str()) {
        return Some(SectionType::Education);
    }
    if vocab.experience_headers.contains(key.as_str()) {
        return Some(SectionType::Experience);
    }
    None
}

/// Is this line a section header rather than content?
///
/// Empty lines count as headers (they terminate name searches). Otherwise
/// the line is word-break-repaired, search-normalized, and checked against
/// the header blacklist; all-caps single words ("EXPERIENCE") also qualify.
pub fn is_header_line(text: &str, vocab: &Vocabulary) -> bool {
    let raw = text.trim();
    if raw.is_empty() {
        return true;
    }

    let raw = normalize_pdf_wordbreaks(raw, vocab);
    let t = normalize_for_search(&raw);
    let key = collapse_whitespace(&t).to_lowercase();

    if vocab.is_blacklisted_header(&key) {
        return true;
    }

    is_all_caps(&t) && !t.contains(' ')
}

/// Extract a "City, State/Country" pattern by scanning commas right to left.
///
/// Handles "Company, San Francisco, California" -> "San Francisco,
/// California" and "Spokane, Washington, 2012 – 2016" -> "Spokane,
/// Washington". Rejects study-abroad phrasing like "DIS Study Abroad,
/// Copenhagen" where the "city" would be a program keyword.
pub fn extract_location_from_line(text: &str, vocab: &Vocabulary) -> Option<String> {
    let commas: Vec<usize> = text
        .char_indices()
        .filter(|(_, c)| *c == ',')
        .map(|(i, _)| i)
        .collect();

    fn strip_punct(s: &str) -> &str {
        s.trim_matches(|c| matches!(c, ',' | '.' | ';' | ':' | '–' | '-'))
    }

    for &comma_pos in commas.iter().rev() {
        let after_comma = text[comma_pos + 1..].trim();
        let words_after: Vec<&str> = after_comma.split_whitespace().collect();
        if words_after.is_empty() {
            continue;
        }

        let first_word = strip_punct(words_after[0]).to_string();
        let two_words = if words_after.len() >= 2 {
            strip_punct(&words_after[..2].join(" ")).to_string()
        } else {
            String::new()
        };

        let is_state_code = vocab.is_state_code(&first_word);
        let is_multi_word = !two_words.is_empty() && vocab.is_multi_word_state(&two_words);
        let is_valid_location = STATE_WORD_RE.is_match(&first_word) && first_word.len() >= 4;

        let location_name = if is_multi_word {
            Some(two_words)
        } else if is_state_code || is_valid_location {
            Some(first_word)
        } else {
            None
        };

        let name = match location_name {
            Some(n) => n,
            None => continue,
        };

        // The city is the last 1-2 capitalized words before this comma.
        let before_comma = text[..comma_pos].trim();
        let words: Vec<&str> = before_comma.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let mut city_words: Vec<&str> = Vec::new();
        for w in words.iter().rev() {
            if CITY_WORD_RE.is_match(w) {
                city_words.insert(0, w);
                if city_words.len() >= 2 {
                    break;
                }
            } else {
                break;
            }
        }

        if city_words.is_empty() {
            continue;
        }

        let city = city_words.join(" ");
        let city_lower = city.to_lowercase();
        let invalid_city = [
            "study",
            "abroad",
            "institute",
            "program",
            "semester",
            "trimester",
            "year",
        ];
        if invalid_city.iter().any(|k| city_lower.contains(k)) {
            continue;
        }

        return Some(format!("{}, {}", city, name));
    }

    None
}

/// Detect a company header with location, e.g. "Bausch & Lomb, Phoenix
/// Valley, AZ". Requires a comma, an extractable location, and a plausible
/// company name before it. Single all-caps words like "MANAGER" are job
/// titles, not companies.
pub fn is_company_with_location_header(text: &str, vocab: &Vocabulary) -> bool {
    if text.is_empty() || text.len() > 150 {
        return false;
    }
    if !text.contains(',') {
        return false;
    }

    let location = match extract_location_from_line(text, vocab) {
        Some(l) => l,
        None => return false,
    };

    let loc_idx = match text.find(&location) {
        Some(i) => i,
        None => return false,
    };

    let before_loc = text[..loc_idx].trim().trim_end_matches(',').trim();
    if before_loc.is_empty() {
        return false;
    }

    if is_all_caps(before_loc)
        && before_loc.split_whitespace().count() == 1
        && before_loc.len() < 20
    {
        return false;
    }

    COMPANY_START_RE.is_match(before_loc)
}

/// Detect a job-title header line, e.g. "TERRITORY MANAGER" or "Senior
/// Software Engineer", optionally with dates on the same line:
/// "BUSINESS DEVELOPMENT MANAGER   04/2025 - PRESENT".
///
/// Colons and commas disqualify (those indicate the single-line or
/// company/location formats), as do blacklisted section headers and lines
/// with an extractable location.
pub fn is_job_title_header(text: &str, vocab: &Vocabulary) -> bool {
    if text.is_empty() || text.len() > 150 {
        return false;
    }

    let t = text.trim();

    if vocab.is_blacklisted_header(&t.to_lowercase()) {
        return false;
    }
    if t.contains(':') || t.contains(',') {
        return false;
    }
    if extract_location_from_line(t, vocab).is_some() {
        return false;
    }

    let title_part = if NUMERIC_DATE_RE.is_match(t) {
        TITLE_DATE_STRIP_RE.replace_all(t, "").trim().to_string()
    } else {
        t.to_string()
    };

    if title_part.is_empty() {
        return false;
    }

    if !(is_all_caps(&title_part) || TITLE_CASE_RE.is_match(&title_part)) {
        return false;
    }

    let word_count = title_part.split_whitespace().count();
    (1..=6).contains(&word_count)
}

/// Heuristic: does this line look like a company name or job title rather
/// than an achievement bullet or description? At least half the words must
/// start uppercase, no bullet prefix, and the line must stay short.
pub fn is_company_or_job_line(text: &str) -> bool {
    let t = text.trim();

    if BULLET_RE.is_match(t) {
        return false;
    }
    if t.len() > 150 || t.is_empty() {
        return false;
    }

    let words: Vec<&str> = t.split_whitespace().collect();
    let upper_words = words
        .iter()
        .filter(|w| w.chars().next().map_or(false, |c| c.is_uppercase()))
        .count();

    !words.is_empty() && upper_words as f64 / words.len() as f64 >= 0.5
}

/// Is this line nothing but a numeric date range ("04/2025 - PRESENT")?
/// Date-only lines attach to the current entry, never start a new one.
pub fn is_date_only_line(text: &str) -> bool {
    DATE_ONLY_RE.is_match(text)
}

/// Extract (start_date, end_date) from a line, or (None, None).
pub fn extract_date_range(text: &str) -> (Option<String>, Option<String>) {
    let m = match DATE_RANGE_RE.find(text) {
        Some(m) => m,
        None => return (None, None),
    };

    let matched = m.as_str().trim();
    let parts: Vec<&str> = DATE_SPLIT_RE.split(matched).collect();
    if parts.len() == 2 {
        (
            Some(parts[0].trim().to_string()),
            Some(parts[1].trim().to_string()),
        )
    } else {
        (None, None)
    }
}

/// Find the first experience section header, if any.
pub fn detect_experience_section_start(lines: &[SourceLine]) -> Option<usize> {
    lines
        .iter()
        .position(|line| EXPERIENCE_HEADER_RE.is_match(line.text.trim()))
}

/// Grouping state: between entries, or collecting lines into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupState {
    Seeking,
    Collecting,
}

/// State machine that groups experience-section lines into entry blocks.
///
/// Supports three layouts: hierarchical "Company, Location" headers followed
/// by job-title headers (with the company header carried forward to sibling
/// jobs), single-line "Company: Title: Location" entries, and plain
/// multi-line blocks separated by company/title lines.
struct ExperienceGrouper<'a> {
    vocab: &'a Vocabulary,
    state: GroupState,
    entries: Vec<Vec<SourceLine>>,
    current: Vec<SourceLine>,
    /// Last "Company, Location" header seen, carried into sibling job entries.
    company_header: Option<SourceLine>,
}

impl<'a> ExperienceGrouper<'a> {
    fn new(vocab: &'a Vocabulary) -> Self {
        ExperienceGrouper {
            vocab,
            state: GroupState::Seeking,
            entries: Vec::new(),
            current: Vec::new(),
            company_header: None,
        }
    }

    /// Feed one line. Breaks when a new major section header ends the
    /// experience section.
    fn feed(&mut self, idx: usize, section_start: usize, line: &SourceLine) -> ControlFlow<()> {
        let t = line.text.trim();
        if t.is_empty() {
            return ControlFlow::Continue(());
        }

        if is_header_line(&line.text, self.vocab)
            && !BULLET_RE.is_match(t)
            && !t.contains(':')
            && idx > section_start + 2
            && SECTION_STOP_RE.is_match(t)
            && t.split_whitespace().count() <= 5
        {
            self.close_current();
            return ControlFlow::Break(());
        }

        let t_owned = t.to_string();
        if self.starts_new_entry(line, &t_owned) && self.state == GroupState::Collecting {
            self.entries.push(std::mem::take(&mut self.current));

            // A sibling job title reuses the cached company header so the
            // company name carries into the new entry.
            if is_job_title_header(&t_owned, self.vocab)
                && self.company_header.is_some()
                && !is_company_with_location_header(&t_owned, self.vocab)
            {
                let header = self.company_header.clone();
                self.current = vec![header.unwrap_or_else(|| line.clone()), line.clone()];
            } else {
                self.current = vec![line.clone()];
                if is_company_with_location_header(&t_owned, self.vocab) {
                    self.company_header = Some(line.clone());
                } else {
                    self.company_header = None;
                }
            }
        } else {
            self.current.push(line.clone());
            self.state = GroupState::Collecting;
        }

        ControlFlow::Continue(())
    }

    /// Entry-boundary decision. Order matters: each check short-circuits the
    /// ones after it, so a line that matches an earlier shape never falls
    /// through to a later heuristic.
    fn starts_new_entry(&mut self, line: &SourceLine, t: &str) -> bool {
        // Bullets are always attachments, never boundaries.
        if BULLET_RE.is_match(t) {
            return false;
        }

        // Date-only lines belong to the current entry.
        if is_date_only_line(t) {
            return false;
        }

        // "Company, Location" header: new entry, and cache it for sibling jobs.
        if is_company_with_location_header(t, self.vocab) {
            self.company_header = Some(line.clone());
            return true;
        }

        // "Company: Title: Location" single-line entry.
        if t.contains(':') && SINGLE_LINE_EXPERIENCE_RE.is_match(t) {
            self.company_header = None;
            return true;
        }

        // "Company: Job Title" two-part entry, but only when the company
        // half looks like a name rather than prose.
        if let Some(caps) = TWO_PART_EXPERIENCE_RE.captures(t) {
            let company_part = caps.get(1).map_or("", |m| m.as_str()).trim();
            let looks_like_company = company_part.len() < 100
                && (is_all_caps(company_part)
                    || company_part
                        .split_whitespace()
                        .any(|w| w.chars().next().map_or(false, |c| c.is_uppercase())));
            if looks_like_company {
                self.company_header = None;
                return true;
            }
            return false;
        }

        // A bare location line mid-entry never opens a new entry, and also
        // blocks the sibling-title and simple-format checks below.
        if self.state == GroupState::Collecting
            && t.len() < 200
            && extract_location_from_line(t, self.vocab).is_some()
        {
            return false;
        }

        // Sibling job title under a cached company header: only once the
        // current entry already holds a complete job (title plus content).
        if self.state == GroupState::Collecting
            && self.company_header.is_some()
            && is_job_title_header(t, self.vocab)
        {
            return self.current.len() >= 4
                && self
                    .current
                    .iter()
                    .any(|l| is_job_title_header(l.text.trim(), self.vocab));
        }

        // Plain multi-line format: a company/title line after a completed
        // entry (one that already collected achievements).
        if self.state == GroupState::Collecting && is_company_or_job_line(t) {
            let has_achievements = self.current.iter().any(|l| BULLET_RE.is_match(&l.text));
            if has_achievements && self.current.len() >= 3 {
                self.company_header = None;
                return true;
            }
            return false;
        }

        false
    }

    fn close_current(&mut self) {
        if !self.current.is_empty() {
            self.entries.push(std::mem::take(&mut self.current));
        }
        self.state = GroupState::Seeking;
    }

    fn finish(mut self) -> Vec<Vec<SourceLine>> {
        self.close_current();
        self.entries
    }
}

/// Group consecutive experience-section lines into entry blocks, starting
/// after the section header at `section_start`.
pub fn group_experience_entries(
    lines: &[SourceLine],
    section_start: usize,
    vocab: &Vocabulary,
) -> Vec<Vec<SourceLine>> {
    let mut grouper = ExperienceGrouper::new(vocab);

    for (idx, line) in lines.iter().enumerate().skip(section_start + 1) {
        if grouper.feed(idx, section_start, line).is_break() {
            break;
        }
    }

    grouper.finish()
}

/// State machine that groups education-section lines into entry blocks.
///
/// Institution keywords are the primary anchor for new entries; degree
/// keywords only open an entry when nothing is being collected (so a
/// "Bachelor of Science..." line stays attached to its institution).
struct EducationGrouper<'a> {
    vocab: &'a Vocabulary,
    state: GroupState,
    entries: Vec<Vec<SourceLine>>,
    current: Vec<SourceLine>,
}

impl<'a> EducationGrouper<'a> {
    fn new(vocab: &'a Vocabulary) -> Self {
        EducationGrouper {
            vocab,
            state: GroupState::Seeking,
            entries: Vec::new(),
            current: Vec::new(),
        }
    }

    fn feed(&mut self, idx: usize, section_start: usize, line: &SourceLine) -> ControlFlow<()> {
        let t = line.text.trim();
        if t.is_empty() {
            return ControlFlow::Continue(());
        }

        if is_header_line(&line.text, self.vocab)
            && !BULLET_RE.is_match(t)
            && idx > section_start + 2
            && SECTION_STOP_RE.is_match(t)
            && t.split_whitespace().count() <= 5
        {
            self.close_current();
            return ControlFlow::Break(());
        }

        if self.starts_new_entry(t) && self.state == GroupState::Collecting {
            self.entries.push(std::mem::take(&mut self.current));
            self.current = vec![line.clone()];
        } else {
            self.current.push(line.clone());
            self.state = GroupState::Collecting;
        }

        ControlFlow::Continue(())
    }

    fn starts_new_entry(&self, t: &str) -> bool {
        if self.vocab.has_institution_keyword(t) {
            return true;
        }
        if self.vocab.is_high_school(t) {
            return true;
        }
        if self.vocab.is_study_abroad(t) {
            return true;
        }
        if self.vocab.has_degree_keyword(t) && self.current.is_empty() {
            return true;
        }

        // Location line: starts a new entry only when the current one
        // already has a location of its own.
        if !BULLET_RE.is_match(t)
            && t.len() < 150
            && extract_location_from_line(t, self.vocab).is_some()
        {
            if self.current.is_empty() {
                return true;
            }
            let prev_text = self
                .current
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            return extract_location_from_line(&prev_text, self.vocab).is_some();
        }

        false
    }

    fn close_current(&mut self) {
        if !self.current.is_empty() {
            self.entries.push(std::mem::take(&mut self.current));
        }
        self.state = GroupState::Seeking;
    }

    fn finish(mut self) -> Vec<Vec<SourceLine>> {
        self.close_current();
        self.entries
    }
}

/// Group consecutive education-section lines into entry blocks, starting
/// after the section header at `section_start`.
pub fn group_education_entries(
    lines: &[SourceLine],
    section_start: usize,
    vocab: &Vocabulary,
) -> Vec<Vec<SourceLine>> {
    let mut grouper = EducationGrouper::new(vocab);

    for (idx, line) in lines.iter().enumerate().skip(section_start + 1) {
        if grouper.feed(idx, section_start, line).is_break() {
            break;
        }
    }

    grouper.finish()
}
