//! Candidate-name extraction.
//!
//! No NLP here: the name is found positionally. Strongest signal first (the
//! 1-3 lines above the email), then the top ten lines, then a last-resort
//! split of a glued top line at the email.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::normalize_for_search;
use crate::schema::{EvidenceItem, SourceKind, SourceLine};
use crate::segmenter::is_header_line;
use crate::vocab::Vocabulary;

lazy_static! {
    /// Letters, spaces, dots, hyphens, apostrophes only.
    static ref NAME_SHAPE_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z .'-]{1,58}$").unwrap();
    /// A single name-like token for the glued-top-line fallback.
    static ref NAME_TOKEN_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z.'-]*$").unwrap();
}

/// Result of the name search.
#[derive(Debug, Clone, Default)]
pub struct NameHit {
    pub full_name: Option<String>,
    pub evidence: Vec<EvidenceItem>,
}

/// Display normalization: ALL-CAPS names become Title Case, everything else
/// is left alone. Evidence keeps the raw form either way.
fn normalize_name(name: &str) -> String {
    let t = name.trim();
    let has_alpha = t.chars().any(|c| c.is_alphabetic());
    if has_alpha && !t.chars().any(|c| c.is_lowercase()) {
        return title_after_boundaries(t);
    }
    t.to_string()
}

/// Title-case with a capital after every non-letter, so "ANNA-MARIE O'HARA"
/// becomes "Anna-Marie O'Hara".
fn title_after_boundaries(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Does this line plausibly hold a person's name? Header-safe: section
/// headers and single words never qualify.
fn looks_like_name(s: &str, vocab: &Vocabulary) -> bool {
    let t = normalize_for_search(s.trim());

    if t.is_empty() || t.len() > 60 {
        return false;
    }
    if is_header_line(&t, vocab) {
        return false;
    }
    if !NAME_SHAPE_RE.is_match(&t) {
        return false;
    }
    t.split_whitespace().count() >= 2
}

/// Search the 1-3 lines above the email, closest first.
fn try_window(
    lines: &[SourceLine],
    email_idx: usize,
    source: SourceKind,
    vocab: &Vocabulary,
) -> Option<NameHit> {
    let start = email_idx.saturating_sub(3);
    for j in (start..email_idx).rev() {
        let line = &lines[j];
        if looks_like_name(&line.text, vocab) {
            let cleaned = normalize_for_search(&line.text);
            return Some(NameHit {
                full_name: Some(normalize_name(&cleaned)),
                evidence: vec![EvidenceItem::exact(source, line.locator.as_str(), &line.text)],
            });
        }
    }
    None
}

/// Last resort: the top line often glues name, location, and email together
/// ("JOHN DOE New York, New York john.doe@example.com"). Split at the email
/// and take the first two name-like tokens.
fn try_glued_top_line(
    lines: &[SourceLine],
    email: Option<&str>,
    source: SourceKind,
    vocab: &Vocabulary,
) -> Option<NameHit> {
    let line = lines.first()?;
    let t = normalize_for_search(&line.text);

    let prefix = match email {
        Some(email) if t.contains(email) => t.split(email).next().unwrap_or_default().trim(),
        _ => t.as_str(),
    };

    let tokens: Vec<&str> = prefix
        .split_whitespace()
        .filter(|tok| NAME_TOKEN_RE.is_match(tok))
        .collect();

    if tokens.len() >= 2 {
        let name_guess = tokens[..2].join(" ");
        if !is_header_line(&name_guess, vocab) {
            return Some(NameHit {
                full_name: Some(normalize_name(&name_guess)),
                evidence: vec![EvidenceItem::exact(source, line.locator.as_str(), &line.text)],
            });
        }
    }

    None
}

/// Extract the candidate name.
///
/// Order: email window, then the first ten lines, then the glued-top-line
/// fallback. ALL-CAPS names are title-cased for display; evidence keeps the
/// raw line.
pub fn extract_name(
    lines: &[SourceLine],
    email_idx: Option<usize>,
    email: Option<&str>,
    source: SourceKind,
    vocab: &Vocabulary,
) -> NameHit {
    if let Some(idx) = email_idx {
        if let Some(hit) = try_window(lines, idx, source, vocab) {
            return hit;
        }
    }

    for line in lines.iter().take(10) {
        if looks_like_name(&line.text, vocab) {
            let cleaned = normalize_for_search(&line.text);
            return NameHit {
                full_name: Some(normalize_name(&cleaned)),
                evidence: vec![EvidenceItem::exact(source, line.locator.as_str(), &line.text)],
            };
        }
    }

    try_glued_top_line(lines, email, source, vocab).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<SourceLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| SourceLine::new(format!("text:line:{}", i + 1), *t))
            .collect()
    }

    #[test]
    fn test_name_above_email_wins() {
        let vocab = Vocabulary::default();
        let input = lines(&["JOHN DOE", "john.doe@example.com"]);
        let hit = extract_name(&input, Some(1), Some("john.doe@example.com"), SourceKind::Text, &vocab);
        assert_eq!(hit.full_name.as_deref(), Some("John Doe"));
        assert_eq!(hit.evidence[0].text, "JOHN DOE");
    }

    #[test]
    fn test_headers_never_match_as_names() {
        let vocab = Vocabulary::default();
        assert!(!looks_like_name("EXPERIENCE", &vocab));
        assert!(!looks_like_name("Work Experience", &vocab));
        assert!(!looks_like_name("DOE", &vocab));
        assert!(looks_like_name("Anna-Marie O'Hara", &vocab));
    }

    #[test]
    fn test_top_lines_fallback() {
        let vocab = Vocabulary::default();
        let input = lines(&["", "Jane Smith", "Territory Manager 04/2020 - 04/2022"]);
        let hit = extract_name(&input, None, None, SourceKind::Text, &vocab);
        assert_eq!(hit.full_name.as_deref(), Some("Jane Smith"));
    }

    #[test]
    fn test_glued_top_line_split_at_email() {
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
    fn test_all_caps_title_cased_for_display() {
        assert_eq!(normalize_name("JOHN DOE"), "John Doe");
        assert_eq!(normalize_name("ANNA-MARIE O'HARA"), "Anna-Marie O'Hara");
        assert_eq!(normalize_name("Jane Smith"), "Jane Smith");
    }
}
