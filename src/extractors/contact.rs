//! Email and phone extraction.
//!
//! These two fields are the anchors of the whole parse: the email line
//! position drives the name-window search, and phone runs first so its
//! digits never leak into an email's user portion when both share a line.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::{despace_spaced_chars, normalize_for_search};
use crate::schema::{EvidenceItem, SourceKind, SourceLine};

lazy_static! {
    /// Tolerant email matcher: allows stray spaces around `@`, around the
    /// final dot, and inside the user/domain parts.
    static ref EMAIL_FLEX_RE: Regex = Regex::new(
        r"([^\s@]+(?:\s+[^\s@]+)*)\s*@\s*([^\s@]+(?:\s+[^\s@]+)*)\s*\.\s*([A-Za-z]{2,})"
    ).unwrap();

    static ref STRICT_EMAIL_RE: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();

    /// Phone matcher over search-normalized text. Handles "(555) 123-4567",
    /// "( 555 ) 123-4567", "555-123-4567", "+1 555 123 4567".
    pub static ref PHONE_RE: Regex = Regex::new(
        r"(?:^|\s|\()((?:\+?\d{1,3}[-.\s]?)?\(?\s*\d{3}\s*\)?[-.\s]?\d{3}[-.\s]?\d{4})"
    ).unwrap();

    static ref DIGIT_RUN_RE: Regex = Regex::new(r"\d+").unwrap();

    /// Recovers the phone from the ORIGINAL line to preserve its formatting.
    static ref PHONE_ORIGINAL_RE: Regex =
        Regex::new(r"(\(?\s*\d{3}\s*\)?\s*[-.]?\s*\d{3}\s*[-.]?\s*\d{4})").unwrap();
    static ref PHONE_PARENS_RE: Regex = Regex::new(r"\(\d{3}\)\s*\d{3}[-.]?\d{4}").unwrap();
    static ref PHONE_STANDARD_RE: Regex = Regex::new(r"\d{3}[-.]?\d{3}[-.]?\d{4}").unwrap();

    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Result of scanning the lines for one contact field.
#[derive(Debug, Clone, Default)]
pub struct ContactHit {
    pub value: Option<String>,
    pub evidence: Vec<EvidenceItem>,
    /// Index of the line the field was found on.
    pub line_index: Option<usize>,
}

/// Does this would-be email user portion actually look like a phone number?
/// Rejects concatenations like "(856)366-5713k.o.harbaugh".
fn user_looks_like_phone(user: &str) -> bool {
    let digit_count = user.chars().filter(|c| c.is_ascii_digit()).count();
    let has_parens = user.contains('(') || user.contains(')');
    let has_plus = user.starts_with('+');
    has_parens || has_plus || (digit_count >= 7 && user.contains('-'))
}

/// Extract an email from text, tolerating accidental spaces around `@` and
/// `.` and inside the user/domain parts.
///
/// # Examples
///
/// ```
/// use resume_oxide::extractors::extract_email_flexible;
/// assert_eq!(
///     extract_email_flexible("annaford0719 @ gmail . com"),
///     Some("annaford0719@gmail.com".to_string())
/// );
/// assert_eq!(extract_email_flexible("(856)366-5713k.o.harbaugh@gmail.com"), None);
/// ```
pub fn extract_email_flexible(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = EMAIL_FLEX_RE.captures(text) {
        let user = caps[1].replace(' ', "");
        let domain = caps[2].replace(' ', "");
        let tld = caps[3].replace(' ', "");
        if !user_looks_like_phone(&user) {
            return Some(format!("{}@{}.{}", user, domain, tld));
        }
    }

    if let Some(m) = STRICT_EMAIL_RE.find(text) {
        let whole = m.as_str();
        let user = whole.split('@').next().unwrap_or_default();
        if !user_looks_like_phone(user) {
            return Some(whole.to_string());
        }
    }

    None
}

/// Find the first phone number in the lines.
///
/// Matching runs over the search-normalized text, but the stored phone is
/// recovered from the ORIGINAL line so formatting like "(555) 123-4567"
/// survives. Evidence keeps the original line text.
pub fn extract_phone(lines: &[SourceLine], source: SourceKind) -> ContactHit {
    for (idx, line) in lines.iter().enumerate() {
        let t = normalize_for_search(&line.text);
        let caps = match PHONE_RE.captures(&t) {
            Some(c) => c,
            None => continue,
        };

        let digit_groups: Vec<&str> = DIGIT_RUN_RE
            .find_iter(&caps[1])
            .map(|m| m.as_str())
            .collect();

        let mut phone = None;
        if digit_groups.len() >= 3 {
            if let Some(orig) = PHONE_ORIGINAL_RE.captures(&line.text) {
                let mut p = orig[1].replace([' ', '\t'], "");
                if line.text.contains('(') && line.text.contains(')') {
                    if let Some(m) = PHONE_PARENS_RE.find(&line.text) {
                        p = m.as_str().to_string();
                    }
                } else if let Some(m) = PHONE_STANDARD_RE.find(&line.text) {
                    p = m.as_str().to_string();
                }
                phone = Some(p);
            } else if digit_groups.len() >= 4 {
                phone = Some(format!(
                    "({}){}-{}",
                    digit_groups[0], digit_groups[1], digit_groups[2]
                ));
            }
        }

        return ContactHit {
            value: phone,
            evidence: vec![EvidenceItem::exact(source, line.locator.as_str(), &line.text)],
            line_index: Some(idx),
        };
    }

    ContactHit::default()
}

/// Find the first email in the lines.
///
/// Search normalization is deliberately NOT applied here: it would split
/// the email at letter/digit boundaries. Instead the line is de-spaced and
/// then tried with all whitespace stripped, falling back to the raw form.
pub fn extract_email(lines: &[SourceLine], source: SourceKind) -> ContactHit {
    for (idx, line) in lines.iter().enumerate() {
        let raw = despace_spaced_chars(&line.text);
        let raw_nospace = WHITESPACE_RE.replace_all(&raw, "").into_owned();

        let email = extract_email_flexible(&raw_nospace).or_else(|| extract_email_flexible(&raw));
        if let Some(email) = email {
            return ContactHit {
                value: Some(email),
                evidence: vec![EvidenceItem::exact(source, line.locator.as_str(), &line.text)],
                line_index: Some(idx),
            };
        }
    }

    ContactHit::default()
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
    fn test_email_flexible_spaces_everywhere() {
        assert_eq!(
            extract_email_flexible("anna ford@gm ail.com"),
            Some("annaford@gmail.com".to_string())
        );
        assert_eq!(
            extract_email_flexible("annaford0719@gmail.com"),
            Some("annaford0719@gmail.com".to_string())
        );
    }

    #[test]
    fn test_email_rejects_phone_concatenation() {
        assert_eq!(
            extract_email_flexible("(856)366-5713k.o.harbaugh@gmail.com"),
            None
        );
    }

    #[test]
    fn test_extract_email_from_lines() {
        let input = lines(&["JOHN DOE", "john.doe@example.com | (555) 123-4567"]);
        let hit = extract_email(&input, SourceKind::Text);
        assert_eq!(hit.value.as_deref(), Some("john.doe@example.com"));
        assert_eq!(hit.line_index, Some(1));
        assert_eq!(hit.evidence.len(), 1);
        assert_eq!(hit.evidence[0].text, "john.doe@example.com | (555) 123-4567");
    }

    #[test]
    fn test_extract_phone_preserves_paren_format() {
        let input = lines(&["JOHN DOE", "(555) 123-4567"]);
        let hit = extract_phone(&input, SourceKind::Text);
        assert_eq!(hit.value.as_deref(), Some("(555) 123-4567"));
        assert_eq!(hit.line_index, Some(1));
    }

    #[test]
    fn test_extract_phone_dotted_format() {
        let input = lines(&["555.123.4567"]);
        let hit = extract_phone(&input, SourceKind::Text);
        assert_eq!(hit.value.as_deref(), Some("555.123.4567"));
    }

    #[test]
    fn test_no_contact_found() {
        let input = lines(&["JOHN DOE", "Territory Manager"]);
        assert!(extract_phone(&input, SourceKind::Text).value.is_none());
        assert!(extract_email(&input, SourceKind::Text).value.is_none());
        assert!(extract_email(&input, SourceKind::Text).line_index.is_none());
    }
}
