//! Matching-only normalization.
//!
//! Everything in this module exists so that detection regexes can run over
//! awful PDF-extracted strings. The normalized form is used ONLY for
//! matching; evidence text always remains the original line.

use lazy_static::lazy_static;
use regex::Regex;

use crate::vocab::Vocabulary;

use super::collapse_whitespace;

lazy_static! {
    /// A line that is mostly single characters separated by spaces,
    /// e.g. "E X P E R I E N C E" or "5 5 5 . 1 2 3 . 4 5 6 7".
    static ref SPACED_CHARS_RE: Regex =
        Regex::new(r"^(?:[A-Za-z0-9@.()\-\+]\s+){2,}[A-Za-z0-9@.()\-\+]+$").unwrap();
    static ref MULTI_SPACE_SPLIT_RE: Regex = Regex::new(r"\s{2,}").unwrap();
    static ref NO_SPACE_PUNCT_RE: Regex = Regex::new(r"([,;/\|\(\)\[\]])").unwrap();
    static ref CAMEL_BOUNDARY_RE: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
    static ref LETTER_THEN_DIGIT_RE: Regex = Regex::new(r"([A-Za-z])(\d)").unwrap();
    static ref DIGIT_THEN_LETTER_RE: Regex = Regex::new(r"(\d)([A-Za-z])").unwrap();
    /// Glued all-caps job-title fragments, e.g. TERRITORYMANAGER.
    static ref JOB_TITLE_GLUE_RES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"TERRITORY([A-Z])").unwrap(), "TERRITORY $1"),
        (Regex::new(r"MANAGER([A-Z])").unwrap(), "MANAGER $1"),
        (Regex::new(r"KEY([A-Z])").unwrap(), "KEY $1"),
        (Regex::new(r"ACCOUNT([A-Z])").unwrap(), "ACCOUNT $1"),
        (Regex::new(r"GROUP([A-Z])").unwrap(), "GROUP $1"),
        (Regex::new(r"([A-Z])OF([A-Z])").unwrap(), "$1 OF $2"),
    ];
    static ref SPACE_BEFORE_COMMA_RE: Regex = Regex::new(r"\s+,").unwrap();
    static ref COMMA_SPACING_RE: Regex = Regex::new(r",\s*").unwrap();
    static ref LETTERS_MULTI_GAP_RE: Regex = Regex::new(r"([A-Za-z])\s{2,}([A-Za-z])").unwrap();
    static ref COLON_CAP_RE: Regex = Regex::new(r":([A-Z])").unwrap();
    static ref COMMA_CAP_RE: Regex = Regex::new(r",([A-Z])").unwrap();
}

/// Re-apply a replacement until the text stops changing. Needed because a
/// single `replace_all` pass consumes its match, so overlapping artifacts
/// like "te  rri  tory" take two passes to fully close.
fn replace_until_stable(re: &Regex, text: &str, rep: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..8 {
        let next = re.replace_all(&current, rep).into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Fix PDFs that extract text with spaces between every character.
///
/// Runs of 2+ spaces are treated as word boundaries; single spaces inside
/// each part are removed.
///
/// # Examples
///
/// ```
/// use resume_oxide::normalize::despace_spaced_chars;
/// assert_eq!(despace_spaced_chars("E X P E R I E N C E"), "EXPERIENCE");
/// assert_eq!(despace_spaced_chars("J O H N   D O E"), "JOHN DOE");
/// assert_eq!(despace_spaced_chars("5 5 5 . 1 2 3 . 4 5 6 7"), "555.123.4567");
/// ```
pub fn despace_spaced_chars(text: &str) -> String {
    let t = text.trim();
    if t.is_empty() {
        return String::new();
    }

    if SPACED_CHARS_RE.is_match(t) {
        return MULTI_SPACE_SPLIT_RE
            .split(t)
            .map(|part| part.split_whitespace().collect::<String>())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
    }

    t.to_string()
}

/// Normalize a line for matching and detection.
///
/// Goal: make awful PDF-extracted strings searchable. Splits glued all-caps
/// job titles, spaces out punctuation, camelCase boundaries, and
/// letter/digit boundaries, then collapses whitespace.
///
/// # Examples
///
/// ```
/// use resume_oxide::normalize::normalize_for_search;
/// assert_eq!(normalize_for_search("NewYork,NewYork"), "New York , New York");
/// assert_eq!(normalize_for_search("TERRITORYMANAGER"), "TERRITORY MANAGER");
/// ```
pub fn normalize_for_search(text: &str) -> String {
    let mut t = despace_spaced_chars(text.trim());
    if t.is_empty() {
        return t;
    }

    for (re, rep) in JOB_TITLE_GLUE_RES.iter() {
        t = re.replace_all(&t, *rep).into_owned();
    }

    t = NO_SPACE_PUNCT_RE.replace_all(&t, " $1 ").into_owned();
    t = CAMEL_BOUNDARY_RE.replace_all(&t, "$1 $2").into_owned();
    t = LETTER_THEN_DIGIT_RE.replace_all(&t, "$1 $2").into_owned();
    t = DIGIT_THEN_LETTER_RE.replace_all(&t, "$1 $2").into_owned();

    collapse_whitespace(&t)
}

/// Tidy comma spacing in an extracted location.
///
/// "New York , New York" -> "New York, New York"; ",California" -> ", California".
pub fn format_location(s: &str) -> String {
    let t = SPACE_BEFORE_COMMA_RE.replace_all(s, ",");
    let t = COMMA_SPACING_RE.replace_all(&t, ", ");
    collapse_whitespace(&t)
}

/// Fix mid-word breaks in PDF-extracted text, conservatively.
///
/// Runs of 2+ spaces between letters are always extraction artifacts and
/// close unconditionally. Single-space breaks close only when the rejoined
/// fragments spell a dictionary word, so real phrases like "Bachelor of
/// Science" keep their spaces.
///
/// # Examples
///
/// ```
/// use resume_oxide::normalize::normalize_pdf_wordbreaks;
/// use resume_oxide::vocab::Vocabulary;
///
/// let vocab = Vocabulary::default();
/// assert_eq!(normalize_pdf_wordbreaks("communicati on", &vocab), "communication");
/// assert_eq!(normalize_pdf_wordbreaks("journ a lism", &vocab), "journalism");
/// assert_eq!(
///     normalize_pdf_wordbreaks("Bachelor of Science", &vocab),
///     "Bachelor of Science"
/// );
/// ```
pub fn normalize_pdf_wordbreaks(s: &str, vocab: &Vocabulary) -> String {
    if s.is_empty() {
        return String::new();
    }
    let t = replace_until_stable(&LETTERS_MULTI_GAP_RE, s, "$1$2");
    merge_broken_fragments(&t, vocab)
}

/// Both sides of every junction in a fragment run must be lowercase; a space
/// next to an uppercase letter is a real word boundary.
fn junctions_are_lowercase(run: &[&str]) -> bool {
    run.windows(2).all(|pair| {
        pair[0].chars().last().is_some_and(|c| c.is_ascii_lowercase())
            && pair[1].chars().next().is_some_and(|c| c.is_ascii_lowercase())
    })
}

/// Rejoin runs of 2-4 adjacent fragments whose concatenation is a dictionary
/// word ("journ a lism" -> "journalism"). Longer runs win over shorter ones.
fn merge_broken_fragments(text: &str, vocab: &Vocabulary) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let mut merged: Option<(usize, String)> = None;
        let max_run = std::cmp::min(i + 4, tokens.len());

        for end in (i + 2..=max_run).rev() {
            let run = &tokens[i..end];
            if !junctions_are_lowercase(run) {
                continue;
            }
            let joined = run.concat();
            let key = joined.to_lowercase();
            if key.chars().all(|c| c.is_ascii_lowercase()) && vocab.is_common(&key) {
                merged = Some((end, joined));
                break;
            }
        }

        match merged {
            Some((end, joined)) => {
                out.push(joined);
                i = end;
            }
            None => {
                out.push(tokens[i].to_string());
                i += 1;
            }
        }
    }

    out.join(" ")
}

/// Add spaces in common patterns where PDF extraction removed them.
///
/// # Examples
///
/// ```
/// use resume_oxide::normalize::add_spaces_to_text;
/// assert_eq!(add_spaces_to_text("NewYork,NewYork"), "New York, New York");
/// assert_eq!(add_spaces_to_text("January2024"), "January 2024");
/// assert_eq!(add_spaces_to_text("NEODENT:TERRITORY"), "NEODENT: TERRITORY");
/// ```
pub fn add_spaces_to_text(text: &str) -> String {
    let t = CAMEL_BOUNDARY_RE.replace_all(text, "$1 $2");
    let t = LETTER_THEN_DIGIT_RE.replace_all(&t, "$1 $2");
    let t = DIGIT_THEN_LETTER_RE.replace_all(&t, "$1 $2");
    let t = COLON_CAP_RE.replace_all(&t, ": $1");
    let t = COMMA_CAP_RE.replace_all(&t, ", $1");
    collapse_whitespace(&t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_despace_preserves_word_boundary() {
        assert_eq!(despace_spaced_chars("J O H N   D O E"), "JOHN DOE");
    }

    #[test]
    fn test_despace_leaves_normal_text_alone() {
        assert_eq!(
            despace_spaced_chars("Territory Manager at Acme"),
            "Territory Manager at Acme"
        );
    }

    #[test]
    fn test_normalize_for_search_glued_caps_title() {
        assert_eq!(
            normalize_for_search("KEYACCOUNTMANAGER"),
            "KEY ACCOUNT MANAGER"
        );
    }

    #[test]
    fn test_normalize_for_search_digit_boundaries() {
        assert_eq!(normalize_for_search("ford0719"), "ford 0719");
    }

    #[test]
    fn test_format_location() {
        assert_eq!(format_location("New York , New York"), "New York, New York");
        assert_eq!(format_location("Austin,TX"), "Austin, TX");
        assert_eq!(format_location("Spokane,   Washington"), "Spokane, Washington");
    }

    #[test]
    fn test_wordbreaks_multi_space_artifact() {
        let vocab = Vocabulary::default();
        assert_eq!(normalize_pdf_wordbreaks("educati  on", &vocab), "education");
    }

    #[test]
    fn test_wordbreaks_single_space_needs_dictionary_word() {
        let vocab = Vocabulary::default();
        assert_eq!(normalize_pdf_wordbreaks("educati on", &vocab), "education");
        assert_eq!(normalize_pdf_wordbreaks("journ a lism", &vocab), "journalism");
    }

    #[test]
    fn test_wordbreaks_keeps_real_word_boundaries() {
        let vocab = Vocabulary::default();
        assert_eq!(
            normalize_pdf_wordbreaks("Bachelor of Science in Communication Studies", &vocab),
            "Bachelor of Science in Communication Studies"
        );
        assert_eq!(
            normalize_pdf_wordbreaks("References available upon request", &vocab),
            "References available upon request"
        );
    }

    #[test]
    fn test_wordbreaks_keeps_uppercase_boundaries() {
        let vocab = Vocabulary::default();
        assert_eq!(
            normalize_pdf_wordbreaks("Spring Trimester", &vocab),
            "Spring Trimester"
        );
    }

    #[test]
    fn test_add_spaces_all_caps_colon_format() {
        assert_eq!(
            add_spaces_to_text("ACMECORP:TERRITORYMANAGER:NEWYORK"),
            "ACMECORP: TERRITORYMANAGER: NEWYORK"
        );
    }
}
