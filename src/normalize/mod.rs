//! Text normalization for PDF/DOCX extraction artifacts.
//!
//! Resume text arrives corrupted in three characteristic ways: glued words
//! (`Transferredto`), character fragmentation (`ne wc us to me rs`), and
//! mid-word breaks (`adopti on`). The submodules here attack each at a
//! different level of aggressiveness:
//!
//! - [`search`]: matching-only normalization. Evidence always stays original.
//! - [`fields`]: whitelist-only repair safe for structured fields.
//! - [`bullets`]: the rich per-token pipeline for achievement text.
//! - [`repair`]: corruption classification and best-of-N strategy selection.
//! - [`segment`]: dictionary-driven segmentation of glued words.

pub mod bullets;
pub mod fields;
pub mod repair;
pub mod search;
pub mod segment;

pub use bullets::{fix_word_breaks_aggressive, normalize_bullet_text, normalize_token_basic};
pub use fields::normalize_field_text;
pub use repair::{repair_achievement, CorruptionClass};
pub use search::{
    add_spaces_to_text, despace_spaced_chars, format_location, normalize_for_search,
    normalize_pdf_wordbreaks,
};
pub use segment::{deglue_joiners, segment_concatenated_words};

/// True when the string has at least one cased character and no lowercase
/// ones, mirroring the usual "is this ALL CAPS" check.
pub fn is_all_caps(s: &str) -> bool {
    let mut saw_alpha = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_alphabetic() {
            saw_alpha = true;
        }
    }
    saw_alpha
}

/// Title-case word by word: uppercase the first letter, lowercase the rest.
/// Works better than a naive `to_titlecase` for hyphens and apostrophes in
/// the middle of company names.
pub fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse all runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("TERRITORY MANAGER"));
        assert!(is_all_caps("ACME & CO."));
        assert!(!is_all_caps("Territory Manager"));
        assert!(!is_all_caps("12345"));
        assert!(!is_all_caps(""));
    }

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case_words("TERRITORY MANAGER"), "Territory Manager");
        assert_eq!(title_case_words("SOUTHERN GLAZER'S"), "Southern Glazer's");
        assert_eq!(title_case_words("NEW YORK"), "New York");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a   b\t c "), "a b c");
    }
}
