//! Quality signals for geometric extraction and the dictionary repair pass.

use serde::Serialize;

use crate::normalize::segment_concatenated_words;
use crate::vocab::Vocabulary;

use super::{PdfLine, PdfWord};

/// Quality score below which repair always runs.
pub const REPAIR_QUALITY_THRESHOLD: f64 = 0.6;

/// Quality metrics for a set of reconstructed words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionQuality {
    pub total_words: usize,
    /// Fraction of alphabetic words found in the dictionary.
    pub dict_coverage: f64,
    pub avg_length: f64,
    /// Count of words longer than 20 characters.
    pub long_words: usize,
    pub no_vowel_ratio: f64,
    pub suspicious_ratio: f64,
    pub suspicious_count: usize,
    pub quality_score: f64,
    pub needs_repair: bool,
}

impl ExtractionQuality {
    fn clean() -> Self {
        ExtractionQuality {
            total_words: 0,
            dict_coverage: 0.0,
            avg_length: 0.0,
            long_words: 0,
            no_vowel_ratio: 0.0,
            suspicious_ratio: 0.0,
            suspicious_count: 0,
            quality_score: 1.0,
            needs_repair: false,
        }
    }
}

fn vowel_count(text: &str) -> usize {
    text.chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count()
}

fn is_all_upper(text: &str) -> bool {
    let mut saw_alpha = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_alphabetic() {
            saw_alpha = true;
        }
    }
    saw_alpha
}

/// Compute quality signals over reconstructed words to decide whether the
/// dictionary repair pass is needed.
///
/// Signals: dictionary coverage, overlong words (20+ chars), vowel-free
/// words, and all-caps runs without separators. Repair is recommended when
/// more than 15% of words are suspicious, coverage drops below 60%, or more
/// than 10% of words have no vowels.
pub fn compute_extraction_quality(words: &[PdfWord], vocab: &Vocabulary) -> ExtractionQuality {
    if words.is_empty() {
        return ExtractionQuality::clean();
    }

    let mut dict_hits = 0usize;
    let mut no_vowel = 0usize;
    let mut long_words = 0usize;
    let mut suspicious = 0usize;
    let mut total_length = 0usize;

    for word in words {
        let text = word.text.trim();
        if text.is_empty() || !text.chars().any(|c| c.is_alphabetic()) {
            continue;
        }

        total_length += text.len();
        let mut is_suspicious = false;

        if vocab.is_common(&text.to_lowercase()) {
            dict_hits += 1;
        }

        if text.len() > 20 {
            long_words += 1;
            is_suspicious = true;
        }

        if text.len() > 3 && vowel_count(text) == 0 {
            no_vowel += 1;
            is_suspicious = true;
        }

        if is_all_upper(text) && text.len() > 5 {
            is_suspicious = true;
        }

        if is_suspicious {
            suspicious += 1;
        }
    }

    let alphabetic = words
        .iter()
        .filter(|w| w.text.chars().any(|c| c.is_alphabetic()))
        .count()
        .max(1);

    let dict_coverage = dict_hits as f64 / alphabetic as f64;
    let no_vowel_ratio = no_vowel as f64 / alphabetic as f64;
    let suspicious_ratio = suspicious as f64 / alphabetic as f64;

    let quality_score =
        dict_coverage * 0.5 + (1.0 - no_vowel_ratio) * 0.2 + (1.0 - suspicious_ratio) * 0.3;

    let needs_repair = suspicious_ratio > 0.15 || dict_coverage < 0.6 || no_vowel_ratio > 0.1;

    ExtractionQuality {
        total_words: words.len(),
        dict_coverage,
        avg_length: total_length as f64 / alphabetic as f64,
        long_words,
        no_vowel_ratio,
        suspicious_ratio,
        suspicious_count: suspicious,
        quality_score,
        needs_repair,
    }
}

/// Whether a single word is suspicious enough to segment.
///
/// Overlong, vowel-free, glued all-caps, or letters mixed with digits
/// without any separator.
pub fn should_repair_word(text: &str) -> bool {
    if text.len() < 5 {
        return false;
    }

    if text.len() > 15 {
        return true;
    }

    if text.len() > 3 && vowel_count(text) == 0 {
        return true;
    }

    if is_all_upper(text) && text.len() > 5 {
        return true;
    }

    let has_letters = text.chars().any(|c| c.is_alphabetic());
    let has_digits = text.chars().any(|c| c.is_ascii_digit());
    if has_letters && has_digits && !text.chars().any(|c| matches!(c, '.' | '-' | '/' | ' ')) {
        return true;
    }

    false
}

/// Apply dictionary segmentation to suspicious words in each line.
///
/// Repaired words keep the original word's coordinates so evidence locators
/// still point at the geometry they came from.
pub fn repair_lines(lines: &[PdfLine], vocab: &Vocabulary) -> Vec<PdfLine> {
    lines
        .iter()
        .map(|line| {
            let mut repaired: Vec<PdfWord> = Vec::with_capacity(line.words.len());

            for word in &line.words {
                if !should_repair_word(&word.text) {
                    repaired.push(word.clone());
                    continue;
                }

                let segmented = segment_concatenated_words(&word.text, vocab);
                if segmented.contains(' ') {
                    for part in segmented.split_whitespace() {
                        repaired.push(PdfWord {
                            text: part.to_string(),
                            ..word.clone()
                        });
                    }
                } else {
                    repaired.push(word.clone());
                }
            }

            PdfLine {
                page: line.page,
                y_position: line.y_position,
                words: repaired,
            }
        })
        .collect()
}
