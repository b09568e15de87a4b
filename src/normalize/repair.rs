//! Corruption classification and best-of-N repair for achievement text.
//!
//! Different achievements arrive with different corruption patterns, so a
//! single fixed pipeline either under- or over-repairs. Instead, the text is
//! classified into a [`CorruptionClass`], a per-class strategy table selects
//! candidate repair pipelines, every candidate runs, and the highest-scoring
//! result wins.

use lazy_static::lazy_static;
use regex::Regex;

use crate::vocab::Vocabulary;

use super::collapse_whitespace;
use super::segment::segment_concatenated_words;

lazy_static! {
    static ref CAMEL_RE: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
    static ref GLUED_CAMEL_RE: Regex = Regex::new(r"[a-z]{2,}[A-Z]").unwrap();
    /// Runs of 1-2 letter fragments, e.g. "ne wc us to me rs".
    static ref FRAGMENT_RUN_RE: Regex =
        Regex::new(r"[a-zA-Z]{1,2}(?:\s+[a-zA-Z]{1,2}){2,}").unwrap();
    static ref DIGIT_FRAGMENT_RE: Regex =
        Regex::new(r"(\d+)\s+([a-zA-Z])\s+([a-zA-Z]{2,})").unwrap();
    /// Unambiguous long words split when glued to surrounding lowercase text.
    static ref GLUED_LONG_WORD_RES: Vec<Regex> = ["customers", "business", "achieved", "acquired"]
        .iter()
        .map(|w| Regex::new(&format!(r"(?i)([a-z]+)({})([a-z]+)", w)).unwrap())
        .collect();
    static ref GLUED_MEDIUM_WORD_RES: Vec<Regex> =
        ["months", "leading", "through", "years", "after", "just", "growth"]
            .iter()
            .map(|w| Regex::new(&format!(r"(?i)([a-z]+)({})([a-z]+)", w)).unwrap())
            .collect();
    static ref GLUED_IN_RES: Vec<Regex> = ["plan", "months", "month", "year", "years"]
        .iter()
        .map(|w| Regex::new(&format!(r"(?i)({})(in)([a-z])", w)).unwrap())
        .collect();
    static ref A_NEW_RE: Regex = Regex::new(r"(?i)(a)(new)([a-z]{2,})").unwrap();
    static ref GLUED_NEW_RE: Regex = Regex::new(r"(?i)([a-z]{2,})(new)([a-z]{2,})").unwrap();
    static ref NEW_BUSINESS_RE: Regex = Regex::new(r"(?i)(new)(business)").unwrap();
    static ref PLAN_TO_RE: Regex = Regex::new(r"(?i)(plan)(to)([a-z])").unwrap();
    static ref TO_PLAN_RE: Regex = Regex::new(r"(?i)([^a-z])(to)(plan)").unwrap();
    static ref PERCENT_TO_RE: Regex = Regex::new(r"(?i)(%)(to)").unwrap();
}

/// Classification of how an achievement line is corrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionClass {
    /// High space-to-character ratio, e.g. "ne wc us to me rs".
    CharacterFragmentation,
    /// Long words with few spaces, e.g. "Transferredto San Diegoin".
    CompletelyGlued,
    /// Fragments and glued words together, e.g. "pl an an dg re en".
    MixedCorruption,
    /// Minimal issues.
    MostlyOk,
}

impl CorruptionClass {
    /// Classify a text by its spacing statistics and gluing patterns.
    pub fn detect(text: &str) -> Self {
        if text.len() < 5 {
            return CorruptionClass::MostlyOk;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return CorruptionClass::MostlyOk;
        }

        let space_ratio =
            text.chars().filter(|&c| c == ' ').count() as f64 / text.len() as f64;
        let glued_camel = GLUED_CAMEL_RE.find_iter(text).count();
        let long_word_count = words
            .iter()
            .filter(|w| w.len() > 10 && !w.chars().skip(1).any(|c| c.is_uppercase()))
            .count();

        if space_ratio > 0.2 {
            let avg_len =
                words.iter().map(|w| w.len()).sum::<usize>() as f64 / words.len() as f64;
            if avg_len < 3.5 {
                return CorruptionClass::CharacterFragmentation;
            }
        }

        if (words.len() < 5 && text.len() > 25) || glued_camel > 0 {
            return CorruptionClass::CompletelyGlued;
        }

        if text.contains("  ") && words.iter().any(|w| w.len() < 2) {
            return CorruptionClass::MixedCorruption;
        }

        if long_word_count > 0 && words.len() < 6 {
            return CorruptionClass::CompletelyGlued;
        }

        CorruptionClass::MostlyOk
    }
}

/// Reassemble words that PDFs extracted as runs of 1-2 character fragments.
///
/// "mon ths" -> "months", "ne wc us to me rs" -> "newcustomers",
/// "4 mont hs" -> "4months". The reassembled (possibly still glued) words
/// are handled by segmentation afterwards.
pub fn collapse_irregular_spacing(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let t = FRAGMENT_RUN_RE.replace_all(text, |caps: &regex::Captures| {
        caps[0].split_whitespace().collect::<String>()
    });
    let t = DIGIT_FRAGMENT_RE.replace_all(&t, "$1$2$3");
    collapse_whitespace(&t)
}

/// Split common glued lowercase word patterns in PDF bullet text.
///
/// Multi-pass, most-unambiguous words first: long words (customers,
/// business), then medium words, then targeted "in"/"new"/"to" boundaries.
/// "monthsinanewrole" -> "months in a new role" after all passes.
pub fn fix_glued_lowercase_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut t = text.to_string();

    for re in GLUED_LONG_WORD_RES.iter() {
        t = re.replace_all(&t, "$1 $2 $3").into_owned();
    }
    for re in GLUED_MEDIUM_WORD_RES.iter() {
        t = re.replace_all(&t, "$1 $2 $3").into_owned();
    }
    for re in GLUED_IN_RES.iter() {
        t = re.replace_all(&t, "$1 $2 $3").into_owned();
    }

    t = A_NEW_RE.replace_all(&t, "$1 $2 $3").into_owned();
    t = GLUED_NEW_RE.replace_all(&t, "$1 $2 $3").into_owned();
    t = NEW_BUSINESS_RE.replace_all(&t, "$1 $2").into_owned();

    t = PLAN_TO_RE.replace_all(&t, "$1 $2 $3").into_owned();
    t = TO_PLAN_RE.replace_all(&t, "$1$2 $3").into_owned();
    t = PERCENT_TO_RE.replace_all(&t, "$1 $2").into_owned();

    collapse_whitespace(&t)
}

/// Score a repaired text against its original. Higher is better.
///
/// Penalizes single-letter words and over-segmentation, rewards reasonable
/// word lengths, recognized achievement verbs, and minimal distortion of the
/// original length.
pub fn score_repair(original: &str, normalized: &str, vocab: &Vocabulary) -> f64 {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let mut score = 100.0;

    let single_letters = words
        .iter()
        .filter(|w| w.len() == 1 && w.chars().all(|c| c.is_alphabetic()))
        .count();
    score -= single_letters as f64 * 15.0;

    let short_words = words
        .iter()
        .filter(|w| {
            w.len() <= 2
                && !matches!(w.to_lowercase().as_str(), "a" | "to" | "in" | "at" | "by" | "of")
        })
        .count();
    score -= short_words as f64 * 3.0;

    let avg_len = words.iter().map(|w| w.len()).sum::<usize>() as f64 / words.len() as f64;
    if (5.0..=10.0).contains(&avg_len) {
        score += 15.0;
    } else if (3.0..=12.0).contains(&avg_len) {
        score += 5.0;
    } else {
        score -= 10.0;
    }

    let space_ratio =
        normalized.chars().filter(|&c| c == ' ').count() as f64 / normalized.len().max(1) as f64;
    if space_ratio > 0.25 {
        score -= 20.0;
    }

    let found = words
        .iter()
        .filter(|w| vocab.is_achievement_word(&w.to_lowercase()))
        .count();
    score += found as f64 * 8.0;

    if (normalized.len() as f64) < original.len() as f64 * 0.7 {
        score -= 25.0;
    }
    if (normalized.len() as f64 - original.len() as f64).abs() < original.len() as f64 * 0.1 {
        score += 10.0;
    }

    score.max(0.0)
}

// ---------------------------------------------------------------------------
// Repair strategies
// ---------------------------------------------------------------------------

type RepairFn = fn(&str, &Vocabulary) -> String;

fn split_camel(text: &str) -> String {
    collapse_whitespace(&CAMEL_RE.replace_all(text, "$1 $2"))
}

/// collapse -> fix glued -> segment.
fn full_pipeline(text: &str, vocab: &Vocabulary) -> String {
    let t = split_camel(text);
    let t = collapse_irregular_spacing(&t);
    let t = fix_glued_lowercase_text(&t);
    segment_concatenated_words(&t, vocab)
}

/// Only fix obvious patterns, no dictionary segmentation.
fn conservative_fix(text: &str, _vocab: &Vocabulary) -> String {
    let t = split_camel(text);
    let t = collapse_irregular_spacing(&t);
    fix_glued_lowercase_text(&t)
}

/// Segment twice with a collapse in between, for very glued text.
fn aggressive_segment(text: &str, vocab: &Vocabulary) -> String {
    let t = split_camel(text);
    let t = segment_concatenated_words(&t, vocab);
    let t = collapse_irregular_spacing(&t);
    segment_concatenated_words(&t, vocab)
}

/// Pure word segmentation for heavily glued text like "Grewthe Oregonterritorytoover".
fn direct_segmentation(text: &str, vocab: &Vocabulary) -> String {
    let t = CAMEL_RE.replace_all(text, "$1 $2");
    let t = segment_concatenated_words(&t, vocab);
    collapse_irregular_spacing(&t)
}

/// Strategy table: which repair pipelines to try for each corruption class.
fn strategies_for(class: CorruptionClass) -> &'static [RepairFn] {
    match class {
        CorruptionClass::CharacterFragmentation => &[conservative_fix, full_pipeline],
        CorruptionClass::CompletelyGlued => {
            &[direct_segmentation, aggressive_segment, full_pipeline]
        }
        CorruptionClass::MixedCorruption => &[full_pipeline, aggressive_segment],
        CorruptionClass::MostlyOk => &[conservative_fix, full_pipeline],
    }
}

/// Repair an achievement line by classifying its corruption, running every
/// candidate pipeline for that class, and keeping the highest-scoring result.
pub fn repair_achievement(text: &str, vocab: &Vocabulary) -> String {
    let text = text.trim();
    if text.len() < 5 {
        return text.to_string();
    }

    let class = CorruptionClass::detect(text);

    let mut best: Option<(f64, String)> = None;
    for strategy in strategies_for(class) {
        let result = strategy(text, vocab);
        let score = score_repair(text, &result, vocab);
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, result));
        }
    }

    best.map_or_else(|| text.to_string(), |(_, result)| result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn test_detect_character_fragmentation() {
        assert_eq!(
            CorruptionClass::detect("ne wc us to me rs an d gr ow th"),
            CorruptionClass::CharacterFragmentation
        );
    }

    #[test]
    fn test_detect_completely_glued() {
        assert_eq!(
            CorruptionClass::detect("Transferredto SanDiegoin July"),
            CorruptionClass::CompletelyGlued
        );
    }

    #[test]
    fn test_detect_mostly_ok() {
        assert_eq!(
            CorruptionClass::detect("Grew the territory by 40% in 5 months"),
            CorruptionClass::MostlyOk
        );
    }

    #[test]
    fn test_collapse_irregular_spacing() {
        assert_eq!(collapse_irregular_spacing("ne wc us to me rs"), "newcustomers");
        assert_eq!(collapse_irregular_spacing("le ad in g"), "leading");
        assert_eq!(collapse_irregular_spacing("4 m onths"), "4months");
    }

    #[test]
    fn test_fix_glued_lowercase_text() {
        assert_eq!(fix_glued_lowercase_text("newcustomersin"), "new customers in");
        assert_eq!(
            fix_glued_lowercase_text("monthsinanewrole"),
            "months in a new role"
        );
    }

    #[test]
    fn test_score_prefers_clean_text() {
        let v = vocab();
        let original = "Grewtheterritory";
        let good = "Grew the territory";
        let bad = "G r e w t h e t e r r i t o r y";
        assert!(score_repair(original, good, &v) > score_repair(original, bad, &v));
    }

    #[test]
    fn test_repair_leaves_clean_text_alone() {
        let v = vocab();
        let text = "Exceeded quota by 20% across the region";
        assert_eq!(repair_achievement(text, &v), text);
    }

    #[test]
    fn test_repair_glued_achievement() {
        let v = vocab();
        let repaired = repair_achievement("Grewthe territory fast", &v);
        assert_eq!(repaired, "Grew the territory fast");
    }
}
