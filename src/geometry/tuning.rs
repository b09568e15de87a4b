//! Extraction-parameter tuning by scoring candidate texts.
//!
//! Word-level PDF extraction has an x-tolerance knob: too tight and words
//! fragment, too loose and they glue. The extractor runs the same page at
//! several tolerances and keeps the candidate whose text scores best.

use lazy_static::lazy_static;
use regex::Regex;

/// Tolerances worth trying, tightest first.
pub const DEFAULT_X_TOLERANCES: [f64; 4] = [1.5, 2.0, 2.5, 3.0];

lazy_static! {
    static ref ALPHA_TOKEN_RE: Regex = Regex::new(r"[A-Za-z]+").unwrap();
}

/// One extraction attempt at a given x-tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionCandidate {
    pub x_tolerance: f64,
    pub text: String,
}

/// Score extracted text for gluing and fragmentation artifacts. Lower is
/// better.
///
/// Alphabetic tokens of 18+ chars indicate glued words; single-letter tokens
/// beyond the ten or so legitimate ones (a, I, Q) indicate fragmentation.
/// Text with no alphabetic tokens at all scores effectively infinite.
pub fn score_extracted_text(s: &str) -> f64 {
    let tokens: Vec<&str> = ALPHA_TOKEN_RE.find_iter(s).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        return 1e9;
    }

    let long_glued = tokens.iter().filter(|t| t.len() >= 18).count();
    let one_letter = tokens.iter().filter(|t| t.len() == 1).count();
    let excessive_singles = one_letter.saturating_sub(10);

    (long_glued * 10 + excessive_singles * 3) as f64
}

/// Pick the candidate whose text has the fewest artifacts. Ties go to the
/// earliest (tightest) tolerance.
pub fn select_best_extraction(candidates: &[ExtractionCandidate]) -> Option<&ExtractionCandidate> {
    candidates.iter().min_by(|a, b| {
        score_extracted_text(&a.text)
            .partial_cmp(&score_extracted_text(&b.text))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_scores_zero() {
        assert_eq!(score_extracted_text("Grew the territory by 40%"), 0.0);
    }

    #[test]
    fn test_glued_tokens_penalized() {
        let glued = "Grewtheterritorybyfortypercent in five months";
        assert!(score_extracted_text(glued) >= 10.0);
    }

    #[test]
    fn test_fragmentation_penalized() {
        let fragmented = "J O H N D O E E X P E R I E N C E M A N A G E R";
        assert!(score_extracted_text(fragmented) > 0.0);
    }

    #[test]
    fn test_empty_text_is_worst() {
        assert_eq!(score_extracted_text(""), 1e9);
        assert_eq!(score_extracted_text("1234 !!"), 1e9);
    }

    #[test]
    fn test_select_best_prefers_clean_candidate() {
        let candidates = vec![
            ExtractionCandidate {
                x_tolerance: 1.5,
                text: "G r e w t h e t e r r i t o r y a n d m o r e w o r d s".into(),
            },
            ExtractionCandidate {
                x_tolerance: 2.5,
                text: "Grew the territory".into(),
            },
        ];
        let best = select_best_extraction(&candidates).unwrap();
        assert_eq!(best.x_tolerance, 2.5);
    }
}
