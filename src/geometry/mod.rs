//! Geometric word-boundary reconstruction for PDF character streams.
//!
//! PDF extractors deliver positioned characters, not words. This module
//! rebuilds words from character geometry (gap thresholds relative to font
//! size) instead of linguistic guessing, then groups words back into lines
//! for the line-oriented parsing pipeline. Quality signals decide whether a
//! dictionary-based repair pass is warranted afterwards.

mod quality;
mod tuning;

pub use quality::{compute_extraction_quality, repair_lines, should_repair_word, ExtractionQuality};
pub use tuning::{score_extracted_text, select_best_extraction, ExtractionCandidate, DEFAULT_X_TOLERANCES};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fraction of the font size a horizontal gap must exceed to count as a
/// space between words.
pub const SPACE_GAP_RATIO: f64 = 0.35;

/// Vertical distance in PDF units under which characters share a line.
pub const LINE_Y_TOLERANCE: f64 = 3.0;

/// A single character with its geometric properties. `y0` is the top edge
/// (PDF extractors usually report "top"), `y1` the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfChar {
    pub page: u32,
    pub ch: char,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub fontname: String,
    pub size: f64,
}

impl PdfChar {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// A word reconstructed from characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfWord {
    pub text: String,
    pub page: u32,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl PdfWord {
    /// Locator string for evidence tracking.
    pub fn locator(&self) -> String {
        format!("pdf:page:{}:word:{:.1}_{:.1}", self.page, self.x0, self.y0)
    }
}

/// A line of reconstructed words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfLine {
    pub page: u32,
    pub y_position: f64,
    pub words: Vec<PdfWord>,
}

impl PdfLine {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Locator string for evidence tracking.
    pub fn locator(&self) -> String {
        format!("pdf:page:{}:line:{:.1}", self.page, self.y_position)
    }
}

/// Reconstruct words from positioned characters.
///
/// Characters are grouped per page, sorted top-to-bottom then left-to-right,
/// clustered into lines by y-position, and split into words wherever the
/// horizontal gap exceeds [`SPACE_GAP_RATIO`] of the font size or the font
/// changes. Whitespace characters are dropped; geometry alone decides the
/// boundaries.
pub fn reconstruct_words(characters: &[PdfChar]) -> Vec<PdfWord> {
    if characters.is_empty() {
        return Vec::new();
    }

    let mut by_page: BTreeMap<u32, Vec<&PdfChar>> = BTreeMap::new();
    for c in characters {
        if c.ch.is_whitespace() {
            continue;
        }
        by_page.entry(c.page).or_default().push(c);
    }

    let mut words = Vec::new();

    for page_chars in by_page.values_mut() {
        page_chars.sort_by(|a, b| {
            let ka = ((a.y0 / 2.0).round(), a.x0);
            let kb = ((b.y0 / 2.0).round(), b.x0);
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });

        for line_chars in cluster_into_lines(page_chars) {
            words.extend(segment_line_into_words(&line_chars));
        }
    }

    words
}

/// Group sorted characters into lines by y-position clustering against the
/// line's starting y.
fn cluster_into_lines<'a>(chars: &[&'a PdfChar]) -> Vec<Vec<&'a PdfChar>> {
    let mut lines: Vec<Vec<&PdfChar>> = Vec::new();
    let mut current: Vec<&PdfChar> = Vec::new();
    let mut current_y = 0.0;

    for &c in chars {
        if current.is_empty() {
            current_y = c.y0;
            current.push(c);
        } else if (c.y0 - current_y).abs() < LINE_Y_TOLERANCE {
            current.push(c);
        } else {
            lines.push(std::mem::take(&mut current));
            current_y = c.y0;
            current.push(c);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Split a line of characters into words at geometric boundaries: a gap
/// wider than a space, a font change, or a size jump over one point.
fn segment_line_into_words(line_chars: &[&PdfChar]) -> Vec<PdfWord> {
    if line_chars.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&PdfChar> = line_chars.to_vec();
    sorted.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));

    let mut words = Vec::new();
    let mut current: Vec<&PdfChar> = vec![sorted[0]];

    for pair in sorted.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);

        let gap = curr.x0 - prev.x1;
        let is_space_gap = gap > curr.size * SPACE_GAP_RATIO;
        let font_changed = curr.fontname != prev.fontname;
        let size_changed = (curr.size - prev.size).abs() > 1.0;

        if is_space_gap || font_changed || size_changed {
            words.push(build_word(&current));
            current = vec![curr];
        } else {
            current.push(curr);
        }
    }

    words.push(build_word(&current));
    words
}

fn build_word(chars: &[&PdfChar]) -> PdfWord {
    let text: String = chars.iter().map(|c| c.ch).collect();
    PdfWord {
        text,
        page: chars[0].page,
        x0: chars.iter().map(|c| c.x0).fold(f64::INFINITY, f64::min),
        x1: chars.iter().map(|c| c.x1).fold(f64::NEG_INFINITY, f64::max),
        y0: chars.iter().map(|c| c.y0).fold(f64::INFINITY, f64::min),
        y1: chars.iter().map(|c| c.y1).fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Group words back into lines for the line-oriented parsing pipeline.
///
/// Words are keyed by page and y rounded to the nearest 2 units, then sorted
/// left to right within each line.
pub fn reconstruct_lines(words: &[PdfWord]) -> Vec<PdfLine> {
    if words.is_empty() {
        return Vec::new();
    }

    let mut by_line: BTreeMap<(u32, i64), Vec<PdfWord>> = BTreeMap::new();
    for w in words {
        let key = (w.page, (w.y0 / 2.0).round() as i64 * 2);
        by_line.entry(key).or_default().push(w.clone());
    }

    by_line
        .into_iter()
        .map(|((page, y), mut line_words)| {
            line_words
                .sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
            PdfLine {
                page,
                y_position: y as f64,
                words: line_words,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(page: u32, c: char, x0: f64, y0: f64) -> PdfChar {
        PdfChar {
            page,
            ch: c,
            x0,
            y0,
            x1: x0 + 5.0,
            y1: y0 + 10.0,
            fontname: "Helvetica".into(),
            size: 10.0,
        }
    }

    fn chars_for(page: u32, text: &str, mut x: f64, y: f64, gap: f64) -> Vec<PdfChar> {
        let mut out = Vec::new();
        for c in text.chars() {
            out.push(ch(page, c, x, y));
            x += 5.0 + gap;
        }
        out
    }

    #[test]
    fn test_small_gaps_stay_one_word() {
        let chars = chars_for(1, "Hello", 0.0, 100.0, 1.0);
        let words = reconstruct_words(&chars);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Hello");
    }

    #[test]
    fn test_wide_gap_splits_words() {
        let mut chars = chars_for(1, "Hi", 0.0, 100.0, 1.0);
        chars.extend(chars_for(1, "there", 30.0, 100.0, 1.0));
        let words = reconstruct_words(&chars);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "Hi");
        assert_eq!(words[1].text, "there");
    }

    #[test]
    fn test_font_change_splits_words() {
        let mut chars = chars_for(1, "ab", 0.0, 100.0, 1.0);
        let mut bold = chars_for(1, "cd", 12.0, 100.0, 1.0);
        for c in &mut bold {
            c.fontname = "Helvetica-Bold".into();
        }
        chars.extend(bold);
        let words = reconstruct_words(&chars);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_lines_split_by_y_position() {
        let mut chars = chars_for(1, "top", 0.0, 100.0, 1.0);
        chars.extend(chars_for(1, "bottom", 0.0, 120.0, 1.0));
        let words = reconstruct_words(&chars);
        let lines = reconstruct_lines(&words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "top");
        assert_eq!(lines[1].text(), "bottom");
    }

    #[test]
    fn test_line_locator_format() {
        let line = PdfLine {
            page: 1,
            y_position: 100.0,
            words: Vec::new(),
        };
        assert_eq!(line.locator(), "pdf:page:1:line:100.0");
    }

    #[test]
    fn test_word_locator_format() {
        let word = PdfWord {
            text: "x".into(),
            page: 2,
            x0: 10.25,
            x1: 15.0,
            y0: 50.0,
            y1: 60.0,
        };
        assert_eq!(word.locator(), "pdf:page:2:word:10.2_50.0");
    }

    #[test]
    fn test_whitespace_chars_dropped() {
        let mut chars = chars_for(1, "a b", 0.0, 100.0, 1.0);
        assert_eq!(chars[1].ch, ' ');
        chars[2].x0 = 30.0;
        chars[2].x1 = 35.0;
        let words = reconstruct_words(&chars);
        assert_eq!(words.len(), 2);
    }
}
