//! Candidate-location extraction from the top of the document.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::{format_location, normalize_for_search};
use crate::schema::{EvidenceItem, SourceKind, SourceLine};
use crate::segmenter::{extract_location_from_line, is_header_line};
use crate::vocab::Vocabulary;

lazy_static! {
    /// Simple whole-line "City, State" shape, e.g. "New York, New York".
    static ref LOCATION_RE: Regex = Regex::new(r"^[A-Za-z .'-]+,\s*[A-Za-z]{2,}$").unwrap();
}

/// Result of the location search.
#[derive(Debug, Clone, Default)]
pub struct LocationHit {
    pub location: Option<String>,
    pub evidence: Vec<EvidenceItem>,
}

/// Scan the first fifteen lines for a location.
///
/// A line qualifies if its whole normalized form matches "City, State" or
/// if the comma-scan extractor finds a location inside it. The stored value
/// and the evidence text are both comma-formatted; this is the one field
/// whose evidence is the formatted match rather than the raw line.
pub fn extract_location(
    lines: &[SourceLine],
    source: SourceKind,
    vocab: &Vocabulary,
) -> LocationHit {
    for line in lines.iter().take(15) {
        let t = normalize_for_search(&line.text);
        if t.len() > 200 || is_header_line(&t, vocab) {
            continue;
        }

        let extracted = extract_location_from_line(&t, vocab);
        let matched = if let Some(loc) = extracted {
            Some(loc)
        } else if LOCATION_RE.is_match(&t) {
            Some(t.clone())
        } else {
            None
        };

        if let Some(matched) = matched {
            let formatted = format_location(&matched);
            return LocationHit {
                location: Some(formatted.clone()),
                evidence: vec![EvidenceItem::exact(source, line.locator.as_str(), &formatted)],
            };
        }
    }

    LocationHit::default()
}
