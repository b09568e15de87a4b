//! URL extraction: LinkedIn, GitHub, and generic links.

use lazy_static::lazy_static;
use regex::Regex;

use crate::schema::{EvidenceItem, SourceKind, SourceLine};

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"(?i)\bhttps?://[^\s)>\]]+\b").unwrap();
    static ref LINKEDIN_RE: Regex =
        Regex::new(r"(?i)\b(?:https?://)?(?:www\.)?linkedin\.com/[^\s)>\]]+\b").unwrap();
    static ref GITHUB_RE: Regex =
        Regex::new(r"(?i)\b(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_.-]+\b").unwrap();
}

/// Result of the link scan.
#[derive(Debug, Clone, Default)]
pub struct LinksHit {
    pub links: Vec<String>,
    pub evidence: Vec<EvidenceItem>,
}

/// Scan every line for LinkedIn, GitHub, and generic URLs.
///
/// Matching runs over the raw line text (search normalization would insert
/// spaces around the slashes and break every URL). Links are deduplicated
/// by exact string, first occurrence wins, and each new link records the
/// original line as evidence.
pub fn extract_links(lines: &[SourceLine], source: SourceKind) -> LinksHit {
    let mut hit = LinksHit::default();

    for line in lines {
        for rx in [&*LINKEDIN_RE, &*GITHUB_RE, &*URL_RE] {
            for m in rx.find_iter(line.text.trim()) {
                let url = m.as_str().to_string();
                if !hit.links.contains(&url) {
                    hit.links.push(url);
                    hit.evidence.push(EvidenceItem::exact(
                        source,
                        line.locator.as_str(),
                        &line.text,
                    ));
                }
            }
        }
    }

    hit
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
    fn test_linkedin_without_protocol() {
        let input = lines(&["linkedin.com/in/johndoe"]);
        let hit = extract_links(&input, SourceKind::Text);
        assert_eq!(hit.links, vec!["linkedin.com/in/johndoe"]);
    }

    #[test]
    fn test_generic_url_and_dedup() {
        let input = lines(&[
            "Portfolio: https://johndoe.dev",
            "See https://johndoe.dev for samples",
        ]);
        let hit = extract_links(&input, SourceKind::Text);
        assert_eq!(hit.links, vec!["https://johndoe.dev"]);
        assert_eq!(hit.evidence.len(), 1);
        assert_eq!(hit.evidence[0].text, "Portfolio: https://johndoe.dev");
    }

    #[test]
    fn test_linkedin_listed_before_generic() {
        let input = lines(&["https://example.com and linkedin.com/in/johndoe"]);
        let hit = extract_links(&input, SourceKind::Text);
        assert_eq!(
            hit.links,
            vec!["linkedin.com/in/johndoe", "https://example.com"]
        );
    }

    #[test]
    fn test_no_links() {
        let input = lines(&["JOHN DOE", "Territory Manager"]);
        assert!(extract_links(&input, SourceKind::Text).links.is_empty());
    }
}
