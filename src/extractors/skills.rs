//! Skills-section extraction.
//!
//! Three layouts are supported: inline ("Skills: Python, SQL"), bulleted
//! lists under a skills header, and subheading lines ("Languages: Python,
//! Go"). A skills header opens section mode; the next major section header
//! closes it.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::schema::{EvidenceItem, SourceKind, SourceLine};
use crate::segmenter::is_header_line;
use crate::vocab::Vocabulary;

lazy_static! {
    static ref SKILLS_HEADER_RE: Regex = Regex::new(
        r"(?i)^\s*(technical\s+|core\s+|additional\s+)?(skills|competencies|proficiencies|expertise|strengths)\s*:?"
    ).unwrap();

    /// Strips the header prefix off an inline skills line.
    static ref SKILLS_PREFIX_STRIP_RE: Regex = Regex::new(
        r"(?i)^\s*(technical\s+|core\s+|additional\s+)?(skills|competencies|proficiencies)\s*:?\s*"
    ).unwrap();

    static ref SKILL_SPLIT_RE: Regex = Regex::new(r"[,;•]").unwrap();
    static ref BULLET_SKILL_RE: Regex = Regex::new(r"^[\s•\-*>]+[A-Za-z]").unwrap();
    static ref BULLET_STRIP_RE: Regex = Regex::new(r"^[\s•\-*>]+").unwrap();

    /// A short capitalized line like "Python" or "Power BI" counts as a
    /// skill on its own; longer runs are prose.
    static ref BARE_SKILL_RE: Regex = Regex::new(r"^[A-Z][A-Za-z0-9\s\+#\-\./\(\)]*$").unwrap();

    static ref SUBHEADING_PREFIX_RE: Regex = Regex::new(r"^[A-Za-z]+\s*:").unwrap();
    static ref SUBHEADING_RE: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9\s\+#\-\./\(\),]*:\s*(.*)").unwrap();

    /// Candidate for a section header that closes the skills block.
    static ref CAPS_LINE_RE: Regex = Regex::new(r"^[A-Z][A-Za-z\s]*$").unwrap();
}

/// Result of the skills scan.
#[derive(Debug, Clone, Default)]
pub struct SkillsHit {
    pub skills: Vec<String>,
    pub evidence: Vec<EvidenceItem>,
}

/// Split an inline skills line ("Skills: Python, JavaScript; SQL") into
/// individual skills, dropping the header prefix and sub-2-char noise.
fn extract_inline_skills(text: &str) -> Vec<String> {
    let cleaned = SKILLS_PREFIX_STRIP_RE.replace(text, "").trim().to_string();
    if cleaned.is_empty() {
        return Vec::new();
    }

    SKILL_SPLIT_RE
        .split(&cleaned)
        .map(str::trim)
        .filter(|s| s.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Is this line a skill bullet? Explicit bullet markers qualify, as do
/// short capitalized lines ("Python", "Power BI") that are not subheadings.
fn is_skill_bullet(text: &str) -> bool {
    let t = text.trim();

    if BULLET_SKILL_RE.is_match(t) {
        return true;
    }

    if BARE_SKILL_RE.is_match(t) {
        if t.split_whitespace().count() > 3 {
            return false;
        }
        if SUBHEADING_PREFIX_RE.is_match(t) {
            return false;
        }
        return true;
    }

    false
}

/// Scan all lines for skills.
///
/// Deduplication is case-sensitive and first-seen-wins; evidence is added
/// once per line that contributed at least one new skill.
pub fn extract_skills(lines: &[SourceLine], source: SourceKind, vocab: &Vocabulary) -> SkillsHit {
    let mut hit = SkillsHit::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut section_active = false;

    for line in lines {
        let raw = line.text.trim();

        if SKILLS_HEADER_RE.is_match(&line.text) {
            section_active = true;
            let inline = extract_inline_skills(&line.text);
            if !inline.is_empty() {
                for skill in inline {
                    if seen.insert(skill.clone()) {
                        hit.skills.push(skill);
                    }
                }
                hit.evidence
                    .push(EvidenceItem::exact(source, line.locator.as_str(), &line.text));
            }
            continue;
        }

        if !section_active {
            continue;
        }
        if raw.is_empty() {
            continue;
        }

        // Another major section header closes the skills block.
        if CAPS_LINE_RE.is_match(raw)
            && raw.split_whitespace().count() <= 3
            && is_header_line(&line.text, vocab)
        {
            section_active = false;
            continue;
        }

        if is_skill_bullet(&line.text) {
            let skill = BULLET_STRIP_RE.replace(raw, "").trim().to_string();
            // "SQL" and "AWS" are valid skills, so no header check here.
            if skill.chars().count() >= 2 && seen.insert(skill.clone()) {
                hit.skills.push(skill);
                hit.evidence
                    .push(EvidenceItem::exact(source, line.locator.as_str(), &line.text));
            }
        } else if let Some(caps) = SUBHEADING_RE.captures(raw) {
            let remainder = caps.get(1).map_or("", |m| m.as_str()).trim();
            for part in SKILL_SPLIT_RE.split(remainder) {
                let skill = part.trim();
                if skill.chars().count() >= 2 && seen.insert(skill.to_string()) {
                    hit.skills.push(skill.to_string());
                }
            }
            if !remainder.is_empty() {
                hit.evidence
                    .push(EvidenceItem::exact(source, line.locator.as_str(), &line.text));
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
    fn test_inline_skills() {
        let vocab = Vocabulary::default();
        let input = lines(&["Skills: Python, JavaScript; SQL"]);
        let hit = extract_skills(&input, SourceKind::Text, &vocab);
        assert_eq!(hit.skills, vec!["Python", "JavaScript", "SQL"]);
        assert_eq!(hit.evidence.len(), 1);
    }

    #[test]
    fn test_bullet_skills_until_next_section() {
        let vocab = Vocabulary::default();
        let input = lines(&[
            "TECHNICAL SKILLS",
            "• Python",
            "• Docker",
            "EXPERIENCE",
            "• Grew the territory",
        ]);
        let hit = extract_skills(&input, SourceKind::Text, &vocab);
        assert_eq!(hit.skills, vec!["Python", "Docker"]);
    }

    #[test]
    fn test_subheading_skills() {
        let vocab = Vocabulary::default();
        let input = lines(&[
            "Skills",
            "Languages: Python, Go",
            "Frameworks: Actix, Axum",
        ]);
        let hit = extract_skills(&input, SourceKind::Text, &vocab);
        assert_eq!(hit.skills, vec!["Python", "Go", "Actix", "Axum"]);
    }

    #[test]
    fn test_skills_deduplicated_first_seen() {
        let vocab = Vocabulary::default();
        let input = lines(&["Skills: Python, SQL, Python"]);
        let hit = extract_skills(&input, SourceKind::Text, &vocab);
        assert_eq!(hit.skills, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_bare_capitalized_skill_lines() {
        assert!(is_skill_bullet("Python"));
        assert!(is_skill_bullet("Power BI"));
        assert!(!is_skill_bullet("Languages:"));
        assert!(!is_skill_bullet("Led a cross functional team effort"));
    }

    #[test]
    fn test_no_skills_section() {
        let vocab = Vocabulary::default();
        let input = lines(&["JOHN DOE", "EXPERIENCE", "• Grew the territory"]);
        assert!(extract_skills(&input, SourceKind::Text, &vocab)
            .skills
            .is_empty());
    }
}
