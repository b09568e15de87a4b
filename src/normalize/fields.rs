//! Whitelist-only repair for structured fields.
//!
//! Job titles, company names, and locations must never be corrupted by an
//! over-eager splitter, so field normalization fixes only split-inside-a-word
//! patterns from an explicit whitelist.

/// Safe normalization for structured fields (job_title, company, location).
///
/// Handles:
/// - "communicati on" -> "communication"
/// - "communicati ons" -> "communications"
/// - "communic a tions" -> "communications"
///
/// Does NOT apply joiner splitting, which could mangle names and places.
pub fn normalize_field_text(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();

    // 2-token merge: communication(s) family only
    let mut merged: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() {
            let (a, b) = (tokens[i], tokens[i + 1]);
            if is_alpha(a) && is_alpha(b) {
                let combo = format!("{}{}", a, b).to_lowercase();
                if combo == "communication" || combo == "communications" {
                    merged.push(format!("{}{}", a, b));
                    i += 2;
                    continue;
                }
            }
        }
        merged.push(tokens[i].to_string());
        i += 1;
    }

    // 3-token merge: "communic a tions" -> "communications"
    let mut out: Vec<String> = Vec::with_capacity(merged.len());
    let mut i = 0;
    while i < merged.len() {
        if i + 2 < merged.len() {
            let (a, b, c) = (&merged[i], &merged[i + 1], &merged[i + 2]);
            if is_alpha(a) && is_alpha(b) && is_alpha(c) && b.chars().count() == 1 {
                let combo = format!("{}{}{}", a, b, c).to_lowercase();
                if combo == "communications" {
                    out.push(format!("{}{}{}", a, b, c));
                    i += 3;
                    continue;
                }
            }
        }
        out.push(merged[i].clone());
        i += 1;
    }

    out.join(" ")
}

fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphabetic())
}
