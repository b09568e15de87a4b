//! Dictionary-driven segmentation of glued words.
//!
//! PDFs lose inter-word spaces and produce tokens like
//! `Grewtheterritoryby40%in5months`. Segmentation is tiered by word length:
//! short words are left alone, medium words get a dictionary-only split, and
//! long words get a full segmentation with heuristic fallbacks. All dynamic
//! programming here is bottom-up over a table indexed by position, so there
//! is no recursion depth to worry about on pathological tokens.

use lazy_static::lazy_static;
use regex::Regex;

use crate::vocab::Vocabulary;

use super::is_all_caps;

/// Joiners accepted as standalone pieces during token de-gluing.
const JOINER_PIECES: &[&str] = &[
    "a", "an", "to", "in", "of", "for", "and", "the", "by", "on", "at", "or", "as", "is",
];

/// Joiners tried as glued suffixes (territoryby -> territory by).
const SUFFIX_JOINERS: &[&str] = &["by", "to", "in", "of", "at", "on"];

const COMMON3_PIECES: &[&str] = &["new", "all", "top", "one", "two", "six", "ten", "and", "ver"];

const SHORT_WORDS: &[&str] = &[
    "a", "an", "to", "in", "on", "at", "as", "is", "it", "be", "do", "go", "up", "no", "so",
    "or", "by", "he", "me", "we", "my",
];

const COMMON_PREFIXES: &[&str] = &[
    "un", "re", "pre", "dis", "mis", "over", "out", "in", "inter", "sub", "super",
];
const COMMON_SUFFIXES: &[&str] = &[
    "ed", "ing", "er", "ly", "tion", "ment", "ness", "able", "ful", "less", "ish",
];

lazy_static! {
    static ref DIGIT_LETTER_RE: Regex = Regex::new(r"(\d)([A-Za-z])").unwrap();
    static ref LETTER_DIGIT_RE: Regex = Regex::new(r"([A-Za-z])(\d)").unwrap();
    static ref CAMEL_RE: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
    static ref CONSONANT_CLUSTER_RE: Regex = Regex::new(r"[bcdfghjklmnpqrstvwxz]{5,}").unwrap();
}

fn count_vowels(word: &str) -> usize {
    word.chars()
        .filter(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .count()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Dictionary check plus shape heuristics for segmentation candidates.
fn is_valid_word(word: &str, vocab: &Vocabulary) -> bool {
    if word.len() < 2 {
        return false;
    }
    if vocab.is_common(word) {
        return true;
    }
    if word.len() > 20 {
        return false;
    }

    let vowels = count_vowels(word);
    if word.len() > 3 && vowels < 1 {
        return false;
    }

    if COMMON_PREFIXES.iter().any(|p| word.starts_with(p))
        || COMMON_SUFFIXES.iter().any(|s| word.ends_with(s))
    {
        return true;
    }

    // Very short segments must be known words.
    if word.len() <= 3 {
        return SHORT_WORDS.contains(&word) || vocab.is_common(word);
    }

    // Medium segments need a healthy vowel ratio.
    if word.len() <= 8 {
        return vowels >= std::cmp::max(1, word.len() / 2);
    }

    false
}

/// Greedy longest-match segmentation, the fallback of last resort.
fn greedy_segment(word: &str, vocab: &Vocabulary) -> String {
    let mut result: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < word.len() {
        let mut found = false;
        let mut j = std::cmp::min(i + 15, word.len());
        while j > i {
            let candidate = &word[i..j];
            if is_valid_word(candidate, vocab) {
                result.push(candidate);
                i = j;
                found = true;
                break;
            }
            j -= 1;
        }

        if !found {
            let chunk = std::cmp::min(3, word.len() - i);
            result.push(&word[i..i + chunk]);
            i += chunk;
        }
    }

    result.join(" ")
}

/// Segment a lowercase word, tiered by length.
///
/// - <= 10 chars: dictionary 2-part split only
/// - 11-15 chars: dictionary-only table fill, accepted only when it yields
///   2+ words
/// - 16+ chars: dictionary first, heuristic words second, greedy fallback
fn segment_lowercase_word(word: &str, vocab: &Vocabulary) -> String {
    if word.len() <= 2 || word.contains(' ') {
        return word.to_string();
    }

    if word.len() <= 10 {
        if vocab.is_common(word) {
            return word.to_string();
        }
        for i in 2..word.len() - 1 {
            let (first, rest) = word.split_at(i);
            if vocab.is_common(first) && vocab.is_common(rest) {
                return format!("{} {}", first, rest);
            }
        }
        return word.to_string();
    }

    if word.len() <= 15 {
        // dp[i] = segmentation of word[..i] into dictionary words, if any.
        // Filled left to right; each cell tries the longest last-word first.
        let n = word.len();
        let mut dp: Vec<Option<Vec<&str>>> = vec![None; n + 1];
        dp[0] = Some(Vec::new());

        for idx in 1..=n {
            let lo = idx.saturating_sub(12);
            for start in lo..idx {
                let candidate = &word[start..idx];
                if vocab.is_common(candidate) && dp[start].is_some() {
                    let mut seg = dp[start].clone().unwrap_or_default();
                    seg.push(candidate);
                    dp[idx] = Some(seg);
                    break;
                }
            }
        }

        if let Some(seg) = &dp[n] {
            if seg.len() >= 2 {
                return seg.join(" ");
            }
        }
        return word.to_string();
    }

    // 16+ chars: full table, dictionary words preferred over heuristic ones,
    // longest candidate first within each tier.
    let n = word.len();
    let mut dp: Vec<Option<Vec<&str>>> = vec![None; n + 1];
    dp[0] = Some(Vec::new());

    for idx in 1..=n {
        let max_len = std::cmp::min(15, idx);

        'tiers: for dictionary_only in [true, false] {
            for length in (2..=max_len).rev() {
                let start = idx - length;
                let candidate = &word[start..idx];
                let accept = if dictionary_only {
                    vocab.is_common(candidate)
                } else {
                    is_valid_word(candidate, vocab)
                };
                if accept && dp[start].is_some() {
                    let mut seg = dp[start].clone().unwrap_or_default();
                    seg.push(candidate);
                    dp[idx] = Some(seg);
                    break 'tiers;
                }
            }
        }
    }

    match &dp[n] {
        Some(seg) => seg.join(" "),
        None => greedy_segment(word, vocab),
    }
}

/// Segment very long glued words (15+ chars) with word-start anchoring.
///
/// The table is filled right to left: dp[idx] holds a segmentation of
/// word[idx..]. Full dictionary words are tried first, longest candidate
/// first, then word-start/shape heuristics, then fixed chunks of 4/3/2
/// characters, then the bare remainder, so every position always resolves.
fn segment_long_word(word: &str, vocab: &Vocabulary) -> String {
    if word.len() <= 3 {
        return word.to_string();
    }

    let n = word.len();
    let mut dp: Vec<Option<Vec<&str>>> = vec![None; n + 1];
    dp[n] = Some(Vec::new());

    for idx in (0..n).rev() {
        let max_len = std::cmp::min(12, n - idx);

        'tiers: for dictionary_only in [true, false] {
            for length in (2..=max_len).rev() {
                let end = idx + length;
                let candidate = &word[idx..end];
                let accept = if dictionary_only {
                    vocab.is_common(candidate)
                } else {
                    vocab.is_word_start(candidate) || is_valid_word(candidate, vocab)
                };
                if accept && dp[end].is_some() {
                    let mut seg = vec![candidate];
                    seg.extend(dp[end].clone().unwrap_or_default());
                    dp[idx] = Some(seg);
                    break 'tiers;
                }
            }
        }

        if dp[idx].is_none() {
            for chunk in [4usize, 3, 2] {
                if idx + chunk <= n && dp[idx + chunk].is_some() {
                    let mut seg = vec![&word[idx..idx + chunk]];
                    seg.extend(dp[idx + chunk].clone().unwrap_or_default());
                    dp[idx] = Some(seg);
                    break;
                }
            }
        }

        if dp[idx].is_none() {
            dp[idx] = Some(vec![&word[idx..]]);
        }
    }

    match &dp[0] {
        Some(seg) if !seg.is_empty() => seg.join(" "),
        _ => word.to_string(),
    }
}

/// Segment concatenated words in running text.
///
/// Pass 1 inserts spaces at digit/letter boundaries, pass 2 at camelCase
/// boundaries, pass 3 walks the words and segments the suspicious ones.
/// All-caps words (acronyms, glued headers) and words carrying digits are
/// never touched here.
pub fn segment_concatenated_words(text: &str, vocab: &Vocabulary) -> String {
    if !text.chars().any(|c| c.is_alphabetic()) {
        return text.to_string();
    }

    let t = DIGIT_LETTER_RE.replace_all(text, "$1 $2");
    let t = LETTER_DIGIT_RE.replace_all(&t, "$1 $2");
    let t = CAMEL_RE.replace_all(&t, "$1 $2");

    let mut segmented: Vec<String> = Vec::new();

    for word in t.split_whitespace() {
        if word.len() <= 3 || word.chars().any(|c| c.is_ascii_digit()) || !word.is_ascii() {
            segmented.push(word.to_string());
            continue;
        }

        if is_all_caps(word) {
            segmented.push(word.to_string());
            continue;
        }

        let word_lower = word.to_lowercase();

        if vocab.is_common(&word_lower) {
            segmented.push(word.to_string());
            continue;
        }

        if word.starts_with(|c: char| c.is_uppercase()) {
            // Sentence-case words like "Transferredto": dictionary 2-part
            // split first, DP tiers second.
            let mut found = None;
            for i in 2..word_lower.len() - 1 {
                let (first, rest) = word_lower.split_at(i);
                if vocab.is_common(first) && vocab.is_common(rest) {
                    found = Some(capitalize_first(&format!("{} {}", first, rest)));
                    break;
                }
            }

            if let Some(split) = found {
                segmented.push(split);
            } else {
                let seg = if word_lower.len() > 15 {
                    segment_long_word(&word_lower, vocab)
                } else {
                    segment_lowercase_word(&word_lower, vocab)
                };
                if seg != word_lower {
                    segmented.push(capitalize_first(&seg));
                } else {
                    segmented.push(word.to_string());
                }
            }
            continue;
        }

        let seg = if word_lower.len() > 15 {
            segment_long_word(&word_lower, vocab)
        } else {
            segment_lowercase_word(&word_lower, vocab)
        };
        segmented.push(seg);
    }

    segmented.join(" ")
}

// ---------------------------------------------------------------------------
// One-shot joiner de-gluing (no dictionary, strict piece validation)
// ---------------------------------------------------------------------------

fn is_wordish_piece(s: &str) -> bool {
    let s = s.to_lowercase();
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if !s.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')) {
        return false;
    }
    !CONSONANT_CLUSTER_RE.is_match(&s)
}

/// A piece is valid if it's a known joiner, 4+ chars and word-shaped, or a
/// whitelisted 3-letter word.
fn valid_piece(p: &str) -> bool {
    let p = p.to_lowercase();
    if JOINER_PIECES.contains(&p.as_str()) {
        return true;
    }
    if p.len() >= 4 {
        return is_wordish_piece(&p);
    }
    p.len() == 3 && COMMON3_PIECES.contains(&p.as_str())
}

/// Short joiners with 6+ chars on both sides are almost certainly buried
/// inside a real word like "territory".
fn veto_embedded_short_joiner(left: &str, joiner: &str, right: &str) -> bool {
    matches!(joiner, "to" | "in" | "of" | "an" | "by" | "a") && left.len() >= 6 && right.len() >= 6
}

/// Segment a glued token at joiner boundaries.
///
/// One-shot and deterministic, three passes in order of precision: suffix
/// joiner (territoryby -> territory by), embedded 'a' (backalarge -> back a
/// large), embedded joiners with strict validation (greeninall -> green in
/// all). No recursive splitting; all pieces must validate.
pub fn segment_token(tok: &str) -> String {
    let t = tok.to_lowercase();

    if !(t.is_ascii() && t.chars().all(|c| c.is_ascii_lowercase()) && t.len() >= 8)
        || tok.chars().any(|c| c.is_uppercase())
    {
        return tok.to_string();
    }

    for j in SUFFIX_JOINERS {
        if t.ends_with(j) && t.len() > j.len() + 3 {
            let left = &t[..t.len() - j.len()];
            if valid_piece(left) && valid_piece(j) {
                return format!("{} {}", left, j);
            }
        }
    }

    // Embedded 'a': scan right to left so the longest left piece wins.
    let bytes = t.as_bytes();
    let mut i = t.len() - 4;
    while i > 2 {
        if bytes[i] == b'a' {
            let (left, right) = (&t[..i], &t[i + 1..]);
            if valid_piece(left) && valid_piece(right) {
                return format!("{} a {}", left, right);
            }
        }
        i -= 1;
    }

    // Embedded joiners, longer joiners tried first so "the" beats "he".
    let mut best: Option<(usize, String)> = None;
    for j in ["the", "and", "for", "to", "in", "of", "an"] {
        let jlen = j.len();
        for i in 4..t.len().saturating_sub(3) {
            if i + jlen > t.len() || &t[i..i + jlen] != j {
                continue;
            }

            let (left, right) = (&t[..i], &t[i + jlen..]);

            if veto_embedded_short_joiner(left, j, right) {
                continue;
            }

            // Prefer "a" over "an" when the remainder would be junk.
            if j == "an" && !valid_piece(right) {
                let alt_right = format!("n{}", right);
                if valid_piece(left) && valid_piece(&alt_right) {
                    return format!("{} a {}", left, alt_right);
                }
                continue;
            }

            if !(valid_piece(left) && valid_piece(j) && valid_piece(right)) {
                continue;
            }

            let score = left.len() + right.len();
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, format!("{} {} {}", left, j, right)));
            }
        }
    }

    best.map_or_else(|| tok.to_string(), |(_, cand)| cand)
}

/// De-glue suspicious tokens in a text by segmenting each at joiner points.
pub fn deglue_joiners(text: &str) -> String {
    text.split_whitespace()
        .map(segment_token)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn test_digit_boundaries_split() {
        let v = vocab();
        // "40%in" keeps its digit so it is never segmented further
        assert_eq!(
            segment_concatenated_words("by40%in5months", &v),
            "by 40%in 5 months"
        );
    }

    #[test]
    fn test_sentence_case_two_part_split() {
        let v = vocab();
        assert_eq!(segment_concatenated_words("Transferredto", &v), "Transferred to");
        assert_eq!(segment_concatenated_words("Grewthe", &v), "Grew the");
    }

    #[test]
    fn test_medium_word_dictionary_table() {
        let v = vocab();
        assert_eq!(
            segment_concatenated_words("Wonbackaccount", &v),
            "Won back account"
        );
        assert_eq!(
            segment_concatenated_words("nationalaccount", &v),
            "national account"
        );
    }

    #[test]
    fn test_long_glued_word() {
        let v = vocab();
        assert_eq!(
            segment_concatenated_words("Thenationalaccount", &v),
            "The national account"
        );
    }

    #[test]
    fn test_long_word_prefers_whole_dictionary_words() {
        let v = vocab();
        assert_eq!(
            segment_concatenated_words("grewtheterritoryby", &v),
            "grew the territory by"
        );
        assert_eq!(
            segment_concatenated_words("wonbackaccountagain", &v),
            "won back account again"
        );
    }

    #[test]
    fn test_all_caps_left_alone() {
        let v = vocab();
        assert_eq!(segment_concatenated_words("EXPERIENCE", &v), "EXPERIENCE");
    }

    #[test]
    fn test_common_word_left_alone() {
        let v = vocab();
        assert_eq!(segment_concatenated_words("territory", &v), "territory");
        assert_eq!(segment_concatenated_words("account", &v), "account");
    }

    #[test]
    fn test_is_valid_word_heuristics() {
        let v = vocab();
        assert!(is_valid_word("the", &v));
        assert!(is_valid_word("performing", &v)); // suffix heuristic
        assert!(!is_valid_word("xyzq", &v)); // no vowels
        assert!(!is_valid_word("x", &v));
    }

    #[test]
    fn test_segment_token_suffix_joiner() {
        assert_eq!(segment_token("territoryby"), "territory by");
    }

    #[test]
    fn test_segment_token_embedded_a() {
        assert_eq!(segment_token("backalarge"), "back a large");
    }

    #[test]
    fn test_segment_token_veto_protects_real_words() {
        assert_eq!(segment_token("relationships"), "relationships");
    }

    #[test]
    fn test_deglue_joiners_mixed_line() {
        assert_eq!(
            deglue_joiners("Won greeninall regions"),
            "Won green in all regions"
        );
    }
}
