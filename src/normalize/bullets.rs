//! Rich normalization pipeline for achievement/bullet text.
//!
//! Two levels of aggressiveness:
//! - [`normalize_token_basic`]: ultra-conservative, safe everywhere
//! - [`normalize_bullet_text`]: the full pipeline for achievement text
//!
//! plus [`fix_word_breaks_aggressive`] for paragraph-level suffix rejoining
//! ("adopti on" -> "adoption", "terri to ries" -> "territories").
//!
//! Every splitting rule here carries glue-evidence guards so a real single
//! word is never torn apart just because it happens to contain a joiner.

use lazy_static::lazy_static;
use regex::Regex;

const JOINER_SUFFIX_PHRASES: &[(&str, &str)] = &[
    ("inthe", "in the"),
    ("ofthe", "of the"),
    ("tobe", "to be"),
    ("toa", "to a"),
    ("tothe", "to the"),
    ("andthe", "and the"),
];

const JOINER_PREFIX_PHRASES: &[(&str, &str)] = &[
    ("dueto", "due to"),
    ("leadingto", "leading to"),
    ("setthe", "set the"),
];

const EMBEDDED_JOINERS: &[&str] = &["the", "and", "for", "to", "in", "of"];
const SHORT_JOINERS: &[&str] = &["to", "in", "of", "an", "a"];

/// Whitelisted 3-letter words that count as valid pieces.
const COMMON3: &[&str] = &["new", "all", "top", "one", "two", "six", "ten", "ver", "and", "the", "for"];

/// Words commonly seen after "a" in resume bullets.
const A_RIGHT_WHITELIST: &[&str] = &[
    "new", "large", "positive", "can", "role", "territory", "team", "month", "year",
];

/// Short words commonly on the left of an embedded "a" in achievements.
const A_LEFT_WHITELIST: &[&str] = &["back", "won", "grew", "built", "led", "sold", "took"];

/// Resume-domain common words used for glue-evidence checks: a split is only
/// trusted when at least one side is a recognized word.
const GLUE_COMMON_WORDS: &[&str] = &[
    "back", "large", "new", "role", "team", "month", "year", "account", "territory",
    "sales", "growth", "customers", "business", "country", "attend", "miami", "symposium",
    "conference", "leader", "expand", "market", "client", "revenue", "product", "service",
];

/// Bullet-only exact fixes (highest precision).
const EXACT_TOKEN_FIXES: &[(&str, &str)] = &[
    ("selectedas", "selected as"),
    ("focusin", "focus in"),
    ("growthin", "growth in"),
    ("greeninall", "green in all"),
    ("expansionand", "expansion and"),
    ("over-executedonboth", "over-executed on both"),
    ("maintainingapositive", "maintaining a positive"),
    ("apositive", "a positive"),
    ("foranoverall", "for an overall"),
    ("personofthe", "person of the"),
    ("girlsofthe", "girls of the"),
    ("toolstobe", "tools to be"),
];

const MERGE_2_WHITELIST: &[&str] = &["newspaper", "expansion", "bulletin"];
const MERGE_3_PREFIX_WHITELIST: &[&str] = &[
    "maintaining",
    "increasing",
    "developing",
    "implementing",
    "managing",
];

/// Suffixes that indicate a mid-word break rather than a word boundary.
const BROKEN_SUFFIXES: &[&str] = &[
    "on", "ing", "ed", "tion", "sion", "ment", "ity", "ies", "able",
    "ness", "ous", "ful", "less", "ly", "er", "est", "en", "ist",
    "nd", "st", "rd", "th",
    "tive", "ive",
];

lazy_static! {
    static ref CONSONANT_CLUSTER_RE: Regex = Regex::new(r"[bcdfghjklmnpqrstvwxz]{5,}").unwrap();
    static ref CAMEL_SPLIT_RE: Regex = Regex::new(r"[a-z][A-Z]").unwrap();
    static ref Q_NUMBER_RE: Regex = Regex::new(r"^(\d{1,2})([,.\-]*)$").unwrap();
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

fn has_vowels(s: &str) -> bool {
    s.chars().any(|c| is_vowel(c.to_ascii_lowercase()))
}

fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphabetic())
}

fn is_lower_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase())
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_uppercase())
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Word-shaped: alphabetic, has vowels, no long consonant clusters.
fn is_wordish(s: &str) -> bool {
    let s = s.to_lowercase();
    is_alpha(&s) && has_vowels(&s) && !CONSONANT_CLUSTER_RE.is_match(&s)
}

/// Stricter than `is_wordish`: 5+ chars and 2+ vowels, so fragments like
/// "ttend" or "kickst" are rejected.
fn strong_word(s: &str) -> bool {
    let s = s.to_lowercase();
    if !is_alpha(&s) || s.len() < 5 {
        return false;
    }
    let vowel_count = s.chars().filter(|&c| is_vowel(c)).count();
    vowel_count >= 2 && !CONSONANT_CLUSTER_RE.is_match(&s)
}

/// At least one side of a split must be a recognized word. Prevents false
/// splits of real single words.
fn glue_evidence(left: &str, right: &str) -> bool {
    let l = left.to_lowercase();
    let r = right.to_lowercase();
    GLUE_COMMON_WORDS.contains(&l.as_str())
        || GLUE_COMMON_WORDS.contains(&r.as_str())
        || A_LEFT_WHITELIST.contains(&l.as_str())
        || A_RIGHT_WHITELIST.contains(&r.as_str())
}

fn is_valid_piece(p: &str) -> bool {
    let low = p.to_lowercase();
    if matches!(
        low.as_str(),
        "a" | "an" | "to" | "in" | "of" | "for" | "and" | "the" | "by" | "on" | "at" | "or"
            | "as" | "is"
    ) {
        return true;
    }
    if low.len() >= 4 && is_wordish(&low) {
        return true;
    }
    low.len() == 3 && COMMON3.contains(&low.as_str())
}

/// Tokens with an '@' (emails) are never normalized.
fn is_protected_token(tok: &str) -> bool {
    tok.contains('@')
}

fn apply_to_subtokens(s: &str, f: impl Fn(&str) -> String) -> String {
    s.split_whitespace().map(|p| f(p)).collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// List-level merges (split-inside-a-word artifacts)
// ---------------------------------------------------------------------------

/// 'New spaper' -> 'Newspaper' for whitelisted combinations.
fn merge_two_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() {
            let (a, b) = (&tokens[i], &tokens[i + 1]);
            let combo = format!("{}{}", a, b).to_lowercase();
            if MERGE_2_WHITELIST.contains(&combo.as_str()) {
                let merged = format!("{}{}", a, b);
                let merged = if starts_uppercase(a) {
                    capitalize_first(&merged)
                } else {
                    merged
                };
                out.push(merged);
                i += 2;
                continue;
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// 'mainta in ing' -> 'maintaining' when the concatenation starts with a
/// whitelisted word and the middle token is tiny.
fn merge_three_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 2 < tokens.len() {
            let (a, b, c) = (&tokens[i], &tokens[i + 1], &tokens[i + 2]);
            if b.len() <= 2 && is_lower_alpha(b) {
                let concat = format!("{}{}{}", a, b, c);
                if concat.is_ascii() {
                    let merged = concat.to_lowercase();
                    let mut matched = false;
                    for w in MERGE_3_PREFIX_WHITELIST {
                        if merged.starts_with(w) {
                            let result = if starts_uppercase(a) {
                                capitalize_first(w)
                            } else {
                                (*w).to_string()
                            };
                            out.push(result);
                            let remainder = &concat[w.len()..];
                            if !remainder.is_empty() {
                                out.push(remainder.to_string());
                            }
                            i += 3;
                            matched = true;
                            break;
                        }
                    }
                    if !matched {
                        out.push(a.clone());
                        i += 1;
                    }
                    continue;
                }
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// 'communic a tions' -> 'communications'. Very constrained: left >= 4,
/// right >= 3, merged >= 8 and word-shaped.
fn merge_single_letter_splits(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 2 < tokens.len() {
            let (a, b, c) = (&tokens[i], &tokens[i + 1], &tokens[i + 2]);
            if is_alpha(a) && is_alpha(b) && is_alpha(c) && b.chars().count() == 1 {
                if a.len() >= 4 && c.len() >= 3 {
                    let merged = format!("{}{}{}", a, b, c);
                    if merged.len() >= 8 && is_wordish(&merged.to_lowercase()) {
                        out.push(merged);
                        i += 3;
                        continue;
                    }
                }
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// 'Q 1' -> 'Q1', preserving trailing punctuation on the number.
fn merge_letter_number_pairs(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() {
            let (a, b) = (&tokens[i], &tokens[i + 1]);
            if a.eq_ignore_ascii_case("Q") {
                if let Some(caps) = Q_NUMBER_RE.captures(b) {
                    out.push(format!("Q{}{}", &caps[1], &caps[2]));
                    i += 2;
                    continue;
                }
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Per-token rules
// ---------------------------------------------------------------------------

fn apply_exact_token_fixes(tok: &str) -> String {
    let low = tok.to_lowercase();
    for (glued, fixed) in EXACT_TOKEN_FIXES {
        if low == *glued {
            return if starts_uppercase(tok) {
                capitalize_first(fixed)
            } else {
                (*fixed).to_string()
            };
        }
    }
    tok.to_string()
}

/// Standalone glued phrases: anew, inanew, startanew, leadingto, dueto.
fn fix_standalone_phrases(tok: &str) -> Option<&'static str> {
    match tok.to_lowercase().as_str() {
        "anew" => Some("a new"),
        "inanew" => Some("in a new"),
        "startanew" => Some("start a new"),
        "leadingto" => Some("leading to"),
        "dueto" => Some("due to"),
        _ => None,
    }
}

/// Peel off suffix phrases like 'inthe', 'ofthe', 'tobe'.
fn split_suffix_phrases(tok: &str) -> String {
    if !tok.is_ascii() {
        return tok.to_string();
    }
    let low = tok.to_lowercase();
    for (suf, repl) in JOINER_SUFFIX_PHRASES {
        if low.ends_with(suf) && low.len() >= suf.len() + 4 {
            let left = &tok[..tok.len() - suf.len()];
            if is_valid_piece(&left.to_lowercase()) {
                return format!("{} {}", left, repl);
            }
        }
    }
    tok.to_string()
}

/// Handle prefix phrases like 'dueto', 'leadingto' glued onto a remainder.
fn split_prefix_phrases(tok: &str) -> String {
    if !tok.is_ascii() {
        return tok.to_string();
    }
    let low = tok.to_lowercase();
    for (pre, repl) in JOINER_PREFIX_PHRASES {
        if low.starts_with(pre) && low.len() > pre.len() {
            let rest = &tok[pre.len()..];
            return format!("{} {}", repl, rest);
        }
    }
    tok.to_string()
}

/// Try to split on an embedded 'a' (backalarge -> back a large), with
/// glue-evidence guards. Returns `None` when no safe split exists.
fn try_embedded_a(tok: &str) -> Option<String> {
    let t = tok.to_lowercase();
    if !(t.is_ascii() && is_alpha(&t) && t.len() >= 8) {
        return None;
    }

    let bytes = t.as_bytes();
    // Scan right-to-left, preferring the longest left piece.
    let mut i = t.len() - 4;
    while i >= 4 {
        if bytes[i] != b'a' {
            i -= 1;
            continue;
        }
        let left = &t[..i];
        let right = &t[i + 1..];

        // Joiner cases (leftto, leadingof, ...) belong to the joiner rule.
        let joiner_tail = ["to", "of", "in", "by", "for"]
            .iter()
            .any(|j| left.ends_with(j));
        if joiner_tail {
            i -= 1;
            continue;
        }

        if !(strong_word(left) || A_LEFT_WHITELIST.contains(&left)) {
            i -= 1;
            continue;
        }

        let right_ok = strong_word(right)
            || A_RIGHT_WHITELIST.contains(&right)
            || (right.len() >= 4
                && right.chars().next().is_some_and(is_vowel)
                && is_wordish(right));
        if !right_ok {
            i -= 1;
            continue;
        }

        if !glue_evidence(left, right) {
            i -= 1;
            continue;
        }

        // Avoid junk right pieces: short, consonant-starting, uncommon.
        if right.len() < 5
            && !right.chars().next().is_some_and(is_vowel)
            && !GLUE_COMMON_WORDS.contains(&right)
        {
            i -= 1;
            continue;
        }

        return Some(format!("{} a {}", &tok[..i], &tok[i + 1..]));
    }

    None
}

/// Split on embedded joiners like 'territorytoover' -> 'territory to over'.
///
/// Conservative: only 13+ char alphabetic tokens with substantial pieces on
/// both sides. Short joiners with BOTH sides 7+ chars are vetoed, which
/// protects real words like "territory" from a terri|to|ry split.
fn split_embedded_joiner_once(tok: &str) -> String {
    let low = tok.to_lowercase();
    if low.len() < 13 || !low.is_ascii() || !is_alpha(&low) {
        return tok.to_string();
    }

    let mut best: Option<(usize, String)> = None;
    for j in EMBEDDED_JOINERS {
        let jlen = j.len();
        for i in 5..low.len().saturating_sub(5) {
            if i + jlen > low.len() || &low[i..i + jlen] != *j {
                continue;
            }

            let left = &tok[..i];
            let right = &tok[i + jlen..];
            let left_low = &low[..i];
            let right_low = &low[i + jlen..];

            if SHORT_JOINERS.contains(j) && left_low.len() >= 7 && right_low.len() >= 7 {
                continue;
            }

            if !(is_valid_piece(left_low) && is_valid_piece(right_low)) {
                continue;
            }

            let score = left.len();
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, format!("{} {} {}", left, j, right)));
            }
        }
    }

    best.map_or_else(|| tok.to_string(), |(_, cand)| cand)
}

/// Fix CamelCase boundaries where a joiner sits at the boundary:
/// SymposiuminMiami -> Symposium in Miami (combined with later steps).
fn split_camel_joiner(tok: &str) -> String {
    let m = match CAMEL_SPLIT_RE.find(tok) {
        Some(m) => m,
        None => return tok.to_string(),
    };

    let i = m.start() + 1; // the boundary is ASCII, so +1 byte lands on the uppercase char
    let left = &tok[..i];
    let right = &tok[i..];
    let left_low = left.to_lowercase();

    if ["in", "to", "of", "and", "for"]
        .iter()
        .any(|j| left_low.ends_with(j))
    {
        return format!("{} {}", left, right);
    }

    if left.len() >= 7 && is_wordish(&left_low) {
        return format!("{} {}", left, right);
    }

    tok.to_string()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Ultra-conservative token normalization, safe to apply everywhere.
///
/// Handles standalone glued phrases (anew, dueto, leadingto) and suffix
/// phrases (salesinthe). No recursion; applied once per token. Protected
/// tokens (emails) are returned unchanged.
pub fn normalize_token_basic(token: &str) -> String {
    if is_protected_token(token) {
        return token.to_string();
    }

    if let Some(fixed) = fix_standalone_phrases(token) {
        return fixed.to_string();
    }

    split_suffix_phrases(token)
}

/// Rich normalization pipeline for achievement/bullet text.
///
/// Pipeline:
/// 0. List-level merges (in order): 2-token whitelist merges, 3-token prefix
///    merges, single-letter split merges, letter-number pair merges
/// 1. Bullet-only exact token fixes
/// 2. Basic normalization with protected-token guard
/// 3-7. Suffix/prefix phrases, embedded joiners, embedded 'a', CamelCase,
///    with safe subtoken reapplication once a token has been split
pub fn normalize_bullet_text(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();

    let tokens = merge_two_tokens(tokens);
    let tokens = merge_three_tokens(tokens);
    let tokens = merge_single_letter_splits(tokens);
    let tokens = merge_letter_number_pairs(tokens);

    let mut result: Vec<String> = Vec::with_capacity(tokens.len());

    for token in &tokens {
        if is_protected_token(token) {
            result.push(token.clone());
            continue;
        }

        let mut norm = apply_exact_token_fixes(token);
        norm = normalize_token_basic(&norm);

        norm = if norm == *token {
            split_suffix_phrases(&norm)
        } else {
            apply_to_subtokens(&norm, split_suffix_phrases)
        };

        norm = if norm == *token {
            split_prefix_phrases(&norm)
        } else {
            apply_to_subtokens(&norm, split_prefix_phrases)
        };

        if norm == *token {
            norm = split_embedded_joiner_once(&norm);
        }

        if norm == *token {
            if let Some(split) = try_embedded_a(&norm) {
                norm = split;
            }
        }

        norm = apply_to_subtokens(&norm, split_camel_joiner);
        // Pieces left of a camel boundary can still be glued ("growthinQ"
        // splits to "growthin Q"), so the token fixes rerun on the pieces.
        norm = apply_to_subtokens(&norm, apply_exact_token_fixes);
        norm = apply_to_subtokens(&norm, split_suffix_phrases);

        result.push(norm);
    }

    result.join(" ")
}

/// Paragraph-level merge of mid-word breaks: "adopti on" -> "adoption",
/// "terri to ries" -> "territories".
///
/// Conservatively merges adjacent tokens when they clearly form a broken
/// word: a tiny middle token plus a suffix-looking tail, or a vowel-final
/// token followed by a known suffix. Tokens carrying digits never merge,
/// so "Q2 2 nd" stays apart.
pub fn fix_word_breaks_aggressive(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        // 3-token merge: "terri to ries" -> "territories"
        if i + 2 < tokens.len() {
            let (tok1, tok2, tok3) = (tokens[i], tokens[i + 1], tokens[i + 2]);
            let tok3_low = tok3.to_lowercase();
            let suffix_like = BROKEN_SUFFIXES.contains(&tok3_low.as_str())
                || ["ies", "ment", "tion", "tive", "ive"]
                    .iter()
                    .any(|s| tok3_low.ends_with(s));
            if tok2.len() <= 2
                && suffix_like
                && !tok1.chars().any(|c| c.is_ascii_digit())
                && !tok2.chars().any(|c| c.is_ascii_digit())
            {
                out.push(format!("{}{}{}", tok1, tok2, tok3));
                i += 3;
                continue;
            }
        }

        // 2-token merge: vowel-final token + clear suffix
        if i + 1 < tokens.len() {
            let (tok1, tok2) = (tokens[i], tokens[i + 1]);
            if BROKEN_SUFFIXES.contains(&tok2.to_lowercase().as_str()) {
                let vowel_final = tok1
                    .chars()
                    .last()
                    .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
                if vowel_final {
                    out.push(format!("{}{}", tok1, tok2));
                    i += 2;
                    continue;
                }
            }
        }

        out.push(tokens[i].to_string());
        i += 1;
    }

    out.join(" ")
}
