//! Vocabulary data for section detection, classification, and word repair.
//!
//! All keyword sets and dictionaries live in a single [`Vocabulary`] value
//! that is built once and injected into the components that need it. This
//! keeps every classification decision deterministic and lets tests swap in
//! a reduced vocabulary.

use std::collections::HashSet;

/// Resume-domain dictionary used by word segmentation and quality scoring.
/// Most frequent words in professional/achievement context, plus month names
/// and common city-name components.
const COMMON_WORDS: &[&str] = &[
    "the", "a", "and", "to", "of", "in", "for", "is", "was", "on", "with", "by", "from",
    "as", "at", "be", "been", "that", "this", "it", "which", "who", "or", "an", "have",
    "has", "had", "are", "were", "new", "large", "back", "key", "account", "manager",
    "leader", "team", "sales", "customer", "territory", "grew", "growth", "won", "selected",
    "opened", "acquired", "finished", "performed", "transferred", "outperformed", "percent",
    "plan", "business", "year", "month", "due", "leading", "over", "goals",
    "while", "always", "maintaining", "positive", "volunteer", "group", "girls", "boys",
    "teaching", "encouraging", "strong", "smart", "bold", "blitz", "expansion", "relations",
    "set", "tone", "overall", "atmosphere", "can", "do", "attitude", "case", "coast",
    "person", "june", "q", "west", "several", "national", "major", "downtown", "near",
    "relationship", "through", "develop", "improve", "increase", "decrease", "change", "led",
    "lead", "create", "created", "delivery", "managed", "manage",
    "up", "down", "implemented", "implement", "provide", "provided",
    "process", "system", "quality", "service", "support", "training",
    "staff", "office", "regional", "company", "corporation", "division", "department",
    "responsible", "responsibilities", "achievement", "achievements", "accomplishment",
    "results", "result", "success", "successful", "successfully", "recognition", "award",
    "awards", "promoted", "promotion", "increased", "expand",
    "partnership", "partner", "collaborate", "collaboration", "initiative", "strategic",
    "strategy", "market", "marketing", "revenue", "profit", "efficiency",
    "effective", "effectiveness", "productivity", "product", "production",
    "implementation", "launch", "launched", "innovation", "innovative",
    "technology", "technical", "operational", "operations", "logistics", "supply",
    "chain", "sourcing", "procurement", "vendor", "suppliers", "client", "clients",
    "prospecting", "pipeline", "closing", "negotiation", "negotiated", "contract",
    "proposal", "proposals", "presentations", "presentation", "trained",
    "coaching", "mentoring", "mentored", "development", "developed", "improved",
    "reduced", "reduction", "optimized", "optimization", "streamlined", "streamline",
    "automated", "automation", "platform", "solution", "solutions", "integration",
    "integrated", "scaling", "scaled", "migration", "migrated", "modernization",
    "infrastructure", "deployment", "deployed", "maintenance", "troubleshooting",
    "problem", "solving", "resolution", "incident", "security", "compliance", "risk",
    "management", "project", "program", "portfolio", "governance", "stakeholder",
    "stakeholders", "communication", "reporting", "analysis", "analytical",
    "education", "experience", "journalism",
    "datadriven", "metrics", "kpi", "kpis", "benchmark", "benchmarking", "forecast",
    "forecasting", "budget", "budgeting", "financial", "profitability", "roe", "roi",
    "valuation", "return", "investment", "capital", "funding", "investor", "venture",
    "startup", "scalable", "scalability", "sustainable", "sustainability", "corporate",
    "enterprise", "b2b", "b2c", "saas", "cloud", "premise", "hybrid", "mobile",
    "web", "desktop", "application", "applications", "api", "apis", "database", "databases",
    "storage", "server", "servers", "network", "networking", "aws", "azure",
    "gcp", "docker", "kubernetes", "agile", "scrum", "kanban", "devops", "ci", "cd",
    "testing", "test", "qa", "assurance", "ux", "ui", "design", "designer",
    "frontend", "backend", "fullstack", "architect", "architecture", "microservices",
    // Month names
    "january", "february", "march", "april", "may", "july", "august",
    "september", "october", "november", "december",
    // Common location words and proper nouns
    "diego", "francisco", "angeles", "york", "chicago", "denver",
    "boston", "atlanta", "seattle", "austin",
    // Common verbs for achievements
    "kick", "start", "kickstart", "grow", "achieved", "achieve",
];

/// Common word starters used by the long-word segmenter to anchor boundaries.
const WORD_STARTS: &[&str] = &[
    "a", "an", "and", "as", "at", "be", "by", "can", "do", "for", "get", "go",
    "had", "has", "have", "he", "her", "his", "how", "i", "if", "in", "is",
    "it", "its", "key", "lead", "led", "made", "make", "may", "my", "of", "on",
    "or", "our", "out", "over", "re", "so", "some", "such", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "to",
    "too", "under", "up", "us", "used", "very", "was", "we", "were", "what",
    "when", "which", "who", "why", "will", "with", "won", "would", "yet", "you",
    "your", "grew", "acquired", "selected", "opened", "finished", "transferred",
    "outperformed", "performed", "down", "territory", "due", "relationships",
    "major", "close", "accounts", "account", "blitzes", "expansion", "team",
    "national", "several", "country", "attend", "new", "year", "month",
];

/// Achievement verbs/nouns rewarded by the repair-strategy scorer.
const ACHIEVEMENT_WORDS: &[&str] = &[
    "acquired", "grew", "led", "built", "improved", "increased", "achieved",
    "won", "developed", "created", "managed", "exceeded", "delivered",
    "customers", "revenue", "sales", "growth", "team", "business",
];

/// Common resume section headers (never a candidate name).
const HEADER_BLACKLIST: &[&str] = &[
    "objective",
    "summary",
    "professional summary",
    "profile",
    "experience",
    "work experience",
    "employment",
    "employment history",
    "professional experience",
    "education",
    "skills",
    "technical skills",
    "soft skills",
    "core competencies",
    "technical proficiencies",
    "competencies",
    "proficiencies",
    "areas of expertise",
    "expertise",
    "strengths",
    "projects",
    "certifications",
    "certification",
    "licenses",
    "awards",
    "publications",
    "volunteer",
    "volunteering",
    "volunteer experience",
    "interests",
    "hobbies",
    "references",
    "additional information",
];

const EDUCATION_SECTION_HEADERS: &[&str] = &[
    "education",
    "academic background",
    "education & training",
    "academic",
    "schooling",
    "academic experience",
];

const EXPERIENCE_SECTION_HEADERS: &[&str] = &[
    "experience",
    "professional experience",
    "work experience",
    "employment",
    "work history",
    "career",
    "career experience",
    "career experience & achievements",
    "career experience and achievements",
];

/// Degree keywords: a line containing any of these is education, full stop.
const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor of",
    "bachelor's",
    "master of",
    "master's",
    "associate of",
    "associate's",
    "b.s.",
    "b.a.",
    "m.s.",
    "m.a.",
    "m.b.a.",
    "ph.d.",
    "phd",
    "doctorate",
    "doctoral",
    "graduate degree",
    "postgraduate",
    "diploma",
    "certificate",
    "b.s. in",
    "b.a. in",
    "m.s. in",
    "m.a. in",
];

const INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "institute of",
    "school",
    "academy",
    "high school",
    "secondary school",
    "prep school",
    "polytechnic",
    "state university",
    "community college",
    "trade school",
];

const HIGH_SCHOOL_KEYWORDS: &[&str] = &[
    "high school",
    "secondary school",
    "prep school",
    "preparatory",
];

const STUDY_ABROAD_KEYWORDS: &[&str] = &[
    "study abroad",
    "institute of study abroad",
    "dis study abroad",
    "semester abroad",
    "year abroad",
];

/// Known study abroad program abbreviations, expanded to full program names.
const STUDY_ABROAD_ABBREVIATIONS: &[(&str, &str)] = &[
    ("dis", "Danish Institute of Study Abroad"),
    ("isa", "Institute for Study Abroad"),
    ("aifs", "American Institute for Foreign Study"),
    ("ciee", "Council on International Educational Exchange"),
    ("saf", "Study Abroad Foundation"),
];

const EDUCATION_DETAIL_KEYWORDS: &[&str] = &[
    "major:",
    "minor:",
    "focus in",
    "concentration",
    "focus:",
    "honors:",
    "dean's list",
    "cum laude",
    "magna cum laude",
    "summa cum laude",
    "gpa:",
    "scholarship",
    "award:",
    "relevant coursework",
    "coursework:",
];

/// US state abbreviations (2-letter codes).
const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV",
    "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN",
    "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY", "DC",
];

/// Multi-word US states/territories (lowercased for lookup).
const MULTI_WORD_STATES: &[&str] = &[
    "new york", "new mexico", "new hampshire", "north carolina", "north dakota",
    "south carolina", "south dakota", "west virginia", "puerto rico",
];

/// Immutable classification data for the whole pipeline, loaded once.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Dictionary for segmentation, repair scoring, and quality coverage
    pub common_words: HashSet<&'static str>,
    /// Word starters for long-word segmentation
    pub word_starts: HashSet<&'static str>,
    /// Words rewarded by repair-strategy scoring
    pub achievement_words: HashSet<&'static str>,
    /// Section headers that are never a name
    pub header_blacklist: HashSet<&'static str>,
    /// Headers that open an education section
    pub education_headers: HashSet<&'static str>,
    /// Headers that open an experience section
    pub experience_headers: HashSet<&'static str>,
    /// Substring signals that force education classification
    pub degree_keywords: Vec<&'static str>,
    /// Substring signals for educational institutions
    pub institution_keywords: Vec<&'static str>,
    /// Substring signals for high school (always education)
    pub high_school_keywords: Vec<&'static str>,
    /// Substring signals for study abroad programs
    pub study_abroad_keywords: Vec<&'static str>,
    /// Abbreviation -> full study abroad program name
    pub study_abroad_abbreviations: Vec<(&'static str, &'static str)>,
    /// Substring signals for education detail bullets (major, GPA, honors)
    pub education_detail_keywords: Vec<&'static str>,
    /// 2-letter US state codes
    pub us_states: HashSet<&'static str>,
    /// Multi-word US states/territories, lowercased
    pub multi_word_states: HashSet<&'static str>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary {
            common_words: COMMON_WORDS.iter().copied().collect(),
            word_starts: WORD_STARTS.iter().copied().collect(),
            achievement_words: ACHIEVEMENT_WORDS.iter().copied().collect(),
            header_blacklist: HEADER_BLACKLIST.iter().copied().collect(),
            education_headers: EDUCATION_SECTION_HEADERS.iter().copied().collect(),
            experience_headers: EXPERIENCE_SECTION_HEADERS.iter().copied().collect(),
            degree_keywords: DEGREE_KEYWORDS.to_vec(),
            institution_keywords: INSTITUTION_KEYWORDS.to_vec(),
            high_school_keywords: HIGH_SCHOOL_KEYWORDS.to_vec(),
            study_abroad_keywords: STUDY_ABROAD_KEYWORDS.to_vec(),
            study_abroad_abbreviations: STUDY_ABROAD_ABBREVIATIONS.to_vec(),
            education_detail_keywords: EDUCATION_DETAIL_KEYWORDS.to_vec(),
            us_states: US_STATES.iter().copied().collect(),
            multi_word_states: MULTI_WORD_STATES.iter().copied().collect(),
        }
    }
}

impl Vocabulary {
    /// Dictionary lookup. The word must already be lowercase.
    pub fn is_common(&self, word: &str) -> bool {
        self.common_words.contains(word)
    }

    /// Word-starter lookup for long-word segmentation.
    pub fn is_word_start(&self, word: &str) -> bool {
        self.word_starts.contains(word)
    }

    /// Achievement-word lookup for repair scoring.
    pub fn is_achievement_word(&self, word: &str) -> bool {
        self.achievement_words.contains(word)
    }

    /// Is this normalized, lowercased line a blacklisted section header?
    pub fn is_blacklisted_header(&self, key: &str) -> bool {
        self.header_blacklist.contains(key)
    }

    /// Does the text contain a degree keyword? Strong education signal.
    pub fn has_degree_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.degree_keywords.iter().any(|k| lower.contains(k))
    }

    /// Does the text mention an educational institution?
    pub fn has_institution_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.institution_keywords.iter().any(|k| lower.contains(k))
    }

    /// High school always maps to education, never experience.
    pub fn is_high_school(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.high_school_keywords.iter().any(|k| lower.contains(k))
    }

    /// Study abroad is still education, not experience.
    pub fn is_study_abroad(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.study_abroad_keywords.iter().any(|k| lower.contains(k))
    }

    /// Is this bullet an education detail (major, minor, GPA, honors)?
    pub fn is_education_detail(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.education_detail_keywords.iter().any(|k| lower.contains(k))
    }

    /// Is this token a 2-letter US state code? Case-insensitive.
    pub fn is_state_code(&self, token: &str) -> bool {
        self.us_states.contains(token.to_uppercase().as_str())
    }

    /// Is this phrase a multi-word US state? Case-insensitive.
    pub fn is_multi_word_state(&self, phrase: &str) -> bool {
        self.multi_word_states.contains(phrase.to_lowercase().as_str())
    }

    /// Expand a known study abroad abbreviation at the start of the text,
    /// dropping a trailing "Study Abroad" the full name already carries.
    pub fn expand_study_abroad_abbreviation(&self, institution: &str) -> String {
        let lower = institution.to_lowercase();
        for (abbrev, full_name) in &self.study_abroad_abbreviations {
            let prefix = format!("{} ", abbrev);
            if lower.starts_with(&prefix) {
                let rest = institution[abbrev.len()..].trim_start();
                let mut expanded = format!("{} {}", full_name, rest);
                if full_name.to_lowercase().contains("study abroad") {
                    const SUFFIX: &str = "study abroad";
                    let trimmed_len = expanded.trim_end().len();
                    if let Some(cut) = trimmed_len.checked_sub(SUFFIX.len()) {
                        if expanded.is_char_boundary(cut)
                            && expanded[cut..trimmed_len].eq_ignore_ascii_case(SUFFIX)
                        {
                            expanded.truncate(cut);
                        }
                    }
                }
                return expanded.trim().to_string();
            }
        }
        institution.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_keywords_case_insensitive() {
        let vocab = Vocabulary::default();
        assert!(vocab.has_degree_keyword("Bachelor of Science in Communication Studies"));
        assert!(vocab.has_degree_keyword("M.B.A. candidate"));
        assert!(!vocab.has_degree_keyword("Territory Manager"));
    }

    #[test]
    fn test_state_lookups() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_state_code("wa"));
        assert!(vocab.is_state_code("NY"));
        assert!(!vocab.is_state_code("ZZ"));
        assert!(vocab.is_multi_word_state("New York"));
        assert!(!vocab.is_multi_word_state("Old York"));
    }

    #[test]
    fn test_expand_study_abroad_abbreviation() {
        let vocab = Vocabulary::default();
        assert_eq!(
            vocab.expand_study_abroad_abbreviation("DIS Study Abroad"),
            "Danish Institute of Study Abroad"
        );
        assert_eq!(
            vocab.expand_study_abroad_abbreviation("ISA Study Abroad"),
            "Institute for Study Abroad"
        );
        assert_eq!(
            vocab.expand_study_abroad_abbreviation("Gonzaga University"),
            "Gonzaga University"
        );
        // Non-ASCII program names change byte length under lowercasing; the
        // suffix cut must still land on a character boundary.
        assert_eq!(
            vocab.expand_study_abroad_abbreviation("DIS İstanbul Study Abroad"),
            "Danish Institute of Study Abroad İstanbul"
        );
    }

    #[test]
    fn test_education_detail_signals() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_education_detail("Minor: Journalism"));
        assert!(vocab.is_education_detail("Graduated magna cum laude"));
        assert!(!vocab.is_education_detail("Grew the territory by 40%"));
    }

    #[test]
    fn test_dictionary_lookups() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_common("territory"));
        assert!(vocab.is_common("grew"));
        assert!(!vocab.is_common("Territory")); // caller lowercases first
        assert!(vocab.is_word_start("transferred"));
        assert!(vocab.is_achievement_word("exceeded"));
    }
}
