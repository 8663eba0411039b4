//! Heuristic compliance signals.
//!
//! Every detector is driven by the tables in [`SignalRules`]; swapping the
//! tables changes what is detected without touching control flow.

use crate::results::PageSignals;
use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// CSS class/id fragments used by common consent banners
pub const COOKIE_BANNER_MARKERS: &[&str] = &[
    "cookie-banner",
    "cookie-consent",
    "cookie-notice",
    "cookieconsent",
    "cookie_banner",
    "cc-banner",
    "consent-banner",
    "gdpr-banner",
];

/// Phrases a consent banner typically shows
pub const COOKIE_BANNER_PHRASES: &[&str] = &[
    "we use cookies",
    "this website uses cookies",
    "this site uses cookies",
];

pub const PRIVACY_LINK_PATTERNS: &[&str] = &[
    r"privacy\s*policy",
    r"data\s*protection",
    r"privacy\s*notice",
    r"privacy\s*statement",
];

/// Known analytics and advertising script identifiers
pub const TRACKER_PATTERNS: &[&str] = &[
    "google-analytics",
    "googletagmanager",
    "gtag(",
    "ga(",
    "fbq(",
    "facebook.net",
    "segment.com",
    "segment.io",
    "hotjar",
    "doubleclick",
    "adsbygoogle",
    "clarity.ms",
];

pub const COOKIE_KEYWORDS: &[&str] = &[
    "cookies",
    "consent",
    "preferences",
    "accept all",
    "reject all",
    "accept cookies",
    "cookie settings",
    "manage cookies",
    "cookie policy",
    "cookie notice",
];

/// Data-subject-rights vocabulary
pub const RIGHTS_KEYWORDS: &[&str] = &[
    "right to access",
    "right to erasure",
    "right to deletion",
    "right to rectification",
    "right to portability",
    "right to object",
    "data subject",
    "withdraw consent",
    "do not sell",
    "do not share",
    "opt out",
    "request deletion",
    "request access",
];

/// `<input type=...>` values that collect personal data
pub const PERSONAL_INPUT_TYPES: &[&str] = &["email", "text", "tel"];

/// `<input name=...>` prefixes that collect personal data
pub const PERSONAL_INPUT_NAMES: &[&str] = &["email", "name", "phone"];

static DEFAULT_RULES: LazyLock<SignalRules> = LazyLock::new(SignalRules::default);

/// Pattern tables for every signal
#[derive(Debug, Clone)]
pub struct SignalRules {
    pub cookie_banner_markers: Vec<String>,
    pub cookie_banner_phrases: Vec<String>,
    pub privacy_link_patterns: Vec<Regex>,
    pub trackers: Vec<String>,
    pub cookie_keywords: Vec<String>,
    pub rights_keywords: Vec<String>,
    pub personal_input_types: Vec<String>,
    pub personal_input_names: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_lowercase()).collect()
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            cookie_banner_markers: owned(COOKIE_BANNER_MARKERS),
            cookie_banner_phrases: owned(COOKIE_BANNER_PHRASES),
            privacy_link_patterns: compile(PRIVACY_LINK_PATTERNS)
                .expect("built-in privacy patterns are valid"),
            trackers: owned(TRACKER_PATTERNS),
            cookie_keywords: owned(COOKIE_KEYWORDS),
            rights_keywords: owned(RIGHTS_KEYWORDS),
            personal_input_types: owned(PERSONAL_INPUT_TYPES),
            personal_input_names: owned(PERSONAL_INPUT_NAMES),
        }
    }
}

/// Compile case-insensitive regexes
pub fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
        .collect()
}

impl SignalRules {
    /// Derive all signals for one page from its markup and its plain text
    pub fn detect(&self, html: &str, text: &str) -> PageSignals {
        let lower_html = html.to_lowercase();
        let lower_text = text.to_lowercase();

        PageSignals {
            has_cookie_banner: self.has_cookie_banner(&lower_html, &lower_text),
            has_privacy_policy_link: self.has_privacy_policy_link(html),
            has_forms: self.has_personal_data_form(html),
            trackers: matches_in(&lower_html, &self.trackers),
            cookie_keywords: matches_in(&lower_text, &self.cookie_keywords),
            rights_keywords: matches_in(&lower_text, &self.rights_keywords),
        }
    }

    fn has_cookie_banner(&self, lower_html: &str, lower_text: &str) -> bool {
        let has_marker = self
            .cookie_banner_markers
            .iter()
            .any(|m| lower_html.contains(m.as_str()));
        // Banners often live in header/footer chrome, which the text drops
        let has_phrase = self
            .cookie_banner_phrases
            .iter()
            .any(|p| lower_text.contains(p.as_str()) || lower_html.contains(p.as_str()));
        has_marker || has_phrase
    }

    fn has_privacy_policy_link(&self, html: &str) -> bool {
        self.privacy_link_patterns.iter().any(|r| r.is_match(html))
    }

    fn has_personal_data_form(&self, html: &str) -> bool {
        let doc = Html::parse_document(html);
        let form = Selector::parse("form").expect("static selector");
        if doc.select(&form).next().is_none() {
            return false;
        }

        let input = Selector::parse("input").expect("static selector");
        doc.select(&input).any(|el| {
            let attrs = el.value();
            let by_type = attrs.attr("type").is_some_and(|t| {
                let t = t.trim().to_lowercase();
                self.personal_input_types.iter().any(|p| t.starts_with(p.as_str()))
            });
            let by_name = attrs.attr("name").is_some_and(|n| {
                let n = n.trim().to_lowercase();
                self.personal_input_names.iter().any(|p| n.starts_with(p.as_str()))
            });
            by_type || by_name
        })
    }
}

/// Entries of `needles` found in `haystack`, in table order
fn matches_in(haystack: &str, needles: &[String]) -> Vec<String> {
    needles
        .iter()
        .filter(|n| haystack.contains(n.as_str()))
        .cloned()
        .collect()
}

/// Signals for one page using the built-in rule tables
pub fn extract_signals(html: &str, text: &str) -> PageSignals {
    DEFAULT_RULES.detect(html, text)
}
