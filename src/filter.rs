use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

/// Path patterns that mark a link as pointing at a legal/compliance page
pub const POLICY_PATH_PATTERNS: [&str; 7] = [
    r"/privac",
    r"/cookie",
    r"/terms",
    r"/legal",
    r"/gdpr",
    r"/data-protection",
    r"/impressum",
];

/// Static assets that never carry policy text
pub const ASSET_EXCLUDE_PATTERN: &str =
    r"(?i)\.(jpg|jpeg|png|gif|webp|css|js|ico|svg|woff|woff2|ttf|eot|pdf|zip|mp4|mp3)$";

/// Configuration for link filtering during a crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Regex patterns (matched against the path, case-insensitive) that classify
    /// a link as a policy link
    #[serde(default = "default_policy_patterns")]
    pub policy_patterns: Vec<String>,

    /// Regex patterns (matched against the path) for URLs never to load
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_policy_patterns() -> Vec<String> {
    POLICY_PATH_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_exclude_patterns() -> Vec<String> {
    vec![ASSET_EXCLUDE_PATTERN.to_string()]
}

impl Default for UrlFilterConfig {
    fn default() -> Self {
        Self {
            policy_patterns: default_policy_patterns(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Decides which links on a seed page are in scope and which are policy links.
///
/// Scope is the seed's origin (scheme, host and port).
#[derive(Debug)]
pub struct UrlFilter {
    origin: url::Origin,
    policy_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter bounded to the origin of `seed`
    pub fn new(seed: &Url, config: &UrlFilterConfig) -> Result<Self, regex::Error> {
        let mut policy_regexes = Vec::with_capacity(config.policy_patterns.len());
        for pattern in &config.policy_patterns {
            policy_regexes.push(RegexBuilder::new(pattern).case_insensitive(true).build()?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            origin: seed.origin(),
            policy_regexes,
            exclude_regexes,
        })
    }

    /// Resolve an href against the page it came from. Returns `None` for
    /// unparsable or cross-origin targets.
    pub fn resolve(&self, base: &Url, href: &str) -> Option<Url> {
        let resolved = match base.join(href.trim()) {
            Ok(url) => url,
            Err(e) => {
                ::log::trace!("Unparsable link {:?}: {}", href, e);
                return None;
            }
        };

        if !self.is_same_origin(&resolved) {
            ::log::trace!("Cross-origin link rejected: {}", resolved);
            return None;
        }

        Some(normalize_url(&resolved))
    }

    /// Whether the URL should never be loaded. Patterns are matched against
    /// the path, so query strings and fragments do not hide an asset.
    pub fn is_excluded(&self, url: &Url) -> bool {
        let path = url.path();
        self.exclude_regexes.iter().any(|r| r.is_match(path))
    }

    /// Whether the URL shares the seed's origin
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }

    /// Whether the URL path looks like a legal/compliance page
    pub fn is_policy_link(&self, url: &Url) -> bool {
        let path = url.path();
        self.policy_regexes.iter().any(|r| r.is_match(path))
    }
}

/// Create a normalized version of the URL (fragment removed)
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

/// Key used to decide whether two URLs are the same page
pub fn path_key(url: &Url) -> String {
    url.path().to_string()
}
