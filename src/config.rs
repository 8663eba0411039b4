use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for the browser-driven crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Maximum number of pages to visit, seed included
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Per-page load budget in seconds
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Grace period after DOM ready for client-rendered content
    #[serde(default = "default_settle_grace_ms")]
    pub settle_grace_ms: u64,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// User agent presented to the site
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Regex patterns for links never worth loading (in addition to static assets)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Configuration for the scoring oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Credential; normally supplied through `OPENAI_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Model name passed to the oracle
    #[serde(default = "default_model")]
    pub model: String,

    /// Responses endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-page excerpt length sent to the oracle
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Request timeout in seconds
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

/// Top-level scanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub oracle: OracleConfig,
}

impl ScannerConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(webdriver_url) = get("WEBDRIVER_URL") {
            self.crawler.webdriver_url = webdriver_url;
        }
        if let Some(api_key) = get("OPENAI_API_KEY") {
            self.oracle.api_key = Some(api_key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.oracle.model = model;
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            self.oracle.endpoint = format!("{}/responses", base_url.trim_end_matches('/'));
        }
        self
    }
}

impl CrawlerConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn settle_grace(&self) -> Duration {
        Duration::from_millis(self.settle_grace_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            max_pages: default_max_pages(),
            page_timeout_secs: default_page_timeout_secs(),
            settle_grace_ms: default_settle_grace_ms(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl OracleConfig {
    /// The credential, if one is set and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            excerpt_chars: default_excerpt_chars(),
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_max_pages() -> usize {
    5
}

fn default_page_timeout_secs() -> u64 {
    15
}

fn default_settle_grace_ms() -> u64 {
    2000
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/responses".to_string()
}

/// Kept below the extractor's own cap to bound request size
fn default_excerpt_chars() -> usize {
    3000
}

fn default_oracle_timeout_secs() -> u64 {
    45
}
