use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A page loaded by the crawler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL the page was loaded from
    pub url: String,

    /// Final rendered HTML
    pub html: String,

    /// Document title (may be empty)
    pub title: String,
}

impl PageRecord {
    /// Create a new page record
    pub fn new(url: impl Into<String>, html: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            title: title.into(),
        }
    }
}

/// Output of a crawl: the seed page first, then secondary pages in visit order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    pub pages: Vec<PageRecord>,

    /// Absolute URLs of every same-origin policy link seen on the seed page,
    /// whether or not it was visited
    pub discovered_policy_links: Vec<String>,
}

/// Heuristic signals derived from one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSignals {
    pub has_cookie_banner: bool,
    pub has_privacy_policy_link: bool,
    pub has_forms: bool,
    pub trackers: Vec<String>,
    pub cookie_keywords: Vec<String>,
    pub rights_keywords: Vec<String>,
}

/// A page reduced to an excerpt plus its signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedPage {
    pub url: String,
    pub title: String,
    pub text_excerpt: String,
    pub signals: PageSignals,
}

/// Everything the scoring oracle gets to see about a site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceBundle {
    pub input_url: String,
    pub scanned_pages: Vec<ScannedPage>,
    pub discovered_policy_links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingCategory {
    #[serde(rename = "Privacy Policy")]
    PrivacyPolicy,
    #[serde(rename = "Cookies/Consent")]
    CookiesConsent,
    #[serde(rename = "Data Collection")]
    DataCollection,
    #[serde(rename = "User Rights")]
    UserRights,
    #[serde(rename = "Security/Transfers")]
    SecurityTransfers,
    Other,
}

impl FindingCategory {
    /// Wire names, in schema order
    pub const ALL: [&'static str; 6] = [
        "Privacy Policy",
        "Cookies/Consent",
        "Data Collection",
        "User Rights",
        "Security/Transfers",
        "Other",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [&'static str; 3] = ["low", "medium", "high"];

    /// Display rank: high sorts first
    fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }
}

/// A page excerpt backing a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Evidence {
    pub url: String,
    /// At most 200 characters
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Finding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub evidence: Vec<Evidence>,
    pub recommendation: String,
}

/// Final, clamped assessment of a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Always within 0..=100
    pub score: u8,
    pub summary: String,
    pub findings: Vec<Finding>,
    pub limitations: Vec<String>,
}

impl ScanResult {
    /// Findings ordered high, medium, low for display. Order within a
    /// severity is the order the oracle returned.
    pub fn findings_by_severity(&self) -> Vec<&Finding> {
        let mut sorted: Vec<&Finding> = self.findings.iter().collect();
        sorted.sort_by_key(|f| f.severity.rank());
        sorted
    }
}

/// Human label for a score band
pub fn risk_label(score: u8) -> &'static str {
    match score {
        80.. => "Low Risk Signals",
        50..=79 => "Moderate Risk Signals",
        20..=49 => "Significant Risk Signals",
        _ => "Major Risk Signals",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Running,
    Done,
    Error,
}

impl ScanStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanStatus::Done | ScanStatus::Error)
    }
}

/// The persisted view of one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub url: String,
    pub status: ScanStatus,
    pub score: Option<u8>,
    pub summary: Option<String>,
    pub findings: Option<ScanResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScanRecord {
    /// Create a pending record for a normalized URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            status: ScanStatus::Pending,
            score: None,
            summary: None,
            findings: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// pending -> running
    pub fn start(&mut self) {
        if self.status != ScanStatus::Pending {
            ::log::warn!("Scan {} cannot start from {:?}", self.id, self.status);
            return;
        }
        self.status = ScanStatus::Running;
    }

    /// running -> done
    pub fn complete(&mut self, result: ScanResult) {
        if self.status != ScanStatus::Running {
            ::log::warn!("Scan {} cannot complete from {:?}", self.id, self.status);
            return;
        }
        self.status = ScanStatus::Done;
        self.score = Some(result.score);
        self.summary = Some(result.summary.clone());
        self.findings = Some(result);
        self.completed_at = Some(Utc::now());
    }

    /// running -> error
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.status != ScanStatus::Running {
            ::log::warn!("Scan {} cannot fail from {:?}", self.id, self.status);
            return;
        }
        self.status = ScanStatus::Error;
        self.error = Some(message.into());
    }
}
