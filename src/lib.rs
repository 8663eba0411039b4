//! Compliance-signal scanning for websites.
//!
//! A scan visits a handful of pages on one site (policy pages first),
//! reduces each to text and heuristic signals, and asks an external scoring
//! oracle for a 0-100 risk score with itemized findings. The output is a set
//! of signals under explicit uncertainty, never a legal determination.

pub mod bundle;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use bundle::bundle;
pub use config::{CrawlerConfig, OracleConfig, ScannerConfig};
pub use crawlers::{PageLoader, SiteCrawler, WebDriverCrawler};
pub use error::{LoadError, ScanError};
pub use evaluator::Evaluator;
pub use parsers::{extract_signals, to_plain_text};
pub use pipeline::{MemoryStore, ScanStore, Scanner};
pub use results::{
    CrawlResult, EvidenceBundle, Finding, FindingCategory, PageRecord, PageSignals, ScanRecord,
    ScanResult, ScanStatus, ScannedPage, Severity,
};
