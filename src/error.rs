use std::time::Duration;
use thiserror::Error;

/// Errors that end a scan.
///
/// The `Display` output of each variant is stored verbatim in the terminal
/// scan record, so messages are written for the person reading the report.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The seed URL could not be parsed; raised before any I/O.
    #[error("invalid URL: {0}")]
    InvalidInput(String),

    /// The seed page could not be loaded.
    #[error("{0}")]
    Crawl(String),

    /// The scoring oracle is not configured.
    #[error("{0}")]
    Config(String),

    /// The scoring oracle call failed or returned a non-success status.
    #[error("{0}")]
    Oracle(String),

    /// The scoring oracle reply was not schema-conformant JSON.
    #[error("{0}")]
    Parse(String),

    /// The scan record store rejected a write.
    #[error("scan store error: {0}")]
    Store(String),
}

/// Failure to load a single page. Fatal only for the seed page.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("page load timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("browser error: {0}")]
    Browser(String),
}

impl From<fantoccini::error::CmdError> for LoadError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        LoadError::Browser(err.to_string())
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::Oracle(format!("scoring oracle request failed: {}", err))
    }
}
