use crate::error::{LoadError, ScanError};
use crate::results::{CrawlResult, PageRecord};
use std::future::Future;
use url::Url;

/// Loads one page at a time through some rendering backend
pub trait PageLoader {
    /// Render `url` and return its final HTML and title.
    ///
    /// Implementations bound the load by their own timeout and release any
    /// per-page resources before returning, on success or failure.
    fn load(&mut self, url: &Url) -> impl Future<Output = Result<PageRecord, LoadError>> + Send;
}

/// Produces a bounded page set for a seed URL
pub trait SiteCrawler {
    /// Crawl from `seed`; fails only if the seed page itself cannot be loaded
    fn crawl(&self, seed: &Url) -> impl Future<Output = Result<CrawlResult, ScanError>> + Send;
}
