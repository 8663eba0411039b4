pub mod crawler;
pub mod web;

pub use crawler::{PageLoader, SiteCrawler};
pub use web::{BrowserSession, WebDriverCrawler, crawl_with};
