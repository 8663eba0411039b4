use crate::bundle::bundle;
use crate::config::ScannerConfig;
use crate::crawlers::{SiteCrawler, WebDriverCrawler};
use crate::error::ScanError;
use crate::evaluator::Evaluator;
use crate::results::{ScanRecord, ScanResult};
use crate::utils::normalize_input_url;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

/// Where scan records live between the `running` write and the terminal write
pub trait ScanStore {
    fn insert(&self, record: &ScanRecord) -> impl Future<Output = Result<(), ScanError>> + Send;

    fn update(&self, record: &ScanRecord) -> impl Future<Output = Result<(), ScanError>> + Send;

    fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<ScanRecord>, ScanError>> + Send;

    /// All records, newest first
    fn list(&self) -> impl Future<Output = Result<Vec<ScanRecord>, ScanError>> + Send;
}

/// Process-local scan store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Uuid, ScanRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanStore for MemoryStore {
    async fn insert(&self, record: &ScanRecord) -> Result<(), ScanError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.id) {
            return Err(ScanError::Store(format!("scan {} already exists", record.id)));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &ScanRecord) -> Result<(), ScanError> {
        let mut records = self.records.lock().await;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(ScanError::Store(format!("scan {} not found", record.id))),
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<ScanRecord>, ScanError> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ScanRecord>, ScanError> {
        let mut all: Vec<ScanRecord> = self.records.lock().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

/// Runs crawl, bundle and evaluate for one URL and records the outcome.
pub struct Scanner<C, S> {
    crawler: C,
    evaluator: Evaluator,
    store: S,
}

impl Scanner<WebDriverCrawler, MemoryStore> {
    /// Browser-backed scanner with an in-memory record store
    pub fn from_config(config: &ScannerConfig) -> Result<Self, ScanError> {
        let crawler = WebDriverCrawler::new(config.crawler.clone());
        let evaluator = Evaluator::new(config.oracle.clone())?;
        Ok(Self::new(crawler, evaluator, MemoryStore::new()))
    }
}

impl<C: SiteCrawler, S: ScanStore> Scanner<C, S> {
    pub fn new(crawler: C, evaluator: Evaluator, store: S) -> Self {
        Self {
            crawler,
            evaluator,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scan `input` end to end.
    ///
    /// Input that is not a URL is rejected before anything is recorded.
    /// Otherwise a `running` record is written, then exactly one terminal
    /// update: `done` with the result, or `error` with the failure message.
    /// Partial evidence from a failed run is discarded.
    pub async fn scan(&self, input: &str) -> Result<ScanRecord, ScanError> {
        let url = normalize_input_url(input)?;

        let mut record = ScanRecord::new(url.as_str());
        record.start();
        self.store.insert(&record).await?;
        ::log::info!("Scan {} running for {}", record.id, record.url);

        match self.run(&url).await {
            Ok(result) => {
                ::log::info!("Scan {} done with score {}", record.id, result.score);
                record.complete(result);
            }
            Err(e) => {
                ::log::error!("Scan {} failed: {}", record.id, e);
                record.fail(e.to_string());
            }
        }

        self.store.update(&record).await?;
        Ok(record)
    }

    /// Crawl, bundle and evaluate without touching the store
    pub async fn run(&self, url: &Url) -> Result<ScanResult, ScanError> {
        // Fail before spending a crawl on a scan that cannot be scored
        self.evaluator.ensure_configured()?;

        let crawl = self.crawler.crawl(url).await?;
        let evidence = bundle(&crawl.pages, &crawl.discovered_policy_links, url.as_str());
        self.evaluator.evaluate(&evidence).await
    }
}
