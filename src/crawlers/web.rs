use crate::config::CrawlerConfig;
use crate::crawlers::crawler::{PageLoader, SiteCrawler};
use crate::error::{LoadError, ScanError};
use crate::filter::{self, UrlFilter, UrlFilterConfig};
use crate::parsers::html;
use crate::results::{CrawlResult, PageRecord};
use fantoccini::wd::{TimeoutConfiguration, WindowHandle};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Upper bound on tab teardown so a wedged browser cannot stall the crawl
const RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between `document.readyState` polls
const READY_POLL: Duration = Duration::from_millis(100);

/// Crawls a site through a WebDriver-controlled browser.
///
/// Each call to [`SiteCrawler::crawl`] opens its own browser session and
/// closes it before returning.
#[derive(Debug, Clone)]
pub struct WebDriverCrawler {
    config: CrawlerConfig,
    filter_config: UrlFilterConfig,
}

impl WebDriverCrawler {
    pub fn new(config: CrawlerConfig) -> Self {
        let mut filter_config = UrlFilterConfig::default();
        filter_config
            .exclude_patterns
            .extend(config.exclude_patterns.iter().cloned());
        Self {
            config,
            filter_config,
        }
    }
}

impl SiteCrawler for WebDriverCrawler {
    async fn crawl(&self, seed: &Url) -> Result<CrawlResult, ScanError> {
        ::log::info!("Starting crawl for: {}", seed);

        let url_filter = UrlFilter::new(seed, &self.filter_config)
            .map_err(|e| ScanError::Config(format!("invalid link pattern: {}", e)))?;

        let mut session = BrowserSession::connect(&self.config).await?;
        let result = crawl_with(&mut session, seed, &url_filter, self.config.max_pages).await;
        session.close().await;

        if let Ok(crawl) = &result {
            ::log::info!(
                "Crawl complete - {} pages loaded, {} policy links discovered",
                crawl.pages.len(),
                crawl.discovered_policy_links.len()
            );
        }
        result
    }
}

/// Bounded, policy-first crawl of a single site.
///
/// Loads the seed, then visits same-origin links from the seed page with
/// policy links ahead of everything else, until `max_pages` loads (seed
/// included) have been attempted. A secondary page that fails to load is
/// skipped; a seed that fails to load fails the crawl.
pub async fn crawl_with<L: PageLoader>(
    loader: &mut L,
    seed: &Url,
    url_filter: &UrlFilter,
    max_pages: usize,
) -> Result<CrawlResult, ScanError> {
    let seed = filter::normalize_url(seed);

    let seed_page = loader.load(&seed).await.map_err(|e| {
        ::log::error!("Failed to load seed page {}: {}", seed, e);
        ScanError::Crawl(format!("Failed to load {}: {}", seed, e))
    })?;
    ::log::info!("Loaded seed page: {}", seed);

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(filter::path_key(&seed));

    let (policy_links, candidates) = plan_visits(&seed, &seed_page.html, url_filter, &visited);

    let mut pages = vec![seed_page];
    let mut attempted = 1;

    for url in candidates {
        if attempted >= max_pages {
            ::log::debug!("Page cap of {} reached", max_pages);
            break;
        }
        if !visited.insert(filter::path_key(&url)) {
            ::log::trace!("Skipping already visited: {}", url);
            continue;
        }
        attempted += 1;

        match loader.load(&url).await {
            Ok(page) => {
                ::log::info!("Loaded page: {}", url);
                pages.push(page);
            }
            Err(e) => {
                ::log::warn!("Skipping {}: {}", url, e);
            }
        }
    }

    Ok(CrawlResult {
        pages,
        discovered_policy_links: policy_links,
    })
}

/// Classifies the seed page's links.
///
/// Returns every same-origin policy link seen (absolute, deduplicated,
/// discovery order, excluded assets included) and the visit order: unvisited
/// loadable policy links first, then the rest, each group in discovery order
/// with one entry per path.
fn plan_visits(
    seed: &Url,
    seed_html: &str,
    url_filter: &UrlFilter,
    visited: &HashSet<String>,
) -> (Vec<String>, Vec<Url>) {
    let parsed = html::parse(seed_html);

    let mut policy_links: Vec<String> = Vec::new();
    let mut policy_candidates: Vec<Url> = Vec::new();
    let mut other_candidates: Vec<Url> = Vec::new();
    let mut seen_paths: HashSet<String> = HashSet::new();

    for href in &parsed.links {
        let Some(url) = url_filter.resolve(seed, href) else {
            continue;
        };

        let is_policy = url_filter.is_policy_link(&url);
        if is_policy && !policy_links.iter().any(|l| l == url.as_str()) {
            ::log::debug!("Discovered policy link: {}", url);
            policy_links.push(url.to_string());
        }

        if url_filter.is_excluded(&url) {
            ::log::debug!("URL filter rejected: {}", url);
            continue;
        }

        let path = filter::path_key(&url);
        if visited.contains(&path) || !seen_paths.insert(path) {
            continue;
        }

        if is_policy {
            policy_candidates.push(url);
        } else {
            other_candidates.push(url);
        }
    }

    ::log::debug!(
        "Visit plan: {} policy candidates, {} other candidates",
        policy_candidates.len(),
        other_candidates.len()
    );

    policy_candidates.extend(other_candidates);
    (policy_links, policy_candidates)
}

/// A WebDriver browser session owned by one crawl.
///
/// Call [`BrowserSession::close`] when done; if a session is dropped without
/// being closed, the close is scheduled on the current runtime.
pub struct BrowserSession {
    client: Option<Client>,
    page_timeout: Duration,
    settle_grace: Duration,
}

impl BrowserSession {
    /// Connects to the configured WebDriver server, falling back to common
    /// local driver ports
    pub async fn connect(config: &CrawlerConfig) -> Result<Self, ScanError> {
        let client = connect_to_webdriver(config).await?;

        let timeouts = TimeoutConfiguration::new(None, Some(config.page_timeout()), None);
        if let Err(e) = client.update_timeouts(timeouts).await {
            ::log::warn!("Failed to set WebDriver page load timeout: {}", e);
        }

        Ok(Self {
            client: Some(client),
            page_timeout: config.page_timeout(),
            settle_grace: config.settle_grace(),
        })
    }

    /// Ends the WebDriver session
    pub async fn close(mut self) {
        if let Some(client) = self.client.take() {
            match client.close().await {
                Ok(()) => ::log::debug!("Browser session closed"),
                Err(e) => ::log::warn!("Failed to close browser session: {}", e),
            }
        }
    }

    /// Navigate the current tab and read the settled document
    async fn render(&self, client: &Client, url: &Url) -> Result<(String, String), LoadError> {
        client.goto(url.as_str()).await?;
        wait_for_dom_ready(client).await?;
        tokio::time::sleep(self.settle_grace).await;

        let html = client.source().await?;
        let title = client.title().await?;
        Ok((html, title))
    }
}

impl PageLoader for BrowserSession {
    async fn load(&mut self, url: &Url) -> Result<PageRecord, LoadError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| LoadError::Browser("browser session already closed".to_string()))?;

        let mut home: Option<WindowHandle> = None;
        let mut tab: Option<WindowHandle> = None;
        let outcome = timeout(self.page_timeout, async {
            home = Some(client.window().await?);
            let opened = client.new_window(true).await?;
            tab = Some(opened.handle.clone());
            client.switch_to_window(opened.handle).await?;
            let rendered = self.render(client, url).await?;
            Ok::<_, LoadError>(rendered)
        })
        .await;

        if let (Some(home), Some(tab)) = (home, tab) {
            release_tab(client, tab, home).await;
        }

        let (html, title) = match outcome {
            Ok(rendered) => rendered?,
            Err(_) => {
                ::log::warn!("Timeout loading: {}", url);
                return Err(LoadError::Timeout(self.page_timeout));
            }
        };

        Ok(PageRecord::new(url.as_str(), html, title))
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = client.close().await {
                        ::log::warn!("Failed to close dropped browser session: {}", e);
                    }
                });
            }
            Err(_) => {
                ::log::warn!("Browser session dropped outside a runtime; WebDriver session left open");
            }
        }
    }
}

/// Closes `tab` and returns focus to `home`. The tab is only closed once it
/// is current, since WebDriver closes whichever window has focus.
async fn release_tab(client: &Client, tab: WindowHandle, home: WindowHandle) {
    let released = timeout(RELEASE_TIMEOUT, async {
        match client.switch_to_window(tab).await {
            Ok(()) => {
                if let Err(e) = client.close_window().await {
                    ::log::warn!("Failed to close tab: {}", e);
                }
            }
            Err(e) => ::log::warn!("Failed to focus tab for closing: {}", e),
        }
        if let Err(e) = client.switch_to_window(home).await {
            ::log::warn!("Failed to switch back to main window: {}", e);
        }
    })
    .await;

    if released.is_err() {
        ::log::warn!("Timed out releasing tab");
    }
}

async fn wait_for_dom_ready(client: &Client) -> Result<(), LoadError> {
    loop {
        let state = client
            .execute("return document.readyState;", Vec::new())
            .await?;
        if state.as_str() != Some("loading") {
            return Ok(());
        }
        tokio::time::sleep(READY_POLL).await;
    }
}

/// Capabilities for a Chrome session
fn chrome_capabilities(config: &CrawlerConfig) -> serde_json::Map<String, serde_json::Value> {
    let mut args = vec![
        format!("--user-agent={}", config.user_agent),
        "--disable-gpu".to_string(),
        "--window-size=1366,900".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let mut caps = serde_json::Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(config: &CrawlerConfig) -> Result<Client, ScanError> {
    let caps = chrome_capabilities(config);

    let mut builder = ClientBuilder::native();
    builder.capabilities(caps.clone());
    let first_error = match builder.connect(&config.webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::warn!(
                "Failed to connect to WebDriver at {}: {}",
                config.webdriver_url,
                e
            );
            e
        }
    };

    // If we couldn't connect, try common local driver ports
    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == config.webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        let mut builder = ClientBuilder::native();
        builder.capabilities(caps.clone());
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScanError::Crawl(format!(
        "Failed to start browser session at {}: {}",
        config.webdriver_url, first_error
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Serves canned pages keyed by absolute URL; unknown URLs fail to load
    #[derive(Default)]
    struct ScriptedLoader {
        pages: HashMap<String, Result<String, Duration>>,
        calls: Vec<String>,
    }

    impl ScriptedLoader {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(html.to_string()));
            self
        }

        fn timeout(mut self, url: &str) -> Self {
            self.pages
                .insert(url.to_string(), Err(Duration::from_secs(15)));
            self
        }
    }

    impl PageLoader for ScriptedLoader {
        async fn load(&mut self, url: &Url) -> Result<PageRecord, LoadError> {
            self.calls.push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some(Ok(html)) => Ok(PageRecord::new(url.as_str(), html.clone(), "Title")),
                Some(Err(after)) => Err(LoadError::Timeout(*after)),
                None => Err(LoadError::Browser("net::ERR_NAME_NOT_RESOLVED".to_string())),
            }
        }
    }

    fn seed() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn default_filter() -> UrlFilter {
        UrlFilter::new(&seed(), &UrlFilterConfig::default()).unwrap()
    }

    fn anchors(paths: &[&str]) -> String {
        paths
            .iter()
            .map(|p| format!(r#"<a href="{}">link</a>"#, p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn urls(pages: &[PageRecord]) -> Vec<&str> {
        pages.iter().map(|p| p.url.as_str()).collect()
    }

    #[tokio::test]
    async fn test_seed_without_links() {
        let mut loader = ScriptedLoader::default().page("https://example.com/", "<p>Hi</p>");
        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(urls(&result.pages), vec!["https://example.com/"]);
        assert!(result.discovered_policy_links.is_empty());
    }

    #[tokio::test]
    async fn test_seed_failure_is_fatal() {
        let mut loader = ScriptedLoader::default().timeout("https://example.com/");
        let err = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::Crawl(_)));
        assert!(err.to_string().starts_with("Failed to load https://example.com/"));
        assert_eq!(loader.calls.len(), 1);
    }

    #[tokio::test]
    async fn test_policy_links_visited_first() {
        let html = anchors(&["/about", "/blog", "/terms", "/pricing", "/privacy"]);
        let mut loader = ScriptedLoader::default()
            .page("https://example.com/", &html)
            .page("https://example.com/about", "")
            .page("https://example.com/blog", "")
            .page("https://example.com/terms", "")
            .page("https://example.com/pricing", "")
            .page("https://example.com/privacy", "");

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(
            urls(&result.pages),
            vec![
                "https://example.com/",
                "https://example.com/terms",
                "https://example.com/privacy",
                "https://example.com/about",
                "https://example.com/blog",
            ]
        );
        assert_eq!(
            result.discovered_policy_links,
            vec!["https://example.com/terms", "https://example.com/privacy"]
        );
    }

    #[tokio::test]
    async fn test_privacy_policy_survives_many_links() {
        let mut paths: Vec<String> = (0..20).map(|i| format!("/product/{}", i)).collect();
        paths.push("/privacy-policy".to_string());
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();

        let mut loader = ScriptedLoader::default().page("https://example.com/", &anchors(&refs));
        for path in &paths {
            loader = loader.page(&format!("https://example.com{}", path), "<p>page</p>");
        }

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(result.pages.len(), 5);
        assert_eq!(result.pages[1].url, "https://example.com/privacy-policy");
        assert_eq!(
            result.discovered_policy_links,
            vec!["https://example.com/privacy-policy"]
        );
    }

    #[tokio::test]
    async fn test_policy_links_recorded_beyond_cap() {
        let html = anchors(&[
            "/privacy",
            "/cookies",
            "/terms",
            "/legal",
            "/gdpr",
            "/impressum",
        ]);
        let mut loader = ScriptedLoader::default().page("https://example.com/", &html);
        for path in ["/privacy", "/cookies", "/terms", "/legal", "/gdpr", "/impressum"] {
            loader = loader.page(&format!("https://example.com{}", path), "");
        }

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(result.pages.len(), 5);
        assert_eq!(result.discovered_policy_links.len(), 6);
        assert!(
            result
                .discovered_policy_links
                .contains(&"https://example.com/impressum".to_string())
        );
        assert!(!loader.calls.contains(&"https://example.com/impressum".to_string()));
    }

    #[tokio::test]
    async fn test_secondary_timeout_is_skipped() {
        let html = anchors(&["/privacy", "/about", "/contact"]);
        let mut loader = ScriptedLoader::default()
            .page("https://example.com/", &html)
            .timeout("https://example.com/privacy")
            .page("https://example.com/about", "")
            .page("https://example.com/contact", "");

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(
            urls(&result.pages),
            vec![
                "https://example.com/",
                "https://example.com/about",
                "https://example.com/contact",
            ]
        );
        // Still discovered even though it never loaded
        assert_eq!(
            result.discovered_policy_links,
            vec!["https://example.com/privacy"]
        );
    }

    #[tokio::test]
    async fn test_failed_loads_count_toward_cap() {
        let html = anchors(&["/a", "/b", "/c"]);
        let mut loader = ScriptedLoader::default()
            .page("https://example.com/", &html)
            .page("https://example.com/b", "")
            .page("https://example.com/c", "");

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 3)
            .await
            .unwrap();

        assert_eq!(
            urls(&result.pages),
            vec!["https://example.com/", "https://example.com/b"]
        );
        assert_eq!(loader.calls.len(), 3);
    }

    #[tokio::test]
    async fn test_dedupes_by_path_and_scope() {
        let html = anchors(&[
            "/",
            "#top",
            "/about",
            "/about#team",
            "/about?ref=nav",
            "https://example.com/about",
            "https://other.com/privacy",
            "http://example.com/terms",
            "mailto:hello@example.com",
            "/logo.png",
            "http://[::1",
        ]);
        let mut loader = ScriptedLoader::default()
            .page("https://example.com/", &html)
            .page("https://example.com/about", "");

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(
            urls(&result.pages),
            vec!["https://example.com/", "https://example.com/about"]
        );
        assert!(result.discovered_policy_links.is_empty());

        let paths: HashSet<String> = result
            .pages
            .iter()
            .map(|p| filter::path_key(&Url::parse(&p.url).unwrap()))
            .collect();
        assert_eq!(paths.len(), result.pages.len());
    }

    #[tokio::test]
    async fn test_relative_links_resolve_against_seed() {
        let seed = Url::parse("https://example.com/shop/index.html").unwrap();
        let filter = UrlFilter::new(&seed, &UrlFilterConfig::default()).unwrap();
        let mut loader = ScriptedLoader::default()
            .page("https://example.com/shop/index.html", &anchors(&["cookie-policy"]))
            .page("https://example.com/shop/cookie-policy", "");

        let result = crawl_with(&mut loader, &seed, &filter, 5).await.unwrap();

        assert_eq!(
            result.discovered_policy_links,
            vec!["https://example.com/shop/cookie-policy"]
        );
        assert_eq!(result.pages.len(), 2);
    }

    #[tokio::test]
    async fn test_policy_assets_recorded_not_loaded() {
        let html = anchors(&["/privacy-policy.pdf", "/legal/terms.pdf", "/about"]);
        let mut loader = ScriptedLoader::default()
            .page("https://example.com/", &html)
            .page("https://example.com/about", "");

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(
            result.discovered_policy_links,
            vec![
                "https://example.com/privacy-policy.pdf",
                "https://example.com/legal/terms.pdf",
            ]
        );
        assert_eq!(
            loader.calls,
            vec!["https://example.com/", "https://example.com/about"]
        );
    }

    #[tokio::test]
    async fn test_assets_with_query_not_loaded() {
        let html = anchors(&["/static/app.js?v=3", "/logo.png?w=200", "/contact"]);
        let mut loader = ScriptedLoader::default()
            .page("https://example.com/", &html)
            .page("https://example.com/contact", "");

        let result = crawl_with(&mut loader, &seed(), &default_filter(), 5)
            .await
            .unwrap();

        assert_eq!(
            urls(&result.pages),
            vec!["https://example.com/", "https://example.com/contact"]
        );
        assert_eq!(loader.calls.len(), 2);
    }

    #[test]
    fn test_chrome_capabilities() {
        let mut config = CrawlerConfig::default();
        let caps = chrome_capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert!(args.iter().any(|a| a.as_str().unwrap().starts_with("--user-agent=Mozilla")));

        config.headless = false;
        let caps = chrome_capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }

    mod browser_session {
        use super::*;
        use std::time::Instant;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn ok(value: serde_json::Value) -> ResponseTemplate {
            ResponseTemplate::new(200).set_body_json(json!({ "value": value }))
        }

        /// A WebDriver endpoint with one session (`s1`) and one window (`home`)
        async fn driver() -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/session"))
                .respond_with(ok(json!({ "sessionId": "s1", "capabilities": {} })))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/session/s1/timeouts"))
                .respond_with(ok(json!(null)))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/session/s1/window"))
                .respond_with(ok(json!("home")))
                .mount(&server)
                .await;
            Mock::given(method("DELETE"))
                .and(path("/session/s1/window"))
                .respond_with(ok(json!(["home"])))
                .mount(&server)
                .await;
            server
        }

        fn config(server: &MockServer) -> CrawlerConfig {
            CrawlerConfig {
                webdriver_url: server.uri(),
                page_timeout_secs: 1,
                settle_grace_ms: 0,
                ..CrawlerConfig::default()
            }
        }

        async fn requests(server: &MockServer, verb: &str, route: &str) -> Vec<serde_json::Value> {
            server
                .received_requests()
                .await
                .unwrap()
                .into_iter()
                .filter(|r| r.method.as_str() == verb && r.url.path() == route)
                .map(|r| serde_json::from_slice(&r.body).unwrap_or(serde_json::Value::Null))
                .collect()
        }

        #[tokio::test]
        async fn test_tab_setup_bounded_by_page_timeout() {
            let server = driver().await;
            Mock::given(method("POST"))
                .and(path("/session/s1/window/new"))
                .respond_with(
                    ok(json!({ "handle": "tab-1", "type": "tab" }))
                        .set_delay(Duration::from_secs(3)),
                )
                .mount(&server)
                .await;

            let mut session = BrowserSession::connect(&config(&server)).await.unwrap();
            let url = Url::parse("https://example.com/").unwrap();

            let started = Instant::now();
            let err = session.load(&url).await.unwrap_err();
            assert!(started.elapsed() < Duration::from_millis(2500));
            assert!(matches!(err, LoadError::Timeout(t) if t == Duration::from_secs(1)));

            session.close().await;
        }

        #[tokio::test]
        async fn test_tab_closed_when_switch_fails() {
            let server = driver().await;
            Mock::given(method("POST"))
                .and(path("/session/s1/window/new"))
                .respond_with(ok(json!({ "handle": "tab-1", "type": "tab" })))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/session/s1/window"))
                .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                    "value": {
                        "error": "no such window",
                        "message": "window not ready",
                        "stacktrace": ""
                    }
                })))
                .up_to_n_times(1)
                .with_priority(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/session/s1/window"))
                .respond_with(ok(json!(null)))
                .mount(&server)
                .await;

            let mut session = BrowserSession::connect(&config(&server)).await.unwrap();
            let url = Url::parse("https://example.com/").unwrap();

            let err = session.load(&url).await.unwrap_err();
            assert!(matches!(err, LoadError::Browser(_)));

            let closes = requests(&server, "DELETE", "/session/s1/window").await;
            assert_eq!(closes.len(), 1);

            let switches = requests(&server, "POST", "/session/s1/window").await;
            let handles: Vec<&str> = switches
                .iter()
                .filter_map(|body| body["handle"].as_str())
                .collect();
            assert_eq!(handles, vec!["tab-1", "tab-1", "home"]);

            session.close().await;
        }
    }
}
