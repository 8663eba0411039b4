use clap::{Parser, ValueEnum};
use site_signals::ScannerConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-signals")]
#[command(about = "Scan a website for privacy and consent compliance signals")]
#[command(version)]
pub struct Args {
    /// Website to scan (full URL or bare host)
    pub url: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Maximum pages to visit, seed included
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Per-page load timeout in seconds
    #[arg(long)]
    pub page_timeout: Option<u64>,

    /// Scoring model (overrides config and OPENAI_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    /// Build the effective configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<ScannerConfig, Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => ScannerConfig::from_file(path)?,
            None => ScannerConfig::default(),
        };
        let mut config = config.apply_env();

        if let Some(webdriver_url) = &self.webdriver_url {
            config.crawler.webdriver_url = webdriver_url.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages.max(1);
        }
        if let Some(page_timeout) = self.page_timeout {
            config.crawler.page_timeout_secs = page_timeout;
        }
        if let Some(model) = &self.model {
            config.oracle.model = model.clone();
        }
        Ok(config)
    }
}
