//! Boundary with the external scoring oracle.
//!
//! The oracle is non-deterministic, so its reply is decoded strictly (unknown
//! fields and unknown enum values are rejected) and then normalized: the
//! score is rounded and clamped into 0..=100 and evidence snippets are cut
//! to 200 characters.

pub mod schema;


use crate::config::OracleConfig;
use crate::error::ScanError;
use crate::results::{EvidenceBundle, Finding, PageSignals, ScanResult};
use crate::utils::truncate_chars;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Longest evidence snippet kept from the oracle
pub const MAX_SNIPPET_CHARS: usize = 200;

/// Client for the scoring oracle
#[derive(Clone)]
pub struct Evaluator {
    config: OracleConfig,
    client: Client,
}

impl Evaluator {
    pub fn new(config: OracleConfig) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ScanError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Fails with `ScanError::Config` when no credential is set
    pub fn ensure_configured(&self) -> Result<&str, ScanError> {
        self.config
            .credential()
            .ok_or_else(|| ScanError::Config("OPENAI_API_KEY is not configured".to_string()))
    }

    /// Score an evidence bundle.
    ///
    /// No request is sent when the credential is missing.
    pub async fn evaluate(&self, bundle: &EvidenceBundle) -> Result<ScanResult, ScanError> {
        let api_key = self.ensure_configured()?;

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| ScanError::Config("invalid OPENAI_API_KEY".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = self.request_body(bundle)?;

        ::log::info!(
            "Sending {} scanned pages to scoring oracle ({})",
            bundle.scanned_pages.len(),
            self.config.model
        );
        let resp = self
            .client
            .post(&self.config.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            ::log::error!("Scoring oracle returned {}", status);
            return Err(ScanError::Oracle(format!(
                "scoring oracle error ({}): {}",
                status.as_u16(),
                text
            )));
        }

        let raw = resp.text().await?;
        let envelope: ResponseEnvelope = serde_json::from_str(&raw).map_err(|e| {
            ScanError::Parse(format!("scoring oracle response is not JSON: {}", e))
        })?;
        let output = envelope
            .output_text()
            .ok_or_else(|| ScanError::Parse("No text output from scoring oracle".to_string()))?;

        let result = parse_scan_result(output)?;
        ::log::info!(
            "Scoring oracle returned score {} with {} findings",
            result.score,
            result.findings.len()
        );
        Ok(result)
    }

    fn request_body(&self, bundle: &EvidenceBundle) -> Result<serde_json::Value, ScanError> {
        let compact = CompactBundle::new(bundle, self.config.excerpt_chars);
        let pretty = serde_json::to_string_pretty(&compact)
            .map_err(|e| ScanError::Oracle(format!("failed to encode evidence bundle: {}", e)))?;

        Ok(json!({
            "model": self.config.model,
            "instructions": schema::INSTRUCTIONS,
            "input": format!("{}{}", schema::INPUT_PREFIX, pretty),
            "text": schema::response_format(),
        }))
    }
}

/// The bundle as sent over the wire: excerpts shortened to bound request size
#[derive(Debug, Serialize)]
pub struct CompactBundle<'a> {
    input_url: &'a str,
    scanned_pages: Vec<CompactPage<'a>>,
    discovered_policy_links: &'a [String],
}

#[derive(Debug, Serialize)]
struct CompactPage<'a> {
    url: &'a str,
    title: &'a str,
    text_excerpt: String,
    signals: &'a PageSignals,
}

impl<'a> CompactBundle<'a> {
    pub fn new(bundle: &'a EvidenceBundle, excerpt_chars: usize) -> Self {
        Self {
            input_url: &bundle.input_url,
            scanned_pages: bundle
                .scanned_pages
                .iter()
                .map(|p| CompactPage {
                    url: &p.url,
                    title: &p.title,
                    text_excerpt: truncate_chars(&p.text_excerpt, excerpt_chars, ""),
                    signals: &p.signals,
                })
                .collect(),
            discovered_policy_links: &bundle.discovered_policy_links,
        }
    }
}

/// The parts of a Responses API envelope we read
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponseEnvelope {
    /// Text of the first `output_text` part of the first message
    fn output_text(&self) -> Option<&str> {
        self.output
            .iter()
            .find(|item| item.kind == "message")?
            .content
            .iter()
            .find(|part| part.kind == "output_text")?
            .text
            .as_deref()
    }
}

/// The reply exactly as the schema describes it, before normalization
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OracleReply {
    score: f64,
    summary: String,
    findings: Vec<Finding>,
    limitations: Vec<String>,
}

/// Decode the oracle's JSON text into a normalized `ScanResult`
pub fn parse_scan_result(text: &str) -> Result<ScanResult, ScanError> {
    let reply: OracleReply = serde_json::from_str(text).map_err(|e| {
        ScanError::Parse(format!("scoring oracle returned malformed result: {}", e))
    })?;

    let findings = reply
        .findings
        .into_iter()
        .map(|mut finding| {
            for evidence in &mut finding.evidence {
                evidence.snippet = truncate_chars(&evidence.snippet, MAX_SNIPPET_CHARS, "");
            }
            finding
        })
        .collect();

    Ok(ScanResult {
        score: clamp_score(reply.score),
        summary: reply.summary,
        findings,
        limitations: reply.limitations,
    })
}

/// Round to the nearest integer and clamp into 0..=100
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
