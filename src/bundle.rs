use crate::parsers::{extract_signals, html};
use crate::results::{EvidenceBundle, PageRecord, ScannedPage};

/// Title used when neither the browser nor the markup provides one
pub const UNTITLED: &str = "Untitled";

/// Reduces crawled pages to the evidence handed to the scoring oracle.
///
/// Never fails; page order is preserved.
pub fn bundle(
    pages: &[PageRecord],
    discovered_policy_links: &[String],
    input_url: &str,
) -> EvidenceBundle {
    let scanned_pages = pages.iter().map(scan_page).collect();

    EvidenceBundle {
        input_url: input_url.to_string(),
        scanned_pages,
        discovered_policy_links: discovered_policy_links.to_vec(),
    }
}

fn scan_page(page: &PageRecord) -> ScannedPage {
    let parsed = html::parse(&page.html);
    let signals = extract_signals(&page.html, &parsed.content);

    let title = Some(page.title.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or(parsed.title)
        .unwrap_or_else(|| UNTITLED.to_string());

    ScannedPage {
        url: page.url.clone(),
        title,
        text_excerpt: parsed.content,
        signals,
    }
}
