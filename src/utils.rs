use crate::error::ScanError;
use url::Url;

/// Turn user input into an absolute http(s) URL.
///
/// Bare hosts are assumed to be HTTPS. Nothing here touches the network.
pub fn normalize_input_url(input: &str) -> Result<Url, ScanError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidInput("URL is required".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ScanError::InvalidInput(format!("{}: {}", trimmed, e)))?;
    if url.host_str().is_none_or(|h| h.is_empty()) {
        return Err(ScanError::InvalidInput(format!("{}: missing host", trimmed)));
    }
    Ok(url)
}

/// Cut `text` to at most `max_chars` characters, appending `marker` when cut.
///
/// Counting is by `char`, so multi-byte text is never split mid-codepoint.
/// Text already within the bound is returned unchanged.
pub fn truncate_chars(text: &str, max_chars: usize, marker: &str) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => {
            let mut out = String::with_capacity(byte_idx + marker.len());
            out.push_str(&text[..byte_idx]);
            out.push_str(marker);
            out
        }
    }
}
