pub mod html;
pub mod signals;
pub mod text;


pub use html::to_plain_text;
pub use signals::{SignalRules, extract_signals};

/// Result of parsing a rendered page
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Bounded plain text with chrome removed
    pub content: String,
    /// Contents of `<title>`, if present and non-blank
    pub title: Option<String>,
    /// Raw hyperlink targets, in document order
    pub links: Vec<String>,
}

impl ParseResult {
    /// Creates a new parse result
    pub fn new(content: String, title: Option<String>, links: Vec<String>) -> Self {
        Self {
            content,
            title,
            links,
        }
    }
}
