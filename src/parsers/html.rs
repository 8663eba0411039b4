use crate::parsers::{ParseResult, text};
use scraper::{Html, Selector};

/// Elements whose whole subtree is chrome or code, never page prose
const SKIPPED_ELEMENTS: [&str; 7] = [
    "script", "style", "noscript", "template", "nav", "header", "footer",
];

/// Parses HTML content to extract text, title and links
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    let content = visible_text(&doc);
    let title = title(&doc);
    let links = links(&doc);

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    ParseResult::new(content, title, links)
}

/// Reduces HTML to bounded plain text with script, style and structural chrome removed
pub fn to_plain_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    visible_text(&doc)
}

fn visible_text(doc: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in doc.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            parts.push(&**fragment);
        }
    }

    text::clean(&parts.join(" "))
}

fn title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("static selector");
    doc.select(&selector)
        .next()
        .map(|el| text::normalize_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn links(doc: &Html) -> Vec<String> {
    let selector = Selector::parse("a[href], area[href]").expect("static selector");
    doc.select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect()
}
