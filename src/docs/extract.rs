//! HTML to plain text for documentation pages.
//!
//! Picks the main content region with CSS selectors, skips navigation and
//! script noise inside it, and collapses whitespace.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Tried in order; the first region with any visible text wins.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    ".content",
    ".documentation",
    ".docs-content",
    "article",
    ".markdown-body",
    ".prose",
];

const NOISE_TAGS: &[&str] = &[
    "nav", "footer", "aside", "script", "style", "noscript", "template",
];

const NOISE_CLASSES: &[&str] = &["sidebar", "navigation"];

/// Extract visible text from an HTML document. Returns an empty string when
/// nothing readable is found.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(region) = document.select(&selector).next() {
            let text = region_text(region);
            if !text.is_empty() {
                return text;
            }
        }
    }

    if let Ok(body) = Selector::parse("body") {
        if let Some(region) = document.select(&body).next() {
            let text = region_text(region);
            if !text.is_empty() {
                return text;
            }
        }
    }

    region_text(document.root_element())
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn region_text(region: ElementRef<'_>) -> String {
    if is_noise(&region) {
        return String::new();
    }
    let mut parts = Vec::new();
    collect_text(region, &mut parts);
    normalize_whitespace(&parts.join(" "))
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push(text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if !is_noise(&child_el) {
                        collect_text(child_el, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_noise(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    NOISE_TAGS.contains(&value.name()) || value.classes().any(|c| NOISE_CLASSES.contains(&c))
}
