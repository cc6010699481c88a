//! HTML parser for fetched pages
//!
//! This module turns a page body into everything the crawl loop needs:
//! - Page title (from the `<title>` tag)
//! - Raw link hrefs to offer to the frontier
//! - Structured content, when the page is a content page

use crate::crawler::extractor::extract_content;
use crate::document::PageContent;
use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title, whitespace collapsed onto one line
    pub title: Option<String>,

    /// Raw `href` values in document order, unresolved
    pub hrefs: Vec<String>,

    /// Structured content, `None` for non-content pages
    pub content: Option<PageContent>,
}

/// Parses HTML content and extracts title, links and content
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">` on the page
///
/// **Exclude:** `<a href="..." download>`
///
/// Scheme, scope and fragment filtering happen later, in the frontier.
///
/// # Example
///
/// ```
/// use docscribe::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_page(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.hrefs, vec!["/page"]);
/// assert!(parsed.content.is_none());
/// ```
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        hrefs: extract_hrefs(&document),
        content: extract_content(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

/// Extracts the raw href of every followable anchor
fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
