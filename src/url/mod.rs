//! URL handling module for Docscribe
//!
//! This module resolves discovered links against the page they were found on
//! and decides which of them may enter the crawl frontier.

mod policy;

use url::Url;

pub use policy::{AdmissionPolicy, AdmissionRule};

/// Resolves a link href to an absolute URL
///
/// Returns None if the link can never be crawled:
/// - empty hrefs
/// - javascript:, mailto:, tel: schemes and data: URIs
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// Fragments are kept; the admission policy rejects them outright.
///
/// # Examples
///
/// ```
/// use docscribe::url::resolve_link;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/intro/").unwrap();
/// let resolved = resolve_link("../tutorial/", &page).unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/docs/tutorial/");
/// ```
pub fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match page_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_resolve_absolute() {
        let url = resolve_link("https://other.com/x", &page()).unwrap();
        assert_eq!(url.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_resolve_root_relative() {
        let url = resolve_link("/docs/other", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/other");
    }

    #[test]
    fn test_resolve_path_relative() {
        let url = resolve_link("sibling", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/sibling");
    }

    #[test]
    fn test_fragment_is_kept() {
        let url = resolve_link("#section", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/page#section");
        assert_eq!(url.fragment(), Some("section"));
    }

    #[test]
    fn test_skip_special_schemes() {
        assert!(resolve_link("javascript:void(0)", &page()).is_none());
        assert!(resolve_link("JavaScript:void(0)", &page()).is_none());
        assert!(resolve_link("mailto:test@example.com", &page()).is_none());
        assert!(resolve_link("tel:+1234567890", &page()).is_none());
        assert!(resolve_link("data:text/html,<h1>x</h1>", &page()).is_none());
        assert!(resolve_link("ftp://example.com/file", &page()).is_none());
    }

    #[test]
    fn test_skip_empty() {
        assert!(resolve_link("", &page()).is_none());
        assert!(resolve_link("   ", &page()).is_none());
    }
}
