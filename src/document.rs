//! Document types produced by the content extractor
//!
//! A [`Document`] is built once per content page and never mutated afterwards;
//! the batch accumulator owns it until it has been written to disk.

/// A fenced code region found on a page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeBlock {
    /// Language tag taken from a `language-<tag>` class, or empty
    pub language: String,

    /// Raw text content of the code region, untrimmed
    pub code: String,
}

impl CodeBlock {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
        }
    }
}

/// Structured body of a content page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageContent {
    /// Prose fragments in document order, one per qualifying element
    pub text: Vec<String>,

    /// Code blocks in document order
    pub code_blocks: Vec<CodeBlock>,
}

/// An extracted content page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: String,
    title: String,
    content: PageContent,
}

impl Document {
    /// Creates a document, using the URL as the title when none is available
    pub fn new(url: impl Into<String>, title: Option<String>, content: PageContent) -> Self {
        let url = url.into();
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| url.clone());
        Self {
            url,
            title,
            content,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &PageContent {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_falls_back_to_url() {
        let doc = Document::new("https://example.com/docs/a", None, PageContent::default());
        assert_eq!(doc.title(), "https://example.com/docs/a");

        let doc = Document::new(
            "https://example.com/docs/a",
            Some("   ".to_string()),
            PageContent::default(),
        );
        assert_eq!(doc.title(), "https://example.com/docs/a");
    }

    #[test]
    fn test_title_kept_when_present() {
        let doc = Document::new(
            "https://example.com/docs/a",
            Some("Intro".to_string()),
            PageContent::default(),
        );
        assert_eq!(doc.title(), "Intro");
    }
}
