//! Content extraction from parsed documentation pages
//!
//! Prose comes from the page's `<article>` element only. Code blocks are
//! collected from every `<pre>` on the page, including ones outside the
//! article (tabbed examples are often rendered next to it).

use crate::document::{CodeBlock, PageContent};
use scraper::{ElementRef, Html, Selector};

/// Elements whose text becomes a prose fragment
const PROSE_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li";

/// Class prefix carrying a code block's language
const LANGUAGE_CLASS_PREFIX: &str = "language-";

/// Extracts the structured content of a page
///
/// Returns `None` when the page has no `<article>` element; such pages are not
/// content pages and produce no document. Missing substructure inside a
/// content page yields empty lists, never an error.
///
/// # Example
///
/// ```
/// use docscribe::crawler::extract_content;
/// use scraper::Html;
///
/// let html = Html::parse_document(
///     r#"<article><h1>Intro</h1><pre><code class="language-python">print(1)</code></pre></article>"#,
/// );
/// let content = extract_content(&html).unwrap();
/// assert_eq!(content.text, vec!["Intro"]);
/// assert_eq!(content.code_blocks[0].language, "python");
/// ```
pub fn extract_content(document: &Html) -> Option<PageContent> {
    let article_selector = Selector::parse("article").ok()?;
    let article = document.select(&article_selector).next()?;

    Some(PageContent {
        text: extract_prose(article),
        code_blocks: extract_code_blocks(document),
    })
}

/// Collects one flattened text fragment per prose element, in document order
fn extract_prose(container: ElementRef<'_>) -> Vec<String> {
    let Ok(selector) = Selector::parse(PROSE_SELECTOR) else {
        return Vec::new();
    };

    container
        .select(&selector)
        .map(flatten_text)
        .collect()
}

/// Joins an element's text nodes, trims it and collapses inner whitespace
fn flatten_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collects every `<pre>` region of the page with its language tag
fn extract_code_blocks(document: &Html) -> Vec<CodeBlock> {
    let (Ok(pre_selector), Ok(code_selector)) = (Selector::parse("pre"), Selector::parse("code"))
    else {
        return Vec::new();
    };

    document
        .select(&pre_selector)
        .map(|pre| {
            let code = pre.text().collect::<String>();
            let language = pre
                .select(&code_selector)
                .next()
                .and_then(language_tag)
                .unwrap_or_default();
            CodeBlock { language, code }
        })
        .collect()
}

/// Returns the `<tag>` of the first `language-<tag>` class on the element
fn language_tag(code: ElementRef<'_>) -> Option<String> {
    code.value()
        .classes()
        .find_map(|class| class.strip_prefix(LANGUAGE_CLASS_PREFIX))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Option<PageContent> {
        extract_content(&Html::parse_document(html))
    }

    #[test]
    fn test_no_article_is_not_a_content_page() {
        let html = r#"<html><body><p>Hello</p><pre><code>x = 1</code></pre></body></html>"#;
        assert_eq!(extract(html), None);
    }

    #[test]
    fn test_empty_article() {
        let content = extract("<html><body><article></article></body></html>").unwrap();
        assert!(content.text.is_empty());
        assert!(content.code_blocks.is_empty());
    }

    #[test]
    fn test_prose_in_document_order() {
        let html = r#"
            <html><body>
            <p>Outside the article</p>
            <article>
                <h1>Title</h1>
                <p>First paragraph</p>
                <ul><li>One</li><li>Two</li></ul>
                <h3>Sub</h3>
                <div>Not prose</div>
                <h6>Deep</h6>
            </article>
            </body></html>
        "#;
        let content = extract(html).unwrap();
        assert_eq!(
            content.text,
            vec!["Title", "First paragraph", "One", "Two", "Sub", "Deep"]
        );
    }

    #[test]
    fn test_prose_whitespace_is_collapsed() {
        let html = "<article><p>\n   Hello   <b>bold</b>\n\tworld  </p></article>";
        let content = extract(html).unwrap();
        assert_eq!(content.text, vec!["Hello bold world"]);
    }

    #[test]
    fn test_empty_fragments_are_kept() {
        let html = "<article><p>   </p><p>Text</p><li></li></article>";
        let content = extract(html).unwrap();
        assert_eq!(content.text, vec!["", "Text", ""]);
    }

    #[test]
    fn test_nested_prose_elements_each_produce_a_fragment() {
        let html = "<article><li><p>Inner</p></li></article>";
        let content = extract(html).unwrap();
        assert_eq!(content.text, vec!["Inner", "Inner"]);
    }

    #[test]
    fn test_code_language_from_class() {
        let html = r#"<article><pre><code class="language-python">print("hi")</code></pre></article>"#;
        let content = extract(html).unwrap();
        assert_eq!(
            content.code_blocks,
            vec![CodeBlock::new("python", "print(\"hi\")")]
        );
    }

    #[test]
    fn test_language_class_not_first() {
        let html = r#"<article><pre><code class="highlight language-bash">ls</code></pre></article>"#;
        let content = extract(html).unwrap();
        assert_eq!(content.code_blocks[0].language, "bash");
    }

    #[test]
    fn test_code_without_language() {
        let html = r#"<article><pre><code class="highlight">x</code></pre><pre>plain</pre></article>"#;
        let content = extract(html).unwrap();
        assert_eq!(
            content.code_blocks,
            vec![CodeBlock::new("", "x"), CodeBlock::new("", "plain")]
        );
    }

    #[test]
    fn test_code_text_is_not_trimmed() {
        let html = "<article><pre><code>  def f():\n      return 1\n</code></pre></article>";
        let content = extract(html).unwrap();
        assert_eq!(content.code_blocks[0].code, "  def f():\n      return 1\n");
    }

    #[test]
    fn test_code_spans_are_flattened() {
        let html = r#"<article><pre><code class="language-py"><span class="k">import</span> <span>os</span></code></pre></article>"#;
        let content = extract(html).unwrap();
        assert_eq!(content.code_blocks[0].code, "import os");
    }

    #[test]
    fn test_empty_code_block_is_kept() {
        let html = "<article><pre></pre></article>";
        let content = extract(html).unwrap();
        assert_eq!(content.code_blocks, vec![CodeBlock::new("", "")]);
    }

    #[test]
    fn test_code_outside_article_is_collected() {
        let html = r#"
            <html><body>
            <article><p>Text</p></article>
            <aside><pre><code class="language-toml">[a]</code></pre></aside>
            </body></html>
        "#;
        let content = extract(html).unwrap();
        assert_eq!(content.code_blocks, vec![CodeBlock::new("toml", "[a]")]);
    }
}
