//! Batch file loader
//!
//! Reads the batch files a crawl produced back into documents, following the
//! same delimiters and literal encoding the writer uses. This is the contract
//! the downstream document-loading pipeline relies on.

use crate::document::PageContent;
use crate::output::literal::decode_content;
use crate::output::traits::{OutputError, OutputResult};
use crate::output::writer::RECORD_SEPARATOR;
use std::path::{Path, PathBuf};

/// A document read back from a batch file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// `<url>_<n>` where `n` counts documents across the whole load
    pub id: String,
    pub url: String,
    pub title: String,
    pub content: PageContent,
}

impl LoadedDocument {
    /// Flattens the content into a single text for embedding
    ///
    /// Prose fragments are joined with blank lines, followed by each code
    /// block as a fenced block tagged with its language.
    pub fn flattened(&self) -> String {
        let mut full = self.content.text.join("\n\n");
        if !self.content.code_blocks.is_empty() {
            let blocks: Vec<String> = self
                .content
                .code_blocks
                .iter()
                .map(|block| format!("```{}\n{}\n```", block.language, block.code))
                .collect();
            full.push_str("\n\n");
            full.push_str(&blocks.join("\n\n"));
        }
        full
    }
}

/// A record as it appears in a batch file, before ids are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    pub url: String,
    pub title: String,
    pub content: PageContent,
}

/// Loads every batch file in a directory
///
/// Files are read in batch-number order (files whose name carries no number
/// come last, by name). Blocks that cannot be parsed are logged and skipped;
/// only I/O errors fail the load.
pub fn load_documents(directory: &Path) -> OutputResult<Vec<LoadedDocument>> {
    let mut documents = Vec::new();

    for path in batch_files(directory)? {
        let text = std::fs::read_to_string(&path)?;
        let file = path.display().to_string();

        for record in parse_batch(&text, &file) {
            let id = format!("{}_{}", record.url, documents.len());
            documents.push(LoadedDocument {
                id,
                url: record.url,
                title: record.title,
                content: record.content,
            });
        }
        tracing::debug!("Loaded documents from {}", file);
    }

    Ok(documents)
}

/// Lists the `*.txt` files of a directory in batch order
pub fn batch_files(directory: &Path) -> OutputResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();

    files.sort_by_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (batch_number_of(&name).unwrap_or(u32::MAX), name)
    });
    Ok(files)
}

/// Extracts `N` from `<prefix>_batch_<N>.txt`
fn batch_number_of(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(".txt")?;
    let (_, number) = stem.rsplit_once("_batch_")?;
    number.parse().ok()
}

/// Parses the text of one batch file; malformed blocks are skipped with a warning
///
/// Records are split on separator *lines*, so a run of 80 `=` inside a
/// content literal never splits a record.
pub fn parse_batch(text: &str, file: &str) -> Vec<BatchRecord> {
    let separator = format!("\n{}\n", RECORD_SEPARATOR);
    text.split(separator.as_str())
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| match parse_record(block, file) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping record: {}", e);
                None
            }
        })
        .collect()
}

/// Parses one record block
pub fn parse_record(block: &str, file: &str) -> OutputResult<BatchRecord> {
    let malformed = |message: &str| OutputError::MalformedRecord {
        file: file.to_string(),
        message: message.to_string(),
    };

    let url = header_field(block, "url: ").ok_or_else(|| malformed("missing url"))?;
    let title = header_field(block, "title: ").ok_or_else(|| malformed("missing title"))?;

    // The content field starts a line; titles may contain "content: " too
    let start = block
        .find("\ncontent: ")
        .ok_or_else(|| malformed("missing content"))?
        + "\ncontent: ".len();
    let end = block[start..]
        .find("\n---")
        .map(|offset| start + offset)
        .ok_or_else(|| malformed("content is not terminated by ---"))?;

    let literal = block[start..end].trim();
    if !(literal.starts_with('{') && literal.ends_with('}')) {
        return Err(malformed("content is not a mapping"));
    }

    let content = decode_content(literal).map_err(|e| OutputError::MalformedRecord {
        file: file.to_string(),
        message: format!("{} ({})", e, url),
    })?;

    Ok(BatchRecord {
        url,
        title,
        content,
    })
}

/// Returns the trimmed value of the first line starting with `prefix`
fn header_field(block: &str, prefix: &str) -> Option<String> {
    block
        .lines()
        .find_map(|line| line.strip_prefix(prefix))
        .map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CodeBlock, Document};
    use crate::output::traits::BatchWriter;
    use crate::output::writer::{render_batch, FileBatchWriter};
    use tempfile::TempDir;

    fn document(url: &str, title: &str, text: &[&str], code: &[(&str, &str)]) -> Document {
        Document::new(
            url,
            Some(title.to_string()),
            PageContent {
                text: text.iter().map(|s| s.to_string()).collect(),
                code_blocks: code
                    .iter()
                    .map(|(lang, code)| CodeBlock::new(*lang, *code))
                    .collect(),
            },
        )
    }

    #[test]
    fn test_written_documents_load_back_identically() {
        let docs = vec![
            document(
                "https://example.com/docs/a",
                "Alpha",
                &["Intro", "It's \"quoted\"", ""],
                &[("python", "def f():\n    return '}\\n---'\n"), ("", "")],
            ),
            document("https://example.com/docs/b", "Beta", &[], &[]),
        ];

        let records = parse_batch(&render_batch(&docs), "mem");
        assert_eq!(records.len(), 2);
        for (record, doc) in records.iter().zip(&docs) {
            assert_eq!(record.url, doc.url());
            assert_eq!(record.title, doc.title());
            assert_eq!(&record.content, doc.content());
        }
    }

    #[test]
    fn test_title_mentioning_content_field_loads_back() {
        let docs = vec![document(
            "https://example.com/docs/tutorial/body/",
            "Request Body content: JSON",
            &["Declare the body content: as a model"],
            &[("python", "content: {'a': 1}\n---\n")],
        )];

        let records = parse_batch(&render_batch(&docs), "mem");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, docs[0].url());
        assert_eq!(records[0].title, "Request Body content: JSON");
        assert_eq!(&records[0].content, docs[0].content());
    }

    #[test]
    fn test_separator_inside_content_does_not_split() {
        let underline = "=".repeat(80);
        let code = format!("Title\n{}\n", underline);
        let docs = vec![document(
            "https://example.com/docs/rst",
            "RST",
            &[underline.as_str()],
            &[("rst", code.as_str())],
        )];

        let records = parse_batch(&render_batch(&docs), "mem");
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0].content, docs[0].content());
    }

    #[test]
    fn test_load_documents_from_directory() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileBatchWriter::new(dir.path(), "docs").unwrap();

        writer
            .write_batch(
                2,
                &[document("https://example.com/docs/c", "C", &["third"], &[])],
            )
            .unwrap();
        writer
            .write_batch(
                1,
                &[
                    document("https://example.com/docs/a", "A", &["first"], &[]),
                    document("https://example.com/docs/b", "B", &["second"], &[]),
                ],
            )
            .unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let loaded = load_documents(dir.path()).unwrap();
        let urls: Vec<_> = loaded.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/docs/a",
                "https://example.com/docs/b",
                "https://example.com/docs/c"
            ]
        );
        assert_eq!(loaded[0].id, "https://example.com/docs/a_0");
        assert_eq!(loaded[2].id, "https://example.com/docs/c_2");
    }

    #[test]
    fn test_batch_files_sorted_numerically() {
        let dir = TempDir::new().unwrap();
        for name in ["docs_batch_10.txt", "docs_batch_2.txt", "docs_batch_1.txt", "other.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let names: Vec<String> = batch_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["docs_batch_1.txt", "docs_batch_2.txt", "docs_batch_10.txt", "other.txt"]
        );
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let good = render_batch(&[document("https://example.com/docs/a", "A", &["x"], &[])]);
        let text = format!(
            "{}url: https://example.com/docs/broken\ntitle: Broken\ncontent: {{'text': [\n---\n\n\n{}\n\n",
            good, RECORD_SEPARATOR
        );
        let records = parse_batch(&text, "mem");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com/docs/a");
    }

    #[test]
    fn test_parse_record_errors() {
        assert!(matches!(
            parse_record("title: x\ncontent: {}\n---\n", "f"),
            Err(OutputError::MalformedRecord { .. })
        ));
        assert!(parse_record("url: u\ntitle: t\ncontent: {}\n", "f").is_err());
        assert!(parse_record("url: u\ntitle: t\ncontent: ['x']\n---\n", "f").is_err());
        assert!(parse_record("url: u\ntitle: t\ncontent: {}\n---\n", "f").is_ok());
    }

    #[test]
    fn test_flattened() {
        let doc = LoadedDocument {
            id: "u_0".to_string(),
            url: "u".to_string(),
            title: "t".to_string(),
            content: PageContent {
                text: vec!["One".to_string(), "Two".to_string()],
                code_blocks: vec![CodeBlock::new("python", "x = 1")],
            },
        };
        assert_eq!(doc.flattened(), "One\n\nTwo\n\n```python\nx = 1\n```");

        let prose_only = LoadedDocument {
            content: PageContent {
                text: vec!["Only".to_string()],
                code_blocks: vec![],
            },
            ..doc
        };
        assert_eq!(prose_only.flattened(), "Only");
    }
}
