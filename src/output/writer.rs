//! Batch file writer
//!
//! Each batch becomes one UTF-8 text file, `<prefix>_batch_<N>.txt`, holding
//! one record per document in extraction order:
//!
//! ```text
//! url: <absolute URL>
//! title: <page title>
//! content: <literal mapping>
//! ---
//!
//!
//! ================================================================================
//!
//! ```

use crate::document::Document;
use crate::output::literal::encode_content;
use crate::output::traits::{BatchWriter, OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Separator line between records (80 `=` characters)
pub const RECORD_SEPARATOR: &str =
    "================================================================================";

/// Writes batches as text files in a directory
#[derive(Debug, Clone)]
pub struct FileBatchWriter {
    directory: PathBuf,
    prefix: String,
}

impl FileBatchWriter {
    /// Creates a writer; the directory is created if absent
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> OutputResult<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            prefix: prefix.into(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file for a given batch number
    pub fn batch_path(&self, batch_number: u32) -> PathBuf {
        self.directory
            .join(batch_file_name(&self.prefix, batch_number))
    }

    /// Deletes every `<prefix>_batch_<N>.txt` file in the directory
    ///
    /// Called before a new crawl starts numbering at 1, so no file from an
    /// earlier run survives next to the new batches. Other files are left
    /// alone. Returns the number of files removed.
    pub fn remove_batches(&self) -> OutputResult<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !self.is_batch_file_name(name) || !entry.file_type()?.is_file() {
                continue;
            }
            std::fs::remove_file(entry.path())?;
            tracing::debug!("Removed {}", entry.path().display());
            removed += 1;
        }
        Ok(removed)
    }

    fn is_batch_file_name(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix("_batch_"))
            .and_then(|rest| rest.strip_suffix(".txt"))
            .map(|number| !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }
}

impl BatchWriter for FileBatchWriter {
    fn write_batch(&mut self, batch_number: u32, documents: &[Document]) -> OutputResult<PathBuf> {
        let path = self.batch_path(batch_number);
        let rendered = render_batch(documents);

        let write = |path: &Path| -> std::io::Result<()> {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            file.sync_all()
        };

        write(&path).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(
            "Wrote batch {} ({} documents) to {}",
            batch_number,
            documents.len(),
            path.display()
        );
        Ok(path)
    }
}

/// File name for a batch: `<prefix>_batch_<N>.txt`
pub fn batch_file_name(prefix: &str, batch_number: u32) -> String {
    format!("{}_batch_{}.txt", prefix, batch_number)
}

/// Renders every document of a batch, concatenated in order
pub fn render_batch(documents: &[Document]) -> String {
    documents.iter().map(render_record).collect()
}

/// Renders a single document record including its trailing separator
pub fn render_record(document: &Document) -> String {
    format!(
        "url: {}\ntitle: {}\ncontent: {}\n---\n\n\n{}\n\n",
        single_line(document.url()),
        single_line(document.title()),
        encode_content(document.content()),
        RECORD_SEPARATOR
    )
}

/// Keeps header fields on their line
fn single_line(value: &str) -> String {
    if value.contains(['\n', '\r']) {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CodeBlock, PageContent};
    use tempfile::TempDir;

    fn document(n: usize) -> Document {
        Document::new(
            format!("https://example.com/docs/{}", n),
            Some(format!("Page {}", n)),
            PageContent {
                text: vec![format!("Paragraph {}", n)],
                code_blocks: vec![CodeBlock::new("python", "print(1)\n")],
            },
        )
    }

    #[test]
    fn test_remove_batches_only_touches_own_batch_files() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileBatchWriter::new(dir.path(), "docs").unwrap();
        writer.write_batch(1, &[document(1)]).unwrap();
        writer.write_batch(12, &[document(2)]).unwrap();

        for keep in ["notes.txt", "docs_batch_x.txt", "other_batch_1.txt", "docs_batch_1.txt.bak"] {
            std::fs::write(dir.path().join(keep), "keep").unwrap();
        }

        assert_eq!(writer.remove_batches().unwrap(), 2);
        assert!(!writer.batch_path(1).exists());
        assert!(!writer.batch_path(12).exists());
        for keep in ["notes.txt", "docs_batch_x.txt", "other_batch_1.txt", "docs_batch_1.txt.bak"] {
            assert!(dir.path().join(keep).exists(), "{} should be kept", keep);
        }

        assert_eq!(writer.remove_batches().unwrap(), 0);
    }

    #[test]
    fn test_separator_is_80_chars() {
        assert_eq!(RECORD_SEPARATOR.len(), 80);
        assert!(RECORD_SEPARATOR.chars().all(|c| c == '='));
    }

    #[test]
    fn test_render_record_layout() {
        let expected = format!(
            "url: https://example.com/docs/1\n\
             title: Page 1\n\
             content: {{'text': ['Paragraph 1'], 'code_blocks': [{{'language': 'python', 'code': 'print(1)\\n'}}]}}\n\
             ---\n\n\n{}\n\n",
            "=".repeat(80)
        );
        assert_eq!(render_record(&document(1)), expected);
    }

    #[test]
    fn test_multiline_title_is_flattened() {
        let doc = Document::new(
            "https://example.com/docs/a",
            Some("Line one\n  line two".to_string()),
            PageContent::default(),
        );
        assert!(render_record(&doc).contains("title: Line one line two\n"));
    }

    #[test]
    fn test_batch_file_name() {
        assert_eq!(batch_file_name("fastapi_docs", 3), "fastapi_docs_batch_3.txt");
    }

    #[test]
    fn test_write_batch_creates_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("docs");
        let mut writer = FileBatchWriter::new(&out, "docs").unwrap();

        let docs = vec![document(1), document(2)];
        let path = writer.write_batch(1, &docs).unwrap();

        assert_eq!(path, out.join("docs_batch_1.txt"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_batch(&docs));
        assert_eq!(written.matches(RECORD_SEPARATOR).count(), 2);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileBatchWriter::new(dir.path(), "docs").unwrap();
        // A directory where the batch file should go makes File::create fail
        std::fs::create_dir(dir.path().join("docs_batch_1.txt")).unwrap();

        let result = writer.write_batch(1, &[document(1)]);
        assert!(matches!(result, Err(OutputError::Write { .. })));
    }
}
