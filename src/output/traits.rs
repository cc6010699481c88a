//! Output traits and error types
//!
//! This module defines the sink interface batches are written through and the
//! errors the output layer can produce.

use crate::document::Document;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid content literal at position {position}: {message}")]
    Literal { position: usize, message: String },

    #[error("Malformed record in {file}: {message}")]
    MalformedRecord { file: String, message: String },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination for complete batches
///
/// Implementations must either persist the whole batch or return an error;
/// the accumulator keeps its buffer when `write_batch` fails.
pub trait BatchWriter {
    /// Writes one batch and returns where it went
    fn write_batch(&mut self, batch_number: u32, documents: &[Document]) -> OutputResult<PathBuf>;
}

impl<W: BatchWriter + ?Sized> BatchWriter for Box<W> {
    fn write_batch(&mut self, batch_number: u32, documents: &[Document]) -> OutputResult<PathBuf> {
        (**self).write_batch(batch_number, documents)
    }
}
