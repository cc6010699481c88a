//! Batch accumulator
//!
//! Buffers extracted documents and hands them to a [`BatchWriter`] in
//! fixed-size, sequentially numbered batches. The buffer is cleared only after
//! the writer confirms the batch is on disk.

use crate::document::Document;
use crate::output::traits::{BatchWriter, OutputError};
use std::path::PathBuf;
use thiserror::Error;

/// A batch that was written successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReceipt {
    pub batch_number: u32,
    pub documents: usize,
    pub path: PathBuf,
}

/// A batch that could not be written; its documents are still buffered
#[derive(Debug, Error)]
#[error("batch {batch_number} ({pending} documents) could not be written: {source}")]
pub struct FlushError {
    pub batch_number: u32,
    pub pending: usize,
    #[source]
    pub source: OutputError,
}

/// In-memory buffer of documents awaiting their batch
pub struct BatchAccumulator<W: BatchWriter> {
    writer: W,
    capacity: usize,
    buffer: Vec<Document>,
    batch_number: u32,
    documents_written: usize,
    batches_written: usize,
}

impl<W: BatchWriter> BatchAccumulator<W> {
    /// Creates an accumulator whose first batch is number 1
    pub fn new(writer: W, capacity: usize) -> Self {
        Self::starting_at(writer, capacity, 1)
    }

    /// Creates an accumulator continuing an earlier run's numbering
    pub fn starting_at(writer: W, capacity: usize, batch_number: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            writer,
            capacity,
            buffer: Vec::with_capacity(capacity),
            batch_number: batch_number.max(1),
            documents_written: 0,
            batches_written: 0,
        }
    }

    /// Buffers a document, flushing when the buffer reaches capacity
    ///
    /// Returns the receipt of the batch written by this call, if any.
    pub fn add(&mut self, document: Document) -> Result<Option<BatchReceipt>, FlushError> {
        self.buffer.push(document);
        if self.buffer.len() >= self.capacity {
            self.flush()
        } else {
            Ok(None)
        }
    }

    /// Writes the buffered documents as the current batch
    ///
    /// Does nothing when the buffer is empty, so it is safe to call
    /// unconditionally at the end of a crawl. On failure the buffer and the
    /// batch number are left untouched.
    pub fn flush(&mut self) -> Result<Option<BatchReceipt>, FlushError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let batch_number = self.batch_number;
        let path = self
            .writer
            .write_batch(batch_number, &self.buffer)
            .map_err(|source| FlushError {
                batch_number,
                pending: self.buffer.len(),
                source,
            })?;

        let documents = self.buffer.len();
        self.buffer.clear();
        self.batch_number += 1;
        self.documents_written += documents;
        self.batches_written += 1;

        tracing::info!(
            "Saved batch {} ({} documents) to {}",
            batch_number,
            documents,
            path.display()
        );

        Ok(Some(BatchReceipt {
            batch_number,
            documents,
            path,
        }))
    }

    /// Number of buffered, not yet written documents
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Number the next written batch will carry
    pub fn batch_number(&self) -> u32 {
        self.batch_number
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn documents_written(&self) -> usize {
        self.documents_written
    }

    pub fn batches_written(&self) -> usize {
        self.batches_written
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}
