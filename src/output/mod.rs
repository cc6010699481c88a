//! Output module for persisting and reading back extracted documents
//!
//! This module handles:
//! - Buffering documents into fixed-size batches
//! - Writing batch files in the record format the loader expects
//! - Encoding and decoding the structured `content:` literal
//! - Loading batch files back for the retrieval pipeline
//! - Summarizing a crawl run

mod batch;
pub mod literal;
pub mod loader;
pub mod report;
mod traits;
mod writer;

pub use batch::{BatchAccumulator, BatchReceipt, FlushError};
pub use literal::{decode_content, encode_content};
pub use loader::{load_documents, LoadedDocument};
pub use report::{print_report, CrawlReport};
pub use traits::{BatchWriter, OutputError, OutputResult};
pub use writer::{batch_file_name, render_record, FileBatchWriter, RECORD_SEPARATOR};
