//! Document ingestion: PDF loading, metadata sanitization, chunking

mod chunker;
mod loader;
mod sanitizer;

pub use chunker::TextChunker;
pub use loader::{content_hash, DocumentLoader, PdfLoader};
pub use sanitizer::{sanitize_metadata, sanitize_segment};
