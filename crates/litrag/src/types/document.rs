//! Document, segment and chunk types

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An uploaded file, buffered once into an immutable blob.
///
/// Both the loader and the header extractor borrow the same bytes, so neither
/// consumer can exhaust the other's read.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as provided by the user
    pub filename: String,
    /// Full file contents
    pub data: Bytes,
}

impl UploadedFile {
    /// Wrap raw file contents
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// A text segment produced by the document loader.
///
/// Metadata starts out as whatever the loader recovered (including nulls and
/// composites) and is reduced to primitive values by the sanitizer before the
/// segment reaches the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Extracted text
    pub text: String,
    /// Segment metadata
    pub metadata: HashMap<String, Value>,
}

impl Segment {
    /// Create a segment
    pub fn new(text: impl Into<String>, metadata: HashMap<String, Value>) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded-length text window derived from a segment, the unit of embedding
/// and retrieval. Inherits its parent segment's sanitized metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Metadata inherited from the parent segment
    pub metadata: HashMap<String, Value>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: String, metadata: HashMap<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            metadata,
        }
    }
}
