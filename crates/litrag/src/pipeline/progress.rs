//! Progress events emitted by the pipeline
//!
//! Pipeline stages report through a sink instead of touching any display
//! state; the presentation layer decides how events are shown.

use std::fmt;

/// Per-document processing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Extracting text from the PDF
    Parsing,
    /// Splitting segments into chunks
    Chunking,
    /// Embedding chunks into the vector index
    Embedding,
    /// Answering the fixed questions
    Answering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Parsing => "parsing",
            Self::Chunking => "chunking",
            Self::Embedding => "embedding",
            Self::Answering => "answering",
        };
        f.write_str(label)
    }
}

/// An event in the pipeline's progress stream
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Processing of a document began
    DocumentStarted {
        /// Zero-based upload index
        index: usize,
        /// Total number of uploads
        total: usize,
        /// Filename of the document
        filename: String,
    },
    /// The document moved to a new stage
    StageChanged {
        /// Zero-based upload index
        index: usize,
        /// The stage now running
        stage: Stage,
    },
    /// Header OCR failed; the row will carry a null header
    HeaderUnavailable {
        /// Zero-based upload index
        index: usize,
        /// Why extraction failed
        reason: String,
    },
    /// One of the fixed questions finished
    QuestionAnswered {
        /// Zero-based upload index
        index: usize,
        /// Zero-based question index
        question: usize,
        /// Whether the cell carries an error string
        failed: bool,
    },
    /// Building the document's index failed; all answer cells carry the error
    DocumentFailed {
        /// Zero-based upload index
        index: usize,
        /// Why the build failed
        reason: String,
    },
    /// The document's row is complete
    DocumentCompleted {
        /// Zero-based upload index
        index: usize,
    },
}

/// Consumer of the progress stream
pub trait ProgressSink: Send + Sync {
    /// Receive one event
    fn emit(&self, event: ProgressEvent);
}

/// Sink that discards every event
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}
