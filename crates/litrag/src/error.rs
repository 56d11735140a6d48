//! Error types for the survey pipeline

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the survey pipeline and its providers
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a document
    #[error("failed to parse {file}: {reason}")]
    FileParse {
        /// Name of the offending file
        file: String,
        /// What went wrong
        reason: String,
    },

    /// Embedding service failure
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// LLM invocation failure
    #[error("llm request failed: {0}")]
    Llm(String),

    /// The paraphrase reply did not match the requested list format
    #[error("paraphrase output did not match the requested format: {0}")]
    ParaphraseFormat(String),

    /// Vector index failure
    #[error("vector index error: {0}")]
    VectorIndex(String),

    /// OCR / page rendering failure
    #[error("header extraction failed: {0}")]
    Ocr(String),

    /// Configuration failure
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Build a `FileParse` error
    pub fn file_parse(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileParse {
            file: file.into(),
            reason: reason.into(),
        }
    }
}
