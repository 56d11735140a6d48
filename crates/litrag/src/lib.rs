//! litrag: literature-survey RAG over uploaded PDFs
//!
//! Builds an ephemeral per-document vector index from each uploaded PDF and
//! answers a fixed set of research questions against it with a local Ollama
//! model, collecting one table row per document. The top of the first page is
//! OCR'd to recover a citation-style header for the row label.

pub mod config;
pub mod error;
pub mod generation;
pub mod header;
pub mod index;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod report;
pub mod retrieval;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Segment, UploadedFile},
    report::{SurveyReport, SurveyRow},
};
