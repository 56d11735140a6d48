//! Provider abstractions for embeddings and LLM generation
//!
//! The pipeline only talks to these traits; the shipped implementation is a
//! single Ollama client serving both roles with one model name.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::OllamaClient;
