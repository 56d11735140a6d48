//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM text generation
///
/// Implementations:
/// - `OllamaClient`: local Ollama server (mistral, llama2, gemma)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
