//! Configuration for the survey pipeline

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Model names accepted by the `--model` selector
pub const SUPPORTED_MODELS: [&str; 3] = ["mistral", "llama2", "gemma"];

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Header OCR configuration
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reject model names the application does not expose
    pub fn validate_model(model: &str) -> Result<()> {
        if SUPPORTED_MODELS.contains(&model) {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "unknown model '{}', expected one of: {}",
                model,
                SUPPORTED_MODELS.join(", ")
            )))
        }
    }
}

/// LLM (Ollama) configuration
///
/// The same model name is passed through to both the embedding and generate
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of alternative phrasings requested from the LLM
    pub num_paraphrases: usize,
    /// Chunks retrieved per query variant
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            num_paraphrases: 5,
            top_k: 4,
        }
    }
}

/// Header OCR configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Render resolution for the first page
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { dpi: 150 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_contract() {
        let config = AppConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert_eq!(config.retrieval.num_paraphrases, 5);
        assert_eq!(config.ocr.dpi, 150);
        assert_eq!(config.llm.base_url, "http://localhost:11434");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [llm]
            base_url = "http://ollama.internal:11434"
            temperature = 0.1
            timeout_secs = 30

            [retrieval]
            num_paraphrases = 3
            top_k = 2
            "#,
        )
        .unwrap();

        assert_eq!(parsed.llm.base_url, "http://ollama.internal:11434");
        assert_eq!(parsed.retrieval.num_paraphrases, 3);
        // Sections absent from the file keep their defaults
        assert_eq!(parsed.chunking.chunk_size, 1000);
        assert_eq!(parsed.ocr.dpi, 150);
    }

    #[test]
    fn model_validation() {
        assert!(AppConfig::validate_model("mistral").is_ok());
        assert!(AppConfig::validate_model("llama2").is_ok());
        assert!(AppConfig::validate_model("gemma").is_ok());
        assert!(AppConfig::validate_model("gpt-4").is_err());
    }
}
