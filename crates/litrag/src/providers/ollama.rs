//! Ollama client implementing both provider traits
//!
//! The selected model name is passed through verbatim to both the embedding
//! and the generate endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for a local Ollama server
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    /// Create a new client for the given model
    pub fn new(config: &LlmConfig, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: config.temperature,
        }
    }

    /// Probe the server (`GET /api/tags`); transport failure reads as absent
    pub async fn probe(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "model '{}' returned {}",
                self.model,
                response.status()
            )));
        }

        let body: EmbedResponse = response.json().await?;
        if body.embedding.is_empty() {
            return Err(Error::Embedding(format!(
                "model '{}' returned an empty embedding",
                self.model
            )));
        }

        Ok(body.embedding)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.probe().await)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Llm(format!(
                "model '{}' returned {}",
                self.model,
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.probe().await)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_request_serializes_the_model_passthrough() {
        let request = EmbedRequest {
            model: "mistral",
            prompt: "hello",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "mistral");
        assert_eq!(json["prompt"], "hello");
    }

    #[test]
    fn generate_request_disables_streaming() {
        let request = GenerateRequest {
            model: "gemma",
            prompt: "why?",
            stream: false,
            options: GenerateOptions { temperature: 0.5 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.5);
    }

    #[test]
    fn base_url_is_normalized() {
        let config = LlmConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..LlmConfig::default()
        };
        let client = OllamaClient::new(&config, "llama2");
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(LlmProvider::model(&client), "llama2");
    }
}
