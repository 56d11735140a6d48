//! Multi-query retrieval
//!
//! The LLM is asked for a fixed number of alternative phrasings of the
//! question in a strict numbered-list format. Top-k retrieval runs for the
//! original question and every accepted phrasing; results are merged as a
//! union and deduplicated by chunk id, first-seen order.

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::generation::prompt::PromptBuilder;
use crate::index::{ScoredChunk, VectorIndex};
use crate::providers::{EmbeddingProvider, LlmProvider};

/// Retriever that widens recall through LLM-generated paraphrases
pub struct MultiQueryRetriever {
    llm: Arc<dyn LlmProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    num_paraphrases: usize,
    top_k: usize,
}

impl MultiQueryRetriever {
    /// Create a retriever
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            llm,
            embedder,
            num_paraphrases: config.num_paraphrases,
            top_k: config.top_k,
        }
    }

    /// Parse a numbered-list reply, requiring exactly `expected` items
    pub fn parse_paraphrases(reply: &str, expected: usize) -> Result<Vec<String>> {
        let pattern = Regex::new(r"(?m)^\s*\d+[.)]\s+(.+?)\s*$").expect("Invalid regex");

        let items: Vec<String> = pattern
            .captures_iter(reply)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if items.len() != expected {
            return Err(Error::ParaphraseFormat(format!(
                "expected {expected} numbered lines, found {}",
                items.len()
            )));
        }

        Ok(items)
    }

    /// Ask the LLM for alternative phrasings of the question
    async fn generate_paraphrases(&self, question: &str) -> Result<Vec<String>> {
        let prompt = PromptBuilder::paraphrase_prompt(question, self.num_paraphrases);
        let reply = self.llm.generate(&prompt).await?;
        Self::parse_paraphrases(&reply, self.num_paraphrases)
    }

    /// Retrieve context chunks for a question.
    ///
    /// A malformed paraphrase reply degrades to retrieving with the original
    /// question alone; transport and embedding failures propagate.
    pub async fn retrieve(&self, index: &VectorIndex, question: &str) -> Result<Vec<ScoredChunk>> {
        let mut queries = vec![question.to_string()];

        match self.generate_paraphrases(question).await {
            Ok(variants) => queries.extend(variants),
            Err(Error::ParaphraseFormat(reason)) => {
                tracing::warn!(
                    %reason,
                    "paraphrase reply rejected, retrieving with the original question only"
                );
            }
            Err(e) => return Err(e),
        }

        let mut seen: HashSet<_> = HashSet::new();
        let mut merged = Vec::new();

        for query in &queries {
            let embedding = self.embedder.embed(query).await?;
            for hit in index.search(&embedding, self.top_k) {
                if seen.insert(hit.chunk_id) {
                    merged.push(hit);
                }
            }
        }

        tracing::debug!(
            collection = %index.collection(),
            queries = queries.len(),
            chunks = merged.len(),
            "retrieved context"
        );
        Ok(merged)
    }
}
