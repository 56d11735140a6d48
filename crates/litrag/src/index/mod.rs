//! Per-document in-memory vector index
//!
//! One index exists per document being processed and is discarded when the
//! next document starts. Collection identifiers are unique per document so a
//! later document can never bleed into an earlier retrieval.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// Base name shared by every per-document collection
pub const COLLECTION_BASE: &str = "local-rag";

/// Derive a unique collection identifier from the upload sequence index and
/// the document's content hash
pub fn collection_name(seq: usize, content_hash: &str) -> String {
    let short = &content_hash[..content_hash.len().min(8)];
    format!("{COLLECTION_BASE}-{seq}-{short}")
}

/// A stored chunk with its embedding
#[derive(Debug, Clone)]
struct IndexEntry {
    chunk_id: Uuid,
    content: String,
    metadata: HashMap<String, Value>,
    embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Id of the matched chunk
    pub chunk_id: Uuid,
    /// Chunk text
    pub content: String,
    /// Chunk metadata
    pub metadata: HashMap<String, Value>,
    /// Cosine similarity (higher is more similar)
    pub similarity: f32,
}

/// Named in-memory collection supporting cosine nearest-neighbour search
pub struct VectorIndex {
    collection: String,
    dimensions: Option<usize>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Create an empty index for the given collection
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            dimensions: None,
            entries: Vec::new(),
        }
    }

    /// Collection identifier
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert a chunk with its embedding
    pub fn insert(&mut self, chunk: &Chunk, embedding: Vec<f32>) -> Result<()> {
        if embedding.is_empty() {
            return Err(Error::VectorIndex("chunk has no embedding".to_string()));
        }

        match self.dimensions {
            None => self.dimensions = Some(embedding.len()),
            Some(dims) if dims != embedding.len() => {
                return Err(Error::VectorIndex(format!(
                    "dimension mismatch: expected {dims}, got {}",
                    embedding.len()
                )));
            }
            Some(_) => {}
        }

        self.entries.push(IndexEntry {
            chunk_id: chunk.id,
            content: chunk.content.clone(),
            metadata: chunk.metadata.clone(),
            embedding,
        });

        Ok(())
    }

    /// Search for the `top_k` most similar chunks
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk_id: entry.chunk_id,
                content: entry.content.clone(),
                metadata: entry.metadata.clone(),
                similarity: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        results
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Embed every chunk and insert it into a fresh collection.
///
/// Embeddings are computed one chunk at a time; there is no batching or
/// deduplication, a fresh collection is built per document.
pub async fn build_index(
    collection: String,
    chunks: &[Chunk],
    embedder: &dyn EmbeddingProvider,
) -> Result<VectorIndex> {
    let mut index = VectorIndex::new(collection);

    for chunk in chunks {
        let embedding = embedder.embed(&chunk.content).await?;
        index.insert(chunk, embedding)?;
    }

    tracing::debug!(
        collection = %index.collection(),
        chunks = index.len(),
        "built vector index"
    );
    Ok(index)
}

/// Cosine similarity between two vectors; zero when either has no magnitude
/// or the lengths differ
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
