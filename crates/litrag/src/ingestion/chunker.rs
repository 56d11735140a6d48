//! Text chunking with boundary-aware splitting and fixed overlap

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Segment};

/// Text chunker with configurable size and overlap, both in characters.
///
/// Splitting prefers larger boundaries first: paragraphs, then sentences,
/// then words, then a hard character cut. Each chunk beyond the first starts
/// with the trailing `overlap` characters of its predecessor.
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between adjacent chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. `overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        debug_assert!(overlap < chunk_size);
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Chunk sanitized segments; every chunk inherits its parent's metadata
    pub fn chunk_segments(&self, segments: &[Segment]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for segment in segments {
            for piece in self.split(&segment.text) {
                chunks.push(Chunk::new(piece, segment.metadata.clone()));
            }
        }
        chunks
    }

    /// Split text into windows of at most `chunk_size` characters with
    /// `overlap` shared characters between neighbours
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        if text.chars().count() <= self.chunk_size {
            return vec![text.to_string()];
        }

        // Atoms are capped below chunk_size - overlap so an overlap seed plus
        // one atom always fits in a chunk.
        let max_atom = self.chunk_size - self.overlap;
        let atoms = Self::decompose(text, max_atom);

        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for atom in atoms {
            let atom_len = atom.chars().count();

            if current_len > 0 && current_len + atom_len > self.chunk_size {
                let tail = tail_chars(&current, self.overlap);
                chunks.push(std::mem::take(&mut current));
                current_len = tail.chars().count();
                current = tail;
            }

            current.push_str(&atom);
            current_len += atom_len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Break text into atoms no longer than `max_atom` characters, splitting
    /// at the largest boundary that fits
    fn decompose(text: &str, max_atom: usize) -> Vec<String> {
        let mut atoms = Vec::new();

        for paragraph in text.split_inclusive("\n\n") {
            if paragraph.chars().count() <= max_atom {
                atoms.push(paragraph.to_string());
                continue;
            }

            for sentence in paragraph.split_sentence_bounds() {
                if sentence.chars().count() <= max_atom {
                    atoms.push(sentence.to_string());
                    continue;
                }

                for word in sentence.split_word_bounds() {
                    if word.chars().count() <= max_atom {
                        atoms.push(word.to_string());
                        continue;
                    }

                    // Pathological token, hard cut
                    let chars: Vec<char> = word.chars().collect();
                    for piece in chars.chunks(max_atom) {
                        atoms.push(piece.iter().collect());
                    }
                }
            }
        }

        atoms
    }
}

/// Last `n` characters of a string, whole string if shorter
fn tail_chars(text: &str, n: usize) -> String {
    let count = text.chars().count();
    if count <= n {
        return text.to_string();
    }
    let byte = text
        .char_indices()
        .nth(count - n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    text[byte..].to_string()
}
