//! PDF loading into text segments

use std::collections::HashMap;
use std::process::Command;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::Segment;

/// Hash file contents for collection naming and change detection
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Trait for turning raw file bytes into text segments
///
/// Implementations:
/// - `PdfLoader`: pdf-extract with a pdftotext (poppler) fallback
pub trait DocumentLoader: Send + Sync {
    /// Parse a file into an ordered sequence of segments
    fn load(&self, filename: &str, data: &[u8]) -> Result<Vec<Segment>>;
}

/// PDF loader producing one segment per page
pub struct PdfLoader;

impl PdfLoader {
    /// Extract raw text, preferring the in-process parser
    fn extract_text(filename: &str, data: &[u8]) -> Result<String> {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => {
                tracing::warn!(file = %filename, "pdf-extract produced no text, trying pdftotext");
                Self::extract_with_pdftotext(filename, data)
            }
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "pdf-extract failed, trying pdftotext");
                Self::extract_with_pdftotext(filename, data)
            }
        }
    }

    /// Check if pdftotext is available
    fn has_pdftotext() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Fallback extraction via pdftotext (poppler-utils)
    ///
    /// Page breaks are kept so the form-feed page split still applies.
    fn extract_with_pdftotext(filename: &str, data: &[u8]) -> Result<String> {
        if !Self::has_pdftotext() {
            return Err(Error::file_parse(
                filename,
                "pdftotext not available (install poppler-utils)",
            ));
        }

        let temp_dir = tempfile::tempdir()?;
        let input_path = temp_dir.path().join("input.pdf");
        let output_path = temp_dir.path().join("output.txt");
        std::fs::write(&input_path, data)?;

        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(&input_path)
            .arg(&output_path)
            .output()
            .map_err(|e| Error::file_parse(filename, format!("pdftotext failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::file_parse(filename, format!("pdftotext error: {stderr}")));
        }

        let text = std::fs::read_to_string(&output_path)?;
        if text.trim().is_empty() {
            return Err(Error::file_parse(filename, "pdftotext produced no output"));
        }

        Ok(text)
    }

    /// Read the document information dictionary and page count
    ///
    /// Whatever the dictionary holds is passed through as-is, nulls and
    /// composites included; the sanitizer reduces it to primitives.
    fn info_metadata(data: &[u8]) -> HashMap<String, Value> {
        let mut meta = HashMap::new();

        let Ok(doc) = lopdf::Document::load_mem(data) else {
            return meta;
        };
        meta.insert(
            "total_pages".to_string(),
            Value::from(doc.get_pages().len() as u64),
        );

        let info = doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| match obj {
                lopdf::Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_dict().ok());

        if let Some(info) = info {
            for (key, value) in info.iter() {
                let key = String::from_utf8_lossy(key).to_string();
                meta.insert(key, object_to_value(value));
            }
        }

        meta
    }

    /// Split extracted text into per-page segments on form feeds
    fn page_segments(
        filename: &str,
        text: &str,
        base_metadata: &HashMap<String, Value>,
    ) -> Vec<Segment> {
        let mut segments = Vec::new();

        for (i, page) in text.split('\u{0c}').enumerate() {
            let page_text = page.trim();
            if page_text.is_empty() {
                continue;
            }

            let mut metadata = base_metadata.clone();
            metadata.insert("source".to_string(), Value::from(filename));
            metadata.insert("page".to_string(), Value::from((i + 1) as u64));
            segments.push(Segment::new(page_text, metadata));
        }

        segments
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, filename: &str, data: &[u8]) -> Result<Vec<Segment>> {
        let text = Self::extract_text(filename, data)?;
        let base_metadata = Self::info_metadata(data);

        let segments = Self::page_segments(filename, &text, &base_metadata);
        if segments.is_empty() {
            return Err(Error::file_parse(
                filename,
                "no text content could be extracted",
            ));
        }

        tracing::debug!(
            file = %filename,
            segments = segments.len(),
            "loaded document"
        );
        Ok(segments)
    }
}

/// Best-effort conversion from a PDF object to a JSON value
fn object_to_value(object: &lopdf::Object) -> Value {
    match object {
        lopdf::Object::Null => Value::Null,
        lopdf::Object::Boolean(b) => Value::from(*b),
        lopdf::Object::Integer(i) => Value::from(*i),
        lopdf::Object::Real(r) => Value::from(f64::from(*r)),
        lopdf::Object::String(bytes, _) => Value::from(String::from_utf8_lossy(bytes).to_string()),
        lopdf::Object::Name(bytes) => Value::from(String::from_utf8_lossy(bytes).to_string()),
        lopdf::Object::Array(items) => Value::Array(items.iter().map(object_to_value).collect()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_segments_split_on_form_feed() {
        let base = HashMap::new();
        let segments =
            PdfLoader::page_segments("paper.pdf", "page one\u{0c}page two\u{0c}", &base);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "page one");
        assert_eq!(segments[1].text, "page two");
        assert_eq!(segments[0].metadata["source"], Value::from("paper.pdf"));
        assert_eq!(segments[0].metadata["page"], Value::from(1u64));
        assert_eq!(segments[1].metadata["page"], Value::from(2u64));
    }

    #[test]
    fn page_segments_skip_blank_pages_but_keep_numbering() {
        let base = HashMap::new();
        let segments = PdfLoader::page_segments("paper.pdf", "first\u{0c}   \u{0c}third", &base);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].metadata["page"], Value::from(1u64));
        assert_eq!(segments[1].metadata["page"], Value::from(3u64));
    }

    #[test]
    fn object_conversion_covers_primitives_and_composites() {
        assert_eq!(object_to_value(&lopdf::Object::Null), Value::Null);
        assert_eq!(
            object_to_value(&lopdf::Object::Boolean(true)),
            Value::from(true)
        );
        assert_eq!(
            object_to_value(&lopdf::Object::Integer(7)),
            Value::from(7i64)
        );
        assert_eq!(
            object_to_value(&lopdf::Object::String(
                b"A Title".to_vec(),
                lopdf::StringFormat::Literal
            )),
            Value::from("A Title")
        );
        let array = lopdf::Object::Array(vec![lopdf::Object::Integer(1)]);
        assert!(object_to_value(&array).is_array());
    }

    #[test]
    fn content_hash_is_stable_and_distinct() {
        let a = content_hash(b"one");
        assert_eq!(a, content_hash(b"one"));
        assert_ne!(a, content_hash(b"two"));
        assert_eq!(a.len(), 64);
    }
}
