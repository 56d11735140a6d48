//! Metadata sanitization
//!
//! The vector index only accepts primitive metadata values, so segment
//! metadata is reduced in place before indexing: strings, numbers and
//! booleans pass through, nulls become the literal string "None", and
//! composite values (arrays, objects) are dropped.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::Segment;

/// Sentinel substituted for null metadata values
pub const NULL_SENTINEL: &str = "None";

/// Restrict a metadata map to primitive values, in place
pub fn sanitize_metadata(metadata: &mut HashMap<String, Value>) {
    metadata.retain(|_, value| {
        matches!(
            value,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    });

    for value in metadata.values_mut() {
        if value.is_null() {
            *value = Value::String(NULL_SENTINEL.to_string());
        }
    }
}

/// Sanitize a segment's metadata in place
pub fn sanitize_segment(segment: &mut Segment) {
    sanitize_metadata(&mut segment.metadata);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_metadata() -> HashMap<String, Value> {
        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), json!("paper.pdf"));
        metadata.insert("page".to_string(), json!(3));
        metadata.insert("scanned".to_string(), json!(false));
        metadata.insert("score".to_string(), json!(0.25));
        metadata.insert("author".to_string(), Value::Null);
        metadata.insert("keywords".to_string(), json!(["rag", "survey"]));
        metadata.insert("viewer_prefs".to_string(), json!({"fit": "page"}));
        metadata
    }

    #[test]
    fn primitives_survive_unchanged() {
        let mut metadata = raw_metadata();
        sanitize_metadata(&mut metadata);

        assert_eq!(metadata["source"], json!("paper.pdf"));
        assert_eq!(metadata["page"], json!(3));
        assert_eq!(metadata["scanned"], json!(false));
        assert_eq!(metadata["score"], json!(0.25));
    }

    #[test]
    fn null_becomes_the_none_sentinel() {
        let mut metadata = raw_metadata();
        sanitize_metadata(&mut metadata);

        assert_eq!(metadata["author"], json!("None"));
    }

    #[test]
    fn composites_are_dropped() {
        let mut metadata = raw_metadata();
        sanitize_metadata(&mut metadata);

        assert!(!metadata.contains_key("keywords"));
        assert!(!metadata.contains_key("viewer_prefs"));
    }

    #[test]
    fn every_surviving_value_is_primitive() {
        let mut metadata = raw_metadata();
        sanitize_metadata(&mut metadata);

        for value in metadata.values() {
            assert!(value.is_string() || value.is_number() || value.is_boolean());
        }
    }

    #[test]
    fn empty_metadata_is_a_noop() {
        let mut metadata = HashMap::new();
        sanitize_metadata(&mut metadata);
        assert!(metadata.is_empty());
    }
}
