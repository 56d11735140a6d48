//! Retrieval against the per-document vector index

mod multi_query;

pub use multi_query::MultiQueryRetriever;
