//! Roadmap Search - Tagging and retrieval over parsed chunks
//!
//! This crate provides:
//! - The two-namespace tagging engine (suggest/apply/filter/statistics)
//! - Lexical similarity search with dedup and category bucketing
//! - The vector-store and embedder ports, with degrade-to-empty semantics

pub mod similarity;
pub mod store;
pub mod tagging;

// Re-export commonly used types
pub use similarity::{
    score, search, CategoryBucket, SearchHit, SearchResults, BUCKET_CAP, DEFAULT_THRESHOLD,
    MAX_HITS,
};
pub use store::{
    embedding_text, node_payload, Embedder, EmbeddingRecord, MemoryVectorStore, NodeStore,
    ScoredPayload, VectorQuery, VectorStore,
};
pub use tagging::{
    apply_tags, search_by_tags, suggest_tags, tag_statistics, TagNamespace, TagStatistics,
    TagSuggestion, TagVocabulary,
};
