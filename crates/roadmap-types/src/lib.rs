//! Roadmap Types - Domain types shared across the roadmap corpus
//!
//! This crate provides:
//! - Chunk and Document types produced by the structural parser
//! - The legacy flat node representation and its arena
//! - Validation/change record payloads for the external log store

pub mod chunk;
pub mod node;
pub mod record;

// Re-export commonly used types
pub use chunk::{
    Category, Chunk, ChunkKind, ChunkMetadata, Document, DocumentMetadata, Resource, ResourceKind,
};
pub use node::{LinkKind, NodeArena, NodeKind, NodeLink, NodeTree, RoadmapNode};
pub use record::{
    ChangeRecord, ChangeType, MemorySink, RecordSink, ValidationRecord, ValidationStatus,
};
