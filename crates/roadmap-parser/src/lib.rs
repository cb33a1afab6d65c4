//! Roadmap Parser - Best-effort structural recovery for mind-map HTML
//!
//! This crate provides:
//! - The cascade-based structural parser producing [`Chunk`] lists
//! - Pattern-library extraction of keywords, tools, resources, objectives
//! - Document metadata extraction
//! - The legacy node parser for already-rendered mind-map documents
//!
//! The parse entry points never fail on malformed input: every degradation
//! path ends in data (a fallback or error chunk), not an error.

pub mod config;
pub mod extract;
pub mod legacy;
pub mod metadata;
mod sections;
mod structure;

pub use config::ParserConfig;
pub use legacy::MindmapParser;

use roadmap_types::{Chunk, ChunkKind, Document, RecordSink, ValidationRecord, ValidationStatus};
use scraper::Html;
use serde_json::json;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Structural parser entry point
///
/// Holds only configuration and an optional record sink; safe to reuse
/// across documents and threads.
pub struct RoadmapParser {
    config: ParserConfig,
    sink: Option<Arc<dyn RecordSink>>,
}

impl RoadmapParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config, sink: None }
    }

    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Recover chunks from arbitrary HTML.
    ///
    /// Guarantees at least one chunk for any input, with document-unique
    /// ids and order indices contiguous from 0.
    pub fn parse(&self, html: &str, document_id: &str) -> Vec<Chunk> {
        let started = Instant::now();
        let doc = Html::parse_document(html);

        let mut chunks = match structure::branch_candidates(&doc) {
            Some(candidates) => {
                let pass = catch_unwind(AssertUnwindSafe(|| {
                    structure::parse_structured(&self.config, document_id, &doc, &candidates)
                }));
                match pass {
                    Ok(chunks) => chunks,
                    Err(_) => {
                        tracing::warn!(document_id, "structured pass failed, emitting error chunk");
                        vec![structure::error_chunk(document_id)]
                    }
                }
            }
            None => sections::split_sections(&self.config, document_id, html),
        };

        if chunks.is_empty() {
            chunks = vec![sections::fallback_chunk(&self.config, document_id, html)];
        }

        self.emit_parse_record(document_id, &chunks, started.elapsed().as_secs_f64());
        tracing::info!(document_id, chunks = chunks.len(), "document parsed");
        chunks
    }

    /// Parse into an owned [`Document`]: chunks plus document metadata,
    /// with `filename:`/`source:` tags applied when the source file is
    /// known (this is what makes filename-prefixed search work).
    pub fn parse_document(
        &self,
        html: &str,
        document_id: &str,
        source_filename: Option<&str>,
    ) -> Document {
        let mut chunks = self.parse(html, document_id);
        if let Some(name) = source_filename {
            for chunk in &mut chunks {
                for tag in [format!("filename:{name}"), format!("source:{name}")] {
                    chunk.collection_tags.push(tag.clone());
                    chunk.search_tags.push(tag);
                }
            }
        }

        let metadata = metadata::document_metadata(&self.config, html);
        let title = metadata
            .title
            .clone()
            .unwrap_or_else(|| self.config.default_title.clone());

        Document {
            id: document_id.to_string(),
            title,
            original_html: html.to_string(),
            chunks,
            metadata,
        }
    }

    fn emit_parse_record(&self, document_id: &str, chunks: &[Chunk], elapsed_secs: f64) {
        let Some(sink) = &self.sink else {
            return;
        };

        let error_chunks = chunks
            .iter()
            .filter(|c| c.metadata.kind == ChunkKind::Error)
            .count();
        let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
        for chunk in chunks {
            *kinds.entry(chunk.metadata.kind.as_str()).or_insert(0) += 1;
        }

        let mut record =
            ValidationRecord::success("parse", chunks.len(), "structural_parser", elapsed_secs)
                .with_metadata("document_id", json!(document_id))
                .with_metadata("chunk_kinds", json!(kinds));
        if error_chunks > 0 {
            record.status = ValidationStatus::Partial;
            record.validated_nodes = chunks.len() - error_chunks;
            record.failed_nodes = error_chunks;
        }

        if let Err(err) = sink.record_validation(record) {
            tracing::warn!(error = %err, "validation record dropped");
        }
    }
}

impl Default for RoadmapParser {
    fn default() -> Self {
        Self::new()
    }
}
