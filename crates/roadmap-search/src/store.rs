//! Vector-store port for node embeddings
//!
//! The core never computes vectors. It produces the text an external
//! embedder derives them from ([`embedding_text`] is a contract: search
//! quality depends on the recipe), hands `{id, vector, payload}` records to
//! a [`VectorStore`], and degrades to no-ops/empty results when either
//! collaborator is unavailable.

use roadmap_types::{
    Category, ChangeRecord, NodeArena, RecordSink, RoadmapNode, ValidationRecord,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Labeled-field concatenation used to derive node embeddings
pub fn embedding_text(node: &RoadmapNode) -> String {
    let mut parts = vec![
        format!("Title: {}", node.title),
        format!("Content: {}", node.content),
        format!("Category: {}", node.category.as_str()),
        format!("Type: {}", node.kind.as_str()),
        format!("Tags: {}", node.tags.join(", ")),
    ];
    if !node.links.is_empty() {
        let titles: Vec<&str> = node.links.iter().map(|l| l.title.as_str()).collect();
        parts.push(format!("Resources: {}", titles.join(", ")));
    }
    parts.join(" | ")
}

/// Node attributes flattened for storage alongside the vector
pub fn node_payload(node: &RoadmapNode, embedding_text: &str) -> Value {
    json!({
        "id": node.id,
        "title": node.title,
        "content": node.content,
        "depth": node.depth,
        "parent_id": node.parent_id,
        "node_type": node.kind.as_str(),
        "category": node.category.as_str(),
        "links": node.links,
        "order": node.order,
        "tags": node.tags,
        "embedding_text": embedding_text,
    })
}

/// One storable point
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: Value,
}

/// Vector search request
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub limit: usize,
    pub category: Option<Category>,
}

/// Scored payload returned by vector search
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPayload {
    pub score: f32,
    pub payload: Value,
}

/// External embedding model port
pub trait Embedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// External vector database port
pub trait VectorStore {
    fn upsert(&mut self, records: Vec<EmbeddingRecord>) -> anyhow::Result<()>;
    fn search(&self, query: &VectorQuery) -> anyhow::Result<Vec<ScoredPayload>>;
    fn retrieve(&self, id: &str) -> anyhow::Result<Option<Value>>;
}

/// Store facade over the two collaborator ports
///
/// Every failure of a collaborator is logged as a warning and turned into
/// an empty/no-op result; the surrounding pipeline must keep working
/// without embeddings.
pub struct NodeStore<S: VectorStore> {
    store: S,
    sink: Option<Arc<dyn RecordSink>>,
    agent: String,
}

impl<S: VectorStore> NodeStore<S> {
    pub fn new(store: S, agent: &str) -> Self {
        Self {
            store,
            sink: None,
            agent: agent.to_string(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Embed and upsert every node of the arena.
    ///
    /// Returns the number of stored nodes: 0 when the embedder or store is
    /// unavailable.
    pub fn store_nodes(&mut self, arena: &NodeArena, embedder: &dyn Embedder) -> usize {
        let started = Instant::now();
        let mut records = Vec::with_capacity(arena.len());

        for node in arena.iter() {
            let text = embedding_text(node);
            let vector = match embedder.embed(&text) {
                Ok(vector) => vector,
                Err(err) => {
                    tracing::warn!(error = %err, "embedder unavailable, skipping node storage");
                    return 0;
                }
            };
            records.push(EmbeddingRecord {
                id: node.id.clone(),
                payload: node_payload(node, &text),
                vector,
            });
        }

        let stored = records.len();
        if let Err(err) = self.store.upsert(records) {
            tracing::warn!(error = %err, "vector store unavailable, node storage skipped");
            return 0;
        }

        if let Some(sink) = &self.sink {
            let record = ValidationRecord::success(
                "node_storage",
                stored,
                &self.agent,
                started.elapsed().as_secs_f64(),
            )
            .with_metadata("embedding_model", json!(self.agent));
            if let Err(err) = sink.record_validation(record) {
                tracing::warn!(error = %err, "validation record dropped");
            }
        }
        tracing::info!(nodes = stored, "nodes stored");
        stored
    }

    /// Vector search with optional category filter; empty on any failure
    pub fn search_nodes(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        limit: usize,
        category: Option<Category>,
    ) -> Vec<ScoredPayload> {
        let vector = match embedder.embed(query) {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(error = %err, "embedder unavailable, search skipped");
                return Vec::new();
            }
        };

        match self.store.search(&VectorQuery {
            vector,
            limit,
            category,
        }) {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(error = %err, "vector store unavailable, search skipped");
                Vec::new()
            }
        }
    }

    /// Fetch a stored node payload by id
    pub fn node_by_id(&self, id: &str) -> Option<Value> {
        match self.store.retrieve(id) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, node_id = id, "retrieve failed");
                None
            }
        }
    }

    /// Mutate one node in place, emit its change record, and re-embed it.
    ///
    /// Returns false when the node does not exist. The change record is
    /// emitted even when re-embedding fails; the mutation has happened.
    pub fn update_node<F>(
        &mut self,
        arena: &mut NodeArena,
        embedder: &dyn Embedder,
        node_id: &str,
        apply: F,
    ) -> bool
    where
        F: FnOnce(&mut RoadmapNode),
    {
        let Some(old) = arena.update(node_id, apply) else {
            tracing::warn!(node_id, "update target not found");
            return false;
        };
        let updated = arena
            .get(node_id)
            .expect("updated node still present")
            .clone();

        if let Some(sink) = &self.sink {
            let record = ChangeRecord::update(
                node_id,
                serde_json::to_value(&old).unwrap_or(Value::Null),
                serde_json::to_value(&updated).unwrap_or(Value::Null),
            );
            if let Err(err) = sink.record_change(record) {
                tracing::warn!(error = %err, "change record dropped");
            }
        }

        let text = embedding_text(&updated);
        match embedder.embed(&text) {
            Ok(vector) => {
                let record = EmbeddingRecord {
                    id: updated.id.clone(),
                    payload: node_payload(&updated, &text),
                    vector,
                };
                if let Err(err) = self.store.upsert(vec![record]) {
                    tracing::warn!(error = %err, "vector store unavailable, stale embedding kept");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "embedder unavailable, stale embedding kept");
            }
        }
        true
    }
}

/// In-memory cosine-distance store for tests and local sessions
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    points: HashMap<String, EmbeddingRecord>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorStore for MemoryVectorStore {
    fn upsert(&mut self, records: Vec<EmbeddingRecord>) -> anyhow::Result<()> {
        for record in records {
            self.points.insert(record.id.clone(), record);
        }
        Ok(())
    }

    fn search(&self, query: &VectorQuery) -> anyhow::Result<Vec<ScoredPayload>> {
        let mut scored: Vec<ScoredPayload> = self
            .points
            .values()
            .filter(|record| match query.category {
                Some(category) => record.payload["category"] == category.as_str(),
                None => true,
            })
            .map(|record| ScoredPayload {
                score: cosine(&query.vector, &record.vector),
                payload: record.payload.clone(),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(query.limit);
        Ok(scored)
    }

    fn retrieve(&self, id: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.points.get(id).map(|record| record.payload.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use roadmap_types::{MemorySink, NodeKind, NodeLink};

    fn node(id: &str, title: &str, category: Category) -> RoadmapNode {
        RoadmapNode {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("about {title}"),
            depth: 1,
            parent_id: None,
            kind: NodeKind::Branch,
            category,
            links: Vec::new(),
            order: 0,
            tags: vec!["roadmap".to_string()],
        }
    }

    /// Deterministic toy embedder: character histogram over 4 buckets
    struct ToyEmbedder;

    impl Embedder for ToyEmbedder {
        fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            let mut v = vec![0.0f32; 4];
            for (i, b) in text.bytes().enumerate() {
                v[i % 4] += f32::from(b) / 255.0;
            }
            Ok(v)
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Err(anyhow!("model not loaded"))
        }
    }

    #[test]
    fn embedding_text_recipe_is_stable() {
        let mut n = node("n1", "Hooks", Category::Beginner);
        n.tags = vec!["react".to_string(), "hooks".to_string()];
        n.links = vec![NodeLink {
            url: "https://react.dev".to_string(),
            title: "React docs".to_string(),
            kind: roadmap_types::LinkKind::Documentation,
        }];

        assert_eq!(
            embedding_text(&n),
            "Title: Hooks | Content: about Hooks | Category: beginner | Type: branch | Tags: react, hooks | Resources: React docs"
        );
    }

    #[test]
    fn embedding_text_omits_resources_without_links() {
        let n = node("n1", "Hooks", Category::Beginner);
        assert!(!embedding_text(&n).contains("Resources:"));
    }

    #[test]
    fn store_and_search_roundtrip_with_category_filter() {
        let arena: NodeArena = [
            node("a", "React hooks", Category::Beginner),
            node("b", "Suspense internals", Category::Advanced),
        ]
        .into_iter()
        .collect();

        let mut store = NodeStore::new(MemoryVectorStore::new(), "toy-embedder");
        assert_eq!(store.store_nodes(&arena, &ToyEmbedder), 2);

        let all = store.search_nodes(&ToyEmbedder, "React hooks", 10, None);
        assert_eq!(all.len(), 2);

        let advanced = store.search_nodes(
            &ToyEmbedder,
            "React hooks",
            10,
            Some(Category::Advanced),
        );
        assert_eq!(advanced.len(), 1);
        assert_eq!(advanced[0].payload["id"], "b");
    }

    #[test]
    fn failing_embedder_degrades_to_noop() {
        let arena: NodeArena = [node("a", "React", Category::Beginner)].into_iter().collect();
        let mut store = NodeStore::new(MemoryVectorStore::new(), "none");

        assert_eq!(store.store_nodes(&arena, &FailingEmbedder), 0);
        assert!(store
            .search_nodes(&FailingEmbedder, "anything", 5, None)
            .is_empty());
    }

    #[test]
    fn update_emits_change_record_and_reembeds() {
        let mut arena: NodeArena = [node("a", "React", Category::Beginner)].into_iter().collect();
        let sink = Arc::new(MemorySink::new());
        let mut store =
            NodeStore::new(MemoryVectorStore::new(), "toy-embedder").with_sink(sink.clone());
        store.store_nodes(&arena, &ToyEmbedder);

        let updated = store.update_node(&mut arena, &ToyEmbedder, "a", |n| {
            n.title = "React 19".to_string();
        });
        assert!(updated);

        let changes = sink.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].node_id, "a");
        assert_eq!(changes[0].old_data.as_ref().unwrap()["title"], "React");
        assert_eq!(changes[0].new_data.as_ref().unwrap()["title"], "React 19");

        let payload = store.node_by_id("a").unwrap();
        assert_eq!(payload["title"], "React 19");
    }

    #[test]
    fn update_of_missing_node_is_false() {
        let mut arena = NodeArena::new();
        let mut store = NodeStore::new(MemoryVectorStore::new(), "toy-embedder");
        assert!(!store.update_node(&mut arena, &ToyEmbedder, "ghost", |_| {}));
    }
}
