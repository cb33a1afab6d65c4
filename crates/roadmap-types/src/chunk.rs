//! Chunk and document types produced by the structural parser

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Difficulty/provenance category attached to chunks and nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Beginner,
    Intermediate,
    Advanced,
    Community,
    #[default]
    Unknown,
}

impl Category {
    /// Stable lowercase name, used for tags and CSS class names
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Beginner => "beginner",
            Category::Intermediate => "intermediate",
            Category::Advanced => "advanced",
            Category::Community => "community",
            Category::Unknown => "unknown",
        }
    }

    /// Human-readable label for rendering
    pub fn label(&self) -> &'static str {
        match self {
            Category::Beginner => "Beginner",
            Category::Intermediate => "Intermediate",
            Category::Advanced => "Advanced",
            Category::Community => "Community",
            Category::Unknown => "Unknown",
        }
    }

    /// The four buckets search results are grouped into, in display order
    pub const BUCKETS: [Category; 4] = [
        Category::Beginner,
        Category::Intermediate,
        Category::Advanced,
        Category::Community,
    ];

    /// Map to a search bucket: anything outside the four fixed buckets is
    /// grouped under Community.
    pub fn bucket(&self) -> Category {
        match self {
            Category::Unknown => Category::Community,
            other => *other,
        }
    }
}

/// Structural role of a chunk within its document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Level,
    Branch,
    SubBranch,
    #[default]
    Section,
    Fallback,
    FallbackStructured,
    Error,
    /// Assigned by curation, never by the parser
    Prerequisite,
    Requirement,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Level => "level",
            ChunkKind::Branch => "branch",
            ChunkKind::SubBranch => "sub_branch",
            ChunkKind::Section => "section",
            ChunkKind::Fallback => "fallback",
            ChunkKind::FallbackStructured => "fallback_structured",
            ChunkKind::Error => "error",
            ChunkKind::Prerequisite => "prerequisite",
            ChunkKind::Requirement => "requirement",
        }
    }

    /// Kinds that carry hierarchy information (tagged as `type-*`/`structure-*`)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ChunkKind::Level | ChunkKind::Branch | ChunkKind::SubBranch
        )
    }
}

/// Classified resource link extracted from chunk content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Document,
    Video,
    Image,
    Code,
    Tutorial,
    Link,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Document => "document",
            ResourceKind::Video => "video",
            ResourceKind::Image => "image",
            ResourceKind::Code => "code",
            ResourceKind::Tutorial => "tutorial",
            ResourceKind::Link => "link",
        }
    }
}

/// A link found inside a chunk (anchor href + visible text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub url: String,
    pub title: String,
    pub kind: ResourceKind,
}

/// Per-chunk extraction metadata
///
/// The recognized keys are typed fields; anything else a caller wants to
/// attach travels in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Section title the chunk was derived from
    pub section: String,
    /// 1-based hierarchy depth
    pub level: u32,
    /// 1-based sibling index among branches, when structural
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<u32>,
    /// 1-based sibling index among sub-branches, when structural
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<u32>,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub keywords: Vec<String>,
    pub tools: Vec<String>,
    pub resources: Vec<Resource>,
    pub learning_objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Default for ChunkMetadata {
    fn default() -> Self {
        Self {
            section: String::new(),
            level: 1,
            branch: None,
            sub: None,
            category: Category::default(),
            kind: ChunkKind::default(),
            keywords: Vec::new(),
            tools: Vec::new(),
            resources: Vec::new(),
            learning_objectives: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A unit of recovered document content
///
/// Chunk ids encode the structural path (`{doc}_level_0`,
/// `{doc}_branch_0_2`, ...) so re-parsing an unchanged document reproduces
/// the same ids, which is what makes search dedup stable across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    /// Plain-text summary (title or extracted text, bounded length)
    pub content: String,
    /// Original HTML fragment the chunk was derived from (may be truncated)
    pub raw_fragment: String,
    /// Empty until an external embedding step populates it
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// Position in parse order; contiguous from 0 within a document
    pub order_index: usize,
    pub metadata: ChunkMetadata,
    /// Provenance/structure tags used for scoped retrieval
    pub collection_tags: Vec<String>,
    /// Topical tags used for relevance retrieval
    pub search_tags: Vec<String>,
}

impl Chunk {
    /// Whether any tag in the selected namespace matches `tag`, ignoring case
    pub fn has_tag(&self, tag: &str, collection: bool) -> bool {
        let tags = if collection {
            &self.collection_tags
        } else {
            &self.search_tags
        };
        tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Extraction-level attributes of a whole document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub category: String,
    pub difficulty: Category,
    /// Top extracted keywords (bounded)
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: None,
            category: "programming".to_string(),
            difficulty: Category::Intermediate,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A parsed roadmap document owning its chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    /// Verbatim input, retained for re-parsing and audit
    pub original_html: String,
    pub chunks: Vec<Chunk>,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(id: &str, title: &str, original_html: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            original_html: original_html.to_string(),
            chunks: Vec::new(),
            metadata: DocumentMetadata::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_buckets_fold_unknown_into_community() {
        assert_eq!(Category::Unknown.bucket(), Category::Community);
        assert_eq!(Category::Beginner.bucket(), Category::Beginner);
    }

    #[test]
    fn chunk_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ChunkKind::SubBranch).unwrap();
        assert_eq!(json, "\"sub_branch\"");
        assert_eq!(ChunkKind::FallbackStructured.as_str(), "fallback_structured");
    }

    #[test]
    fn has_tag_is_case_insensitive() {
        let chunk = Chunk {
            id: "d_level_0".into(),
            document_id: "d".into(),
            content: "Basics".into(),
            raw_fragment: String::new(),
            embedding: Vec::new(),
            order_index: 0,
            metadata: ChunkMetadata::default(),
            collection_tags: vec!["level-beginner".into()],
            search_tags: vec!["React".into()],
        };
        assert!(chunk.has_tag("LEVEL-BEGINNER", true));
        assert!(chunk.has_tag("react", false));
        assert!(!chunk.has_tag("react", true));
    }
}
