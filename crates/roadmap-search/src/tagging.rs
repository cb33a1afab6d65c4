//! Two-namespace tagging over parsed chunks
//!
//! Collection tags describe provenance and structure (where a chunk came
//! from); search tags describe topic (what it is about). Suggestion is
//! driven by the caller-owned vocabulary plus fixed pattern groups; there
//! is no global state.

use roadmap_types::{Category, Chunk, ChunkMetadata};
use std::collections::HashMap;

/// Technology pattern groups scanned against chunk content for search tags
const TECH_PATTERNS: &[(&str, &[&str])] = &[
    (
        "frontend",
        &["react", "vue", "angular", "html", "css", "javascript", "typescript"],
    ),
    ("backend", &["nodejs", "python", "java", "php", "ruby", "go"]),
    ("database", &["sql", "mongodb", "postgresql", "mysql", "redis"]),
    (
        "devops",
        &["docker", "kubernetes", "jenkins", "git", "aws", "azure"],
    ),
    (
        "mobile",
        &["react-native", "flutter", "ios", "android", "swift", "kotlin"],
    ),
    (
        "ai",
        &[
            "machine-learning",
            "deep-learning",
            "tensorflow",
            "pytorch",
            "scikit-learn",
        ],
    ),
    (
        "security",
        &["authentication", "authorization", "encryption", "ssl", "oauth"],
    ),
    (
        "testing",
        &["unit-test", "integration-test", "e2e-test", "jest", "cypress"],
    ),
];

/// Domain pattern groups scanned against chunk content for collection tags
const DOMAIN_PATTERNS: &[(&str, &[&str])] = &[
    ("web-development", &["web", "website", "frontend", "backend"]),
    ("mobile-development", &["mobile", "app", "ios", "android"]),
    (
        "data-science",
        &["data", "analysis", "statistics", "machine-learning"],
    ),
    ("game-development", &["game", "unity", "unreal", "gaming"]),
    (
        "cybersecurity",
        &["security", "hacking", "penetration", "vulnerability"],
    ),
];

/// Default suggestion vocabulary shipped with the crate
const DEFAULT_VOCABULARY: &[&str] = &[
    "frontend", "backend", "database", "devops", "mobile", "ai", "ml", "data-science",
    "web-development", "mobile-development", "game-development", "security", "testing",
    "react", "vue", "angular", "nodejs", "python", "java", "javascript", "typescript",
    "html", "css", "sql", "mongodb", "postgresql", "docker", "kubernetes", "aws",
    "azure", "gcp", "git", "github", "ci-cd", "agile", "scrum", "ui-ux", "api",
    "microservices", "serverless", "blockchain", "iot", "cloud-computing",
];

/// Which tag namespace an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagNamespace {
    Collection,
    Search,
}

/// Caller-owned tag suggestion vocabulary
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    terms: Vec<String>,
}

impl TagVocabulary {
    pub fn new(terms: impl IntoIterator<Item = String>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        let lower = term.to_lowercase();
        self.terms.iter().any(|t| *t == lower)
    }

    pub fn add(&mut self, term: &str) {
        let lower = term.to_lowercase();
        if !self.terms.iter().any(|t| *t == lower) {
            self.terms.push(lower);
        }
    }
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY.iter().map(|t| t.to_string()))
    }
}

/// Suggested tags for one chunk, per namespace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSuggestion {
    pub collection_tags: Vec<String>,
    pub search_tags: Vec<String>,
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

/// Derive tag suggestions from content and extraction metadata
pub fn suggest_tags(
    content: &str,
    metadata: &ChunkMetadata,
    vocabulary: &TagVocabulary,
) -> TagSuggestion {
    let mut suggestion = TagSuggestion::default();

    // Vocabulary-backed search tags from extracted keywords and tools
    for term in metadata.keywords.iter().chain(metadata.tools.iter()) {
        if vocabulary.contains(term) {
            push_unique(&mut suggestion.search_tags, term.to_lowercase());
        }
    }

    // Category, type, and level collection tags
    if matches!(
        metadata.category,
        Category::Beginner | Category::Intermediate | Category::Advanced
    ) {
        let cat = metadata.category.as_str();
        push_unique(&mut suggestion.collection_tags, format!("level-{cat}"));
        push_unique(&mut suggestion.collection_tags, format!("difficulty-{cat}"));
    }
    if metadata.kind.is_structural() {
        let kind = metadata.kind.as_str();
        push_unique(&mut suggestion.collection_tags, format!("type-{kind}"));
        push_unique(&mut suggestion.collection_tags, format!("structure-{kind}"));
    }
    push_unique(
        &mut suggestion.collection_tags,
        format!("hierarchy-level-{}", metadata.level),
    );

    // Content pattern groups
    let content_lower = content.to_lowercase();
    for (tag, needles) in TECH_PATTERNS {
        if needles.iter().any(|n| content_lower.contains(n)) {
            push_unique(&mut suggestion.search_tags, (*tag).to_string());
        }
    }
    for (tag, needles) in DOMAIN_PATTERNS {
        if needles.iter().any(|n| content_lower.contains(n)) {
            push_unique(&mut suggestion.collection_tags, (*tag).to_string());
        }
    }

    suggestion
}

/// Merge extra tags into a chunk, returning a new chunk.
///
/// Pure: the input chunk is not touched. Supplied search tags are also
/// unioned into `metadata.keywords` so later suggestion passes see them.
pub fn apply_tags(
    chunk: &Chunk,
    extra_collection_tags: &[String],
    extra_search_tags: &[String],
) -> Chunk {
    let mut updated = chunk.clone();

    for tag in extra_collection_tags {
        push_unique(&mut updated.collection_tags, tag.clone());
    }
    for tag in extra_search_tags {
        push_unique(&mut updated.search_tags, tag.clone());
        push_unique(&mut updated.metadata.keywords, tag.clone());
    }

    updated
}

/// Keep chunks with at least one case-insensitive tag match in the selected
/// namespace. An empty tag list filters nothing.
pub fn search_by_tags<'a>(
    chunks: &'a [Chunk],
    tags: &[String],
    namespace: TagNamespace,
) -> Vec<&'a Chunk> {
    if tags.is_empty() {
        return chunks.iter().collect();
    }

    chunks
        .iter()
        .filter(|chunk| {
            tags.iter()
                .any(|tag| chunk.has_tag(tag, namespace == TagNamespace::Collection))
        })
        .collect()
}

/// Tag frequency per namespace, keys lower-cased
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStatistics {
    pub collection_tag_counts: HashMap<String, usize>,
    pub search_tag_counts: HashMap<String, usize>,
}

pub fn tag_statistics(chunks: &[Chunk]) -> TagStatistics {
    let mut stats = TagStatistics::default();
    for chunk in chunks {
        for tag in &chunk.collection_tags {
            *stats
                .collection_tag_counts
                .entry(tag.to_lowercase())
                .or_insert(0) += 1;
        }
        for tag in &chunk.search_tags {
            *stats
                .search_tag_counts
                .entry(tag.to_lowercase())
                .or_insert(0) += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roadmap_types::ChunkKind;

    fn chunk(id: &str, collection: &[&str], search: &[&str]) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_id: "doc".to_string(),
            content: String::new(),
            raw_fragment: String::new(),
            embedding: Vec::new(),
            order_index: 0,
            metadata: ChunkMetadata::default(),
            collection_tags: collection.iter().map(|t| t.to_string()).collect(),
            search_tags: search.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn suggestions_combine_vocabulary_and_patterns() {
        let metadata = ChunkMetadata {
            category: Category::Beginner,
            kind: ChunkKind::Level,
            level: 2,
            keywords: vec!["react".into(), "obscure-term".into()],
            tools: vec!["docker".into()],
            ..Default::default()
        };
        let suggestion = suggest_tags(
            "Learn react and css for web development",
            &metadata,
            &TagVocabulary::default(),
        );

        assert!(suggestion.search_tags.contains(&"react".to_string()));
        assert!(suggestion.search_tags.contains(&"docker".to_string()));
        assert!(!suggestion.search_tags.contains(&"obscure-term".to_string()));
        // content patterns: react/css -> frontend, web -> web-development
        assert!(suggestion.search_tags.contains(&"frontend".to_string()));
        assert!(suggestion
            .collection_tags
            .contains(&"web-development".to_string()));

        assert!(suggestion
            .collection_tags
            .contains(&"level-beginner".to_string()));
        assert!(suggestion
            .collection_tags
            .contains(&"difficulty-beginner".to_string()));
        assert!(suggestion.collection_tags.contains(&"type-level".to_string()));
        assert!(suggestion
            .collection_tags
            .contains(&"hierarchy-level-2".to_string()));
    }

    #[test]
    fn unknown_category_gets_no_level_tags() {
        let metadata = ChunkMetadata {
            category: Category::Unknown,
            ..Default::default()
        };
        let suggestion = suggest_tags("", &metadata, &TagVocabulary::default());
        assert!(!suggestion
            .collection_tags
            .iter()
            .any(|t| t.starts_with("level-") || t.starts_with("difficulty-")));
    }

    #[test]
    fn apply_tags_is_pure_and_unions() {
        let original = chunk("c1", &["level-beginner"], &["react"]);
        let before = original.clone();

        let updated = apply_tags(
            &original,
            &["Curated".to_string()],
            &["hooks".to_string(), "react".to_string()],
        );
        let again = apply_tags(
            &original,
            &["Curated".to_string()],
            &["hooks".to_string(), "react".to_string()],
        );

        assert_eq!(original, before);
        assert_eq!(updated, again);
        assert_eq!(updated.collection_tags, vec!["level-beginner", "Curated"]);
        assert_eq!(updated.search_tags, vec!["react", "hooks"]);
        assert!(updated.metadata.keywords.contains(&"hooks".to_string()));
    }

    #[test]
    fn empty_tag_filter_is_identity() {
        let chunks = vec![chunk("a", &[], &[]), chunk("b", &[], &[])];
        let filtered = search_by_tags(&chunks, &[], TagNamespace::Search);
        assert_eq!(filtered.len(), 2);
        assert!(std::ptr::eq(filtered[0], &chunks[0]));
    }

    #[test]
    fn tag_filter_matches_case_insensitively_in_one_namespace() {
        let chunks = vec![
            chunk("a", &["level-beginner"], &[]),
            chunk("b", &[], &["React"]),
        ];

        let by_search = search_by_tags(&chunks, &["react".to_string()], TagNamespace::Search);
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].id, "b");

        let by_collection =
            search_by_tags(&chunks, &["LEVEL-BEGINNER".to_string()], TagNamespace::Collection);
        assert_eq!(by_collection.len(), 1);
        assert_eq!(by_collection[0].id, "a");
    }

    #[test]
    fn statistics_lowercase_keys() {
        let chunks = vec![
            chunk("a", &["Level-Beginner"], &["React"]),
            chunk("b", &["level-beginner"], &["react", "hooks"]),
        ];
        let stats = tag_statistics(&chunks);
        assert_eq!(stats.collection_tag_counts.get("level-beginner"), Some(&2));
        assert_eq!(stats.search_tag_counts.get("react"), Some(&2));
        assert_eq!(stats.search_tag_counts.get("hooks"), Some(&1));
    }
}
