//! Lexical similarity search over stored documents
//!
//! Scoring is Jaccard similarity over whitespace-tokenized word sets; a
//! `filename:`/`source:` prefix switches the query into tag matching.
//! Results are thresholded, ranked, deduplicated by chunk id (keeping the
//! best score per id), and grouped into the four category buckets used by
//! the renderer.

use roadmap_types::{Category, Chunk, Document};
use std::collections::{HashMap, HashSet};

/// Default score threshold, matching the corpus tuning
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Ranked results are cut to this many hits before deduplication
pub const MAX_HITS: usize = 20;

/// Per-category cap applied when bucketing for rendering
pub const BUCKET_CAP: usize = 8;

/// Query prefixes that switch to tag-match mode
const FILENAME_PREFIXES: [&str; 2] = ["filename:", "source:"];

/// One scored chunk match
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f32,
    pub document_title: String,
}

/// A category bucket of hits, capped for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: Category,
    pub hits: Vec<SearchHit>,
}

/// Complete search response
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    /// Deduplicated hits, best score first
    pub hits: Vec<SearchHit>,
    /// The four fixed buckets in display order; empty buckets are kept so
    /// renderers can rely on the shape
    pub buckets: Vec<CategoryBucket>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of distinct source documents among the hits
    pub fn source_document_count(&self) -> usize {
        self.hits
            .iter()
            .map(|h| h.chunk.document_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Jaccard similarity between the word sets of query and content.
///
/// 1.0 means identical sets, 0.0 means no overlap or an empty side.
pub fn score(query: &str, content: &str) -> f32 {
    let query_words: HashSet<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let content_words: HashSet<String> = content
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if query_words.is_empty() || content_words.is_empty() {
        return 0.0;
    }

    let intersection = query_words.intersection(&content_words).count();
    let union = query_words.union(&content_words).count();
    intersection as f32 / union as f32
}

/// Tag-match score for filename queries: exact 1.0, case-insensitive 0.8
fn tag_match_score(query: &str, chunk: &Chunk) -> f32 {
    let all_tags = chunk.collection_tags.iter().chain(chunk.search_tags.iter());
    let mut case_insensitive = false;
    for tag in all_tags {
        if tag == query {
            return 1.0;
        }
        if tag.eq_ignore_ascii_case(query) {
            case_insensitive = true;
        }
    }
    if case_insensitive {
        0.8
    } else {
        0.0
    }
}

/// Search all chunks of all documents against a free-text or tag query
pub fn search(query: &str, documents: &[Document], threshold: f32) -> SearchResults {
    let is_filename_query = FILENAME_PREFIXES.iter().any(|p| query.starts_with(p));

    let mut matches: Vec<SearchHit> = Vec::new();
    for document in documents {
        for chunk in &document.chunks {
            let chunk_score = if is_filename_query {
                tag_match_score(query, chunk)
            } else {
                score(query, &chunk.content)
            };

            if chunk_score >= threshold {
                matches.push(SearchHit {
                    chunk: chunk.clone(),
                    score: chunk_score,
                    document_title: document.title.clone(),
                });
            }
        }
    }

    // Stable sort keeps encounter order among ties
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(MAX_HITS);

    // Dedup by chunk id, keeping the best-scoring occurrence per id
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<SearchHit> = Vec::new();
    for hit in matches {
        match position.get(&hit.chunk.id) {
            Some(&i) => {
                if hit.score > deduped[i].score {
                    deduped[i] = hit;
                }
            }
            None => {
                position.insert(hit.chunk.id.clone(), deduped.len());
                deduped.push(hit);
            }
        }
    }
    deduped.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let buckets = Category::BUCKETS
        .iter()
        .map(|&category| CategoryBucket {
            category,
            hits: deduped
                .iter()
                .filter(|h| h.chunk.metadata.category.bucket() == category)
                .take(BUCKET_CAP)
                .cloned()
                .collect(),
        })
        .collect();

    tracing::debug!(
        query,
        hits = deduped.len(),
        "search completed"
    );

    SearchResults {
        query: query.to_string(),
        hits: deduped,
        buckets,
    }
}
