//! Flat section splitting and last-resort fallback
//!
//! When no structural candidates exist, the raw HTML text is scanned with
//! an ordered pattern table and each surviving fragment becomes one flat
//! chunk. When even that yields nothing, a single whole-document fallback
//! chunk is produced so `parse` always returns at least one chunk.

use crate::config::ParserConfig;
use crate::extract;
use crate::structure::truncate;
use lazy_static::lazy_static;
use regex::Regex;
use roadmap_types::{Category, Chunk, ChunkKind, ChunkMetadata};
use scraper::{Html, Selector};
use serde_json::json;

lazy_static! {
    /// Section shapes in priority order: explicit containers first,
    /// paragraphs last
    static ref SECTION_PATTERNS: Vec<Regex> = [
        r"(?is)<section[^>]*>(.*?)</section>",
        r#"(?is)<div[^>]*class="[^"]*step[^"]*"[^>]*>(.*?)</div>"#,
        r#"(?is)<div[^>]*class="[^"]*module[^"]*"[^>]*>(.*?)</div>"#,
        r"(?is)<h2[^>]*>(.*?)</h2>",
        r"(?is)<h3[^>]*>(.*?)</h3>",
        r#"(?is)<div[^>]*class="[^"]*"[^>]*>(.*?)</div>"#,
        r"(?is)<p[^>]*>(.*?)</p>",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("section pattern"))
    .collect();

    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").expect("tag pattern");
    static ref HEADING_RE: Regex =
        Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]>").expect("heading pattern");
    static ref SEL_TITLE: Selector = Selector::parse("h1, title").expect("static selector");
}

/// Split the document into flat sequence chunks via the pattern table
pub(crate) fn split_sections(config: &ParserConfig, document_id: &str, html: &str) -> Vec<Chunk> {
    let mut survivors: Vec<(String, String)> = Vec::new();
    for pattern in SECTION_PATTERNS.iter() {
        for caps in pattern.captures_iter(html) {
            let fragment = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let cleaned = TAG_RE.replace_all(fragment, "").trim().to_string();
            if cleaned.chars().count() >= config.min_section_text {
                survivors.push((fragment.to_string(), cleaned));
            }
        }
    }

    survivors
        .into_iter()
        .enumerate()
        .map(|(index, (fragment, content))| basic_chunk(config, document_id, index, fragment, content))
        .collect()
}

fn basic_chunk(
    config: &ParserConfig,
    document_id: &str,
    index: usize,
    fragment: String,
    content: String,
) -> Chunk {
    let section = HEADING_RE
        .captures(&fragment)
        .and_then(|caps| caps.get(1))
        .map(|m| TAG_RE.replace_all(m.as_str(), "").trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| format!("Section {}", index + 1));

    let mut metadata = ChunkMetadata {
        section,
        level: 1,
        category: Category::Unknown,
        kind: ChunkKind::Section,
        keywords: extract::keywords(&content),
        tools: extract::tools(&content),
        resources: extract::resources_from_text(&content),
        learning_objectives: extract::learning_objectives(&content),
        ..Default::default()
    };
    metadata
        .extra
        .insert("step_number".to_string(), json!(index + 1));

    Chunk {
        id: format!("{document_id}_chunk_{index}"),
        document_id: document_id.to_string(),
        content: truncate(&content, config.max_content_len),
        raw_fragment: fragment,
        embedding: Vec::new(),
        order_index: index,
        metadata,
        collection_tags: vec!["unknown".to_string()],
        search_tags: vec!["unknown".to_string()],
    }
}

/// Single whole-document chunk emitted when every other strategy came up
/// empty; guarantees the at-least-one-chunk contract.
pub(crate) fn fallback_chunk(config: &ParserConfig, document_id: &str, html: &str) -> Chunk {
    let doc = Html::parse_document(html);
    let text = extract::visible_text(doc.root_element());
    let content = if text.is_empty() {
        config.placeholder.clone()
    } else {
        truncate(&text, config.max_content_len)
    };

    let section = doc
        .select(&SEL_TITLE)
        .map(extract::visible_text)
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| config.default_title.clone());

    let mut metadata = ChunkMetadata {
        section,
        level: 1,
        category: Category::Unknown,
        kind: ChunkKind::Fallback,
        keywords: extract::keywords(&text),
        tools: extract::tools(&text),
        resources: extract::resources_from_text(&text),
        learning_objectives: extract::learning_objectives(&text),
        ..Default::default()
    };
    metadata.extra.insert("step_number".to_string(), json!(1));

    Chunk {
        id: format!("{document_id}_fallback"),
        document_id: document_id.to_string(),
        content,
        raw_fragment: truncate(html, config.max_fragment_len),
        embedding: Vec::new(),
        order_index: 0,
        metadata,
        collection_tags: vec!["unknown".to_string()],
        search_tags: vec!["unknown".to_string()],
    }
}
