//! Structured recovery of the level/branch/sub-branch hierarchy
//!
//! Branch candidates are located by a cascade of strategies, each tried
//! only when the previous one yields nothing. The structured pass then
//! walks candidates in document order, emitting one level chunk per
//! candidate plus branch and sub-branch chunks for its nested content.
//! Ids encode the structural path, so an unchanged document re-parses to
//! identical ids.

use crate::config::ParserConfig;
use crate::extract;
use lazy_static::lazy_static;
use regex::Regex;
use roadmap_types::{Category, Chunk, ChunkKind, ChunkMetadata};
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref SEL_MAIN_BRANCHES: Selector =
        Selector::parse("div.main-branches").expect("static selector");
    static ref SEL_SECTION_OR_DIV: Selector =
        Selector::parse("section, div").expect("static selector");
    static ref SEL_HEADINGS: Selector = Selector::parse("h1, h2, h3").expect("static selector");
    static ref SEL_CLASSED_DIV: Selector = Selector::parse("div[class]").expect("static selector");
    static ref SEL_DIV: Selector = Selector::parse("div").expect("static selector");
    static ref SEL_DIV_OR_H2: Selector = Selector::parse("div, h2").expect("static selector");
    static ref SEL_ANY_BLOCK: Selector =
        Selector::parse("div, section, p").expect("static selector");
    static ref SEL_DIV_OR_P: Selector = Selector::parse("div, p").expect("static selector");
    static ref SEL_TITLE: Selector = Selector::parse("h1, title").expect("static selector");

    /// Class-name shapes the corpus uses for its containers
    static ref RE_CONTAINER_CLASS: Regex =
        Regex::new(r"(?i)branch|level|main").expect("class pattern");
    static ref RE_LEVEL_CLASS: Regex = Regex::new(r"(?i)level|branch").expect("class pattern");
    static ref RE_BRANCH_CLASS: Regex = Regex::new(r"(?i)branch|sub").expect("class pattern");
    static ref RE_SUB_CLASS: Regex = Regex::new(r"(?i)sub|detail").expect("class pattern");
}

fn class_matches(element: &ElementRef<'_>, pattern: &Regex) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|classes| pattern.is_match(classes))
}

/// Ordered candidate-location strategies; the first that matches wins
const CANDIDATE_STRATEGIES: [for<'a> fn(&'a Html) -> Option<Vec<ElementRef<'a>>>; 4] = [
    main_branches_children,
    classed_containers,
    heading_siblings,
    classed_blocks,
];

/// Locate branch candidates, or None when no strategy matches
pub(crate) fn branch_candidates(doc: &Html) -> Option<Vec<ElementRef<'_>>> {
    CANDIDATE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(doc))
}

/// Strategy 1: the designated `main-branches` container; its element
/// children are the level candidates. An empty container still counts as a
/// match (the structured pass will degrade on its own).
fn main_branches_children(doc: &Html) -> Option<Vec<ElementRef<'_>>> {
    let container = doc.select(&SEL_MAIN_BRANCHES).next()?;
    Some(container.children().filter_map(ElementRef::wrap).collect())
}

/// Strategy 2: any section/div whose class name looks like a branch, level,
/// or main container
fn classed_containers(doc: &Html) -> Option<Vec<ElementRef<'_>>> {
    let found: Vec<ElementRef<'_>> = doc
        .select(&SEL_SECTION_OR_DIV)
        .filter(|el| class_matches(el, &RE_CONTAINER_CLASS))
        .collect();
    (!found.is_empty()).then_some(found)
}

/// Strategy 3: each h1/h2/h3 heading's next block sibling as a pseudo-branch
fn heading_siblings(doc: &Html) -> Option<Vec<ElementRef<'_>>> {
    let found: Vec<ElementRef<'_>> = doc
        .select(&SEL_HEADINGS)
        .filter_map(|heading| {
            heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|el| matches!(el.value().name(), "div" | "section"))
        })
        .collect();
    (!found.is_empty()).then_some(found)
}

/// Strategy 4: every class-bearing div
fn classed_blocks(doc: &Html) -> Option<Vec<ElementRef<'_>>> {
    let found: Vec<ElementRef<'_>> = doc.select(&SEL_CLASSED_DIV).collect();
    (!found.is_empty()).then_some(found)
}

/// Bound a string to `max` characters, marking the cut with an ellipsis
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut out: String = text.chars().take(max).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

/// Walk the candidates and emit level/branch/sub-branch chunks
pub(crate) fn parse_structured(
    config: &ParserConfig,
    document_id: &str,
    doc: &Html,
    candidates: &[ElementRef<'_>],
) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();

    for (level_idx, level_el) in candidates.iter().enumerate() {
        let pass = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            parse_level(config, document_id, *level_el, level_idx, chunks.len())
        }));
        match pass {
            Ok(level_chunks) => chunks.extend(level_chunks),
            Err(_) => {
                tracing::warn!(document_id, level_idx, "skipping unprocessable level candidate");
            }
        }
    }

    if chunks.is_empty() {
        chunks.push(structured_fallback_chunk(config, document_id, doc));
    }
    chunks
}

/// One level candidate: a level chunk plus its branch/sub-branch chunks
fn parse_level(
    config: &ParserConfig,
    document_id: &str,
    level_el: ElementRef<'_>,
    level_idx: usize,
    order_base: usize,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    // Resolve the element that names this level: a level/branch-classed
    // child, else the first block child, else the candidate itself.
    let level_node = level_el
        .select(&SEL_DIV_OR_H2)
        .filter(|el| *el != level_el)
        .find(|el| class_matches(el, &RE_LEVEL_CLASS))
        .or_else(|| level_el.select(&SEL_DIV_OR_H2).find(|el| *el != level_el))
        .unwrap_or(level_el);

    let mut level_title = extract::visible_text(level_node);
    if level_title.is_empty() {
        level_title = format!("Level {}", level_idx + 1);
    }
    let category = config.category_for_classes(
        level_node.value().attr("class").unwrap_or_default(),
    );

    let level_text = extract::visible_text(level_el);
    chunks.push(Chunk {
        id: format!("{document_id}_level_{level_idx}"),
        document_id: document_id.to_string(),
        content: truncate(
            &format!("{} - {} stage", level_title, category.as_str()),
            config.max_content_len,
        ),
        raw_fragment: level_el.html(),
        embedding: Vec::new(),
        order_index: order_base,
        metadata: ChunkMetadata {
            section: level_title.clone(),
            level: (level_idx + 1) as u32,
            branch: None,
            sub: None,
            category,
            kind: ChunkKind::Level,
            keywords: extract::keywords(&level_title),
            tools: extract::tools(&level_text),
            resources: extract::resources(level_el),
            learning_objectives: extract::learning_objectives(&level_text),
            extra: Default::default(),
        },
        collection_tags: vec![format!("level-{}", category.as_str())],
        search_tags: vec![format!("level-{}", category.as_str())],
    });

    // Branch candidates: branch/sub-classed descendants, else any div,
    // else any block element.
    let mut branches: Vec<ElementRef<'_>> = level_el
        .select(&SEL_DIV)
        .filter(|el| *el != level_el && class_matches(el, &RE_BRANCH_CLASS))
        .collect();
    if branches.is_empty() {
        branches = level_el.select(&SEL_DIV).filter(|el| *el != level_el).collect();
    }
    if branches.is_empty() {
        branches = level_el
            .select(&SEL_ANY_BLOCK)
            .filter(|el| *el != level_el)
            .collect();
    }

    for (branch_idx, branch_el) in branches.iter().enumerate() {
        let branch_title = extract::visible_text(*branch_el);
        if branch_title.chars().count() < config.min_branch_text {
            continue;
        }

        let order = order_base + chunks.len();
        chunks.push(Chunk {
            id: format!("{document_id}_branch_{level_idx}_{branch_idx}"),
            document_id: document_id.to_string(),
            content: truncate(&branch_title, config.max_content_len),
            raw_fragment: branch_el.html(),
            embedding: Vec::new(),
            order_index: order,
            metadata: ChunkMetadata {
                section: branch_title.clone(),
                level: (level_idx + 1) as u32,
                branch: Some((branch_idx + 1) as u32),
                sub: None,
                category,
                kind: ChunkKind::Branch,
                keywords: extract::keywords(&branch_title),
                tools: extract::tools(&branch_title),
                resources: extract::resources(*branch_el),
                learning_objectives: extract::learning_objectives(&branch_title),
                extra: Default::default(),
            },
            collection_tags: vec![format!("branch-{branch_title}")],
            search_tags: vec![format!("branch-{branch_title}")],
        });

        // Sub-branch candidates under the same minimum-length rule
        let mut subs: Vec<ElementRef<'_>> = branch_el
            .select(&SEL_DIV)
            .filter(|el| el != branch_el && class_matches(el, &RE_SUB_CLASS))
            .collect();
        if subs.is_empty() {
            subs = branch_el
                .select(&SEL_DIV_OR_P)
                .filter(|el| el != branch_el)
                .collect();
        }

        for (sub_idx, sub_el) in subs.iter().take(config.max_sub_branches).enumerate() {
            let sub_title = extract::visible_text(*sub_el);
            if sub_title.chars().count() < config.min_branch_text {
                continue;
            }

            let order = order_base + chunks.len();
            chunks.push(Chunk {
                id: format!("{document_id}_sub_{level_idx}_{branch_idx}_{sub_idx}"),
                document_id: document_id.to_string(),
                content: truncate(&sub_title, config.max_content_len),
                raw_fragment: sub_el.html(),
                embedding: Vec::new(),
                order_index: order,
                metadata: ChunkMetadata {
                    section: sub_title.clone(),
                    level: (level_idx + 1) as u32,
                    branch: Some((branch_idx + 1) as u32),
                    sub: Some((sub_idx + 1) as u32),
                    category,
                    kind: ChunkKind::SubBranch,
                    keywords: extract::keywords(&sub_title),
                    tools: extract::tools(&sub_title),
                    resources: extract::resources(*sub_el),
                    learning_objectives: extract::learning_objectives(&sub_title),
                    extra: Default::default(),
                },
                collection_tags: vec![format!("sub-branch-{sub_title}")],
                search_tags: vec![format!("sub-branch-{sub_title}")],
            });
        }
    }

    chunks
}

/// Candidates matched but produced nothing: one whole-document chunk
fn structured_fallback_chunk(config: &ParserConfig, document_id: &str, doc: &Html) -> Chunk {
    let main_title = doc
        .select(&SEL_TITLE)
        .map(extract::visible_text)
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| config.default_title.clone());

    Chunk {
        id: format!("{document_id}_fallback_structured"),
        document_id: document_id.to_string(),
        content: truncate(&main_title, config.max_content_len),
        raw_fragment: doc.root_element().html(),
        embedding: Vec::new(),
        order_index: 0,
        metadata: ChunkMetadata {
            section: main_title.clone(),
            level: 1,
            category: Category::Unknown,
            kind: ChunkKind::FallbackStructured,
            keywords: extract::keywords(&main_title),
            ..Default::default()
        },
        collection_tags: vec!["unknown".to_string()],
        search_tags: vec!["unknown".to_string()],
    }
}

/// A failure escaping the structured pass degrades to this marker chunk
/// instead of reaching the caller.
pub(crate) fn error_chunk(document_id: &str) -> Chunk {
    Chunk {
        id: format!("{document_id}_error_fallback"),
        document_id: document_id.to_string(),
        content: "Structured parse failed; no content recovered.".to_string(),
        raw_fragment: String::new(),
        embedding: Vec::new(),
        order_index: 0,
        metadata: ChunkMetadata {
            section: "error".to_string(),
            level: 1,
            category: Category::Unknown,
            kind: ChunkKind::Error,
            ..Default::default()
        },
        collection_tags: vec!["error".to_string()],
        search_tags: vec!["error".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cascade_prefers_main_branches_container() {
        let doc = Html::parse_document(
            r#"<div class="main-branches"><div class="branch">a</div><div class="branch">b</div></div>
               <div class="level-extra">decoy</div>"#,
        );
        let candidates = branch_candidates(&doc).unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn cascade_falls_through_to_classed_containers() {
        let doc = Html::parse_document(
            r#"<section class="level-one">x</section><div class="unrelated">y</div>"#,
        );
        let candidates = branch_candidates(&doc).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn cascade_uses_heading_siblings() {
        let doc = Html::parse_document(
            "<h2>Basics</h2><p>skip</p><div>content block</div><h3>More</h3><section>s</section>",
        );
        let candidates = branch_candidates(&doc).unwrap();
        // h2 -> div (p skipped), h3 -> section
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].value().name(), "div");
        assert_eq!(candidates[1].value().name(), "section");
    }

    #[test]
    fn cascade_yields_nothing_for_bare_markup() {
        let doc = Html::parse_document("<html><body><span>hi</span></body></html>");
        assert!(branch_candidates(&doc).is_none());
    }

    #[test]
    fn truncate_appends_marker_only_when_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn empty_candidates_degrade_to_structured_fallback() {
        let config = ParserConfig::default();
        let doc = Html::parse_document(
            r#"<html><head><title>My Map</title></head><body><div class="main-branches"></div></body></html>"#,
        );
        let candidates = branch_candidates(&doc).unwrap();
        assert!(candidates.is_empty());
        let chunks = parse_structured(&config, "doc", &doc, &candidates);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.kind, ChunkKind::FallbackStructured);
        assert_eq!(chunks[0].metadata.section, "My Map");
    }

    #[test]
    fn error_chunk_is_tagged_error() {
        let chunk = error_chunk("doc");
        assert_eq!(chunk.metadata.kind, ChunkKind::Error);
        assert_eq!(chunk.order_index, 0);
        assert_eq!(chunk.collection_tags, vec!["error".to_string()]);
    }
}
