//! Node parser for already-rendered mind-map documents
//!
//! Recovers the flat [`RoadmapNode`] collection from a document produced by
//! the renderer (or a hand-written one following the same template):
//! `main-branches` > `branch` > `level-node` / `sub-branches` > `sub-node`
//! > detail/resource/book leaves. Unlike the structural parser this path
//! expects the template's class names and bails out quietly on anything
//! else, leaving just the synthetic root.

use crate::extract;
use lazy_static::lazy_static;
use regex::Regex;
use roadmap_types::{
    Category, NodeArena, NodeKind, NodeLink, RecordSink, RoadmapNode, ValidationRecord,
};
use scraper::{ElementRef, Html, Selector};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

lazy_static! {
    static ref SEL_MINDMAP_TITLE: Selector =
        Selector::parse("h1.mindmap-title").expect("static selector");
    static ref SEL_MAIN_BRANCHES: Selector =
        Selector::parse("div.main-branches").expect("static selector");
    static ref SEL_BRANCH: Selector = Selector::parse("div.branch").expect("static selector");
    static ref SEL_LEVEL_NODE: Selector =
        Selector::parse("div.level-node").expect("static selector");
    static ref SEL_SUB_BRANCHES: Selector =
        Selector::parse("div.sub-branches").expect("static selector");
    static ref SEL_DIV: Selector = Selector::parse("div").expect("static selector");
    static ref SEL_ANCHOR: Selector = Selector::parse("a[href]").expect("static selector");

    /// Trailing expand marker on clickable node labels
    static ref ARROW_RE: Regex = Regex::new(r"\s*▶\s*$").expect("arrow pattern");
    static ref BOOK_TITLE_RE: Regex =
        Regex::new(r"(?i)(?:추천\s*책|recommended\s+book)\s*:\s*(.+)").expect("book pattern");
}

const TEMPLATE_CATEGORIES: [Category; 4] = [
    Category::Beginner,
    Category::Intermediate,
    Category::Advanced,
    Category::Community,
];

/// Parser for rendered mind-map HTML
pub struct MindmapParser {
    sink: Option<Arc<dyn RecordSink>>,
    default_title: String,
}

impl MindmapParser {
    pub fn new() -> Self {
        Self {
            sink: None,
            default_title: "Learning Roadmap".to_string(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Parse a rendered document into a node arena.
    ///
    /// Always yields at least the synthetic root node.
    pub fn parse(&self, html: &str) -> NodeArena {
        let started = Instant::now();
        let doc = Html::parse_document(html);
        let mut arena = NodeArena::new();
        let mut order: u32 = 0;

        let root = self.root_node(&doc);
        let root_id = root.id.clone();
        arena.push(root);

        if let Some(container) = doc.select(&SEL_MAIN_BRANCHES).next() {
            for branch_el in container.select(&SEL_BRANCH) {
                self.parse_branch(branch_el, &root_id, &mut arena, &mut order);
            }
        }

        if let Some(sink) = &self.sink {
            let record =
                ValidationRecord::success("initial_parsing", arena.len(), "manual_parsing", started.elapsed().as_secs_f64())
                    .with_metadata("parser_version", json!("1.0"))
                    .with_metadata("node_kinds", json!(arena.kind_distribution()));
            if let Err(err) = sink.record_validation(record) {
                tracing::warn!(error = %err, "validation record dropped");
            }
        }
        tracing::info!(nodes = arena.len(), "mind-map document parsed");

        arena
    }

    fn root_node(&self, doc: &Html) -> RoadmapNode {
        let title = doc
            .select(&SEL_MINDMAP_TITLE)
            .map(|el| strip_arrow(&extract::visible_text(el)))
            .find(|t| !t.is_empty())
            .unwrap_or_else(|| self.default_title.clone());

        let mut tags = vec!["roadmap".to_string(), "learning".to_string()];
        tags.extend(extract::keywords(&title));

        RoadmapNode {
            id: RoadmapNode::fresh_id(),
            content: format!("Structured learning path: {title}"),
            title,
            depth: 0,
            parent_id: None,
            kind: NodeKind::Root,
            category: Category::Unknown,
            links: Vec::new(),
            order: 0,
            tags,
        }
    }

    fn parse_branch(
        &self,
        branch_el: ElementRef<'_>,
        parent_id: &str,
        arena: &mut NodeArena,
        order: &mut u32,
    ) {
        let Some(level_node) = branch_el.select(&SEL_LEVEL_NODE).next() else {
            return;
        };

        let category = template_category(level_node);
        let title = strip_arrow(&extract::visible_text(level_node));

        *order += 1;
        let mut tags = vec![category.as_str().to_string()];
        tags.extend(extract::keywords(&title));
        let branch_node = RoadmapNode {
            id: RoadmapNode::fresh_id(),
            content: format!("{} level topics", category.label()),
            title,
            depth: 1,
            parent_id: Some(parent_id.to_string()),
            kind: NodeKind::Branch,
            category,
            links: Vec::new(),
            order: *order,
            tags,
        };
        let branch_id = branch_node.id.clone();
        arena.push(branch_node);

        if let Some(subs_el) = branch_el.select(&SEL_SUB_BRANCHES).next() {
            self.parse_sub_branches(subs_el, &branch_id, category, arena, order);
        }
    }

    fn parse_sub_branches(
        &self,
        subs_el: ElementRef<'_>,
        parent_id: &str,
        category: Category,
        arena: &mut NodeArena,
        order: &mut u32,
    ) {
        // Only direct children: nested sub-branch containers belong to the
        // sub-node that precedes them.
        let sub_nodes: Vec<ElementRef<'_>> = subs_el
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| has_class(*el, "sub-node"))
            .collect();

        for sub_node in sub_nodes {
            let title = strip_arrow(&extract::visible_text(sub_node));

            *order += 1;
            let mut tags = vec![category.as_str().to_string()];
            tags.extend(extract::keywords(&title));
            tags.extend(extract::tools(&title));
            let node = RoadmapNode {
                id: RoadmapNode::fresh_id(),
                content: format!("{} material for {}", category.label(), title),
                title,
                depth: 2,
                parent_id: Some(parent_id.to_string()),
                kind: NodeKind::SubBranch,
                category,
                links: Vec::new(),
                order: *order,
                tags,
            };
            let sub_id = node.id.clone();
            arena.push(node);

            let details_el = sub_node
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|el| has_class(*el, "sub-branches"));
            if let Some(details_el) = details_el {
                self.parse_details(details_el, &sub_id, category, arena, order);
            }
        }
    }

    fn parse_details(
        &self,
        details_el: ElementRef<'_>,
        parent_id: &str,
        category: Category,
        arena: &mut NodeArena,
        order: &mut u32,
    ) {
        for el in details_el.select(&SEL_DIV) {
            if has_class(el, "detail-node") {
                self.push_detail(el, parent_id, category, arena, order);
            } else if has_class(el, "resource-node") {
                self.push_resource(el, parent_id, category, arena, order);
            } else if has_class(el, "book-node") {
                self.push_book(el, parent_id, category, arena, order);
            }
        }
    }

    fn push_detail(
        &self,
        el: ElementRef<'_>,
        parent_id: &str,
        category: Category,
        arena: &mut NodeArena,
        order: &mut u32,
    ) {
        let content = extract::visible_text(el);
        if content.is_empty() {
            return;
        }
        let title = title_before_colon(&content);

        *order += 1;
        let mut tags = vec![category.as_str().to_string()];
        tags.extend(extract::keywords(&content));
        tags.extend(extract::tools(&content));
        arena.push(RoadmapNode {
            id: RoadmapNode::fresh_id(),
            title,
            content,
            depth: 3,
            parent_id: Some(parent_id.to_string()),
            kind: NodeKind::Detail,
            category,
            links: Vec::new(),
            order: *order,
            tags,
        });
    }

    fn push_resource(
        &self,
        el: ElementRef<'_>,
        parent_id: &str,
        category: Category,
        arena: &mut NodeArena,
        order: &mut u32,
    ) {
        let content = extract::visible_text(el);
        let links = anchor_links(el);
        let resource_kind = resource_kind_from_prefix(&content);
        let title = title_before_colon(&strip_resource_prefix(&content));

        *order += 1;
        arena.push(RoadmapNode {
            id: RoadmapNode::fresh_id(),
            title,
            content,
            depth: 3,
            parent_id: Some(parent_id.to_string()),
            kind: NodeKind::Resource,
            category,
            links,
            order: *order,
            tags: vec![
                category.as_str().to_string(),
                "resource".to_string(),
                resource_kind.to_string(),
            ],
        });
    }

    fn push_book(
        &self,
        el: ElementRef<'_>,
        parent_id: &str,
        category: Category,
        arena: &mut NodeArena,
        order: &mut u32,
    ) {
        let content = extract::visible_text(el);
        let links = anchor_links(el);
        let title = BOOK_TITLE_RE
            .captures(&content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| ellipsize(&content, 50));

        *order += 1;
        arena.push(RoadmapNode {
            id: RoadmapNode::fresh_id(),
            title,
            content,
            depth: 3,
            parent_id: Some(parent_id.to_string()),
            kind: NodeKind::Book,
            category,
            links,
            order: *order,
            tags: vec![
                category.as_str().to_string(),
                "book".to_string(),
                "reference".to_string(),
            ],
        });
    }
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Category from the template's own class names; the lexicon-based
/// detection in [`crate::ParserConfig`] is for foreign documents, rendered
/// ones carry exact classes.
fn template_category(el: ElementRef<'_>) -> Category {
    TEMPLATE_CATEGORIES
        .into_iter()
        .find(|cat| has_class(el, cat.as_str()))
        .unwrap_or(Category::Unknown)
}

fn strip_arrow(text: &str) -> String {
    ARROW_RE.replace(text, "").trim().to_string()
}

fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut out: String = text.chars().take(max).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

/// Title heuristic: the part before the first colon, else a bounded prefix
fn title_before_colon(content: &str) -> String {
    match content.split_once(':') {
        Some((head, _)) if !head.trim().is_empty() => head.trim().to_string(),
        _ => ellipsize(content, 50),
    }
}

const RESOURCE_PREFIXES: &[(&str, &str)] = &[
    ("🎥", "video"),
    ("📖", "documentation"),
    ("📄", "documentation"),
    ("🔗", "link"),
];

fn resource_kind_from_prefix(content: &str) -> &'static str {
    RESOURCE_PREFIXES
        .iter()
        .find(|(emoji, _)| content.starts_with(emoji))
        .map(|(_, kind)| *kind)
        .unwrap_or("general")
}

fn strip_resource_prefix(content: &str) -> String {
    let mut out = content;
    for (emoji, _) in RESOURCE_PREFIXES {
        out = out.trim_start_matches(emoji);
    }
    out.trim().to_string()
}

fn anchor_links(el: ElementRef<'_>) -> Vec<NodeLink> {
    el.select(&SEL_ANCHOR)
        .filter_map(|anchor| {
            let url = anchor.value().attr("href")?.trim().to_string();
            if url.is_empty() {
                return None;
            }
            Some(NodeLink {
                kind: extract::link_kind(&url),
                title: extract::visible_text(anchor),
                url,
            })
        })
        .collect()
}

impl Default for MindmapParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_types::{LinkKind, MemorySink};

    const RENDERED: &str = r#"
        <html><body>
        <h1 class="mindmap-title">React Roadmap ▶</h1>
        <div class="main-branches">
          <div class="branch">
            <div class="level-node beginner">Getting Started <span class="expand-icon">▶</span></div>
            <div class="sub-branches">
              <div class="sub-node">JSX Basics ▶</div>
              <div class="sub-branches">
                <div class="detail-node">Components: building blocks of the UI</div>
                <div class="resource-node">🎥 <a href="https://youtube.com/watch?v=1">Intro video</a></div>
                <div class="book-node">📚 Recommended book: Learning React</div>
              </div>
            </div>
          </div>
        </div>
        </body></html>"#;

    #[test]
    fn parses_rendered_template_into_arena() {
        let arena = MindmapParser::new().parse(RENDERED);
        // root + branch + sub-branch + detail + resource + book
        assert_eq!(arena.len(), 6);

        let roots = arena.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].title, "React Roadmap");

        let tree = arena.subtree(&roots[0].id).unwrap();
        assert_eq!(tree.count(), 6);

        let branch = &tree.children[0].node;
        assert_eq!(branch.kind, NodeKind::Branch);
        assert_eq!(branch.category, Category::Beginner);
        assert_eq!(branch.title, "Getting Started");
    }

    #[test]
    fn detail_resource_and_book_leaves() {
        let arena = MindmapParser::new().parse(RENDERED);
        let detail = arena.iter().find(|n| n.kind == NodeKind::Detail).unwrap();
        assert_eq!(detail.title, "Components");
        assert_eq!(detail.depth, 3);

        let resource = arena.iter().find(|n| n.kind == NodeKind::Resource).unwrap();
        assert_eq!(resource.links.len(), 1);
        assert_eq!(resource.links[0].kind, LinkKind::Video);
        assert!(resource.tags.contains(&"video".to_string()));

        let book = arena.iter().find(|n| n.kind == NodeKind::Book).unwrap();
        assert_eq!(book.title, "Learning React");
        assert!(book.tags.contains(&"reference".to_string()));
    }

    #[test]
    fn unknown_markup_keeps_only_root() {
        let arena = MindmapParser::new().parse("<p>not a mind map</p>");
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.roots()[0].kind, NodeKind::Root);
    }

    #[test]
    fn emits_validation_record_with_distribution() {
        let sink = Arc::new(MemorySink::new());
        let parser = MindmapParser::new().with_sink(sink.clone());
        parser.parse(RENDERED);

        let records = sink.validations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation_type, "initial_parsing");
        assert_eq!(records[0].total_nodes, 6);
        assert_eq!(records[0].metadata["node_kinds"]["branch"], 1);
    }
}
