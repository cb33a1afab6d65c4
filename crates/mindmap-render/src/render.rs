//! Deterministic serialization of roadmaps, node trees, and search results
//!
//! Every interpolated title, section, content string, and URL is escaped
//! before it reaches the output; this is an injection-safety contract, not
//! a style choice. Element ids are generated (phase indices, node ids),
//! never user text.

use crate::hierarchy::Roadmap;
use crate::template::{document_shell, esc, esc_attr};
use roadmap_search::{SearchHit, SearchResults};
use roadmap_types::{Category, NodeArena, NodeKind, NodeTree, RoadmapNode};
use std::fmt::Write;

/// Links render as anchors only with an http(s) scheme; anything else
/// (javascript:, data:, relative paths) degrades to a plain bullet.
fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn phase_theme(index: usize) -> &'static str {
    match index {
        0 => "beginner",
        1 => "intermediate",
        _ => "advanced",
    }
}

fn push_branch_header(out: &mut String, theme: &str, toggle_id: &str, label_html: &str) {
    let _ = write!(
        out,
        "<div class=\"branch\">\n<div class=\"level-node {theme}\" onclick=\"toggleBranch('{toggle_id}')\">{label_html} <span class=\"expand-icon\">▶</span></div>\n<div class=\"sub-branches\" id=\"{toggle_id}\">\n"
    );
}

fn push_link(out: &mut String, icon: &str, class: &str, title: &str, url: &str) {
    if is_http_url(url) {
        let _ = write!(
            out,
            "<div class=\"{class}\">{icon} <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></div>\n",
            esc_attr(url),
            esc(title),
        );
    } else {
        let _ = write!(out, "<div class=\"{class}\">📚 {}</div>\n", esc(title));
    }
}

/// Render the reconstructed roadmap shape into a complete document
pub fn render_roadmap(roadmap: &Roadmap) -> String {
    let mut body = String::new();
    let title = &roadmap.main_topic;

    let _ = write!(
        body,
        "<h1 class=\"mindmap-title\">{}</h1>\n",
        esc(title)
    );
    body.push_str(
        "<div class=\"controls\">\n<button class=\"btn\" onclick=\"expandAll()\">Expand all</button>\n<button class=\"btn\" onclick=\"collapseAll()\">Collapse all</button>\n</div>\n",
    );
    body.push_str("<div class=\"mindmap\">\n");
    let _ = write!(
        body,
        "<div class=\"root-node\" onclick=\"toggleAllBranches()\">{}</div>\n",
        esc(title)
    );
    body.push_str("<div class=\"main-branches\" id=\"mainBranches\" style=\"display: none;\">\n");

    if !roadmap.prerequisites.is_empty() {
        push_branch_header(&mut body, "beginner", "prerequisites", "Prerequisites");
        body.push_str(
            "<div class=\"sub-node\" onclick=\"toggleSubBranch('prerequisites-details')\">Required background <span class=\"expand-icon\">▶</span></div>\n<div class=\"sub-branches\" id=\"prerequisites-details\">\n",
        );
        for prerequisite in &roadmap.prerequisites {
            let _ = write!(body, "<div class=\"detail-node\">{}</div>\n", esc(prerequisite));
        }
        body.push_str("</div>\n</div>\n</div>\n");
    }

    for (index, phase) in roadmap.phases.iter().enumerate() {
        let label = if phase.duration.is_empty() {
            esc(&phase.title)
        } else {
            format!("{} ({})", esc(&phase.title), esc(&phase.duration))
        };
        push_branch_header(
            &mut body,
            phase_theme(index),
            &format!("phase-{index}"),
            &label,
        );
        let _ = write!(
            body,
            "<div class=\"sub-node\" onclick=\"toggleSubBranch('topics-{index}')\">Topics <span class=\"expand-icon\">▶</span></div>\n<div class=\"sub-branches\" id=\"topics-{index}\">\n"
        );
        for topic in &phase.topics {
            let _ = write!(body, "<div class=\"detail-node\">{}</div>\n", esc(&topic.title));
            let _ = write!(
                body,
                "<div class=\"detail-node\">{}</div>\n",
                esc(&topic.description)
            );
            for link in &topic.learning_links {
                push_link(&mut body, "🔗", "resource-node", &link.title, &link.url);
            }
        }
        body.push_str("</div>\n</div>\n</div>\n");
    }

    if !roadmap.resources.is_empty() {
        push_branch_header(&mut body, "community", "resources", "Recommended resources");
        for resource in &roadmap.resources {
            let _ = write!(body, "<div class=\"resource-node\">📚 {}</div>\n", esc(resource));
        }
        body.push_str("</div>\n</div>\n");
    }

    body.push_str("</div>\n</div>");
    document_shell(title, &body)
}

/// Render a parsed node arena back into the interactive template
pub fn render_node_tree(arena: &NodeArena) -> String {
    let root_title = arena
        .iter()
        .find(|n| n.kind == NodeKind::Root)
        .map(|n| n.title.clone())
        .unwrap_or_else(|| "Learning Roadmap".to_string());

    let mut body = String::new();
    let _ = write!(
        body,
        "<h1 class=\"mindmap-title\">{}</h1>\n",
        esc(&root_title)
    );
    body.push_str(
        "<div class=\"controls\">\n<button class=\"btn\" onclick=\"expandAll()\">Expand all</button>\n<button class=\"btn\" onclick=\"collapseAll()\">Collapse all</button>\n</div>\n",
    );
    body.push_str("<div class=\"mindmap\">\n");
    let _ = write!(
        body,
        "<div class=\"root-node\" onclick=\"toggleAllBranches()\">{}</div>\n",
        esc(&root_title)
    );

    body.push_str("<div class=\"main-branches\" id=\"mainBranches\" style=\"display: flex;\">\n");
    for root in arena.roots() {
        if root.kind == NodeKind::Root {
            for child in arena.children_of(&root.id) {
                render_node(arena, child, &mut body);
            }
        } else {
            // a rootless collection renders its top level directly
            render_node(arena, root, &mut body);
        }
    }
    body.push_str("</div>\n</div>");

    document_shell(&root_title, &body)
}

fn render_node(arena: &NodeArena, node: &RoadmapNode, out: &mut String) {
    match node.kind {
        NodeKind::Root => {
            for child in arena.children_of(&node.id) {
                render_node(arena, child, out);
            }
        }
        NodeKind::Branch => {
            let theme = category_theme(node.category);
            let _ = write!(
                out,
                "<div class=\"branch\">\n<div class=\"level-node {theme}\" onclick=\"toggleBranch('{id}')\">{title} <span class=\"expand-icon\">▶</span></div>\n<div class=\"sub-branches\" id=\"{id}\">\n",
                id = node.id,
                title = esc(&node.title),
            );
            for child in arena.children_of(&node.id) {
                render_node(arena, child, out);
            }
            out.push_str("</div>\n</div>\n");
        }
        NodeKind::SubBranch => {
            let _ = write!(
                out,
                "<div class=\"sub-node\" onclick=\"toggleSubBranch('{id}')\">{title} <span class=\"expand-icon\">▶</span></div>\n<div class=\"sub-branches\" id=\"{id}\">\n",
                id = node.id,
                title = esc(&node.title),
            );
            for child in arena.children_of(&node.id) {
                render_node(arena, child, out);
            }
            out.push_str("</div>\n");
        }
        NodeKind::Detail => {
            let _ = write!(out, "<div class=\"detail-node\">{}</div>\n", esc(&node.content));
        }
        NodeKind::Resource => {
            if node.links.is_empty() {
                let _ = write!(
                    out,
                    "<div class=\"resource-node\">{}</div>\n",
                    esc(&node.content)
                );
            } else {
                for link in &node.links {
                    push_link(out, "🔗", "resource-node", &link.title, &link.url);
                }
            }
        }
        NodeKind::Book => {
            if node.links.is_empty() {
                let _ = write!(out, "<div class=\"book-node\">📚 {}</div>\n", esc(&node.content));
            } else {
                for link in &node.links {
                    push_link(out, "📚", "book-node", &link.title, &link.url);
                }
            }
        }
    }
}

fn category_theme(category: Category) -> &'static str {
    category.bucket().as_str()
}

/// Render search results as a category-bucketed mind-map
pub fn render_search_results(results: &SearchResults) -> String {
    if results.is_empty() {
        return "<h1>No matching content found</h1>".to_string();
    }
    tracing::debug!(query = %results.query, hits = results.hits.len(), "rendering search results");

    let query = &results.query;
    let title = format!("{query} learning roadmap");

    let mut body = String::new();
    let _ = write!(body, "<h1 class=\"mindmap-title\">{}</h1>\n", esc(&title));
    let _ = write!(
        body,
        "<div class=\"search-info\">🔍 Query: <strong>{}</strong> | 📊 Results: <strong>{}</strong> | 📚 Source documents: <strong>{}</strong></div>\n",
        esc(query),
        results.hits.len(),
        results.source_document_count(),
    );
    body.push_str(
        "<div class=\"controls\">\n<button class=\"btn\" onclick=\"expandAll()\">Expand all</button>\n<button class=\"btn\" onclick=\"collapseAll()\">Collapse all</button>\n</div>\n",
    );
    body.push_str("<div class=\"mindmap\">\n");
    let _ = write!(
        body,
        "<div class=\"root-node\" onclick=\"toggleAllBranches()\">{}</div>\n",
        esc(&title)
    );
    body.push_str("<div class=\"main-branches\" id=\"mainBranches\" style=\"display: none;\">\n");

    for bucket in &results.buckets {
        if bucket.hits.is_empty() {
            continue;
        }
        let theme = bucket.category.as_str();
        push_branch_header(&mut body, theme, theme, bucket.category.label());
        let _ = write!(
            body,
            "<div class=\"sub-node\" onclick=\"toggleSubBranch('{theme}-details')\">Search results <span class=\"expand-icon\">▶</span></div>\n<div class=\"sub-branches\" id=\"{theme}-details\">\n"
        );
        for hit in &bucket.hits {
            render_hit(&mut body, hit);
        }
        body.push_str("</div>\n</div>\n</div>\n");
    }

    body.push_str("</div>\n</div>");
    document_shell(&title, &body)
}

fn render_hit(out: &mut String, hit: &SearchHit) {
    let section = &hit.chunk.metadata.section;
    let content: String = if hit.chunk.content.chars().count() > 150 {
        let mut cut: String = hit.chunk.content.chars().take(150).collect();
        cut.push_str("...");
        cut
    } else {
        hit.chunk.content.clone()
    };

    let _ = write!(out, "<div class=\"detail-node\">{}</div>\n", esc(section));
    let _ = write!(out, "<div class=\"detail-node\">{}</div>\n", esc(&content));
    let _ = write!(
        out,
        "<div class=\"similarity-score\">Similarity: {:.2}</div>\n",
        hit.score
    );

    for resource in hit.chunk.metadata.resources.iter().take(3) {
        let title = if resource.title.is_empty() {
            resource.url.as_str()
        } else {
            resource.title.as_str()
        };
        push_link(out, "🔗", "resource-node", title, &resource.url);
    }

    if !hit.chunk.metadata.tools.is_empty() {
        let tools = hit.chunk.metadata.tools[..hit.chunk.metadata.tools.len().min(3)].join(", ");
        let _ = write!(out, "<div class=\"detail-node\">🔧 Tools: {}</div>\n", esc(&tools));
    }
    for objective in hit.chunk.metadata.learning_objectives.iter().take(2) {
        let _ = write!(out, "<div class=\"detail-node\">🎯 {}</div>\n", esc(objective));
    }
}

/// Markdown rendering of the node tree, headings capped at depth 6
pub fn render_markdown(arena: &NodeArena) -> String {
    let mut out = String::new();
    for root in arena.roots() {
        if let Some(tree) = arena.subtree(&root.id) {
            render_markdown_node(&tree, 0, &mut out);
        }
    }
    out
}

fn render_markdown_node(tree: &NodeTree, depth: usize, out: &mut String) {
    let node = &tree.node;
    out.push_str(&"#".repeat((depth + 1).min(6)));
    out.push(' ');
    out.push_str(&node.title);
    out.push_str("\n\n");

    if !node.content.is_empty() {
        out.push_str(&node.content);
        out.push_str("\n\n");
    }
    if !node.links.is_empty() {
        out.push_str("**References:**\n");
        for link in &node.links {
            let _ = writeln!(out, "- [{}]({}) ({})", link.title, link.url, link.kind.as_str());
        }
        out.push('\n');
    }
    if !node.tags.is_empty() {
        let _ = writeln!(out, "**Tags:** {}", node.tags.join(", "));
        out.push('\n');
    }

    for child in &tree.children {
        render_markdown_node(child, depth + 1, out);
    }
}
