//! Mindmap Render - Hierarchy reconstruction and document generation
//!
//! This crate provides:
//! - Reconstruction of the nested roadmap shape from flat chunk lists
//! - Deterministic rendering to interactive HTML, Markdown, and JSON
//! - The escaping contract for every interpolated value

pub mod hierarchy;
mod render;
mod template;

pub use hierarchy::{to_roadmap, LearningLink, Phase, ReconstructOptions, Roadmap, Topic};
pub use render::{render_markdown, render_node_tree, render_roadmap, render_search_results};

use roadmap_types::NodeArena;
use std::str::FromStr;

/// Rendering failures; unlike parsing these are caller programming errors
/// and fail fast.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Output formats for node-tree generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Serialize a node arena in the requested format.
///
/// JSON output is the subtree forest (node + children, recursively), which
/// is what downstream generators consume.
pub fn render_arena(arena: &NodeArena, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Html => Ok(render_node_tree(arena)),
        OutputFormat::Markdown => Ok(render_markdown(arena)),
        OutputFormat::Json => {
            let forest: Vec<_> = arena
                .roots()
                .iter()
                .filter_map(|root| arena.subtree(&root.id))
                .collect();
            Ok(serde_json::to_string_pretty(&forest)?)
        }
    }
}
