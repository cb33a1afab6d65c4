//! Reconstruction of the nested roadmap shape from a flat chunk list
//!
//! Search hands back a filtered, orderless bag of chunks; rendering wants
//! `{prerequisites, phases[topics], resources}`. Chunks are split into
//! prerequisites and phase topics, with phases keyed by hierarchy level in
//! ascending numeric order.

use roadmap_types::{Chunk, ChunkKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single learnable item inside a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub description: String,
    pub learning_links: Vec<LearningLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningLink {
    pub title: String,
    pub url: String,
}

/// One level of the roadmap, in ascending level order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub title: String,
    pub duration: String,
    pub topics: Vec<Topic>,
}

/// The nested shape the renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub main_topic: String,
    pub prerequisites: Vec<String>,
    pub phases: Vec<Phase>,
    pub resources: Vec<String>,
}

/// Reconstruction knobs
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Section-title marker words that classify a chunk as a prerequisite
    /// (bilingual defaults, matching the corpus)
    pub prerequisite_markers: Vec<String>,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            prerequisite_markers: vec!["prerequisite".into(), "사전".into()],
        }
    }
}

fn is_prerequisite(chunk: &Chunk, options: &ReconstructOptions) -> bool {
    if matches!(
        chunk.metadata.kind,
        ChunkKind::Prerequisite | ChunkKind::Requirement
    ) {
        return true;
    }
    let section = chunk.metadata.section.to_lowercase();
    options
        .prerequisite_markers
        .iter()
        .any(|marker| section.contains(&marker.to_lowercase()))
}

/// Convert a flat chunk collection into the nested roadmap shape.
///
/// Every chunk's resources are flattened into the top-level resources list
/// (display string: title, else url, else the debug form); prerequisite
/// chunks feed the prerequisites list and the rest become phase topics in
/// encounter order.
pub fn to_roadmap(chunks: &[Chunk], main_topic: &str, options: &ReconstructOptions) -> Roadmap {
    let mut prerequisites = Vec::new();
    let mut resources = Vec::new();
    let mut phases: BTreeMap<u32, Phase> = BTreeMap::new();

    for chunk in chunks {
        for resource in &chunk.metadata.resources {
            let display = if !resource.title.is_empty() {
                resource.title.clone()
            } else if !resource.url.is_empty() {
                resource.url.clone()
            } else {
                format!("{resource:?}")
            };
            resources.push(display);
        }

        if is_prerequisite(chunk, options) {
            prerequisites.push(chunk.content.clone());
            continue;
        }

        let level = chunk.metadata.level.max(1);
        let phase = phases.entry(level).or_insert_with(|| Phase {
            title: if chunk.metadata.section.is_empty() {
                format!("Phase {level}")
            } else {
                chunk.metadata.section.clone()
            },
            duration: String::new(),
            topics: Vec::new(),
        });

        let learning_links = chunk
            .metadata
            .resources
            .iter()
            .filter(|r| !r.url.is_empty())
            .map(|r| LearningLink {
                title: if r.title.is_empty() {
                    r.url.clone()
                } else {
                    r.title.clone()
                },
                url: r.url.clone(),
            })
            .collect();

        phase.topics.push(Topic {
            title: chunk.metadata.section.clone(),
            description: chunk.content.clone(),
            learning_links,
        });
    }

    Roadmap {
        main_topic: main_topic.to_string(),
        prerequisites,
        phases: phases.into_values().collect(),
        resources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roadmap_types::{ChunkMetadata, Resource, ResourceKind};

    fn chunk(id: &str, section: &str, content: &str, level: u32, kind: ChunkKind) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_id: "doc".to_string(),
            content: content.to_string(),
            raw_fragment: String::new(),
            embedding: Vec::new(),
            order_index: 0,
            metadata: ChunkMetadata {
                section: section.to_string(),
                level,
                kind,
                ..Default::default()
            },
            collection_tags: Vec::new(),
            search_tags: Vec::new(),
        }
    }

    #[test]
    fn levels_become_phases_in_ascending_order() {
        let chunks = vec![
            chunk("a", "Basics", "intro text", 1, ChunkKind::Branch),
            chunk("b", "More basics", "second text", 1, ChunkKind::Branch),
            chunk("c", "Deep dive", "advanced text", 2, ChunkKind::Branch),
        ];

        let roadmap = to_roadmap(&chunks, "React", &ReconstructOptions::default());

        assert_eq!(roadmap.phases.len(), 2);
        assert_eq!(roadmap.phases[0].title, "Basics");
        assert_eq!(roadmap.phases[0].topics.len(), 2);
        assert_eq!(roadmap.phases[0].topics[0].description, "intro text");
        assert_eq!(roadmap.phases[0].topics[1].description, "second text");
        assert_eq!(roadmap.phases[1].title, "Deep dive");
        assert_eq!(roadmap.phases[1].topics.len(), 1);
    }

    #[test]
    fn phase_order_is_numeric_even_out_of_encounter_order() {
        let chunks = vec![
            chunk("a", "Later", "x", 10, ChunkKind::Branch),
            chunk("b", "Earlier", "y", 2, ChunkKind::Branch),
        ];
        let roadmap = to_roadmap(&chunks, "T", &ReconstructOptions::default());
        assert_eq!(roadmap.phases[0].title, "Earlier");
        assert_eq!(roadmap.phases[1].title, "Later");
    }

    #[test]
    fn prerequisites_come_from_kind_or_marker() {
        let chunks = vec![
            chunk("a", "Anything", "know the terminal", 1, ChunkKind::Prerequisite),
            chunk("b", "Prerequisite knowledge", "know html", 1, ChunkKind::Branch),
            chunk("c", "Normal", "topic", 1, ChunkKind::Branch),
        ];
        let roadmap = to_roadmap(&chunks, "T", &ReconstructOptions::default());

        assert_eq!(
            roadmap.prerequisites,
            vec!["know the terminal".to_string(), "know html".to_string()]
        );
        // prerequisites do not double as topics
        assert_eq!(roadmap.phases[0].topics.len(), 1);
    }

    #[test]
    fn resources_flatten_with_title_else_url() {
        let mut with_title = chunk("a", "S", "c", 1, ChunkKind::Branch);
        with_title.metadata.resources = vec![
            Resource {
                url: "https://react.dev".to_string(),
                title: "React docs".to_string(),
                kind: ResourceKind::Tutorial,
            },
            Resource {
                url: "https://example.com".to_string(),
                title: String::new(),
                kind: ResourceKind::Link,
            },
        ];

        let roadmap = to_roadmap(&[with_title], "T", &ReconstructOptions::default());
        assert_eq!(
            roadmap.resources,
            vec!["React docs".to_string(), "https://example.com".to_string()]
        );
        let links = &roadmap.phases[0].topics[0].learning_links;
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].title, "https://example.com");
    }
}
