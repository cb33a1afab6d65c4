//! End-to-end parser behavior over whole documents

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use roadmap_parser::{ParserConfig, RoadmapParser};
use roadmap_types::{Category, ChunkKind};

const STRUCTURED: &str = r#"
<html><head><title>Frontend Path</title></head><body>
<div class="main-branches">
  <div class="branch">
    <div class="level-node beginner">Getting Started</div>
    <div class="sub-node">Learn HTML and CSS basics</div>
  </div>
  <div class="branch">
    <div class="level-node advanced">Going Deeper</div>
    <div class="sub-node">Performance profiling with React</div>
  </div>
</div>
</body></html>"#;

#[test]
fn structured_roundtrip_yields_levels_and_branches() {
    let chunks = RoadmapParser::new().parse(STRUCTURED, "doc");

    assert_eq!(chunks.len(), 4);

    let levels: Vec<_> = chunks
        .iter()
        .filter(|c| c.metadata.kind == ChunkKind::Level)
        .collect();
    let branches: Vec<_> = chunks
        .iter()
        .filter(|c| c.metadata.kind == ChunkKind::Branch)
        .collect();
    assert_eq!(levels.len(), 2);
    assert_eq!(branches.len(), 2);

    assert_eq!(levels[0].metadata.category, Category::Beginner);
    assert_eq!(levels[1].metadata.category, Category::Advanced);
    assert_eq!(levels[0].metadata.level, 1);
    assert_eq!(levels[1].metadata.level, 2);

    assert_eq!(levels[0].id, "doc_level_0");
    assert_eq!(branches[0].id, "doc_branch_0_0");
    assert_eq!(branches[1].id, "doc_branch_1_0");

    // Branches inherit their level's category
    assert_eq!(branches[0].metadata.category, Category::Beginner);
    assert_eq!(branches[1].metadata.category, Category::Advanced);
}

#[test]
fn reparsing_reproduces_identical_ids() {
    let parser = RoadmapParser::new();
    let first: Vec<String> = parser.parse(STRUCTURED, "doc").into_iter().map(|c| c.id).collect();
    let second: Vec<String> = parser.parse(STRUCTURED, "doc").into_iter().map(|c| c.id).collect();
    assert_eq!(first, second);
}

#[test]
fn empty_body_falls_back_to_placeholder_chunk() {
    let config = ParserConfig::default();
    let chunks = RoadmapParser::new().parse("<html><body></body></html>", "doc");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].metadata.kind, ChunkKind::Fallback);
    assert_eq!(chunks[0].content, config.placeholder);
    assert_eq!(chunks[0].order_index, 0);
}

#[test]
fn plain_prose_goes_through_the_section_splitter() {
    let html = "<html><body>\
        <p>Install the toolchain and set up your editor.</p>\
        <p>Build your first component with React.</p>\
        </body></html>";
    let chunks = RoadmapParser::new().parse(html, "doc");

    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.metadata.kind == ChunkKind::Section));
    assert_eq!(chunks[0].id, "doc_chunk_0");
    assert!(chunks[1].metadata.keywords.contains(&"react".to_string()));
}

#[test]
fn branch_resources_and_objectives_are_extracted() {
    let html = r#"
    <div class="main-branches">
      <div class="branch">
        <div class="level-node intermediate">Tooling</div>
        <div class="sub-node">
          Goal: master the bundler. See
          <a href="https://webpack.js.org/concepts/">Webpack concepts</a>
        </div>
      </div>
    </div>"#;
    let chunks = RoadmapParser::new().parse(html, "doc");

    let branch = chunks
        .iter()
        .find(|c| c.metadata.kind == ChunkKind::Branch)
        .expect("branch chunk");
    assert_eq!(branch.metadata.resources.len(), 1);
    assert_eq!(branch.metadata.resources[0].url, "https://webpack.js.org/concepts/");
    assert_eq!(branch.metadata.learning_objectives, vec!["master the bundler".to_string()]);
    assert!(branch.metadata.tools.contains(&"webpack".to_string()));
}

#[test]
fn short_branches_are_skipped_but_keep_their_path_index() {
    let html = r#"
    <div class="main-branches">
      <div class="branch">
        <div class="level-node beginner">Start</div>
        <div class="sub-node">ab</div>
        <div class="sub-node">long enough branch</div>
      </div>
    </div>"#;
    let chunks = RoadmapParser::new().parse(html, "doc");

    let branches: Vec<_> = chunks
        .iter()
        .filter(|c| c.metadata.kind == ChunkKind::Branch)
        .collect();
    assert_eq!(branches.len(), 1);
    // the skipped sibling consumed index 0
    assert_eq!(branches[0].id, "doc_branch_0_1");
}

proptest! {
    /// Any non-empty input produces at least one chunk with unique ids and
    /// order indices contiguous from zero.
    #[test]
    fn parse_invariants_hold(html in ".{1,400}") {
        let chunks = RoadmapParser::new().parse(&html, "doc");
        prop_assert!(!chunks.is_empty());

        let mut seen = std::collections::HashSet::new();
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert!(seen.insert(chunk.id.clone()), "duplicate id {}", chunk.id);
            prop_assert_eq!(chunk.order_index, i);
            prop_assert_eq!(chunk.document_id.as_str(), "doc");
        }
    }
}
