//! Whole-pipeline scenario: parse -> tag -> search -> reconstruct -> render

use mindmap_render::{render_roadmap, render_search_results, to_roadmap, ReconstructOptions};
use roadmap_parser::RoadmapParser;
use roadmap_search::{apply_tags, search, suggest_tags, TagVocabulary, DEFAULT_THRESHOLD};

const SOURCE: &str = r#"
<html><head><title>Frontend Roadmap</title></head><body>
<div class="main-branches">
  <div class="branch">
    <div class="level-node beginner">Getting Started</div>
    <div class="sub-node">
      Learn React fundamentals with
      <a href="https://react.dev/learn">the official tutorial</a>
    </div>
  </div>
  <div class="branch">
    <div class="level-node advanced">Production Skills</div>
    <div class="sub-node">React performance and profiling with Docker deployments</div>
  </div>
</div>
</body></html>"#;

#[test]
fn parse_search_reconstruct_render() {
    let parser = RoadmapParser::new();
    let mut document = parser.parse_document(SOURCE, "frontend", Some("frontend.html"));
    assert_eq!(document.title, "Frontend Roadmap");
    assert_eq!(document.chunks.len(), 4);

    // Enrich chunks with suggested tags
    let vocabulary = TagVocabulary::default();
    document.chunks = document
        .chunks
        .iter()
        .map(|chunk| {
            let suggestion = suggest_tags(&chunk.content, &chunk.metadata, &vocabulary);
            apply_tags(chunk, &suggestion.collection_tags, &suggestion.search_tags)
        })
        .collect();

    // Free-text search selects the React chunks
    let results = search("react", &[document.clone()], DEFAULT_THRESHOLD);
    assert!(!results.is_empty());
    assert!(results
        .hits
        .iter()
        .all(|hit| hit.chunk.content.to_lowercase().contains("react")));

    // Filename search reaches every chunk of the uploaded file
    let by_file = search("source:frontend.html", &[document.clone()], 0.5);
    assert_eq!(by_file.hits.len(), 4);

    // Reconstruct and render the filtered subset
    let selected: Vec<_> = results.hits.iter().map(|hit| hit.chunk.clone()).collect();
    let roadmap = to_roadmap(&selected, "react", &ReconstructOptions::default());
    assert!(!roadmap.phases.is_empty());

    let html = render_roadmap(&roadmap);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("mainBranches"));

    let search_html = render_search_results(&results);
    assert!(search_html.contains("Similarity:"));
}

#[test]
fn hostile_content_never_reaches_output_unescaped() {
    let hostile = r#"
    <div class="main-branches">
      <div class="branch">
        <div class="level-node beginner">&lt;script&gt;alert(1)&lt;/script&gt; injection test</div>
        <div class="sub-node">Content with <script>alert(2)</script> markup</div>
      </div>
    </div>"#;

    let parser = RoadmapParser::new();
    let document = parser.parse_document(hostile, "hostile", None);

    let results = search("injection alert(2) markup Content with", &[document], 0.01);
    assert!(!results.is_empty());

    let html = render_search_results(&results);
    assert!(!html.contains("<script>alert("));

    let selected: Vec<_> = results.hits.iter().map(|hit| hit.chunk.clone()).collect();
    let roadmap = to_roadmap(&selected, "injection", &ReconstructOptions::default());
    let roadmap_html = render_roadmap(&roadmap);
    assert!(!roadmap_html.contains("<script>alert("));
}
