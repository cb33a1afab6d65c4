//! Keyword, tool, resource, and learning-objective extraction
//!
//! Pure pattern-library lookups over text or an HTML subtree. Both the
//! structural parser and the legacy node parser go through these helpers so
//! the two paths classify content identically.

use lazy_static::lazy_static;
use regex::Regex;
use roadmap_types::{LinkKind, Resource, ResourceKind};
use scraper::{ElementRef, Selector};

lazy_static! {
    /// Fixed technology vocabulary for keyword extraction
    static ref KEYWORD_RE: Regex = Regex::new(
        r"(?i)\b(JavaScript|Python|React|Node\.js|HTML|CSS|API|Database|TypeScript|Vue|Angular|Django|Flask|Express|MongoDB|PostgreSQL|MySQL|Git|Docker|AWS|Azure|GCP)\b"
    )
    .expect("keyword pattern");

    /// Tool vocabulary, grouped into six pattern classes
    static ref TOOL_RES: Vec<Regex> = [
        r"(?i)\b(vscode|visual studio|sublime|atom|webstorm|intellij)\b",
        r"(?i)\b(git|github|gitlab|bitbucket)\b",
        r"(?i)\b(docker|kubernetes|jenkins|travis)\b",
        r"(?i)\b(npm|yarn|webpack|vite|parcel)\b",
        r"(?i)\b(react|vue|angular|svelte)\b",
        r"(?i)\b(node\.js|express|django|flask|spring)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("tool pattern"))
    .collect();

    /// Objective phrasings: English objective/goal/should-be-able-to plus the
    /// Korean 목표 form, each capturing up to the next period
    static ref OBJECTIVE_RES: Vec<Regex> = [
        r"(?i)\b(?:learning\s+)?objectives?\s*[:\-]\s*([^.]*)",
        r"(?i)\bgoals?\s*[:\-]\s*([^.]*)",
        r"(?i)\bshould\s+be\s+able\s+to\s+([^.]*)",
        r"(?:학습\s*)?목표\s*[:\s]\s*([^.]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("objective pattern"))
    .collect();

    /// Bare URLs in plain text
    static ref URL_RE: Regex = Regex::new(r#"https?://[^\s<>"]+"#).expect("url pattern");

    static ref ANCHOR_SEL: Selector = Selector::parse("a[href]").expect("anchor selector");
}

/// Resource classification rules, evaluated in priority order (first match wins)
const RESOURCE_RULES: &[(&[&str], ResourceKind)] = &[
    (&[".pdf", ".doc", ".docx"], ResourceKind::Document),
    (
        &[".mp4", ".avi", ".mov", "youtube.com", "vimeo.com"],
        ResourceKind::Video,
    ),
    (&[".jpg", ".png", ".gif"], ResourceKind::Image),
    (&["github.com"], ResourceKind::Code),
    (
        &["stackoverflow.com", "docs.", "tutorial"],
        ResourceKind::Tutorial,
    ),
];

/// Link classification rules for the legacy node path
const LINK_RULES: &[(&[&str], LinkKind)] = &[
    (&["youtube.com", "youtu.be"], LinkKind::Video),
    (&["github.com"], LinkKind::Github),
    (
        &["docs.", "developer.mozilla.org", ".org/"],
        LinkKind::Documentation,
    ),
    (&["book", "pdf"], LinkKind::Book),
];

/// Extract technology keywords: deduplicated, lower-cased, first-seen order
pub fn keywords(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in KEYWORD_RE.find_iter(text) {
        let kw = m.as_str().to_lowercase();
        if !out.contains(&kw) {
            out.push(kw);
        }
    }
    out
}

/// Extract tool names across all six pattern classes
pub fn tools(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for re in TOOL_RES.iter() {
        for m in re.find_iter(text) {
            let tool = m.as_str().to_lowercase();
            if !out.contains(&tool) {
                out.push(tool);
            }
        }
    }
    out
}

/// Classify a URL into a resource kind via the ordered rule table
pub fn resource_kind(url: &str) -> ResourceKind {
    let url_lower = url.to_lowercase();
    for (needles, kind) in RESOURCE_RULES {
        if needles.iter().any(|n| url_lower.contains(n)) {
            return *kind;
        }
    }
    ResourceKind::Link
}

/// Classify a URL into a legacy link kind via the ordered rule table
pub fn link_kind(url: &str) -> LinkKind {
    let url_lower = url.to_lowercase();
    for (needles, kind) in LINK_RULES {
        if needles.iter().any(|n| url_lower.contains(n)) {
            return *kind;
        }
    }
    LinkKind::Website
}

/// All anchors with a non-empty href and non-empty visible text
pub fn resources(element: ElementRef<'_>) -> Vec<Resource> {
    let mut out = Vec::new();
    for anchor in element.select(&ANCHOR_SEL) {
        let url = anchor.value().attr("href").unwrap_or_default().trim();
        let title = visible_text(anchor);
        if url.is_empty() || title.is_empty() {
            continue;
        }
        out.push(Resource {
            url: url.to_string(),
            title,
            kind: resource_kind(url),
        });
    }
    out
}

/// Bare URLs in plain text become numbered resources
pub fn resources_from_text(text: &str) -> Vec<Resource> {
    let mut out = Vec::new();
    for m in URL_RE.find_iter(text) {
        let url = m.as_str();
        out.push(Resource {
            url: url.to_string(),
            title: format!("Resource {}", out.len() + 1),
            kind: resource_kind(url),
        });
    }
    out
}

/// Learning-objective clauses; all matches kept in order, no deduplication
pub fn learning_objectives(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for re in OBJECTIVE_RES.iter() {
        for caps in re.captures_iter(text) {
            if let Some(clause) = caps.get(1) {
                let clause = clause.as_str().trim();
                if !clause.is_empty() {
                    out.push(clause.to_string());
                }
            }
        }
    }
    out
}

/// Whitespace-normalized visible text of an element subtree
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
