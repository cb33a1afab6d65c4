//! Document-level metadata extraction

use crate::config::ParserConfig;
use crate::extract;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use roadmap_types::DocumentMetadata;

lazy_static! {
    static ref TITLE_RE: Regex =
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern");
}

/// Extraction-level attributes of a whole document: recovered title,
/// difficulty sniffed from the category lexicons, and the top keywords.
pub fn document_metadata(config: &ParserConfig, html: &str) -> DocumentMetadata {
    let title = TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());

    let mut tags = extract::keywords(html);
    tags.truncate(10);

    DocumentMetadata {
        title,
        category: "programming".to_string(),
        difficulty: config.difficulty_for_text(html),
        tags,
        created_at: Utc::now(),
    }
}
