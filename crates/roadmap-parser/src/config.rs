//! Parser tuning knobs
//!
//! The fallback placeholder and truncation thresholds are tuning defaults
//! inherited from the source corpus, not contracts; callers can override
//! any of them.

use roadmap_types::Category;

/// Configuration for [`crate::RoadmapParser`]
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Upper bound on chunk `content` length, in characters
    pub max_content_len: usize,
    /// Upper bound on the fallback chunk's raw fragment, in characters
    pub max_fragment_len: usize,
    /// Content of the fallback chunk when the document has no visible text
    pub placeholder: String,
    /// Document title when none can be recovered
    pub default_title: String,
    /// Minimum visible text for a branch or sub-branch candidate
    pub min_branch_text: usize,
    /// Minimum visible text for a flat section fragment
    pub min_section_text: usize,
    /// Sub-branch candidates considered per branch
    pub max_sub_branches: usize,
    /// Category lexicons scanned against element class attributes.
    /// The corpus is bilingual, so the Korean terms ship as defaults.
    pub beginner_terms: Vec<String>,
    pub intermediate_terms: Vec<String>,
    pub advanced_terms: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_content_len: 500,
            max_fragment_len: 1000,
            placeholder: "No parseable content available.".to_string(),
            default_title: "Learning Roadmap".to_string(),
            min_branch_text: 3,
            min_section_text: 6,
            max_sub_branches: 3,
            beginner_terms: vec!["beginner".into(), "기초".into(), "입문".into()],
            intermediate_terms: vec!["intermediate".into(), "중급".into()],
            advanced_terms: vec!["advanced".into(), "고급".into(), "심화".into()],
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_content_limits(mut self, max_content: usize, max_fragment: usize) -> Self {
        self.max_content_len = max_content;
        self.max_fragment_len = max_fragment;
        self
    }

    /// Derive a category from a space-joined class attribute.
    ///
    /// Beginner and advanced are checked before intermediate so that
    /// compound class lists resolve the way the corpus expects; anything
    /// unmatched is Community.
    pub fn category_for_classes(&self, class_attr: &str) -> Category {
        let lower = class_attr.to_lowercase();
        let hit = |terms: &[String]| terms.iter().any(|t| lower.contains(t.as_str()));
        if hit(&self.beginner_terms) {
            Category::Beginner
        } else if hit(&self.advanced_terms) {
            Category::Advanced
        } else if hit(&self.intermediate_terms) {
            Category::Intermediate
        } else {
            Category::Community
        }
    }

    /// Difficulty sniffing over whole-document text
    pub fn difficulty_for_text(&self, text: &str) -> Category {
        let lower = text.to_lowercase();
        let hit = |terms: &[String]| terms.iter().any(|t| lower.contains(t.as_str()));
        if hit(&self.beginner_terms) {
            Category::Beginner
        } else if hit(&self.advanced_terms) {
            Category::Advanced
        } else {
            Category::Intermediate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_precedence() {
        let config = ParserConfig::default();
        assert_eq!(
            config.category_for_classes("level-node beginner"),
            Category::Beginner
        );
        // beginner wins over advanced when both appear
        assert_eq!(
            config.category_for_classes("beginner advanced"),
            Category::Beginner
        );
        assert_eq!(
            config.category_for_classes("level-node 고급"),
            Category::Advanced
        );
        assert_eq!(config.category_for_classes("plain"), Category::Community);
    }

    #[test]
    fn difficulty_defaults_to_intermediate() {
        let config = ParserConfig::default();
        assert_eq!(config.difficulty_for_text("nothing special"), Category::Intermediate);
        assert_eq!(config.difficulty_for_text("an advanced course"), Category::Advanced);
    }
}
