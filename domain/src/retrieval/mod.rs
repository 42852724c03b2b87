//! Supporting reference material for debate roles
//!
//! References are fetched per (role, topic) and rendered once into a
//! [`RetrievalPayload`]; later rounds share the same payload.

use crate::core::topic::{Topic, TopicHash};
use crate::role::entities::RoleId;
use crate::util::truncate_str;
use serde::{Deserialize, Serialize};

/// Text used in place of references when none are available.
pub const NO_SUPPORTING_MATERIAL: &str =
    "No supporting material available. Argue from your own expertise.";

/// Maximum bytes of a reference summary included in a prompt.
const SUMMARY_LIMIT: usize = 400;

/// A single piece of supporting material (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub url: String,
    /// Key finding or abstract
    #[serde(default)]
    pub summary: String,
    /// Relevance to the topic on a 0-10 scale
    #[serde(default)]
    pub relevance: f32,
    /// Whether the provider could confirm the reference exists
    #[serde(default)]
    pub verified: bool,
}

impl Reference {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            source: String::new(),
            published: String::new(),
            url: String::new(),
            summary: String::new(),
            relevance: 0.0,
            verified: false,
        }
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>, published: impl Into<String>) -> Self {
        self.source = source.into();
        self.published = published.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_relevance(mut self, relevance: f32) -> Self {
        self.relevance = relevance.clamp(0.0, 10.0);
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    fn render(&self, index: usize) -> String {
        let status = if self.verified { "verified" } else { "unverified" };
        let mut out = format!("Reference {index} ({status})\nTitle: {}\n", self.title);
        if !self.authors.is_empty() {
            let shown: Vec<&str> = self.authors.iter().take(2).map(String::as_str).collect();
            let suffix = if self.authors.len() > 2 { " et al." } else { "" };
            out.push_str(&format!("Authors: {}{}\n", shown.join(", "), suffix));
        }
        if !self.source.is_empty() {
            if self.published.is_empty() {
                out.push_str(&format!("Source: {}\n", self.source));
            } else {
                out.push_str(&format!("Source: {} ({})\n", self.source, self.published));
            }
        }
        if !self.summary.is_empty() {
            out.push_str(&format!(
                "Key finding: {}\n",
                truncate_str(&self.summary, SUMMARY_LIMIT)
            ));
        }
        out.push_str(&format!("Relevance: {:.0}/10", self.relevance));
        out
    }
}

/// References for one role, rendered once for prompt use.
///
/// Shared behind an `Arc` by the cache so every round sees the same
/// rendered text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalPayload {
    references: Vec<Reference>,
    rendered: String,
}

impl RetrievalPayload {
    /// Build a payload, keeping verified references first and at most
    /// `max_results` of them.
    pub fn new(mut references: Vec<Reference>, max_results: usize) -> Self {
        references.sort_by_key(|r| !r.verified);
        references.truncate(max_results);
        let rendered = if references.is_empty() {
            NO_SUPPORTING_MATERIAL.to_string()
        } else {
            references
                .iter()
                .enumerate()
                .map(|(i, r)| r.render(i + 1))
                .collect::<Vec<_>>()
                .join("\n\n")
        };
        Self {
            references,
            rendered,
        }
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Prompt-ready text for this payload
    pub fn as_prompt_text(&self) -> &str {
        &self.rendered
    }
}

/// Key of a retrieval cache entry: (role, topic hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub role: RoleId,
    pub topic: TopicHash,
}

impl CacheKey {
    pub fn new(role: RoleId, topic: &Topic) -> Self {
        Self {
            role,
            topic: topic.hash_key(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.role, self.topic)
    }
}
