//! Topic value object

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};

/// The subject of a debate (Value Object)
///
/// Always non-empty; leading and trailing whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Create a new topic, rejecting empty or whitespace-only content
    pub fn new(content: impl Into<String>) -> Result<Self, ConfigError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the topic text
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Stable hash of the topic text, used as half of a retrieval cache key.
    pub fn hash_key(&self) -> TopicHash {
        TopicHash::of(&self.content)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Topic {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Topic::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.content
    }
}

/// Hash of a topic's text.
///
/// Case and surrounding whitespace are normalised so that trivially
/// different spellings of the same topic share cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicHash(u64);

impl TopicHash {
    pub fn of(text: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        text.trim().to_lowercase().hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TopicHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_trims_whitespace() {
        let topic = Topic::new("  Will AGI replace humans?  ").unwrap();
        assert_eq!(topic.as_str(), "Will AGI replace humans?");
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert_eq!(Topic::new("   "), Err(ConfigError::EmptyTopic));
        assert_eq!(Topic::new(""), Err(ConfigError::EmptyTopic));
    }

    #[test]
    fn test_hash_ignores_case_and_padding() {
        assert_eq!(TopicHash::of("Nuclear Power"), TopicHash::of(" nuclear power "));
        assert_ne!(TopicHash::of("nuclear power"), TopicHash::of("solar power"));
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let parsed: Result<Topic, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: Topic = serde_json::from_str("\"carbon tax\"").unwrap();
        assert_eq!(parsed.as_str(), "carbon tax");
    }
}
