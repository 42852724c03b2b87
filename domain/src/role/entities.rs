//! Role entities

use serde::{Deserialize, Serialize};

/// Identifier of a role (Value Object), e.g. `economist`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RoleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A debate participant (Entity)
///
/// Immutable once loaded. `persona` frames the system prompt,
/// `focus_keywords` narrow the retrieval query, and `voice` selects the
/// speech synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Display name, e.g. "Economist"
    pub name: String,
    /// One-line position, e.g. "Market and cost-benefit analyst"
    pub title: String,
    /// Background and typical stance of the persona
    pub persona: String,
    /// Keywords appended to the topic when searching for references
    #[serde(default)]
    pub focus_keywords: Vec<String>,
    /// Voice tag passed to the speech synthesizer
    pub voice: String,
}

impl Role {
    pub fn new(
        id: impl Into<RoleId>,
        name: impl Into<String>,
        persona: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            title: name.clone(),
            name,
            persona: persona.into(),
            focus_keywords: Vec::new(),
            voice: voice.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_focus_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Retrieval query focused on this role's perspective of `topic`.
    pub fn focused_query(&self, topic: &str) -> String {
        if self.focus_keywords.is_empty() {
            return topic.to_string();
        }
        format!("{} {}", topic, self.focus_keywords.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focused_query_appends_keywords() {
        let role = Role::new("economist", "Economist", "Cares about markets", "david")
            .with_focus_keywords(["economic impact", "cost-benefit"]);
        assert_eq!(
            role.focused_query("carbon tax"),
            "carbon tax economic impact cost-benefit"
        );
    }

    #[test]
    fn test_focused_query_without_keywords() {
        let role = Role::new("a", "A", "persona", "alex");
        assert_eq!(role.focused_query("carbon tax"), "carbon tax");
    }

    #[test]
    fn test_role_id_serializes_transparently() {
        let id = RoleId::new("ethicist");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ethicist\"");
    }
}
