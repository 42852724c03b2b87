//! Immutable role catalog

use super::entities::{Role, RoleId};
use crate::core::error::{ConfigError, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use std::collections::HashSet;

/// Catalog of the roles available to a debate.
///
/// Built once at startup and never mutated; lookups preserve the
/// insertion order of the catalog.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: Vec<Role>,
}

impl RoleRegistry {
    /// Build a registry from an explicit list of roles.
    ///
    /// Fails with [`ConfigError::DuplicateRole`] if two roles share an id.
    pub fn from_roles(roles: Vec<Role>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for role in &roles {
            if !seen.insert(role.id.clone()) {
                return Err(ConfigError::DuplicateRole(role.id.to_string()));
            }
        }
        Ok(Self { roles })
    }

    /// The six built-in debate personas.
    pub fn builtin() -> Self {
        Self {
            roles: builtin_roles(),
        }
    }

    /// Role ids used when the caller does not choose participants.
    pub fn default_participants() -> Vec<RoleId> {
        ["environmentalist", "economist", "policy_maker"]
            .into_iter()
            .map(RoleId::from)
            .collect()
    }

    pub fn get(&self, id: &RoleId) -> Option<&Role> {
        self.roles.iter().find(|r| &r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Resolve a participant list into roles, in the given speaking order.
    ///
    /// Validates the participant count, that every id is known, and that
    /// no id appears twice.
    pub fn resolve(&self, ids: &[RoleId]) -> Result<Vec<Role>, ConfigError> {
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&ids.len()) {
            return Err(ConfigError::ParticipantCount(ids.len()));
        }

        let mut seen = HashSet::new();
        ids.iter()
            .map(|id| {
                if !seen.insert(id) {
                    return Err(ConfigError::DuplicateRole(id.to_string()));
                }
                self.get(id)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownRole(id.to_string()))
            })
            .collect()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_roles() -> Vec<Role> {
    vec![
        Role::new(
            "environmentalist",
            "Environmentalist",
            "A veteran environmental campaigner who weighs every proposal by its \
             long-term ecological footprint. Skeptical of growth-first arguments and \
             quick to cite climate science.",
            "alex",
        )
        .with_title("Ecology and sustainability advocate")
        .with_focus_keywords([
            "environmental protection",
            "climate change",
            "sustainability",
            "ecological impact",
        ]),
        Role::new(
            "economist",
            "Economist",
            "A pragmatic economist who frames questions in terms of incentives, \
             costs and benefits, and market outcomes. Wants numbers before \
             conclusions.",
            "david",
        )
        .with_title("Market and cost-benefit analyst")
        .with_focus_keywords([
            "economic impact",
            "cost-benefit",
            "market analysis",
            "economic policy",
        ]),
        Role::new(
            "policy_maker",
            "Policy Maker",
            "A senior civil servant who has drafted regulation for two decades. \
             Focused on what can actually be legislated, enforced and funded.",
            "charles",
        )
        .with_title("Regulation and governance expert")
        .with_focus_keywords([
            "policy making",
            "regulation",
            "governance framework",
            "implementation strategy",
        ]),
        Role::new(
            "tech_expert",
            "Technologist",
            "An engineer and founder who believes most problems yield to better \
             tools. Argues from technical feasibility and the pace of innovation.",
            "benjamin",
        )
        .with_title("Technology and innovation specialist")
        .with_focus_keywords([
            "technological innovation",
            "technical feasibility",
            "technology adoption",
        ]),
        Role::new(
            "sociologist",
            "Sociologist",
            "A sociologist who studies how change lands on communities. Raises \
             questions of fairness, inequality and social cohesion.",
            "anna",
        )
        .with_title("Social impact researcher")
        .with_focus_keywords(["social impact", "social change", "social equity"]),
        Role::new(
            "ethicist",
            "Ethicist",
            "A moral philosopher who asks who bears responsibility and which values \
             are traded away. Rigorous about first principles.",
            "claire",
        )
        .with_title("Moral philosophy scholar")
        .with_focus_keywords(["ethics", "moral responsibility", "value frameworks"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<RoleId> {
        list.iter().map(|s| RoleId::from(*s)).collect()
    }

    #[test]
    fn test_builtin_has_six_roles() {
        let registry = RoleRegistry::builtin();
        assert_eq!(registry.len(), 6);
        assert!(registry.get(&RoleId::from("ethicist")).is_some());
    }

    #[test]
    fn test_default_participants_resolve() {
        let registry = RoleRegistry::builtin();
        let roles = registry
            .resolve(&RoleRegistry::default_participants())
            .unwrap();
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[0].id.as_str(), "environmentalist");
    }

    #[test]
    fn test_resolve_preserves_speaking_order() {
        let registry = RoleRegistry::builtin();
        let roles = registry
            .resolve(&ids(&["ethicist", "economist", "sociologist"]))
            .unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(names, vec!["ethicist", "economist", "sociologist"]);
    }

    #[test]
    fn test_resolve_rejects_bad_counts() {
        let registry = RoleRegistry::builtin();
        assert_eq!(
            registry.resolve(&ids(&["ethicist", "economist"])),
            Err(ConfigError::ParticipantCount(2))
        );
        let seven = ids(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(
            registry.resolve(&seven),
            Err(ConfigError::ParticipantCount(7))
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_and_duplicate() {
        let registry = RoleRegistry::builtin();
        assert_eq!(
            registry.resolve(&ids(&["ethicist", "economist", "pirate"])),
            Err(ConfigError::UnknownRole("pirate".to_string()))
        );
        assert_eq!(
            registry.resolve(&ids(&["ethicist", "economist", "ethicist"])),
            Err(ConfigError::DuplicateRole("ethicist".to_string()))
        );
    }

    #[test]
    fn test_from_roles_rejects_duplicates() {
        let role = Role::new("a", "A", "persona", "alex");
        let result = RoleRegistry::from_roles(vec![role.clone(), role]);
        assert_eq!(result.unwrap_err(), ConfigError::DuplicateRole("a".to_string()));
    }
}
