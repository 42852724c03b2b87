//! Debate configuration from TOML (`[debate]` section)

use roundtable_application::DEFAULT_ROUNDS;
use roundtable_domain::RoleRegistry;
use serde::{Deserialize, Serialize};

/// Raw debate configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Rounds per debate
    pub rounds: u32,
    /// Participant role ids in speaking order
    pub roles: Vec<String>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            roles: RoleRegistry::default_participants()
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debate_defaults() {
        let config = FileDebateConfig::default();
        assert_eq!(config.rounds, 3);
        assert_eq!(
            config.roles,
            vec!["environmentalist", "economist", "policy_maker"]
        );
    }

    #[test]
    fn test_debate_deserialize() {
        let toml_str = r#"
[debate]
rounds = 5
roles = ["ethicist", "economist", "tech_expert", "sociologist"]
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debate.rounds, 5);
        assert_eq!(config.debate.roles.len(), 4);
    }
}
