//! Retrieval configuration from TOML (`[retrieval]` section)

use serde::{Deserialize, Serialize};

/// Supporting reference settings and the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// Give roles supporting references
    pub enabled: bool,
    /// References kept per role
    pub max_refs_per_role: usize,
    /// Lifetime of a cached entry in seconds
    pub cache_ttl_seconds: u64,
    /// Timeout in seconds for one fetch (0 disables)
    pub timeout_seconds: u64,
    /// Prefetch every participant before round 1
    pub warm_up: bool,
    /// Keep fetched references on disk between runs
    pub persist: bool,
    /// Directory for persisted references (default: user cache dir)
    pub cache_dir: Option<String>,
    /// Base URL of the OpenAI-compatible search model
    pub base_url: String,
    /// Search model name
    pub model: String,
    /// Environment variable holding the search API key
    pub api_key_env: String,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_refs_per_role: 3,
            cache_ttl_seconds: 6 * 60 * 60,
            timeout_seconds: 60,
            warm_up: false,
            persist: true,
            cache_dir: None,
            base_url: "https://api.moonshot.cn/v1".to_string(),
            model: "moonshot-v1-8k".to_string(),
            api_key_env: "MOONSHOT_API_KEY".to_string(),
        }
    }
}

impl FileRetrievalConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
