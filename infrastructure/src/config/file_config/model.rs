//! Language model configuration from TOML (`[model]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat endpoint used to generate turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Base URL of the API, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name sent with each request
    pub name: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Max tokens per turn
    pub max_tokens: u32,
    /// Timeout in seconds for one turn (0 disables)
    pub timeout_seconds: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            name: "deepseek-chat".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_seconds: 120,
        }
    }
}

impl FileModelConfig {
    /// The API key from the configured environment variable, if set
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
