//! Speech configuration from TOML (`[speech]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible `/audio/speech` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSpeechConfig {
    /// Synthesize audio for each turn
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    /// Audio container requested from the endpoint
    pub format: String,
    /// Send voices as `{model}:{voice}` instead of the bare role voice
    pub qualify_voice: bool,
    /// Timeout in seconds for one synthesis (0 disables)
    pub timeout_seconds: u64,
}

impl Default for FileSpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.siliconflow.cn/v1".to_string(),
            model: "FunAudioLLM/CosyVoice2-0.5B".to_string(),
            api_key_env: "SILICONCLOUD_API_KEY".to_string(),
            format: "mp3".to_string(),
            qualify_voice: true,
            timeout_seconds: 30,
        }
    }
}

impl FileSpeechConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
