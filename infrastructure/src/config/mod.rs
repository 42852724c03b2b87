//! Configuration file loading for roundtable
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ROUNDTABLE_*` environment variables (`ROUNDTABLE_DEBATE__ROUNDS=4`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./roundtable.toml` or `./.roundtable.toml`
//! 4. Global config: `$XDG_CONFIG_HOME/roundtable/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDebateConfig, FileModelConfig, FileOutputConfig,
    FileOutputFormat, FilePlaybackConfig, FileRetrievalConfig, FileSpeechConfig,
    FileWorkerConfig,
};
pub(crate) use file_config::seconds;
pub use loader::ConfigLoader;
