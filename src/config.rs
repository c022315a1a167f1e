//! Editor configuration.
//!
//! Handles loading and validating `edita.toml`. Everything has a sensible
//! default; a config file only needs the values it wants to override:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! storage_dir = ".edita"        # Where the content document is persisted
//!
//! [media]
//! max_inline_bytes = 8388608    # Cap on ingested files (8 MiB)
//!
//! [chat]
//! greeting = "Olá! Sou o assistente O Poderoso. Como posso ajudar você hoje?"
//! model = "gemini-3-flash-preview"
//! temperature = 0.7
//! ```
//!
//! Unknown keys are rejected to catch typos early. Unlike the content store,
//! a malformed config file is a hard error — silently editing against the
//! wrong storage directory would be worse than stopping.

use crate::chat;
use crate::media;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `edita.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Directory holding the persisted content document.
    pub storage_dir: String,
    /// Media ingestion settings.
    pub media: MediaConfig,
    /// Chat assistant settings.
    pub chat: ChatConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_dir: ".edita".to_string(),
            media: MediaConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage_dir must not be empty".into(),
            ));
        }
        if self.media.max_inline_bytes == 0 {
            return Err(ConfigError::Validation(
                "media.max_inline_bytes must be non-zero".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(ConfigError::Validation(
                "chat.temperature must be 0.0-2.0".into(),
            ));
        }
        Ok(())
    }
}

/// Media ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Cap on ingested file size in bytes. Oversized files are rejected.
    pub max_inline_bytes: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_inline_bytes: media::DEFAULT_MAX_INLINE_BYTES,
        }
    }
}

/// Chat assistant settings (consumed by whichever backend is wired in).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    /// First message shown when the assistant opens.
    pub greeting: String,
    /// Text-generation model name, passed through to the backend.
    pub model: String,
    /// Sampling temperature, passed through to the backend.
    pub temperature: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: chat::DEFAULT_GREETING.to_string(),
            model: "gemini-3-flash-preview".to_string(),
            temperature: 0.7,
        }
    }
}

/// Load and validate a config file.
pub fn load(path: &Path) -> Result<EditorConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let config: EditorConfig = toml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

/// A documented stock `edita.toml` with every option at its default.
pub fn stock_config_toml() -> String {
    let defaults = EditorConfig::default();
    format!(
        r#"# edita configuration
# All options are optional - defaults shown below

# Where the content document is persisted
storage_dir = "{storage_dir}"

[media]
# Cap on ingested files, in bytes. Files over the limit are rejected
# instead of being inlined into the document.
max_inline_bytes = {max_inline_bytes}

[chat]
# First message shown when the assistant opens
greeting = "{greeting}"
# Model and sampling temperature, passed through to the chat backend
model = "{model}"
temperature = {temperature}
"#,
        storage_dir = defaults.storage_dir,
        max_inline_bytes = defaults.media.max_inline_bytes,
        greeting = defaults.chat.greeting,
        model = defaults.chat.model,
        temperature = defaults.chat.temperature,
    )
}
