use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{defaults, endpoints, paths, prompts};
use crate::error::DevAgentError;
use crate::llm::OpenAIClient;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub chunking: ChunkingSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
    /// Pinned sampling temperature sent with every request.
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingSettings {
    pub max_tokens: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistorySettings {
    pub path: PathBuf,
    pub developer_prompt: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: defaults::MODEL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            base_url: endpoints::OPENAI_BASE_URL.to_string(),
            temperature: defaults::TEMPERATURE,
        }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_tokens: defaults::CHUNK_MAX_TOKENS,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::HISTORY_FILE),
            developer_prompt: prompts::DEVELOPER_PRIMING.to_string(),
        }
    }
}

/// Everything the orchestrator needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    pub model: String,
    pub chunk_max_tokens: usize,
    pub history_path: PathBuf,
    pub developer_prompt: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Settings::default().orchestrator_config()
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR_NAME)
            .join(paths::CONFIG_FILE_NAME)
    }

    /// Load from the default config location.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unusable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Invalid config {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Cannot read config {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DevAgentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| DevAgentError::Configuration(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the API key from the environment variable specified in settings.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            model: self.llm.model.clone(),
            chunk_max_tokens: self.chunking.max_tokens,
            history_path: self.history.path.clone(),
            developer_prompt: self.history.developer_prompt.clone(),
        }
    }

    /// Build the completion client from the current settings.
    pub fn build_completion_client(&self) -> Result<OpenAIClient, DevAgentError> {
        let api_key = self.api_key().ok_or_else(|| {
            DevAgentError::Configuration(format!(
                "API key not found: set the {} environment variable",
                self.llm.api_key_env
            ))
        })?;

        Ok(OpenAIClient::new(api_key)
            .with_model(self.llm.model.clone())
            .with_base_url(self.llm.base_url.clone())
            .with_temperature(self.llm.temperature))
    }
}
