use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::core::errors::ApiError;
use crate::rag::SplitterConfig;

/// Typed application settings, loaded from an optional `config.yml`.
///
/// Any field missing from the file falls back to its default, so an empty
/// or absent config is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub rag: RagSettings,
    pub ingest: IngestSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub max_context_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub docs_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            openai: OpenAiSettings::default(),
            rag: RagSettings::default(),
            ingest: IngestSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: 0.0,
        }
    }
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            chunk_size: 700,
            chunk_overlap: 100,
            top_k: 4,
            max_context_chars: 4000,
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            docs_dir: "docs".to_string(),
        }
    }
}

impl Settings {
    pub fn load(paths: &AppPaths) -> Result<Self, ApiError> {
        let path = config_path(paths);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(ApiError::internal)?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ApiError::Internal(format!("invalid config {}: {}", path.display(), e)))
    }
}

impl RagSettings {
    pub fn splitter(&self) -> SplitterConfig {
        SplitterConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
        }
    }
}

fn config_path(paths: &AppPaths) -> PathBuf {
    if let Ok(path) = env::var("DOCUCHAT_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    let user_config = paths.data_dir.join("config.yml");
    if user_config.exists() {
        return user_config;
    }

    paths.project_root.join("config.yml")
}
