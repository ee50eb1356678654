/// Configuration system for codedoc-rag
///
/// Supports loading from multiple sources with priority:
/// Environment variables > Config file > Defaults
use crate::error::{ConfigError, RagError};
use crate::indexer::{ChunkConfig, DEFAULT_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chunk sizing and boundary policy
    #[serde(default)]
    pub chunking: ChunkConfig,

    /// Local inference service configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Source discovery configuration
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Context retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Local inference service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model that answers questions
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Model that embeds chunks and questions
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Source discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// File name suffixes to process, e.g. ".py"
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Maximum file size to process (in bytes)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,

    /// Paths containing any of these substrings are skipped
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Chunks per embedding request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Context retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Chunks handed to the model as context for each question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "llama3.2".to_string()
}

fn default_embedding_model() -> String {
    "snowflake-arctic-embed".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_file_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_max_file_size() -> usize {
    1_048_576 // 1 MB
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "__pycache__".to_string(),
        ".venv".to_string(),
    ]
}

fn default_batch_size() -> usize {
    32
}

fn default_top_k() -> usize {
    5
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            llm_model: default_llm_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            file_extensions: default_file_extensions(),
            max_file_size: default_max_file_size(),
            exclude_patterns: default_exclude_patterns(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> RagError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
    .into()
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, RagError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or fall back to defaults
    pub fn load_or_default() -> Result<Self, RagError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), RagError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), RagError> {
        self.chunking.validate()?;

        if self.ollama.base_url.trim().is_empty() {
            return Err(invalid("ollama.base_url", "must not be empty"));
        }

        if self.ollama.timeout_secs == 0 {
            return Err(invalid("ollama.timeout_secs", "must be greater than 0"));
        }

        if let Some(ext) = self
            .indexing
            .file_extensions
            .iter()
            .find(|e| !e.starts_with('.') || e.len() < 2)
        {
            return Err(invalid(
                "indexing.file_extensions",
                format!("'{}' must start with '.'", ext),
            ));
        }

        if self.indexing.max_file_size == 0 {
            return Err(invalid("indexing.max_file_size", "must be greater than 0"));
        }

        if self.indexing.batch_size == 0 {
            return Err(invalid("indexing.batch_size", "must be greater than 0"));
        }

        if self.retrieval.top_k == 0 {
            return Err(invalid("retrieval.top_k", "must be greater than 0"));
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CODEDOC_OLLAMA_URL") {
            self.ollama.base_url = url;
        }

        if let Ok(model) = std::env::var("CODEDOC_LLM_MODEL") {
            self.ollama.llm_model = model;
        }

        if let Ok(model) = std::env::var("CODEDOC_EMBEDDING_MODEL") {
            self.ollama.embedding_model = model;
        }

        if let Ok(size) = std::env::var("CODEDOC_MAX_CHUNK_SIZE")
            && let Ok(size) = size.parse()
        {
            self.chunking.max_chunk_size = size;
        }

        if let Ok(size) = std::env::var("CODEDOC_MIN_CHUNK_SIZE")
            && let Ok(size) = size.parse()
        {
            self.chunking.min_chunk_size = size;
        }

        if let Ok(count) = std::env::var("CODEDOC_MAX_CHUNKS_PER_FILE")
            && let Ok(count) = count.parse()
        {
            self.chunking.max_chunks_per_file = count;
        }

        if let Ok(top_k) = std::env::var("CODEDOC_TOP_K")
            && let Ok(top_k) = top_k.parse()
        {
            self.retrieval.top_k = top_k;
        }
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, RagError> {
        let mut config = Self::load_or_default()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests;
