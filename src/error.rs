/// Centralized error types for codedoc-rag using thiserror
///
/// Chunking itself never fails; these errors cover the collaborators around it
/// (configuration, file staging, git, the inference service and code analysis).
use thiserror::Error;

/// Main error type for the system
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Indexing error: {0}")]
    Indexing(#[from] IndexingError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Model service error: {0}")]
    Model(#[from] ModelError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors related to input validation
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Invalid file extension '{0}': must start with '.'")]
    InvalidExtension(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Empty {0}")]
    Empty(String),
}

/// Errors related to walking and reading the staged source tree
#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to read file '{file}': {reason}")]
    FileReadFailed { file: String, reason: String },
}

/// Errors related to git operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a recognised git repository URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to clone '{url}': {reason}")]
    CloneFailed { url: String, reason: String },
}

/// Errors returned by the local inference service
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Unexpected response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Expected {expected} embeddings, got {actual}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
}

/// Errors raised by code complexity analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error analyzing {path}: {reason}")]
    Failed { path: String, reason: String },

    #[error("Unsupported language for analysis: {0}")]
    UnsupportedLanguage(String),
}

impl AnalysisError {
    /// Wrap an underlying cause for the given file
    pub fn failed(path: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        AnalysisError::Failed {
            path: path.into(),
            reason: cause.to_string(),
        }
    }
}

// Conversion from anyhow::Error to RagError
impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::Other(format!("{:#}", err))
    }
}

impl RagError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        RagError::Other(msg.into())
    }

    /// Convert to a user-facing error string suitable for MCP responses
    pub fn to_user_string(&self) -> String {
        format!("{}", self)
    }

    /// Check if this is a user error (validation, bad config value) vs system error
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RagError::Validation(_)
                | RagError::Config(ConfigError::InvalidValue { .. })
                | RagError::Git(GitError::InvalidUrl(_))
        )
    }

    /// Check if retrying the operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RagError::Model(ModelError::RequestFailed { .. }) | RagError::Io(_)
        )
    }
}
