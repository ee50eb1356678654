use crate::error::ValidationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A file uploaded directly by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadedFile {
    /// File name (no directory components), e.g. "main.py"
    pub name: String,
    /// File content as text
    pub content: String,
}

/// Request to load a source tree and build the question-answering index
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoadSourceRequest {
    /// Local folder path or git repository URL (ignored when `files` is non-empty)
    #[serde(default)]
    pub source: Option<String>,
    /// Files uploaded inline
    #[serde(default)]
    pub files: Vec<UploadedFile>,
    /// Model used to answer questions (defaults to the configured model)
    #[serde(default)]
    pub model: Option<String>,
    /// File extensions to process, e.g. [".py", ".js"] (defaults to the configured list)
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl LoadSourceRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() && self.source.as_deref().is_none_or(|s| s.trim().is_empty()) {
            return Err("Either 'source' or 'files' must be provided".to_string());
        }

        for file in &self.files {
            validate_file_name(&file.name)?;
        }

        if let Some(ext) = self.extensions.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
            return Err(ValidationError::InvalidExtension(ext.clone()).to_string());
        }

        Ok(())
    }
}

/// Uploaded file names must be a single, plain path component
pub fn validate_file_name(name: &str) -> Result<(), String> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(format!("Invalid file name: '{}'", name));
    }
    Ok(())
}

/// Result of loading a source
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoadResponse {
    /// Description of what was loaded
    pub source: String,
    /// Files that matched the extension filter
    pub files_found: usize,
    /// Files that produced at least one chunk
    pub files_indexed: usize,
    /// Files skipped because they could not be read
    pub files_failed: usize,
    /// Chunks handed to the index
    pub chunks_indexed: usize,
    /// Model that will answer questions
    pub model: String,
    pub duration_ms: u64,
    /// Non-fatal per-file errors
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Ask a question about the loaded code
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryRequest {
    /// The question about the code
    pub query: String,
}

impl QueryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Query cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Answer to a documentation query
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryResponse {
    pub answer: String,
    /// False when no source was loaded and `answer` is the not-loaded notice
    pub loaded: bool,
    pub duration_ms: u64,
}

/// Request to generate documentation for the whole project
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateDocumentationRequest {}

/// Request to list models offered by the inference service
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListModelsRequest {}

/// Available models, or a single placeholder entry when none could be listed
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// Request to compute complexity metrics for one file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeRequest {
    /// Path to the source file
    pub path: String,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("Path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Request to preview how a file would be chunked
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChunkPreviewRequest {
    /// Path of a file to chunk
    #[serde(default)]
    pub path: Option<String>,
    /// Inline content to chunk instead of a file
    #[serde(default)]
    pub content: Option<String>,
    /// Extension selecting the boundary markers for inline content, e.g. "py"
    #[serde(default)]
    pub extension: Option<String>,
    /// Ignore boundary markers and split on size only
    #[serde(default)]
    pub size_only: bool,
}

impl ChunkPreviewRequest {
    pub fn validate(&self) -> Result<(), String> {
        match (&self.path, &self.content) {
            (Some(_), Some(_)) => Err("Provide either 'path' or 'content', not both".to_string()),
            (None, None) => Err("Either 'path' or 'content' must be provided".to_string()),
            _ => Ok(()),
        }
    }
}

/// Chunks produced for a preview
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChunkPreviewResponse {
    pub chunk_count: usize,
    pub chunks: Vec<String>,
}

/// Where a chunk came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChunkMetadata {
    /// File path relative to the staged root
    pub file_path: String,
    /// Position of the chunk in the file's chunk sequence
    pub chunk_index: usize,
    /// First source line (1-based)
    pub start_line: usize,
    /// Last source line (inclusive)
    pub end_line: usize,
    pub language: Option<String>,
    pub extension: Option<String>,
    /// SHA256 hash of the file content
    pub file_hash: String,
}
