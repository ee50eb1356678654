//! Documentation session
//!
//! A `DocSession` owns the configuration, the chunker and the model
//! collaborators, plus the index built from the most recently loaded source.
//! Loading replaces the index; `unload` drops it.

mod loading;

use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::error::{AnalysisError, ValidationError};
use crate::index::DocumentIndex;
use crate::indexer::{
    BoundaryMode, CodeAnalyzer, CodeChunker, CodeMetrics, FileWalker, SourceLanguage,
};
use crate::llm::LanguageModel;
use crate::ollama::{ERROR_FETCHING_MODELS, NO_MODELS_AVAILABLE, OllamaClient};
use crate::source::SourceInput;
use crate::types::{
    ChunkPreviewRequest, ChunkPreviewResponse, LoadResponse, LoadSourceRequest, QueryResponse,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Answer returned when a question arrives before any source is loaded
pub const NOT_LOADED: &str = "Documentation not loaded.";

/// Question asked to produce whole-project documentation
pub const GENERATE_DOCUMENTATION_QUERY: &str = "Generate comprehensive documentation for this project, including main components, functions, and architecture.";

/// Index built from one loaded source
pub(crate) struct LoadedIndex {
    index: DocumentIndex,
    model: String,
    source: String,
}

#[derive(Clone)]
pub struct DocSession {
    pub(crate) config: Arc<Config>,
    pub(crate) chunker: Arc<CodeChunker>,
    pub(crate) models: Arc<OllamaClient>,
    pub(crate) embedder: Arc<dyn EmbeddingProvider>,
    pub(crate) llm: Arc<dyn LanguageModel>,
    pub(crate) analyzer: CodeAnalyzer,
    loaded: Arc<RwLock<Option<LoadedIndex>>>,
}

impl DocSession {
    /// Create a session from the layered configuration
    pub fn new() -> Result<Self> {
        let config = Config::new().context("Failed to load configuration")?;
        Self::with_config(config)
    }

    /// Create a session talking to the configured Ollama service
    pub fn with_config(config: Config) -> Result<Self> {
        let client = Arc::new(
            OllamaClient::new(&config.ollama).context("Failed to initialize Ollama client")?,
        );
        Self::with_collaborators(config, client.clone(), client.clone(), client)
    }

    /// Create a session with explicit model collaborators
    pub fn with_collaborators(
        config: Config,
        models: Arc<OllamaClient>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LanguageModel>,
    ) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing documentation session");
        tracing::debug!("Ollama service: {}", models.base_url());
        tracing::debug!("Embedding model: {}", embedder.model_name());
        tracing::debug!(
            "Chunk sizes: min {} / max {}, at most {} per file",
            config.chunking.min_chunk_size,
            config.chunking.max_chunk_size,
            config.chunking.max_chunks_per_file
        );

        Ok(Self {
            chunker: Arc::new(CodeChunker::new(config.chunking.clone())),
            config: Arc::new(config),
            models,
            embedder,
            llm,
            analyzer: CodeAnalyzer::new(),
            loaded: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Models offered by the inference service, or a placeholder entry
    pub async fn available_models(&self) -> Vec<String> {
        self.models.available_models().await
    }

    /// Stage a source, chunk it and build the index, replacing any previous one
    pub async fn load_source(&self, request: LoadSourceRequest) -> Result<LoadResponse> {
        let start = Instant::now();
        request.validate().map_err(anyhow::Error::msg)?;

        let model = request
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.config.ollama.llm_model.clone());
        if model == NO_MODELS_AVAILABLE || model == ERROR_FETCHING_MODELS {
            return Err(
                ValidationError::InvalidSource(format!("'{}' is not a model", model)).into(),
            );
        }

        let extensions = if request.extensions.is_empty() {
            self.config.indexing.file_extensions.clone()
        } else {
            request.extensions.clone()
        };

        let source = SourceInput::from_parts(request.files, request.source.as_deref())?;
        let description = source.describe();
        tracing::info!("Loading {} for model {}", description, model);

        let staged = tokio::task::spawn_blocking(move || source.stage())
            .await
            .context("Failed to spawn staging task")??;

        let walker = FileWalker::new(staged.root(), self.config.indexing.max_file_size)
            .with_extensions(extensions)
            .with_exclude_patterns(self.config.indexing.exclude_patterns.clone());
        let chunker = self.chunker.clone();

        let collected =
            tokio::task::spawn_blocking(move || loading::collect_documents(&walker, &chunker))
                .await
                .context("Failed to spawn chunking task")?
                .context("Failed to walk source")?;

        // Staging directory is no longer needed once contents are in memory
        drop(staged);

        let chunks_indexed = collected.documents.len();
        let index = DocumentIndex::build(
            collected.documents,
            self.embedder.as_ref(),
            self.config.indexing.batch_size,
        )
        .await
        .context("Failed to build index")?;

        *self.loaded.write().await = Some(LoadedIndex {
            index,
            model: model.clone(),
            source: description.clone(),
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Loaded {}: {} chunks from {} files in {} ms",
            description,
            chunks_indexed,
            collected.files_indexed,
            duration_ms
        );

        Ok(LoadResponse {
            source: description,
            files_found: collected.files_found,
            files_indexed: collected.files_indexed,
            files_failed: collected.errors.len(),
            chunks_indexed,
            model,
            duration_ms,
            errors: collected.errors,
        })
    }

    /// Answer a free-text question about the loaded source
    pub async fn query_documentation(&self, query: &str) -> Result<QueryResponse> {
        let start = Instant::now();
        let loaded = self.loaded.read().await;

        let Some(loaded) = loaded.as_ref() else {
            return Ok(QueryResponse {
                answer: NOT_LOADED.to_string(),
                loaded: false,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        };

        let answer = loaded
            .index
            .answer(
                query,
                self.embedder.as_ref(),
                self.llm.as_ref(),
                &loaded.model,
                self.config.retrieval.top_k,
            )
            .await?;

        Ok(QueryResponse {
            answer,
            loaded: true,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Ask for documentation of the whole loaded project
    pub async fn generate_documentation(&self) -> Result<QueryResponse> {
        self.query_documentation(GENERATE_DOCUMENTATION_QUERY).await
    }

    /// Complexity metrics for one file
    pub async fn analyze_complexity(
        &self,
        path: impl Into<PathBuf>,
    ) -> Result<CodeMetrics, AnalysisError> {
        let path = path.into();
        let analyzer = self.analyzer;
        let label = path.display().to_string();

        tokio::task::spawn_blocking(move || analyzer.analyze_file(&path))
            .await
            .map_err(|e| AnalysisError::failed(label, e))?
    }

    /// Chunk a file or inline content with the session's configuration
    pub async fn preview_chunks(
        &self,
        request: ChunkPreviewRequest,
    ) -> Result<ChunkPreviewResponse> {
        request.validate().map_err(anyhow::Error::msg)?;

        let chunker = if request.size_only {
            CodeChunker::new(self.chunker.config().clone().with_boundaries(BoundaryMode::None))
        } else {
            self.chunker.as_ref().clone()
        };

        let (content, extension) = match (request.path, request.content) {
            (Some(path), _) => {
                let path = PathBuf::from(path);
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let extension = request.extension.or_else(|| extension_of(&path));
                (content, extension)
            }
            (None, content) => (content.unwrap_or_default(), request.extension),
        };

        let extension = extension.map(|e| e.trim_start_matches('.').to_string());
        let scanner = chunker.scanner_for(extension.as_deref());
        let chunks = chunker.chunk_code_with(&content, &scanner);

        for (i, chunk) in chunks.iter().enumerate() {
            let preview: String = chunk.chars().take(200).collect();
            tracing::debug!("Chunk {}: {}", i, preview);
        }

        tracing::info!(
            "Previewed {} chunks ({})",
            chunks.len(),
            extension
                .as_deref()
                .and_then(SourceLanguage::from_extension)
                .map(|l| l.name())
                .unwrap_or("generic markers")
        );

        Ok(ChunkPreviewResponse {
            chunk_count: chunks.len(),
            chunks,
        })
    }

    /// Drop the loaded index; returns whether one was loaded
    pub async fn unload(&self) -> bool {
        let previous = self.loaded.write().await.take();
        if let Some(loaded) = &previous {
            tracing::info!("Unloaded {}", loaded.source);
        }
        previous.is_some()
    }

    pub async fn is_loaded(&self) -> bool {
        self.loaded.read().await.is_some()
    }

    /// Description of the loaded source and its chunk count
    pub async fn loaded_source(&self) -> Option<(String, usize)> {
        self.loaded
            .read()
            .await
            .as_ref()
            .map(|l| (l.source.clone(), l.index.len()))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(String::from)
}
