//! # CodeDoc RAG - Question answering over source code
//!
//! Loads a source tree (uploaded files, a local folder or a cloned git
//! repository), splits every file into bounded chunks aligned with functions
//! and classes, and answers questions about the code through a local Ollama
//! service. Exposed as a library, a CLI and an MCP server.
//!
//! ## Chunking
//!
//! Each file is scanned line by line. A chunk closes when adding the next line
//! would exceed `max_chunk_size`, or when a boundary line (a function, class or
//! similar declaration of the file's language) arrives after the chunk has
//! reached `min_chunk_size`. Trailing fragments below the minimum are dropped
//! and at most `max_chunks_per_file` chunks are kept, spread evenly across the
//! file.
//!
//! ```
//! use codedoc_rag::indexer::{ChunkConfig, CodeChunker};
//!
//! let chunker = CodeChunker::new(ChunkConfig::default());
//! assert!(chunker.chunk_code("").is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`indexer`]: boundary scanning, chunk assembly, file walking, complexity metrics
//! - [`source`]: source inputs and their staging on disk
//! - [`git`]: repository URL detection and cloning
//! - [`ollama`]: model listing, embedding and generation over HTTP
//! - [`index`]: in-memory retrieval over chunk documents
//! - [`session`]: the documentation session tying it all together
//! - [`mcp_server`]: MCP protocol server with tools and prompts
//! - [`config`]: configuration management with environment variable support
//! - [`types`]: MCP request/response types with JSON schema
//! - [`error`]: error types

/// Configuration management with environment variable overrides
pub mod config;

/// Text embedding seam
pub mod embedding;

/// Error types and utilities
pub mod error;

/// Git repository URL detection and cloning
pub mod git;

/// In-memory retrieval index
pub mod index;

/// File walking, code chunking, and complexity analysis
pub mod indexer;

/// Text generation seam
pub mod llm;

/// MCP server implementation with tools and prompts
pub mod mcp_server;

/// Ollama REST API client
pub mod ollama;

/// Platform-specific configuration paths
pub mod paths;

/// Documentation session
pub mod session;

/// Source inputs and staging
pub mod source;

/// MCP request/response types with JSON schema definitions
pub mod types;

#[cfg(test)]
mod testing;
