//! Source discovery, boundary-aware chunking and complexity analysis
//!
//! Provides functionality to walk a staged source tree filtered by extension,
//! split each file into bounded chunks aligned with logical code units, and
//! compute per-file complexity metrics.

mod boundary;
mod chunker;
mod complexity;
mod encoding;
mod file_info;
mod file_walker;
mod language;

pub use boundary::{BoundaryMode, GENERIC_MARKERS, LineScanner, is_boundary, line_size};
pub use chunker::{ChunkConfig, CodeChunker, cap_evenly};
pub use complexity::{CodeAnalyzer, CodeMetrics, FunctionMetrics};
pub use encoding::decode_source;
pub use file_info::FileInfo;
pub use file_walker::{DEFAULT_EXTENSIONS, FileWalker};
pub use language::{SourceLanguage, detect_language};

use crate::types::ChunkMetadata;

/// Represents a code chunk ready for indexing
#[derive(Debug, Clone)]
pub struct CodeChunk {
    /// The chunk text: contiguous source lines joined by newlines
    pub content: String,
    /// Where the chunk came from (file path, line range, language, etc.)
    pub metadata: ChunkMetadata,
}
