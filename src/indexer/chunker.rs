use super::CodeChunk;
use super::boundary::{BoundaryMode, LineScanner, line_size};
use super::file_info::FileInfo;
use crate::error::ConfigError;
use crate::types::ChunkMetadata;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Size limits and boundary policy for chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Upper bound, in characters, on a chunk's accumulated line content
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Size a chunk must reach before it may be closed or emitted
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    /// Trailing characters of the previous chunk carried into the next one
    /// (only when `apply_overlap` is set)
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Hard cap on chunks emitted per file
    #[serde(default = "default_max_chunks_per_file")]
    pub max_chunks_per_file: usize,

    #[serde(default)]
    pub apply_overlap: bool,

    /// Boundary marker selection
    #[serde(default)]
    pub boundaries: BoundaryMode,
}

fn default_max_chunk_size() -> usize {
    512
}

fn default_min_chunk_size() -> usize {
    128
}

fn default_overlap() -> usize {
    50
}

fn default_max_chunks_per_file() -> usize {
    10
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            min_chunk_size: default_min_chunk_size(),
            overlap: default_overlap(),
            max_chunks_per_file: default_max_chunks_per_file(),
            apply_overlap: false,
            boundaries: BoundaryMode::default(),
        }
    }
}

impl ChunkConfig {
    /// Build a config with explicit limits, validating them
    pub fn new(
        max_chunk_size: usize,
        min_chunk_size: usize,
        max_chunks_per_file: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            max_chunk_size,
            min_chunk_size,
            max_chunks_per_file,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_boundaries(mut self, boundaries: BoundaryMode) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self.apply_overlap = true;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_chunk_size >= self.max_chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "chunking.min_chunk_size".to_string(),
                reason: format!(
                    "must be less than max_chunk_size ({} >= {})",
                    self.min_chunk_size, self.max_chunk_size
                ),
            });
        }

        if self.max_chunks_per_file == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chunking.max_chunks_per_file".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Splits file content into bounded, boundary-aligned chunks
#[derive(Debug, Clone, Default)]
pub struct CodeChunker {
    config: ChunkConfig,
}

impl CodeChunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Chunker that ignores boundaries and splits on size alone
    pub fn size_only(config: ChunkConfig) -> Self {
        Self::new(config.with_boundaries(BoundaryMode::None))
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Scanner for a file with the given extension
    pub fn scanner_for(&self, extension: Option<&str>) -> LineScanner {
        LineScanner::select(self.config.boundaries, extension)
    }

    /// Chunk content of unknown language
    pub fn chunk_code(&self, content: &str) -> Vec<String> {
        self.chunk_code_with(content, &self.scanner_for(None))
    }

    /// Chunk content using an explicit scanner
    pub fn chunk_code_with(&self, content: &str, scanner: &LineScanner) -> Vec<String> {
        self.chunk_spans(content, scanner)
            .into_iter()
            .map(|span| span.content)
            .collect()
    }

    /// Chunk a discovered file, attaching metadata to every chunk
    pub fn chunk_file(&self, file_info: &FileInfo) -> Vec<CodeChunk> {
        let scanner = self.scanner_for(file_info.extension.as_deref());

        self.chunk_spans(&file_info.content, &scanner)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, span)| CodeChunk {
                content: span.content,
                metadata: ChunkMetadata {
                    file_path: file_info.relative_path.clone(),
                    chunk_index,
                    start_line: span.start_line,
                    end_line: span.end_line,
                    language: file_info.language.clone(),
                    extension: file_info.extension.clone(),
                    file_hash: file_info.hash.clone(),
                },
            })
            .collect()
    }

    /// Assemble, optionally overlap, then cap
    pub(crate) fn chunk_spans(&self, content: &str, scanner: &LineScanner) -> Vec<ChunkSpan> {
        if content.is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = content.split('\n').collect();
        let mut spans: Vec<ChunkSpan> = self
            .assemble(&lines, scanner)
            .into_iter()
            .map(|range| ChunkSpan {
                content: lines[range.clone()].join("\n"),
                start_line: range.start + 1,
                end_line: range.end,
            })
            .collect();

        if self.config.apply_overlap && self.config.overlap > 0 {
            apply_overlap(&mut spans, self.config.overlap);
        }

        cap_evenly(spans, self.config.max_chunks_per_file)
    }

    /// Single pass over the lines producing half-open line ranges
    fn assemble(&self, lines: &[&str], scanner: &LineScanner) -> Vec<Range<usize>> {
        let max = self.config.max_chunk_size;
        let min = self.config.min_chunk_size;

        let mut ranges = Vec::new();
        // The buffer is always lines[start..idx]
        let mut start = 0;
        let mut accumulated = 0;

        for (idx, line) in lines.iter().enumerate() {
            let size = line_size(line);

            if accumulated + size > max && idx > start {
                if accumulated >= min {
                    ranges.push(start..idx);
                }
                start = idx;
                accumulated = 0;
            }

            if scanner.is_boundary(line) && accumulated >= min {
                if idx > start {
                    ranges.push(start..idx);
                }
                start = idx;
                accumulated = 0;
            }

            accumulated += size;
        }

        if lines.len() > start && accumulated >= min {
            ranges.push(start..lines.len());
        }

        ranges
    }
}

/// A chunk with its 1-based inclusive line range in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChunkSpan {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Keep every `step`-th item from the start so the kept items stay spread
/// across the whole sequence, then truncate to `max`.
pub fn cap_evenly<T>(items: Vec<T>, max: usize) -> Vec<T> {
    if items.len() <= max {
        return items;
    }

    let step = (items.len() / max.max(1)).max(1);
    items.into_iter().step_by(step).take(max).collect()
}

/// Prefix each chunk with the last `overlap` characters of its predecessor.
///
/// `start_line` moves back to the predecessor line where the prefix begins,
/// so the line range covers the overlapped text.
fn apply_overlap(spans: &mut [ChunkSpan], overlap: usize) {
    let tails: Vec<(String, usize)> = spans
        .iter()
        .map(|span| {
            let char_count = span.content.chars().count();
            let tail: String = span
                .content
                .chars()
                .skip(char_count.saturating_sub(overlap))
                .collect();
            let first_line = span.end_line - tail.matches('\n').count();
            (tail, first_line)
        })
        .collect();

    for (span, (tail, first_line)) in spans.iter_mut().skip(1).zip(tails) {
        span.content = format!("{}\n{}", tail, span.content);
        span.start_line = first_line;
    }
}
