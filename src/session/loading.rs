use crate::index::Document;
use crate::indexer::{CodeChunk, CodeChunker, FileWalker};
use anyhow::Result;
use rayon::prelude::*;

/// Documents produced from one staged source tree
#[derive(Debug, Default)]
pub(crate) struct CollectedDocuments {
    pub documents: Vec<Document>,
    pub files_found: usize,
    pub files_indexed: usize,
    pub errors: Vec<String>,
}

/// Discover files, then read and chunk them in parallel.
///
/// A file that cannot be read is logged and contributes nothing; the batch
/// carries on. Blocking.
pub(crate) fn collect_documents(
    walker: &FileWalker,
    chunker: &CodeChunker,
) -> Result<CollectedDocuments> {
    let paths = walker.discover()?;

    let per_file: Vec<_> = paths
        .par_iter()
        .map(|path| walker.load(path).map(|info| chunker.chunk_file(&info)))
        .collect();

    let mut collected = CollectedDocuments {
        files_found: paths.len(),
        ..Default::default()
    };

    for (path, result) in paths.iter().zip(per_file) {
        match result {
            Ok(chunks) => {
                if chunks.is_empty() {
                    tracing::debug!("No chunks produced for {}", path.display());
                    continue;
                }
                collected.files_indexed += 1;
                collected.documents.extend(chunks.into_iter().map(into_document));
            }
            Err(e) => {
                tracing::warn!("Error processing file {}: {}", path.display(), e);
                collected.errors.push(e.to_string());
            }
        }
    }

    tracing::info!(
        "Chunked {} of {} files into {} documents",
        collected.files_indexed,
        collected.files_found,
        collected.documents.len()
    );
    Ok(collected)
}

fn into_document(chunk: CodeChunk) -> Document {
    Document::with_metadata(chunk.content, chunk.metadata)
}
