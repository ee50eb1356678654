//! In-memory retrieval index over chunk documents
//!
//! Thin adapter over the external model service: chunks are embedded once at
//! build time, questions are embedded at query time, the closest chunks are
//! ranked by cosine similarity and handed to the language model as context.

use crate::embedding::{EmbeddingProvider, cosine_similarity};
use crate::error::ModelError;
use crate::llm::LanguageModel;
use crate::types::ChunkMetadata;
use anyhow::{Context, Result};

/// Opaque text handed to the index, with optional provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub metadata: Option<ChunkMetadata>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata: Some(metadata),
        }
    }

    /// Short provenance label, e.g. "src/app.py:10-24"
    pub fn label(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .map(|m| format!("{}:{}-{}", m.file_path, m.start_line, m.end_line))
    }
}

/// A document ranked against a question
#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f32,
}

#[derive(Debug)]
struct Entry {
    document: Document,
    embedding: Vec<f32>,
}

/// Queryable index built from a flat document collection
#[derive(Debug)]
pub struct DocumentIndex {
    entries: Vec<Entry>,
    embedding_model: String,
}

impl DocumentIndex {
    /// Embed every document in batches of `batch_size` and keep the vectors
    pub async fn build(
        documents: Vec<Document>,
        embedder: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Self> {
        let batch_size = batch_size.max(1);
        let mut entries = Vec::with_capacity(documents.len());
        let mut pending = documents.into_iter().peekable();
        let mut batch_no = 0usize;

        while pending.peek().is_some() {
            let batch: Vec<Document> = pending.by_ref().take(batch_size).collect();
            let texts: Vec<String> = batch.iter().map(|d| d.text.clone()).collect();
            batch_no += 1;

            let embeddings = embedder
                .embed_batch(texts)
                .await
                .with_context(|| format!("Failed to embed batch {}", batch_no))?;

            if embeddings.len() != batch.len() {
                return Err(ModelError::EmbeddingCountMismatch {
                    expected: batch.len(),
                    actual: embeddings.len(),
                }
                .into());
            }

            entries.extend(
                batch
                    .into_iter()
                    .zip(embeddings)
                    .map(|(document, embedding)| Entry {
                        document,
                        embedding,
                    }),
            );
        }

        tracing::info!(
            "Built index of {} documents with {}",
            entries.len(),
            embedder.model_name()
        );

        Ok(Self {
            entries,
            embedding_model: embedder.model_name().to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|e| &e.document)
    }

    /// The `top_k` documents closest to `question`, best first
    pub async fn retrieve(
        &self,
        question: &str,
        embedder: &dyn EmbeddingProvider,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument<'_>>> {
        if self.entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = embedder
            .embed_batch(vec![question.to_string()])
            .await
            .context("Failed to embed question")?
            .into_iter()
            .next()
            .context("Embedding service returned no vector for the question")?;

        let mut scored: Vec<ScoredDocument<'_>> = self
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document: &entry.document,
                score: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        // Stable sort keeps source order among equal scores
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }

    /// Answer `question` from the closest documents
    pub async fn answer(
        &self,
        question: &str,
        embedder: &dyn EmbeddingProvider,
        llm: &dyn LanguageModel,
        model: &str,
        top_k: usize,
    ) -> Result<String> {
        let context = self.retrieve(question, embedder, top_k).await?;
        tracing::debug!("Retrieved {} context chunks", context.len());

        let documents: Vec<&Document> = context.iter().map(|s| s.document).collect();
        let prompt = build_prompt(question, &documents);

        llm.generate(model, &prompt)
            .await
            .with_context(|| format!("Failed to generate answer with {}", model))
    }
}

/// Question-answering prompt over retrieved code context
pub fn build_prompt(question: &str, context: &[&Document]) -> String {
    let mut prompt = String::from("Below are excerpts from a source code project.\n");
    prompt.push_str("---------------------\n");

    if context.is_empty() {
        prompt.push_str("(no matching code was found)\n");
    }
    for document in context {
        if let Some(label) = document.label() {
            prompt.push_str(&format!("File: {}\n", label));
        }
        prompt.push_str(&document.text);
        prompt.push_str("\n\n");
    }

    prompt.push_str("---------------------\n");
    prompt.push_str(
        "Using only the code above and not prior knowledge, answer the question.\n",
    );
    prompt.push_str(&format!("Question: {}\nAnswer: ", question));
    prompt
}

#[cfg(test)]
mod tests;
