//! Deterministic model fakes shared by unit tests

use crate::embedding::EmbeddingProvider;
use crate::llm::LanguageModel;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const VOCABULARY: &[&str] = &["parse", "render", "network", "database", "config"];

/// Embeds text as keyword occurrence counts over a tiny vocabulary
#[derive(Default)]
pub(crate) struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn embed_one(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        VOCABULARY
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Always fails, for error-path tests
pub(crate) struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_batch(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        bail!("embedding service unavailable")
    }

    fn model_name(&self) -> &str {
        "failing-test"
    }
}

/// Records every prompt and answers with a fixed string
#[derive(Default)]
pub(crate) struct RecordingModel {
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl RecordingModel {
    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.prompts.lock().ok()?.last().cloned()
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((model.to_string(), prompt.to_string()));
        }
        Ok(format!("answer from {}", model))
    }
}
