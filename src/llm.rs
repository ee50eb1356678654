//! Text generation seam used to answer questions from retrieved context

use anyhow::Result;
use async_trait::async_trait;

/// A model that completes a prompt
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt` with `model`, returning the full response text
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}
