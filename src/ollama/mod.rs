//! HTTP client for a local Ollama inference service
//!
//! Covers the three endpoints the documentation session needs: model
//! listing (`/api/tags`), batch embedding (`/api/embed`) and non-streaming
//! text generation (`/api/generate`).

use crate::config::OllamaConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::ModelError;
use crate::llm::LanguageModel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shown in place of model names when the service reports none
pub const NO_MODELS_AVAILABLE: &str = "No models available";

/// Shown in place of model names when the service cannot be reached
pub const ERROR_FETCHING_MODELS: &str = "Error fetching models";

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama REST API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    embedding_model: String,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embedding_model: config.embedding_model.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Names of the locally installed models
    pub async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        let endpoint = self.endpoint("/api/tags");
        let tags: TagsResponse = self.get_json(&endpoint).await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Model names for display; never fails.
    ///
    /// Degrades to a single placeholder entry when the list is empty or the
    /// service cannot be queried.
    pub async fn available_models(&self) -> Vec<String> {
        match self.list_models().await {
            Ok(models) if models.is_empty() => vec![NO_MODELS_AVAILABLE.to_string()],
            Ok(models) => models,
            Err(e) => {
                tracing::warn!("Failed to list models: {}", e);
                vec![ERROR_FETCHING_MODELS.to_string()]
            }
        }
    }

    /// Embed `texts` with `model`
    pub async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = self.endpoint("/api/embed");
        let request = EmbedRequest {
            model,
            input: texts,
        };
        let response: EmbedResponse = self.post_json(&endpoint, &request).await?;

        if response.embeddings.len() != texts.len() {
            return Err(ModelError::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: response.embeddings.len(),
            });
        }
        Ok(response.embeddings)
    }

    /// Complete `prompt` with `model` in a single non-streaming request
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let endpoint = self.endpoint("/api/generate");
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };
        let response: GenerateResponse = self.post_json(&endpoint, &request).await?;
        Ok(response.response)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
    ) -> Result<T, ModelError> {
        let response = self
            .http_client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| request_failed(endpoint, e))?;
        read_json(endpoint, response).await
    }

    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ModelError> {
        let response = self
            .http_client
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| request_failed(endpoint, e))?;
        read_json(endpoint, response).await
    }
}

fn request_failed(endpoint: &str, reason: impl std::fmt::Display) -> ModelError {
    ModelError::RequestFailed {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    }
}

async fn read_json<T: for<'de> Deserialize<'de>>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, ModelError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| request_failed(endpoint, e))?;

    if !status.is_success() {
        return Err(request_failed(endpoint, format!("status {status}: {text}")));
    }

    serde_json::from_str(&text).map_err(|e| ModelError::InvalidResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Ok(self.embed(&self.embedding_model, &texts).await?)
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        Ok(self.complete(model, prompt).await?)
    }
}
