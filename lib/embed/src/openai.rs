//! OpenAI-compatible embeddings client
//!
//! Talks to any `/embeddings` endpoint that speaks the OpenAI wire shape.
//! One text per request; batching happens a layer up in the cache, which
//! deduplicates before dispatch. No retry logic here: this layer is a plain
//! pass-through and the pipeline fails the whole batch on the first error.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{EmbedError, Result};
use crate::provider::EmbeddingProvider;

/// Default embedding model (1536 dimensions)
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Async embeddings client for OpenAI-compatible endpoints
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
}

impl OpenAiProvider {
    /// Build a client for the given endpoint and model.
    ///
    /// Fails with [`EmbedError::MissingApiKey`] on an empty key.
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(EmbedError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|e| EmbedError::Malformed(format!("invalid API key: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            dimensions: None,
        })
    }

    /// Client with defaults: OpenAI API, `text-embedding-3-small`
    pub fn from_api_key(api_key: &str) -> Result<Self> {
        Self::new(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL)
    }

    /// Require a specific output dimension and request it from the provider
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
            dimensions: self.dimensions,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Malformed(format!(
                "embeddings request failed ({status}): {body}"
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Malformed("empty embedding data".to_string()))?;

        if let Some(expected) = self.dimensions {
            if first.embedding.len() != expected {
                return Err(EmbedError::InvalidDimension {
                    expected,
                    actual: first.embedding.len(),
                });
            }
        }

        debug!(
            model = %self.model,
            dim = first.embedding.len(),
            chars = text.len(),
            "embedded text"
        );
        Ok(first.embedding)
    }
}
