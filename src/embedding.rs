//! Embedding provider abstraction and implementations.
//!
//! Defines the [`EmbeddingProvider`] trait and concrete implementations:
//! - **[`DisabledProvider`]** — returns errors; used when embeddings are not configured.
//! - **[`GeminiEmbedder`]** — calls the Gemini `batchEmbedContents` API.
//!
//! Also provides [`cosine_similarity`], used by the in-memory vector store.
//!
//! # Provider Selection
//!
//! Use [`create_provider`] to instantiate the appropriate provider based
//! on the configuration:
//!
//! ```rust
//! # use docqa::config::{Credentials, EmbeddingConfig};
//! # use docqa::embedding::create_provider;
//! let config = EmbeddingConfig {
//!     provider: "disabled".to_string(),
//!     ..EmbeddingConfig::default()
//! };
//! let provider = create_provider(&config, &Credentials::default()).unwrap();
//! assert_eq!(provider.model_name(), "disabled");
//! ```

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Credentials, EmbeddingConfig};
use crate::error::Error;
use crate::gemini::{self, Content};
use crate::http;
use crate::models::TaskType;

/// Maximum number of texts per `batchEmbedContents` call.
const MAX_BATCH_REQUESTS: usize = 100;

/// Trait for embedding providers.
///
/// `embed` returns one vector per input text, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"text-embedding-004"`).
    fn model_name(&self) -> &str;

    /// Embed a batch of texts with the given intent tag.
    async fn embed(&self, texts: &[String], task: TaskType) -> Result<Vec<Vec<f32>>>;
}

/// Embed a single query text.
///
/// Convenience wrapper around [`EmbeddingProvider::embed`] for one text
/// (e.g. a question at query time).
pub async fn embed_query(provider: &dyn EmbeddingProvider, text: &str) -> Result<Vec<f32>> {
    let results = provider
        .embed(&[text.to_string()], TaskType::RetrievalQuery)
        .await?;
    results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Empty embedding response"))
}

// ============ Disabled Provider ============

/// A no-op embedding provider that always returns errors.
///
/// Used when `embedding.provider = "disabled"` in the configuration.
pub struct DisabledProvider;

#[async_trait]
impl EmbeddingProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn embed(&self, _texts: &[String], _task: TaskType) -> Result<Vec<Vec<f32>>> {
        bail!("Embedding provider is disabled. Set [embedding] provider in config.")
    }
}

// ============ Gemini Provider ============

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

/// Embedding provider using the Gemini API.
///
/// Requires `GOOGLE_API_KEY`. Inputs larger than the API's per-call limit
/// are split into several requests and re-assembled in order.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    model_path: String,
    title: Option<String>,
    base_url: String,
    max_retries: u32,
}

impl GeminiEmbedder {
    pub fn new(config: &EmbeddingConfig, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            model_path: gemini::model_path(&config.model),
            title: config.title.clone(),
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
        })
    }

    fn batch_request<'a>(&'a self, texts: &'a [String], task: TaskType) -> BatchEmbedRequest<'a> {
        // The API only accepts a title alongside document-intent requests.
        let title = match task {
            TaskType::RetrievalDocument => self.title.as_deref(),
            TaskType::RetrievalQuery => None,
        };
        BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: &self.model_path,
                    content: Content::text(text),
                    task_type: task,
                    title,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String], task: TaskType) -> Result<Vec<Vec<f32>>> {
        let url = gemini::method_url(&self.base_url, &self.model, "batchEmbedContents");
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_REQUESTS) {
            let body = self.batch_request(batch, task);
            debug!(model = %self.model, task = task.as_str(), texts = batch.len(), "embedding batch");

            let response = http::send_with_retry("Gemini embeddings", self.max_retries, || {
                self.client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&body)
            })
            .await?;

            let parsed: BatchEmbedResponse = response
                .json()
                .await
                .context("Invalid Gemini embeddings response")?;
            embeddings.extend(parse_embeddings(parsed, batch.len())?);
        }

        Ok(embeddings)
    }
}

fn parse_embeddings(response: BatchEmbedResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    if response.embeddings.len() != expected {
        bail!(
            "Invalid Gemini embeddings response: expected {} embeddings, got {}",
            expected,
            response.embeddings.len()
        );
    }
    if response.embeddings.iter().any(|e| e.values.is_empty()) {
        bail!("Invalid Gemini embeddings response: empty embedding values");
    }
    Ok(response.embeddings.into_iter().map(|e| e.values).collect())
}

/// Create the appropriate [`EmbeddingProvider`] based on configuration.
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledProvider`] |
/// | `"gemini"` | [`GeminiEmbedder`] |
///
/// # Errors
///
/// [`Error::Configuration`] for unknown provider names or a missing
/// `GOOGLE_API_KEY`.
pub fn create_provider(
    config: &EmbeddingConfig,
    credentials: &Credentials,
) -> Result<Box<dyn EmbeddingProvider>, Error> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledProvider)),
        "gemini" => {
            let api_key = credentials.require_google_api_key()?;
            let provider = GeminiEmbedder::new(config, api_key)
                .map_err(|e| Error::Configuration(format!("{:#}", e)))?;
            Ok(Box::new(provider))
        }
        other => Err(Error::Configuration(format!(
            "Unknown embedding provider: {}",
            other
        ))),
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors or vectors of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
