//! Text generation provider abstraction and implementations.
//!
//! - **[`DisabledGenerator`]** — returns errors; used when generation is not configured.
//! - **[`GeminiGenerator`]** — calls the Gemini `generateContent` API.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Credentials, GenerationSettings};
use crate::error::Error;
use crate::gemini::{self, Content};
use crate::http;
use crate::models::GenerationConfig;

/// Trait for text generation providers.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"gemini-2.5-flash"`).
    fn model_name(&self) -> &str;

    /// Generate a completion for `prompt`. May return an empty string when
    /// the model produced no text.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}

/// A generation provider that always returns errors.
pub struct DisabledGenerator;

#[async_trait]
impl GenerationProvider for DisabledGenerator {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str, _config: &GenerationConfig) -> Result<String> {
        bail!("Generation provider is disabled. Set [generation] provider in config.")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: DecodingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodingConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Generation provider using the Gemini API. Requires `GOOGLE_API_KEY`.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_retries: u32,
}

impl GeminiGenerator {
    pub fn new(settings: &GenerationSettings, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client(settings.timeout_secs)?,
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            max_retries: settings.max_retries,
        })
    }
}

fn request_body<'a>(prompt: &'a str, config: &GenerationConfig) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content::user(prompt)],
        generation_config: DecodingConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        },
    }
}

#[async_trait]
impl GenerationProvider for GeminiGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let url = gemini::method_url(&self.base_url, &self.model, "generateContent");
        let body = request_body(prompt, config);
        debug!(model = %self.model, prompt_chars = prompt.len(), "generating answer");

        let response = http::send_with_retry("Gemini generation", self.max_retries, || {
            self.client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
        })
        .await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Invalid Gemini generation response")?;
        Ok(parsed.text())
    }
}

/// Create the appropriate [`GenerationProvider`] based on configuration.
pub fn create_generator(
    settings: &GenerationSettings,
    credentials: &Credentials,
) -> Result<Box<dyn GenerationProvider>, Error> {
    match settings.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledGenerator)),
        "gemini" => {
            let api_key = credentials.require_google_api_key()?;
            let generator = GeminiGenerator::new(settings, api_key)
                .map_err(|e| Error::Configuration(format!("{:#}", e)))?;
            Ok(Box::new(generator))
        }
        other => Err(Error::Configuration(format!(
            "Unknown generation provider: {}",
            other
        ))),
    }
}
