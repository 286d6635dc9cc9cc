//! TOML configuration and environment credentials.
//!
//! Every section has defaults, so [`Config::default`] is a complete,
//! valid configuration. Secrets never live in the TOML file; they are read
//! from the environment by [`Credentials::from_env`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::Error;
use crate::models::GenerationConfig;

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const PINECONE_INDEX: &str = "PINECONE_INDEX";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overlap_chars: default_overlap_chars(),
            min_chars: default_min_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    1500
}
fn default_overlap_chars() -> usize {
    200
}
fn default_min_chars() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    8
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Title attached to document-intent embedding requests.
    #[serde(default = "default_embedding_title")]
    pub title: Option<String>,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_embedding_model(),
            title: default_embedding_title(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}
fn default_embedding_title() -> Option<String> {
    Some("Document Chunks".to_string())
}
fn default_gemini_base_url() -> String {
    GEMINI_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_generation_model(),
            temperature: 0.0,
            max_output_tokens: default_max_output_tokens(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_generation_timeout_secs(),
            max_retries: 0,
        }
    }
}

impl GenerationSettings {
    /// Decoding parameters for each generation call.
    pub fn decoding(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

fn default_generation_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_max_output_tokens() -> u32 {
    1024
}
fn default_generation_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_provider")]
    pub provider: String,
    #[serde(default = "default_upsert_batch_size")]
    pub upsert_batch_size: usize,
    /// Data-plane host of the index. Resolved through the control plane
    /// when unset.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_store_provider(),
            upsert_batch_size: default_upsert_batch_size(),
            host: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_store_provider() -> String {
    "pinecone".to_string()
}
fn default_upsert_batch_size() -> usize {
    50
}

/// Parse a TOML config string and validate it.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Check value ranges and provider names.
///
/// [`parse_config`] runs this on every loaded file; configs assembled in
/// code are checked when a [`RagContext`](crate::context::RagContext) is
/// built from them.
pub fn validate(config: &Config) -> Result<()> {
    // Validate chunking
    if config.chunking.max_chars == 0 {
        anyhow::bail!("chunking.max_chars must be > 0");
    }
    if config.chunking.min_chars >= config.chunking.max_chars {
        anyhow::bail!("chunking.min_chars must be < chunking.max_chars");
    }

    // Validate retrieval
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    // Validate generation
    if config.generation.max_output_tokens < 1 {
        anyhow::bail!("generation.max_output_tokens must be >= 1");
    }
    if !(0.0..=2.0).contains(&config.generation.temperature) {
        anyhow::bail!("generation.temperature must be in [0.0, 2.0]");
    }

    // Validate store
    if config.store.upsert_batch_size < 1 {
        anyhow::bail!("store.upsert_batch_size must be >= 1");
    }

    match config.embedding.provider.as_str() {
        "disabled" | "gemini" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled or gemini.",
            other
        ),
    }
    match config.generation.provider.as_str() {
        "disabled" | "gemini" => {}
        other => anyhow::bail!(
            "Unknown generation provider: '{}'. Must be disabled or gemini.",
            other
        ),
    }
    match config.store.provider.as_str() {
        "memory" | "pinecone" => {}
        other => anyhow::bail!(
            "Unknown store provider: '{}'. Must be memory or pinecone.",
            other
        ),
    }

    Ok(())
}

/// Secrets read from the environment.
///
/// Each field is `None` when the variable is unset or empty. Providers
/// call the `require_*` accessors, which turn absence into
/// [`Error::Configuration`].
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub google_api_key: Option<String>,
    pub pinecone_api_key: Option<String>,
    pub pinecone_index: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            google_api_key: read_env(GOOGLE_API_KEY),
            pinecone_api_key: read_env(PINECONE_API_KEY),
            pinecone_index: read_env(PINECONE_INDEX),
        }
    }

    pub fn require_google_api_key(&self) -> Result<&str, Error> {
        require(&self.google_api_key, GOOGLE_API_KEY)
    }

    pub fn require_pinecone_api_key(&self) -> Result<&str, Error> {
        require(&self.pinecone_api_key, PINECONE_API_KEY)
    }

    pub fn require_pinecone_index(&self) -> Result<&str, Error> {
        require(&self.pinecone_index, PINECONE_INDEX)
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, Error> {
    value
        .as_deref()
        .ok_or_else(|| Error::Configuration(format!("Environment variable '{}' is required.", name)))
}
