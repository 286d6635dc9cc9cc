//! Provider wiring shared by both pipelines.
//!
//! A [`RagContext`] is built once at process start and passed by reference
//! into [`ingest_document`](crate::ingest::ingest_document) and
//! [`answer_question`](crate::query::answer_question).

use crate::config::{self, Config, Credentials};
use crate::embedding::{self, EmbeddingProvider};
use crate::error::{Error, Result};
use crate::extract::{PdfExtractor, TextExtractor};
use crate::generation::{self, GenerationProvider};

pub struct RagContext {
    pub config: Config,
    embedder: Box<dyn EmbeddingProvider>,
    generator: Box<dyn GenerationProvider>,
    extractor: Box<dyn TextExtractor>,
}

impl RagContext {
    /// Assemble a context from explicit providers, extracting with
    /// [`PdfExtractor`].
    ///
    /// Fails with [`Error::Configuration`] when `config` is out of range
    /// (see [`config::validate`]).
    pub fn new(
        config: Config,
        embedder: Box<dyn EmbeddingProvider>,
        generator: Box<dyn GenerationProvider>,
    ) -> Result<Self> {
        config::validate(&config).map_err(|e| Error::Configuration(format!("{:#}", e)))?;
        Ok(Self {
            config,
            embedder,
            generator,
            extractor: Box::new(PdfExtractor),
        })
    }

    /// Replace the text extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Build the configured providers.
    ///
    /// Fails with [`Error::Configuration`] when a provider's credentials
    /// are missing or `config` is out of range.
    pub fn from_config(config: Config, credentials: &Credentials) -> Result<Self> {
        let embedder = embedding::create_provider(&config.embedding, credentials)?;
        let generator = generation::create_generator(&config.generation, credentials)?;
        Self::new(config, embedder, generator)
    }

    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    pub fn generator(&self) -> &dyn GenerationProvider {
        self.generator.as_ref()
    }

    pub fn extractor(&self) -> &dyn TextExtractor {
        self.extractor.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::DisabledProvider;
    use crate::generation::DisabledGenerator;

    fn disabled(config: Config) -> Result<RagContext> {
        RagContext::new(config, Box::new(DisabledProvider), Box::new(DisabledGenerator))
    }

    #[test]
    fn from_config_requires_google_key() {
        let err = RagContext::from_config(Config::default(), &Credentials::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn from_config_with_disabled_providers() {
        let mut config = Config::default();
        config.embedding.provider = "disabled".to_string();
        config.generation.provider = "disabled".to_string();
        let ctx = RagContext::from_config(config, &Credentials::default()).unwrap();
        assert_eq!(ctx.embedder().model_name(), "disabled");
        assert_eq!(ctx.generator().model_name(), "disabled");
    }

    #[test]
    fn new_rejects_zero_batch_size() {
        let mut config = Config::default();
        config.store.upsert_batch_size = 0;
        let err = disabled(config).err().unwrap();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("upsert_batch_size")));
    }

    #[test]
    fn new_rejects_zero_max_chars() {
        let mut config = Config::default();
        config.chunking.max_chars = 0;
        let err = disabled(config).err().unwrap();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("max_chars")));
    }

    #[test]
    fn new_accepts_defaults() {
        assert!(disabled(Config::default()).is_ok());
    }
}
