//! Error taxonomy for the ingestion and query pipelines.
//!
//! Collaborators (embedding, generation, vector store, text extraction)
//! report failures as [`anyhow::Error`]. The pipelines convert those into
//! the typed [`Error`] below, keeping the collaborator's message (including
//! its context chain) so callers can diagnose the underlying fault.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required collaborator handle or credential is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required argument is empty or missing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The document is not a PDF.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The PDF has no pages, no text layer, or could not be parsed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Chunking produced nothing worth storing.
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    /// The embedding provider failed or returned the wrong number of vectors.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The generation provider failed.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The vector store rejected an upsert or query.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// True for errors the caller can fix by supplying different input.
    pub fn is_caller_correctable(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::UnsupportedFormat(_)
                | Error::Extraction(_)
                | Error::EmptyDocument(_)
        )
    }

    pub(crate) fn embedding(err: anyhow::Error) -> Self {
        Error::Embedding(format!("{:#}", err))
    }

    pub(crate) fn generation(err: anyhow::Error) -> Self {
        Error::Generation(format!("{:#}", err))
    }

    pub(crate) fn storage(err: anyhow::Error) -> Self {
        Error::Storage(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
