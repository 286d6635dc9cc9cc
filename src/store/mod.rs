//! Vector index abstraction.
//!
//! The [`VectorStore`] trait is the only storage surface the pipelines
//! touch: batched namespaced upserts and namespaced similarity queries.
//! Index creation, credentials and deletion stay with the backend.
//!
//! | Backend | Purpose |
//! |---------|---------|
//! | [`memory::InMemoryStore`] | Tests and offline single-process use |
//! | [`pinecone::PineconeStore`] | Hosted Pinecone index over HTTP |

pub mod memory;
pub mod pinecone;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::config::{Credentials, StoreConfig};
use crate::error::Error;
use crate::models::{QueryMatch, VectorRecord};

/// Abstract vector index, partitioned by namespace.
///
/// Implementations must be `Send + Sync`. Writes with an existing `id` in
/// the same namespace overwrite the previous record.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or overwrite `records` in `namespace`.
    async fn upsert(&self, records: &[VectorRecord], namespace: &str) -> Result<()>;

    /// Return up to `top_k` records of `namespace` nearest to `vector`,
    /// most similar first. Metadata maps are empty unless
    /// `include_metadata` is set.
    async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>>;
}

/// Create the configured [`VectorStore`].
///
/// # Errors
///
/// - [`Error::Configuration`] when Pinecone credentials are missing.
/// - [`Error::Storage`] when the index host cannot be resolved.
pub async fn create_store(
    config: &StoreConfig,
    credentials: &Credentials,
) -> Result<Box<dyn VectorStore>, Error> {
    match config.provider.as_str() {
        "memory" => Ok(Box::new(memory::InMemoryStore::new())),
        "pinecone" => {
            let api_key = credentials.require_pinecone_api_key()?;
            let store = match config.host.as_deref() {
                Some(host) => pinecone::PineconeStore::new(host, api_key, config.timeout_secs)
                    .map_err(|e| Error::Configuration(format!("{:#}", e)))?,
                None => {
                    let index = credentials.require_pinecone_index()?;
                    pinecone::PineconeStore::connect(index, api_key, config.timeout_secs)
                        .await
                        .map_err(Error::storage)?
                }
            };
            info!(host = store.host(), "connected to Pinecone index");
            Ok(Box::new(store))
        }
        other => Err(Error::Configuration(format!(
            "Unknown store provider: {}",
            other
        ))),
    }
}
