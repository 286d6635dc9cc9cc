//! Pinecone-backed [`VectorStore`].
//!
//! Talks to the index data plane over HTTPS. The data-plane host is either
//! configured directly or resolved once from the control plane by index
//! name (`GET /indexes/{name}`).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http;
use crate::models::{QueryMatch, VectorRecord};

use super::VectorStore;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    namespace: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

pub struct PineconeStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PineconeStore {
    /// Create a store for a known data-plane host.
    pub fn new(host: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            base_url: host_url(host),
            api_key: api_key.to_string(),
        })
    }

    /// Resolve the host of `index` through the control plane and connect.
    pub async fn connect(index: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        let client = http::build_client(timeout_secs)?;
        let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, index);
        let response = http::send_with_retry("Pinecone describe index", 0, || {
            client
                .get(&url)
                .header("Api-Key", api_key)
                .header("X-Pinecone-API-Version", API_VERSION)
        })
        .await
        .with_context(|| format!("Failed to access Pinecone index '{}'", index))?;

        let described: DescribeIndexResponse = response
            .json()
            .await
            .context("Invalid Pinecone describe-index response")?;
        if described.host.trim().is_empty() {
            return Err(anyhow!("Pinecone index '{}' has no host", index));
        }

        Ok(Self {
            client,
            base_url: host_url(&described.host),
            api_key: api_key.to_string(),
        })
    }

    /// Data-plane base URL, e.g. `https://docs-abc123.svc.pinecone.io`.
    pub fn host(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }
}

fn host_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert(&self, records: &[VectorRecord], namespace: &str) -> Result<()> {
        let body = UpsertRequest {
            vectors: records,
            namespace,
        };
        debug!(namespace, records = records.len(), "pinecone upsert");
        http::send_with_retry("Pinecone upsert", 0, || {
            self.post("/vectors/upsert").json(&body)
        })
        .await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        let body = QueryRequest {
            namespace,
            vector,
            top_k,
            include_metadata,
            include_values: false,
        };
        debug!(namespace, top_k, "pinecone query");
        let response =
            http::send_with_retry("Pinecone query", 0, || self.post("/query").json(&body)).await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .context("Invalid Pinecone query response")?;
        Ok(parsed.matches)
    }
}
