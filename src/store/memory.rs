//! In-memory [`VectorStore`] implementation for tests and offline use.
//!
//! Records live in a `BTreeMap` per namespace behind a `std::sync::RwLock`.
//! Queries are brute-force cosine similarity over one namespace; ties keep
//! identifier order so results are deterministic.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::embedding::cosine_similarity;
use crate::models::{QueryMatch, VectorRecord};

use super::VectorStore;

type Namespace = BTreeMap<String, VectorRecord>;

/// In-memory vector store.
pub struct InMemoryStore {
    namespaces: RwLock<HashMap<String, Namespace>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records stored in `namespace`.
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .map(|ns| ns.get(namespace).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn metadata_map(record: &VectorRecord) -> Map<String, Value> {
    match serde_json::to_value(&record.metadata) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn upsert(&self, records: &[VectorRecord], namespace: &str) -> Result<()> {
        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        let stored = namespaces.entry(namespace.to_string()).or_default();
        for record in records {
            stored.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        let namespaces = self
            .namespaces
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        let Some(records) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<(f32, &VectorRecord)> = records
            .values()
            .map(|record| (cosine_similarity(vector, &record.values), record))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, record)| QueryMatch {
                id: record.id.clone(),
                score,
                metadata: if include_metadata {
                    metadata_map(record)
                } else {
                    Map::new()
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordMetadata, FILE_TYPE_PDF};

    fn record(id: &str, namespace: &str, text: &str, values: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values,
            metadata: RecordMetadata {
                text: text.to_string(),
                chunk_index: 0,
                namespace: namespace.to_string(),
                char_count: text.chars().count(),
                file_type: FILE_TYPE_PDF.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_query_orders_by_similarity() {
        let store = InMemoryStore::new();
        store
            .upsert(
                &[
                    record("a", "ns", "far", vec![0.0, 1.0]),
                    record("b", "ns", "near", vec![1.0, 0.1]),
                    record("c", "ns", "middle", vec![1.0, 1.0]),
                ],
                "ns",
            )
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.0], "ns", 2, true).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "b");
        assert_eq!(matches[0].text(), "near");
        assert_eq!(matches[1].id, "c");
        assert!(matches[0].score >= matches[1].score);
    }

    #[tokio::test]
    async fn test_query_is_scoped_to_namespace() {
        let store = InMemoryStore::new();
        store
            .upsert(&[record("x", "one", "in one", vec![0.5, 0.5])], "one")
            .await
            .unwrap();
        store
            .upsert(&[record("y", "two", "in two", vec![1.0, 0.0])], "two")
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.0], "one", 8, true).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text(), "in one");

        assert!(store.query(&[1.0, 0.0], "three", 8, true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_id() {
        let store = InMemoryStore::new();
        store
            .upsert(&[record("id", "ns", "old", vec![1.0])], "ns")
            .await
            .unwrap();
        store
            .upsert(&[record("id", "ns", "new", vec![1.0])], "ns")
            .await
            .unwrap();
        assert_eq!(store.len("ns"), 1);
        let matches = store.query(&[1.0], "ns", 8, true).await.unwrap();
        assert_eq!(matches[0].text(), "new");
    }

    #[tokio::test]
    async fn test_metadata_omitted_unless_requested() {
        let store = InMemoryStore::new();
        store
            .upsert(&[record("id", "ns", "text", vec![1.0])], "ns")
            .await
            .unwrap();
        let matches = store.query(&[1.0], "ns", 8, false).await.unwrap();
        assert!(matches[0].metadata.is_empty());

        let matches = store.query(&[1.0], "ns", 8, true).await.unwrap();
        assert_eq!(matches[0].metadata["file_type"], "pdf");
        assert_eq!(matches[0].metadata["namespace"], "ns");
    }
}
