//! Core data models shared by the ingestion and query pipelines.
//!
//! These types represent the records written to the vector index and the
//! matches read back from it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Format tag stored on every record.
pub const FILE_TYPE_PDF: &str = "pdf";

/// Intent tag sent with every embedding request.
///
/// Documents and queries are embedded asymmetrically: chunks are indexed
/// with [`TaskType::RetrievalDocument`] and questions are embedded with
/// [`TaskType::RetrievalQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            TaskType::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

/// Metadata attached to each stored chunk vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub text: String,
    pub chunk_index: usize,
    pub namespace: String,
    pub char_count: usize,
    pub file_type: String,
}

/// The unit of storage in the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

/// A single similarity match returned by a vector store query.
///
/// `metadata` is the raw key/value map the store returned. Use
/// [`QueryMatch::text`] to read the chunk text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl QueryMatch {
    /// The stored chunk text, or `""` when the match carries none.
    pub fn text(&self) -> &str {
        self.metadata
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// Decoding parameters passed to the generation provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_output_tokens: 1024,
        }
    }
}

/// Summary of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub namespace: String,
    /// Number of chunks embedded and stored.
    pub chunks: usize,
    /// Number of upsert calls issued.
    pub batches: usize,
    /// Identifiers of the stored records, in chunk order.
    pub vector_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_type_serializes_as_api_tag() {
        assert_eq!(
            serde_json::to_value(TaskType::RetrievalDocument).unwrap(),
            json!("RETRIEVAL_DOCUMENT")
        );
        assert_eq!(TaskType::RetrievalQuery.as_str(), "RETRIEVAL_QUERY");
    }

    #[test]
    fn match_text_defaults_to_empty() {
        let m: QueryMatch = serde_json::from_value(json!({"id": "a", "score": 0.5})).unwrap();
        assert_eq!(m.text(), "");

        let m: QueryMatch =
            serde_json::from_value(json!({"id": "b", "metadata": {"text": "hello"}})).unwrap();
        assert_eq!(m.text(), "hello");
        assert_eq!(m.score, 0.0);
    }
}
