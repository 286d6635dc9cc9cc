//! Ingestion pipeline.
//!
//! Turns raw PDF bytes into embedded, metadata-tagged records stored under
//! one namespace: format gate → text extraction → chunking → one batched
//! embedding call → batched upserts.
//!
//! Upserts are at-least-once, not atomic: when a later batch fails the
//! earlier batches stay written. Re-ingesting identical bytes produces
//! identical identifiers, so a retry overwrites rather than duplicates.

use md5::{Digest, Md5};
use tracing::{debug, info};

use crate::chunk::chunk_text;
use crate::context::RagContext;
use crate::error::{Error, Result};
use crate::extract::{is_pdf, normalize_pages, TextExtractor};
use crate::models::{IngestReport, RecordMetadata, TaskType, VectorRecord, FILE_TYPE_PDF};
use crate::store::VectorStore;

/// Content fingerprint of a document: hex MD5 of its raw bytes.
///
/// Used as the document's namespace, so identical uploads share one.
pub fn document_namespace(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

/// Record identifier: `{namespace}-{first 8 hex chars of md5(text)}-{index}`.
pub fn vector_id(namespace: &str, text: &str, index: usize) -> String {
    let hash = format!("{:x}", Md5::digest(text.as_bytes()));
    format!("{}-{}-{}", namespace, &hash[..8], index)
}

/// Extract and normalize the text layer of a PDF.
///
/// Fails with [`Error::Extraction`] when the document has no pages, no
/// extractable text, or cannot be parsed.
pub fn extract_document_text(extractor: &dyn TextExtractor, bytes: &[u8]) -> Result<String> {
    let pages = extractor
        .extract_pages(bytes)
        .map_err(|e| Error::Extraction(format!("{:#}", e)))?;
    if pages.is_empty() {
        return Err(Error::Extraction("PDF contains no pages".to_string()));
    }

    let text = normalize_pages(&pages);
    if text.is_empty() {
        return Err(Error::Extraction(
            "No extractable text found in the PDF".to_string(),
        ));
    }
    debug!(pages = pages.len(), chars = text.chars().count(), "extracted text");
    Ok(text)
}

/// Pair each chunk with its vector and build the stored records.
pub fn build_records(namespace: &str, chunks: &[String], vectors: Vec<Vec<f32>>) -> Vec<VectorRecord> {
    chunks
        .iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (text, values))| VectorRecord {
            id: vector_id(namespace, text, i),
            values,
            metadata: RecordMetadata {
                text: text.clone(),
                chunk_index: i,
                namespace: namespace.to_string(),
                char_count: text.chars().count(),
                file_type: FILE_TYPE_PDF.to_string(),
            },
        })
        .collect()
}

/// Ingest one PDF into `store` under `namespace`.
///
/// Returns a report on full success. Every failure is an `Err`; there is
/// no partial-success result.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | `store` is `None`, zero chunk size or batch size | [`Error::Configuration`] |
/// | empty `bytes` or blank `namespace` | [`Error::InvalidInput`] |
/// | bytes are not a PDF | [`Error::UnsupportedFormat`] |
/// | no pages / no text / unparsable | [`Error::Extraction`] |
/// | no chunk longer than the minimum | [`Error::EmptyDocument`] |
/// | embedding provider failure | [`Error::Embedding`] |
/// | any upsert batch fails | [`Error::Storage`] |
pub async fn ingest_document(
    ctx: &RagContext,
    store: Option<&dyn VectorStore>,
    bytes: &[u8],
    namespace: &str,
) -> Result<IngestReport> {
    let store =
        store.ok_or_else(|| Error::Configuration("Vector store cannot be None".to_string()))?;
    let batch_size = ctx.config.store.upsert_batch_size;
    if batch_size == 0 || ctx.config.chunking.max_chars == 0 {
        return Err(Error::Configuration(
            "chunking.max_chars and store.upsert_batch_size must be > 0".to_string(),
        ));
    }
    if bytes.is_empty() {
        return Err(Error::InvalidInput(
            "Document content cannot be empty".to_string(),
        ));
    }
    if namespace.trim().is_empty() {
        return Err(Error::InvalidInput("Namespace cannot be empty".to_string()));
    }
    if !is_pdf(bytes) {
        return Err(Error::UnsupportedFormat(
            "Only PDF documents are supported".to_string(),
        ));
    }

    info!(namespace, bytes = bytes.len(), "ingesting document");

    let text = extract_document_text(ctx.extractor(), bytes)?;
    let chunks = chunk_text(&text, &ctx.config.chunking);
    if chunks.is_empty() {
        return Err(Error::EmptyDocument(
            "Failed to create any text chunks from the document".to_string(),
        ));
    }
    debug!(namespace, chunks = chunks.len(), "chunked document");

    let vectors = ctx
        .embedder()
        .embed(&chunks, TaskType::RetrievalDocument)
        .await
        .map_err(Error::embedding)?;
    if vectors.len() != chunks.len() {
        return Err(Error::Embedding(format!(
            "Embedding provider returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        )));
    }

    let records = build_records(namespace, &chunks, vectors);
    let vector_ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();

    let mut batches = 0usize;
    for batch in records.chunks(batch_size) {
        store
            .upsert(batch, namespace)
            .await
            .map_err(Error::storage)?;
        batches += 1;
        debug!(namespace, batch = batches, records = batch.len(), "upserted batch");
    }

    info!(namespace, chunks = chunks.len(), batches, "document indexed");

    Ok(IngestReport {
        namespace: namespace.to_string(),
        chunks: chunks.len(),
        batches,
        vector_ids,
    })
}
