//! Query pipeline.
//!
//! Answers a question from one namespace only: embed the question, fetch
//! the nearest chunks, and ask the generation provider to answer strictly
//! from those chunks.
//!
//! Blank input, a missing namespace, zero matches and an empty completion
//! each produce a fixed informational answer instead of an error.

use tracing::{debug, info};

use crate::context::RagContext;
use crate::embedding::embed_query;
use crate::error::{Error, Result};
use crate::models::QueryMatch;
use crate::store::VectorStore;

pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a valid question.";
pub const NO_DOCUMENT_MESSAGE: &str =
    "No active document. Please upload and process a document first.";
pub const NO_MATCHES_MESSAGE: &str =
    "I couldn't find relevant information in the processed document.";
pub const NO_ANSWER_MESSAGE: &str = "No answer generated.";

/// Separator placed between retrieved chunks in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Join the matches' chunk text in store order.
pub fn build_context(matches: &[QueryMatch]) -> String {
    matches
        .iter()
        .map(QueryMatch::text)
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Grounding prompt embedding `context` and `question` verbatim.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question using ONLY the provided context. Be precise and concise.\n\n\
         Context:\n{}\n\nQuestion: {}\n\nAnswer:",
        context, question
    )
}

/// Answer `question` using only chunks stored under `namespace`.
///
/// # Errors
///
/// [`Error::Configuration`] when `store` is `None`; [`Error::Embedding`],
/// [`Error::Storage`] or [`Error::Generation`] when the matching
/// collaborator fails.
pub async fn answer_question(
    ctx: &RagContext,
    store: Option<&dyn VectorStore>,
    question: &str,
    namespace: &str,
) -> Result<String> {
    let store =
        store.ok_or_else(|| Error::Configuration("Vector store cannot be None".to_string()))?;
    if question.trim().is_empty() {
        return Ok(EMPTY_QUESTION_MESSAGE.to_string());
    }
    if namespace.trim().is_empty() {
        return Ok(NO_DOCUMENT_MESSAGE.to_string());
    }

    let query_vector = embed_query(ctx.embedder(), question)
        .await
        .map_err(Error::embedding)?;

    let top_k = ctx.config.retrieval.top_k;
    let matches = store
        .query(&query_vector, namespace, top_k, true)
        .await
        .map_err(Error::storage)?;
    debug!(namespace, top_k, matches = matches.len(), "retrieved matches");

    if matches.is_empty() {
        return Ok(NO_MATCHES_MESSAGE.to_string());
    }

    let context = build_context(&matches);
    let prompt = build_prompt(&context, question);
    let decoding = ctx.config.generation.decoding();

    let answer = ctx
        .generator()
        .generate(&prompt, &decoding)
        .await
        .map_err(Error::generation)?;
    let answer = answer.trim();

    info!(namespace, matches = matches.len(), answered = !answer.is_empty(), "question answered");

    if answer.is_empty() {
        Ok(NO_ANSWER_MESSAGE.to_string())
    } else {
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_match(text: &str) -> QueryMatch {
        serde_json::from_value(json!({"id": "m", "score": 1.0, "metadata": {"text": text}})).unwrap()
    }

    #[test]
    fn test_context_joins_in_order() {
        let matches = vec![text_match("first"), text_match("second")];
        assert_eq!(build_context(&matches), "first\n\n---\n\nsecond");
    }

    #[test]
    fn test_single_match_context_is_verbatim() {
        let matches = vec![text_match("Refunds are processed within 30 days.")];
        assert_eq!(build_context(&matches), "Refunds are processed within 30 days.");
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt("CTX", "Why?");
        assert_eq!(
            prompt,
            "Answer the question using ONLY the provided context. Be precise and concise.\n\n\
             Context:\nCTX\n\nQuestion: Why?\n\nAnswer:"
        );
    }
}
