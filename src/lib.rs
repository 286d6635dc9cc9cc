//! # docqa
//!
//! Retrieval-augmented question answering over PDF documents.
//!
//! A PDF is fingerprinted, its text extracted and split into overlapping
//! sentence-aligned chunks, the chunks embedded and stored in a vector
//! index under a per-document namespace. Questions are embedded, matched
//! against that namespace only, and answered by a language model that is
//! told to use nothing but the retrieved chunks.
//!
//! ## Architecture
//!
//! ```text
//!  PDF bytes ─▶ extract ─▶ chunk ─▶ embed ─▶ upsert ─┐
//!                                                    ▼
//!                                           ┌─────────────────┐
//!                                           │  Vector store   │
//!                                           │ (per namespace) │
//!                                           └────────┬────────┘
//!                                                    ▼
//!  question ─▶ embed ─▶ query top-k ─▶ prompt ─▶ generate ─▶ answer
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment credentials |
//! | [`context`] | Provider wiring passed into both pipelines |
//! | [`models`] | Core data types |
//! | [`extract`] | PDF text extraction |
//! | [`chunk`] | Sentence-boundary chunking with overlap |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`generation`] | Text generation provider abstraction |
//! | [`store`] | Vector store abstraction (Pinecone, in-memory) |
//! | [`ingest`] | Ingestion pipeline |
//! | [`query`] | Query pipeline |
//! | [`error`] | Error taxonomy |

pub mod chunk;
pub mod config;
pub mod context;
pub mod embedding;
pub mod error;
pub mod extract;
mod gemini;
pub mod generation;
mod http;
pub mod ingest;
pub mod models;
pub mod query;
pub mod store;

pub use context::RagContext;
pub use error::{Error, Result};
pub use ingest::{document_namespace, ingest_document};
pub use query::answer_question;
