//! # PartX Embed
//!
//! Embedding layer for the PartX part-catalogue matcher.
//!
//! - [`EmbeddingProvider`] - The capability the matching engine depends on:
//!   `embed(text) -> vector | error`
//! - [`OpenAiProvider`] - Async client for OpenAI-compatible `/embeddings` endpoints
//! - [`EmbeddingCache`] / [`embed_texts`] - Memoized, concurrency-safe batch embedding;
//!   each distinct description text reaches the provider at most once
//!
//! Failures are fail-fast: a provider error for any text aborts the whole
//! batch with the offending text attached, rather than smuggling placeholder
//! vectors into the similarity matrices.

pub mod cache;
pub mod error;
pub mod openai;
pub mod provider;

pub use cache::{embed_texts, EmbeddingCache, DEFAULT_CONCURRENCY};
pub use error::{EmbedError, Result};
pub use openai::{OpenAiProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use provider::EmbeddingProvider;
