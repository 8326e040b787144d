//! Embedding provider capability
//!
//! The matching engine depends only on this signature; the concrete provider,
//! authentication and transport stay behind it.

use async_trait::async_trait;

use crate::error::Result;

/// A source of fixed-length embedding vectors for description text.
///
/// Implementations must be deterministic per text within one batch run and
/// must not silently substitute placeholder vectors on failure.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one description text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
