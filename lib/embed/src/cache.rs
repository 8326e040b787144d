//! Memoizing embedding cache and batch dispatch
//!
//! Part catalogues repeat description text constantly, so each distinct text
//! is sent to the provider at most once. Deduplication happens before
//! dispatch, which keeps the memoization invariant even with a concurrent
//! fan-out window. The cache is the only shared mutable state in a pipeline
//! run and sits behind a `parking_lot::RwLock`.

use ahash::{AHashMap, AHashSet};
use futures_util::stream::{self, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use partx_core::Vector;

use crate::error::{EmbedError, Result};
use crate::provider::EmbeddingProvider;

/// Default bounded-concurrency window for provider calls
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Process-wide text→vector memo, safe under concurrent read/insert.
///
/// Keyed by exact description text. No eviction: the map is bounded by the
/// distinct descriptions of one batch, and descriptions are stable across
/// runs if a caller chooses to keep the cache alive longer.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<AHashMap<String, Arc<Vector>>>,
}

impl EmbeddingCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, text: &str) -> Option<Arc<Vector>> {
        self.entries.read().get(text).cloned()
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.read().contains_key(text)
    }

    /// Insert a vector for a text. If another writer got there first the
    /// existing entry wins, so every reader of a text sees one vector.
    pub fn insert(&self, text: String, vector: Vector) -> Arc<Vector> {
        let vector = Arc::new(vector);
        self.entries
            .write()
            .entry(text)
            .or_insert(vector)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Embed a sequence of texts through the cache, returning one vector per
/// input position.
///
/// Distinct uncached texts are dispatched over a bounded concurrent window;
/// the first failure aborts the batch with the offending text attached.
/// Vectors that are empty, non-finite or all-zero are rejected rather than
/// passed downstream where they would poison cosine scores.
pub async fn embed_texts(
    provider: &dyn EmbeddingProvider,
    cache: &EmbeddingCache,
    texts: &[String],
    max_concurrency: usize,
) -> Result<Vec<Arc<Vector>>> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut missing: Vec<String> = Vec::new();
    for text in texts {
        if cache.contains(text) {
            continue;
        }
        if seen.insert(text.as_str()) {
            missing.push(text.clone());
        }
    }

    if !missing.is_empty() {
        debug!(
            total = texts.len(),
            uncached = missing.len(),
            "dispatching uncached descriptions to provider"
        );

        let window = max_concurrency.max(1);
        let mut results = stream::iter(missing.into_iter().map(|text| async move {
            let result = provider.embed(&text).await;
            (text, result)
        }))
        .buffer_unordered(window);

        while let Some((text, result)) = results.next().await {
            let raw = result.map_err(|e| e.for_text(&text))?;
            let vector = Vector::new(raw);
            if !vector.is_usable() {
                return Err(EmbedError::UnusableVector { text });
            }
            cache.insert(text, vector);
        }
    }

    texts
        .iter()
        .map(|text| {
            cache.get(text).ok_or_else(|| EmbedError::Malformed(
                format!("cache miss after fill for {text:?}"),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic provider double: byte-sum based vectors, call counter
    struct CountingProvider {
        calls: AtomicUsize,
        fail_on: Option<String>,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(text.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(text) {
                return Err(EmbedError::Malformed("provider exploded".to_string()));
            }
            let sum = text.bytes().map(f32::from).sum::<f32>();
            Ok(vec![sum, 1.0, text.len() as f32])
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_each_distinct_text_embedded_once() {
        let provider = CountingProvider::new();
        let cache = EmbeddingCache::new();
        let input = texts(&["oil filter", "oil filter", "air filter", "oil filter"]);

        let vectors = embed_texts(&provider, &cache, &input, 4).await.unwrap();
        assert_eq!(vectors.len(), 4);
        assert_eq!(provider.call_count(), 2);
        assert_eq!(cache.len(), 2);

        // Identical texts share the cached vector
        assert!(Arc::ptr_eq(&vectors[0], &vectors[1]));
        assert!(Arc::ptr_eq(&vectors[0], &vectors[3]));
    }

    #[tokio::test]
    async fn test_second_batch_hits_cache() {
        let provider = CountingProvider::new();
        let cache = EmbeddingCache::new();
        let input = texts(&["oil filter", "air filter"]);

        embed_texts(&provider, &cache, &input, 2).await.unwrap();
        embed_texts(&provider, &cache, &input, 2).await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_carries_offending_text() {
        let provider = CountingProvider::failing_on("bad part");
        let cache = EmbeddingCache::new();
        let input = texts(&["oil filter", "bad part"]);

        let err = embed_texts(&provider, &cache, &input, 1).await.unwrap_err();
        match err {
            EmbedError::Provider { text, .. } => assert_eq!(text, "bad part"),
            other => panic!("expected Provider error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_zero_vector_rejected() {
        struct ZeroProvider;

        #[async_trait]
        impl EmbeddingProvider for ZeroProvider {
            async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
                Ok(vec![0.0, 0.0, 0.0])
            }
        }

        let cache = EmbeddingCache::new();
        let input = texts(&["oil filter"]);
        let err = embed_texts(&ZeroProvider, &cache, &input, 1).await.unwrap_err();
        assert!(matches!(err, EmbedError::UnusableVector { .. }));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let provider = CountingProvider::new();
        let cache = EmbeddingCache::new();
        let vectors = embed_texts(&provider, &cache, &[], 4).await.unwrap();
        assert!(vectors.is_empty());
        assert_eq!(provider.call_count(), 0);
    }
}
