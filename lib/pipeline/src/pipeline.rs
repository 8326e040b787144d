//! Batch matching pipeline
//!
//! One-shot orchestration over two in-memory tables:
//! normalize → empty-input check → embed through the cache → match →
//! explain + assemble. Stage order matters: schema problems surface before
//! any provider call, and any fatal error aborts before a result table
//! exists, so partial output is never observable.

use ahash::AHashMap;
use tracing::info;

use partx_core::{build_aux_map, match_candidates, normalize, Error, RawTable, Vector};
use partx_embed::{embed_texts, EmbeddingCache, EmbeddingProvider, DEFAULT_CONCURRENCY};

use crate::assemble::{assemble, MatchRow};
use crate::config::MatchConfig;
use crate::error::Result;

/// Table labels used in error reporting
const LEFT_LABEL: &str = "catalogue";
const RIGHT_LABEL: &str = "reference";

/// Run one matching batch and produce the ordered result table.
///
/// The cache may be fresh per run or shared across runs; either way each
/// distinct description reaches the provider at most once per cache lifetime.
pub async fn run(
    provider: &dyn EmbeddingProvider,
    cache: &EmbeddingCache,
    catalogue: &RawTable,
    reference: &RawTable,
    config: &MatchConfig,
) -> Result<Vec<MatchRow>> {
    config.validate()?;

    let left = normalize(catalogue, &config.left, LEFT_LABEL)?;
    let right = normalize(reference, &config.right, RIGHT_LABEL)?;

    if left.is_empty() {
        return Err(Error::EmptyInput {
            table: LEFT_LABEL.to_string(),
        }
        .into());
    }
    if right.is_empty() {
        return Err(Error::EmptyInput {
            table: RIGHT_LABEL.to_string(),
        }
        .into());
    }

    let aux = match (&config.aux_key_column, &config.aux_value_column) {
        (Some(key), Some(value)) => build_aux_map(reference, &config.right, key, value, RIGHT_LABEL)?,
        _ => AHashMap::new(),
    };

    info!(
        left = left.len(),
        right = right.len(),
        aux = aux.len(),
        "normalized record sets"
    );

    let left_texts: Vec<String> = left.iter().map(|r| r.description.clone()).collect();
    let right_texts: Vec<String> = right.iter().map(|r| r.description.clone()).collect();

    let left_vectors = materialize(embed_texts(provider, cache, &left_texts, DEFAULT_CONCURRENCY).await?);
    let right_vectors = materialize(embed_texts(provider, cache, &right_texts, DEFAULT_CONCURRENCY).await?);

    info!(
        cached = cache.len(),
        dim = left_vectors.first().map_or(0, Vector::dim),
        "embeddings ready"
    );

    let candidates = match_candidates(&left_vectors, &right_vectors, config.threshold, config.top_n)?;
    info!(matches = candidates.len(), "similarity matching complete");

    Ok(assemble(&candidates, &left, &right, &aux))
}

fn materialize(vectors: Vec<std::sync::Arc<Vector>>) -> Vec<Vector> {
    vectors.into_iter().map(|v| (*v).clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use partx_core::TableRules;
    use partx_embed::{EmbedError, Result as EmbedResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test double: fixed text→vector map plus a call counter, so tests can
    /// assert that schema failures happen before any provider traffic
    struct StaticProvider {
        vectors: HashMap<String, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn new(entries: &[(&str, &[f32])]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(text, vec)| (text.to_string(), vec.to_vec()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StaticProvider {
        async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| EmbedError::Provider {
                    text: text.to_string(),
                    cause: "no fixture vector".to_string(),
                })
        }
    }

    fn grid(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn config() -> MatchConfig {
        MatchConfig::new(
            TableRules::new("PartNumber", "Description"),
            TableRules::new("Part #", "Description"),
        )
    }

    #[tokio::test]
    async fn test_oil_filter_scenario() {
        // cosine(P1, Q1) ≈ 0.95, cosine(P1, Q2) ≈ 0.70; threshold 0.8 keeps
        // only Q1
        let provider = StaticProvider::new(&[
            ("oil filter", &[1.0, 0.0]),
            ("premium oil filter", &[0.95, 0.312_25]),
            ("air filter", &[0.70, 0.714_14]),
        ]);
        let cache = EmbeddingCache::new();

        let catalogue = grid(&[&["PartNumber", "Description"], &["P1", "oil filter"]]);
        let reference = grid(&[
            &["Part #", "Description"],
            &["Q1", "premium oil filter"],
            &["Q2", "air filter"],
        ]);

        let mut cfg = config();
        cfg.threshold = 0.8;

        let rows = run(&provider, &cache, &catalogue, &reference, &cfg)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].left_part_number, "P1");
        assert_eq!(rows[0].right_part_number, "Q1");
        assert_eq!(rows[0].similarity, 0.95);
        assert!(rows[0].similarity >= cfg.threshold);
    }

    #[tokio::test]
    async fn test_schema_error_before_any_provider_call() {
        let provider = StaticProvider::new(&[("oil filter", &[1.0, 0.0])]);
        let cache = EmbeddingCache::new();

        let catalogue = grid(&[&["WrongColumn", "Description"], &["P1", "oil filter"]]);
        let reference = grid(&[&["Part #", "Description"], &["Q1", "oil filter"]]);

        let err = run(&provider, &cache, &catalogue, &reference, &config())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::PipelineError::Core(Error::MissingColumn { .. })
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_after_normalization_is_surfaced() {
        let provider = StaticProvider::new(&[]);
        let cache = EmbeddingCache::new();

        // Rows exist, but every one is incomplete
        let catalogue = grid(&[&["PartNumber", "Description"], &["P1", ""], &["", "x"]]);
        let reference = grid(&[&["Part #", "Description"], &["Q1", "oil filter"]]);

        let err = run(&provider, &cache, &catalogue, &reference, &config())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::PipelineError::Core(Error::EmptyInput { .. })
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_batch() {
        let provider = StaticProvider::new(&[("oil filter", &[1.0, 0.0])]);
        let cache = EmbeddingCache::new();

        let catalogue = grid(&[
            &["PartNumber", "Description"],
            &["P1", "oil filter"],
            &["P2", "mystery part"],
        ]);
        let reference = grid(&[&["Part #", "Description"], &["Q1", "oil filter"]]);

        let err = run(&provider, &cache, &catalogue, &reference, &config())
            .await
            .unwrap_err();
        match err {
            crate::error::PipelineError::Embed(EmbedError::Provider { text, .. }) => {
                assert_eq!(text, "mystery part");
            }
            other => panic!("expected embed failure, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_aux_left_join_and_null() {
        let provider = StaticProvider::new(&[("oil filter", &[1.0, 0.0])]);
        let cache = EmbeddingCache::new();

        let catalogue = grid(&[&["PartNumber", "Description"], &["P1", "oil filter"]]);
        let reference = grid(&[
            &["Part #", "Description", "Location #"],
            &["Q1", "oil filter", "BIN-4"],
            &["Q2", "oil filter", ""],
        ]);

        let cfg = config().with_aux("Part #", "Location #");
        let rows = run(&provider, &cache, &catalogue, &reference, &cfg)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].aux_value.as_deref(), Some("BIN-4"));
        assert_eq!(rows[1].aux_value, None);
    }

    #[tokio::test]
    async fn test_shared_descriptions_embedded_once() {
        let provider = StaticProvider::new(&[("oil filter", &[1.0, 0.0])]);
        let cache = EmbeddingCache::new();

        // The same description on both sides and duplicated within a side
        let catalogue = grid(&[
            &["PartNumber", "Description"],
            &["P1", "oil filter"],
            &["P2", "oil filter"],
        ]);
        let reference = grid(&[&["Part #", "Description"], &["Q1", "oil filter"]]);

        run(&provider, &cache, &catalogue, &reference, &config())
            .await
            .unwrap();
        assert_eq!(provider.call_count(), 1);
    }
}
