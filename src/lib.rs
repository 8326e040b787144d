//! # PartX
//!
//! Semantic part-catalogue matcher: embeds free-text part descriptions,
//! computes pairwise cosine similarity between two catalogues, and emits a
//! ranked, threshold-filtered, keyword-annotated match table.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install partx
//! export OPENAI_API_KEY=sk-...
//! partx --catalogue catalogue.csv --reference adtrans.csv \
//!       --config match.json --output matched_parts.csv
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use partx::prelude::*;
//!
//! # async fn demo() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAiProvider::from_api_key("sk-...")?;
//! let cache = EmbeddingCache::new();
//!
//! let catalogue = parse_table(&std::fs::read_to_string("catalogue.csv")?)?;
//! let reference = parse_table(&std::fs::read_to_string("adtrans.csv")?)?;
//!
//! let config = MatchConfig::new(
//!     TableRules::new("CPProductNumber", "CPDescription").with_offsets(2, 4),
//!     TableRules::new("Part #", "Description"),
//! )
//! .with_aux("Part #", "Location #");
//!
//! let rows = partx_pipeline::run(&provider, &cache, &catalogue, &reference, &config).await?;
//! println!("{}", write_csv(&rows));
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! PartX is composed of several crates:
//!
//! - [`partx-core`](https://docs.rs/partx-core) - Matching engine (normalization, cosine, top-N, keyword overlap)
//! - [`partx-embed`](https://docs.rs/partx-embed) - Embedding provider trait, OpenAI client, memoizing cache
//! - [`partx-pipeline`](https://docs.rs/partx-pipeline) - Configuration, batch orchestration, CSV surface

// Re-export core types
pub use partx_core::{
    build_aux_map, match_candidates, normalize, shared_keywords, Candidate, Error, KeywordOverlap,
    RawTable, Record, Result, TableRules, Vector,
};

// Re-export embedding layer
pub use partx_embed::{
    embed_texts, EmbedError, EmbeddingCache, EmbeddingProvider, OpenAiProvider,
};

// Re-export pipeline
pub use partx_pipeline::{
    parse_csv, parse_table, run, write_csv, MatchConfig, MatchRow, PipelineError,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        match_candidates, normalize, parse_csv, parse_table, run, shared_keywords, write_csv,
        Candidate, EmbedError, EmbeddingCache, EmbeddingProvider, Error, MatchConfig, MatchRow,
        OpenAiProvider, PipelineError, RawTable, Record, Result, TableRules, Vector,
    };
}
