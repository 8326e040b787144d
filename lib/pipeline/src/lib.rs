//! # PartX Pipeline
//!
//! Batch orchestration for the PartX part-catalogue matcher.
//!
//! - [`MatchConfig`] - The whole configuration surface: threshold, top-N,
//!   per-source table rules, optional auxiliary join columns
//! - [`run`] - One-shot pipeline: normalize → embed → match → explain → assemble
//! - [`MatchRow`] - One row of the final ordered result table
//! - [`write_csv`] / [`parse_csv`] - Round-trippable CSV surface
//!
//! The pipeline is fail-fast: schema problems abort before any embedding
//! call, a failed embedding aborts the batch, and no partial result table is
//! ever produced.

pub mod assemble;
pub mod config;
pub mod csv;
pub mod error;
pub mod pipeline;

pub use assemble::{assemble, round_score, MatchRow};
pub use config::{MatchConfig, DEFAULT_THRESHOLD, DEFAULT_TOP_N};
pub use csv::{parse_csv, parse_table, write_csv, RESULT_HEADER};
pub use error::{PipelineError, Result};
pub use pipeline::run;
