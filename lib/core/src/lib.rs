//! # PartX Core
//!
//! Core matching engine for the PartX part-catalogue matcher.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Vector`] - Dense embedding vector with cosine similarity
//! - [`Record`] - A canonical `(part number, description)` row
//! - [`TableRules`] / [`normalize`] - Per-source normalization of ragged input tables
//! - [`match_candidates`] - Threshold-filtered top-N candidate selection over all pairs
//! - [`shared_keywords`] - Keyword-overlap explanation for a candidate pair
//!
//! ## Example
//!
//! ```rust
//! use partx_core::{match_candidates, shared_keywords, Vector};
//!
//! let left = vec![Vector::new(vec![1.0, 0.0])];
//! let right = vec![Vector::new(vec![0.9, 0.1]), Vector::new(vec![0.0, 1.0])];
//!
//! let candidates = match_candidates(&left, &right, 0.6, 3).unwrap();
//! assert_eq!(candidates.len(), 1);
//! assert_eq!(candidates[0].right_index, 0);
//!
//! let overlap = shared_keywords("Brake Pad Front", "FRONT brake pad set");
//! assert_eq!(overlap.count(), 3);
//! ```

pub mod error;
pub mod explain;
pub mod matcher;
pub mod table;
pub mod vector;

pub use error::{Error, Result};
pub use explain::{shared_keywords, KeywordOverlap};
pub use matcher::{match_candidates, Candidate};
pub use table::{build_aux_map, normalize, RawTable, Record, TableRules};
pub use vector::Vector;
