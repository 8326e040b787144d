//! Result assembly
//!
//! Flattens surviving candidates into presentation-ready rows: both records'
//! fields, the score rounded to a fixed precision, the keyword-overlap
//! explanation, and the auxiliary attribute left-joined by the right record's
//! part number. Preserves the matcher's order exactly.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use partx_core::{shared_keywords, Candidate, Record};

/// One row of the final result table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRow {
    pub left_part_number: String,
    pub left_description: String,
    pub right_part_number: String,
    pub right_description: String,
    /// Cosine similarity rounded to 3 decimal places
    pub similarity: f32,
    pub shared_keyword_count: usize,
    /// Shared keywords joined `", "` in sorted order
    pub shared_keywords: String,
    /// Auxiliary attribute (e.g. bin location); `None` when the right part
    /// number has no entry in the auxiliary mapping
    pub aux_value: Option<String>,
}

/// Round a score to 3 decimals for presentation stability
#[inline]
#[must_use]
pub fn round_score(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}

/// Flatten candidates into result rows, preserving candidate order.
///
/// The auxiliary join never drops a row and never fails; a missing key just
/// leaves `aux_value` empty.
#[must_use]
pub fn assemble(
    candidates: &[Candidate],
    left: &[Record],
    right: &[Record],
    aux: &AHashMap<String, String>,
) -> Vec<MatchRow> {
    candidates
        .iter()
        .map(|candidate| {
            let left_record = &left[candidate.left_index];
            let right_record = &right[candidate.right_index];
            let overlap = shared_keywords(&left_record.description, &right_record.description);

            MatchRow {
                left_part_number: left_record.part_number.clone(),
                left_description: left_record.description.clone(),
                right_part_number: right_record.part_number.clone(),
                right_description: right_record.description.clone(),
                similarity: round_score(candidate.score),
                shared_keyword_count: overlap.count(),
                shared_keywords: overlap.joined(),
                aux_value: aux.get(&right_record.part_number).cloned(),
            }
        })
        .collect()
}
