//! Dense pairwise similarity matching
//!
//! Computes full m×n cosine similarity between two embedding sets and keeps,
//! per left row, the top-N right rows that clear a score threshold. Exact
//! all-pairs search: catalogue batches sit in the low tens of thousands of
//! rows, so O(m·n·d) is fine and no ANN index is involved.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::vector::Vector;

/// A surviving left/right candidate pair with its cosine score.
///
/// Indices refer to positions in the normalized record sets, which stay 1:1
/// with their embedding matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub left_index: usize,
    pub right_index: usize,
    pub score: f32,
}

/// Ranking key: higher score wins, equal scores prefer the lower right index
type Rank = (OrderedFloat<f32>, Reverse<usize>);

fn rank(score: f32, right_index: usize) -> Rank {
    (OrderedFloat(score), Reverse(right_index))
}

/// Select the up-to-`top_n` best-scoring right rows for every left row.
///
/// Output is grouped by ascending left index; within a group candidates are
/// ordered by descending score, ties broken by ascending right index. Rows
/// where nothing clears `threshold` contribute no candidates. Left rows are
/// scored in parallel; the documented ordering is unaffected because groups
/// are collected in left-index order.
pub fn match_candidates(
    left: &[Vector],
    right: &[Vector],
    threshold: f32,
    top_n: usize,
) -> Result<Vec<Candidate>> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::InvalidConfig(format!(
            "threshold must be in [0, 1], got {threshold}"
        )));
    }
    if top_n == 0 {
        return Err(Error::InvalidConfig(
            "top_n must be at least 1".to_string(),
        ));
    }
    check_dimensions(left, right)?;

    let groups: Vec<Vec<Candidate>> = left
        .par_iter()
        .enumerate()
        .map(|(i, left_vec)| top_for_row(i, left_vec, right, threshold, top_n))
        .collect();

    Ok(groups.into_iter().flatten().collect())
}

/// Bounded-heap partial selection for a single left row.
///
/// Keeps at most `top_n` entries with the worst at the heap top so each new
/// candidate evicts in O(log top_n), then drains into descending rank order.
fn top_for_row(
    left_index: usize,
    left_vec: &Vector,
    right: &[Vector],
    threshold: f32,
    top_n: usize,
) -> Vec<Candidate> {
    let mut heap: BinaryHeap<Reverse<Rank>> = BinaryHeap::with_capacity(top_n + 1);

    for (j, right_vec) in right.iter().enumerate() {
        let score = left_vec.cosine_similarity(right_vec);
        if score < threshold {
            continue;
        }
        heap.push(Reverse(rank(score, j)));
        if heap.len() > top_n {
            heap.pop();
        }
    }

    let mut ranks: Vec<Rank> = heap.into_iter().map(|Reverse(r)| r).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    ranks
        .into_iter()
        .map(|(score, Reverse(j))| Candidate {
            left_index,
            right_index: j,
            score: score.into_inner(),
        })
        .collect()
}

/// All embeddings on both sides must share one dimension
fn check_dimensions(left: &[Vector], right: &[Vector]) -> Result<()> {
    let expected = match left.first().or_else(|| right.first()) {
        Some(v) => v.dim(),
        None => return Ok(()),
    };
    for v in left.iter().chain(right.iter()) {
        if v.dim() != expected {
            return Err(Error::InvalidDimension {
                expected,
                actual: v.dim(),
            });
        }
    }
    Ok(())
}
