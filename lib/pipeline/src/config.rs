//! Batch matching configuration
//!
//! Everything source-specific lives here rather than in code: the similarity
//! cutoff, the per-left-record match bound, the per-source table rules, and
//! the optional auxiliary join columns. Deserializable from a JSON config
//! file and validated before any normalization or provider call happens.

use serde::{Deserialize, Serialize};

use partx_core::{Error, Result, TableRules};

/// Default similarity cutoff
pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// Default maximum matches per left record
pub const DEFAULT_TOP_N: usize = 3;

/// Full configuration for one matching run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Minimum cosine similarity for a candidate to survive, in [0, 1]
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Maximum matches kept per left record, at least 1
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Normalization rules for the left (catalogue) table
    pub left: TableRules,

    /// Normalization rules for the right (reference) table
    pub right: TableRules,

    /// Right-table column whose value keys the auxiliary mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux_key_column: Option<String>,

    /// Right-table column supplying the auxiliary value (e.g. bin location)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux_value_column: Option<String>,
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl MatchConfig {
    /// Config with default threshold and top-N and no auxiliary join
    pub fn new(left: TableRules, right: TableRules) -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            left,
            right,
            aux_key_column: None,
            aux_value_column: None,
        }
    }

    /// Enable the auxiliary left-join against two right-table columns
    #[must_use]
    pub fn with_aux(mut self, key_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        self.aux_key_column = Some(key_column.into());
        self.aux_value_column = Some(value_column.into());
        self
    }

    /// Check bounds before any work happens
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        if self.top_n == 0 {
            return Err(Error::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }
        if self.aux_key_column.is_some() != self.aux_value_column.is_some() {
            return Err(Error::InvalidConfig(
                "aux_key_column and aux_value_column must be set together".to_string(),
            ));
        }
        Ok(())
    }
}
