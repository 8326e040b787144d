//! Shared-keyword match explanation
//!
//! A cheap, model-independent signal attached to every surviving candidate:
//! which whitespace-delimited words the two descriptions have in common.
//! Case-insensitive, frequency-insensitive, no stemming and no punctuation
//! stripping. Not a second similarity metric, just something a human can
//! audit next to the cosine score.

use std::collections::BTreeSet;

/// Shared-keyword overlap between two descriptions.
///
/// Keywords live in a `BTreeSet` so iteration (and any rendered join) is
/// stable across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordOverlap {
    pub keywords: BTreeSet<String>,
}

impl KeywordOverlap {
    #[must_use]
    pub fn count(&self) -> usize {
        self.keywords.len()
    }

    /// Render the keywords as a comma-separated string in sorted order
    #[must_use]
    pub fn joined(&self) -> String {
        self.keywords
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

/// Compute the shared-keyword set of two descriptions.
///
/// Deterministic for identical input pairs and symmetric in its arguments.
#[must_use]
pub fn shared_keywords(a: &str, b: &str) -> KeywordOverlap {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);
    KeywordOverlap {
        keywords: tokens_a.intersection(&tokens_b).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_overlap() {
        let overlap = shared_keywords("Brake Pad Front", "FRONT brake pad set");
        let expected: BTreeSet<String> = ["brake", "pad", "front"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(overlap.keywords, expected);
        assert_eq!(overlap.count(), 3);
    }

    #[test]
    fn test_symmetric() {
        let ab = shared_keywords("oil filter kit", "filter element oil");
        let ba = shared_keywords("filter element oil", "oil filter kit");
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_no_overlap() {
        let overlap = shared_keywords("spark plug", "wiper blade");
        assert_eq!(overlap.count(), 0);
        assert_eq!(overlap.joined(), "");
    }

    #[test]
    fn test_duplicates_collapse() {
        let overlap = shared_keywords("filter filter filter", "filter");
        assert_eq!(overlap.count(), 1);
    }

    #[test]
    fn test_punctuation_is_not_stripped() {
        // "pad," and "pad" are different tokens on purpose
        let overlap = shared_keywords("brake pad,", "brake pad");
        assert_eq!(overlap.count(), 1);
        assert_eq!(overlap.joined(), "brake");
    }

    #[test]
    fn test_joined_is_sorted() {
        let overlap = shared_keywords("zeta alpha mid", "mid zeta alpha");
        assert_eq!(overlap.joined(), "alpha, mid, zeta");
    }
}
