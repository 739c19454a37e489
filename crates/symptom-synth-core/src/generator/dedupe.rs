//! Near-duplicate detection by token overlap.
//!
//! Tokens are lowercased words split on whitespace, commas and semicolons.
//! No stemming: `Fever.` and `fever` are different tokens.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How the overlap between a candidate and a prior text is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapMetric {
    /// `|candidate ∩ prior| / |prior|`
    #[default]
    PriorCoverage,
    /// `|candidate ∩ prior| / |candidate ∪ prior|`
    Jaccard,
}

/// Token set of a text.
pub fn token_set(text: &str) -> HashSet<String> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Overlap ratio between two token sets, or `None` when the prior is empty.
pub fn overlap_ratio(
    candidate: &HashSet<String>,
    prior: &HashSet<String>,
    metric: OverlapMetric,
) -> Option<f64> {
    if prior.is_empty() {
        return None;
    }
    let shared = candidate.intersection(prior).count() as f64;
    let ratio = match metric {
        OverlapMetric::PriorCoverage => shared / prior.len() as f64,
        OverlapMetric::Jaccard => shared / candidate.union(prior).count() as f64,
    };
    Some(ratio)
}

/// Whether `candidate` overlaps any prior at or above `threshold`.
pub fn is_near_duplicate<'a, I>(candidate: &str, priors: I, threshold: f64) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens = token_set(candidate);
    priors.into_iter().any(|prior| {
        overlap_ratio(&tokens, &token_set(prior), OverlapMetric::PriorCoverage)
            .is_some_and(|ratio| ratio >= threshold)
    })
}

/// Accepted texts for one disease, with their token sets cached.
#[derive(Debug, Clone, Default)]
pub struct DuplicateFilter {
    threshold: f64,
    metric: OverlapMetric,
    accepted: Vec<(String, HashSet<String>)>,
}

impl DuplicateFilter {
    pub fn new(threshold: f64, metric: OverlapMetric) -> Self {
        Self {
            threshold,
            metric,
            accepted: Vec::new(),
        }
    }

    /// Whether `candidate` is too close to an already accepted text.
    pub fn is_near_duplicate(&self, candidate: &str) -> bool {
        self.conflicts(&token_set(candidate))
    }

    /// Accept `candidate` unless it is a near-duplicate. Returns whether it was accepted.
    pub fn try_accept(&mut self, candidate: &str) -> bool {
        let tokens = token_set(candidate);
        let duplicate = self.conflicts(&tokens);
        if !duplicate {
            self.accepted.push((candidate.to_string(), tokens));
        }
        !duplicate
    }

    fn conflicts(&self, tokens: &HashSet<String>) -> bool {
        self.accepted.iter().any(|(_, prior)| {
            overlap_ratio(tokens, prior, self.metric).is_some_and(|ratio| ratio >= self.threshold)
        })
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Accepted texts in acceptance order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(|(text, _)| text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_token_set_splits_and_lowercases() {
        let tokens = token_set("Fever,  RASH; nausea and fever");
        let expected: HashSet<String> = ["fever", "rash", "nausea", "and"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_token_set_keeps_punctuation() {
        let tokens = token_set("fever.");
        assert!(tokens.contains("fever."));
        assert!(!tokens.contains("fever"));
    }

    #[test]
    fn test_overlap_is_asymmetric() {
        let long = token_set("a b c d e f g h");
        let short = token_set("a b");

        // Short prior fully covered by the long candidate
        assert_eq!(overlap_ratio(&long, &short, OverlapMetric::PriorCoverage), Some(1.0));
        // Long prior only a quarter covered by the short candidate
        assert_eq!(overlap_ratio(&short, &long, OverlapMetric::PriorCoverage), Some(0.25));
    }

    #[test]
    fn test_jaccard() {
        let a = token_set("a b c");
        let b = token_set("b c d");
        assert_eq!(overlap_ratio(&a, &b, OverlapMetric::Jaccard), Some(0.5));
    }

    #[test]
    fn test_empty_prior_is_skipped() {
        assert!(!is_near_duplicate("fever rash", ["", " ,; "], 0.8));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 4 of 5 prior tokens shared = 0.8
        assert!(is_near_duplicate("a b c d x", ["a b c d e"], 0.8));
        // 3 of 5 = 0.6
        assert!(!is_near_duplicate("a b c x y", ["a b c d e"], 0.8));
    }

    #[test]
    fn test_filter_accepts_and_rejects() {
        let mut filter = DuplicateFilter::new(0.8, OverlapMetric::PriorCoverage);
        assert!(filter.try_accept("I have fever and rash for 2 days."));
        assert!(!filter.try_accept("I have fever and rash for 2 days."));
        assert!(filter.try_accept("Since morning I've had nausea."));
        assert_eq!(filter.len(), 2);
        assert!(filter.is_near_duplicate("Since morning I've had nausea."));
    }

    proptest! {
        #[test]
        fn overlap_ratio_in_unit_interval(a in "[a-e ]{0,30}", b in "[a-e ]{0,30}") {
            let ta = token_set(&a);
            let tb = token_set(&b);
            for metric in [OverlapMetric::PriorCoverage, OverlapMetric::Jaccard] {
                if let Some(r) = overlap_ratio(&ta, &tb, metric) {
                    prop_assert!((0.0..=1.0).contains(&r));
                }
            }
        }

        #[test]
        fn identical_text_is_duplicate(text in "[a-z]{1,8}( [a-z]{1,8}){0,6}") {
            prop_assert!(is_near_duplicate(&text, [text.as_str()], 0.8));
        }
    }
}
