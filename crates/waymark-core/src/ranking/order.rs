use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Precedence class of a search hit. Exact matches of a whole field always
/// outrank scored matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// The query equals the title.
    ExactTitle,
    /// The query equals the location or the description.
    ExactField,
    Ranked,
}

/// Orders `(tier, score, key)` triples: better tier first, then higher score,
/// then ascending key so equal scores are deterministic.
pub fn compare_scored<K: Ord>(a: (MatchTier, f64, &K), b: (MatchTier, f64, &K)) -> Ordering {
    let (a_tier, a_score, a_key) = a;
    let (b_tier, b_score, b_key) = b;
    a_tier
        .cmp(&b_tier)
        .then_with(|| b_score.total_cmp(&a_score))
        .then_with(|| a_key.cmp(b_key))
}
