use crate::error::{Result, WaymarkError};

use super::{QueryWordStat, Ranker, u64_to_f64};

pub(crate) const DEFAULT_BM25_B: f64 = 0.75;
pub(crate) const DEFAULT_BM25_K1: f64 = 1.2;

/// Okapi BM25.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25 {
    /// Strength of document length normalization, in `[0, 1]`.
    b: f64,
    /// Term frequency saturation, `>= 0` (usually below 3).
    k1: f64,
}

impl Default for Bm25 {
    fn default() -> Self {
        Self {
            b: DEFAULT_BM25_B,
            k1: DEFAULT_BM25_K1,
        }
    }
}

impl Bm25 {
    pub fn new(b: f64, k1: f64) -> Result<Self> {
        if !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(WaymarkError::Validation(format!(
                "bm25 b must be within [0, 1], got {b}"
            )));
        }
        if !k1.is_finite() || k1 < 0.0 {
            return Err(WaymarkError::Validation(format!(
                "bm25 k1 must be finite and >= 0, got {k1}"
            )));
        }
        Ok(Self { b, k1 })
    }

    #[must_use]
    pub const fn b(&self) -> f64 {
        self.b
    }

    #[must_use]
    pub const fn k1(&self) -> f64 {
        self.k1
    }

    /// Length-dependent part of the denominator. Empty documents behave as if
    /// `doc / avg` were 0, an empty corpus average as if it were 2.
    fn denominator_addend(&self, doc_word_count: u64, avg_word_count: f64) -> f64 {
        if doc_word_count == 0 {
            self.k1 * (1.0 - self.b)
        } else if avg_word_count == 0.0 {
            self.k1 * (1.0 + self.b)
        } else {
            self.k1 * (1.0 - self.b + self.b * u64_to_f64(doc_word_count) / avg_word_count)
        }
    }

    fn idf(doc_count: u64, matched_document_count: u64) -> f64 {
        let n = u64_to_f64(doc_count);
        let matched = u64_to_f64(matched_document_count);
        ((n - matched + 0.5) / (matched + 0.5) + 1.0).ln()
    }
}

impl Ranker for Bm25 {
    fn rank(
        &self,
        query_word_stats: &[QueryWordStat],
        doc_word_count: u64,
        avg_word_count: f64,
        doc_count: u64,
    ) -> f64 {
        let numerator_coefficient = self.k1 + 1.0;
        let denominator_addend = self.denominator_addend(doc_word_count, avg_word_count);

        let mut score = 0.0;
        for stat in query_word_stats {
            let appearance = u64_to_f64(stat.appearance_count);
            let numerator = appearance * numerator_coefficient;
            let denominator = appearance + denominator_addend;
            if denominator != 0.0 {
                score += Self::idf(doc_count, stat.matched_document_count) * numerator / denominator;
            }
        }
        score
    }

    fn name(&self) -> &'static str {
        "bm25"
    }
}
