//! Relevance ranking of full-text matches.
//!
//! The FTS index reports per-document counters (see [`MatchStatistics`]); a
//! [`Ranker`] turns them into a score. Scores are only comparable within one
//! query.

mod bm25;
mod matchinfo;
mod order;
mod tfidf;

pub use bm25::Bm25;
pub(crate) use bm25::{DEFAULT_BM25_B, DEFAULT_BM25_K1};
pub use matchinfo::{MATCHINFO_FORMAT, MatchStatistics};
pub use order::{MatchTier, compare_scored};
pub use tfidf::TfIdf;

use crate::error::Result;

/// Counters for one query phrase within one candidate document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryWordStat {
    /// Occurrences of the phrase across all indexed columns of the document.
    pub appearance_count: u64,
    /// Documents in the whole corpus that contain the phrase at least once.
    pub matched_document_count: u64,
}

impl QueryWordStat {
    #[must_use]
    pub const fn new(appearance_count: u64, matched_document_count: u64) -> Self {
        Self {
            appearance_count,
            matched_document_count,
        }
    }
}

/// Document relevance estimation. Higher scores are more relevant and are
/// always finite.
pub trait Ranker {
    fn rank(
        &self,
        query_word_stats: &[QueryWordStat],
        doc_word_count: u64,
        avg_word_count: f64,
        doc_count: u64,
    ) -> f64;

    fn name(&self) -> &'static str;

    /// Parses a raw `pcxnal` matchinfo buffer and ranks it.
    fn rank_match_info(&self, raw: &[u8]) -> Result<f64> {
        let stats = MatchStatistics::parse(raw)?;
        Ok(self.rank(
            &stats.query_word_stats,
            stats.doc_word_count,
            stats.avg_word_count,
            stats.doc_count,
        ))
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "corpus counters stay far below 2^53 so the conversion is exact in practice"
)]
pub(crate) const fn u64_to_f64(value: u64) -> f64 {
    value as f64
}

#[cfg(test)]
mod tests;
