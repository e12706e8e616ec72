use super::{QueryWordStat, Ranker, u64_to_f64};

/// Classic term-frequency times inverse-document-frequency scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TfIdf;

impl TfIdf {
    fn tf(appearance_count: u64, doc_word_count: u64) -> f64 {
        if doc_word_count == 0 {
            return 0.0;
        }
        u64_to_f64(appearance_count) / u64_to_f64(doc_word_count)
    }

    fn idf(doc_count: u64, matched_document_count: u64) -> f64 {
        ((u64_to_f64(doc_count) + 1.0) / (u64_to_f64(matched_document_count) + 1.0)).log10()
    }
}

impl Ranker for TfIdf {
    fn rank(
        &self,
        query_word_stats: &[QueryWordStat],
        doc_word_count: u64,
        _avg_word_count: f64,
        doc_count: u64,
    ) -> f64 {
        query_word_stats
            .iter()
            .map(|stat| {
                Self::tf(stat.appearance_count, doc_word_count)
                    * Self::idf(doc_count, stat.matched_document_count)
            })
            .sum()
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}
