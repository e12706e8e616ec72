use crate::error::WaymarkError;
use crate::ranking::{
    Bm25, MatchStatistics, MatchTier, QueryWordStat, Ranker, TfIdf, compare_scored,
};

const TOLERANCE: f64 = 1e-9;

/// One `(hits_this_row, hits_all_rows, docs_with_hits)` triple per column.
struct PhraseHits(Vec<(i32, i32, i32)>);

fn encode_match_info(
    column_count: i32,
    phrases: &[PhraseHits],
    doc_count: i32,
    column_averages: &[i32],
    column_lengths: &[i32],
) -> Vec<u8> {
    let mut words = vec![
        i32::try_from(phrases.len()).expect("phrase count"),
        column_count,
    ];
    for phrase in phrases {
        for (this_row, all_rows, docs) in &phrase.0 {
            words.extend([*this_row, *all_rows, *docs]);
        }
    }
    words.push(doc_count);
    words.extend_from_slice(column_averages);
    words.extend_from_slice(column_lengths);
    words.iter().flat_map(|word| word.to_ne_bytes()).collect()
}

fn two_phrase_two_column_buffer() -> Vec<u8> {
    encode_match_info(
        2,
        &[
            PhraseHits(vec![(1, 4, 3), (2, 9, 2)]),
            PhraseHits(vec![(0, 1, 1), (1, 2, 2)]),
        ],
        12,
        &[3, 5],
        &[2, 6],
    )
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn parser_sums_counters_across_columns() {
    let stats = MatchStatistics::parse(&two_phrase_two_column_buffer()).expect("parse");

    assert_eq!(
        stats.query_word_stats,
        vec![QueryWordStat::new(3, 5), QueryWordStat::new(1, 3)]
    );
    assert_eq!(stats.doc_count, 12);
    assert_close(stats.avg_word_count, 8.0);
    assert_eq!(stats.doc_word_count, 8);
}

#[test]
fn parser_ignores_hits_across_all_rows() {
    let with_small = encode_match_info(1, &[PhraseHits(vec![(2, 0, 1)])], 4, &[3], &[3]);
    let with_garbage = encode_match_info(1, &[PhraseHits(vec![(2, -77, 1)])], 4, &[3], &[3]);

    assert_eq!(
        MatchStatistics::parse(&with_small).expect("small"),
        MatchStatistics::parse(&with_garbage).expect("garbage")
    );
}

struct EncodedCase {
    column_count: i32,
    phrases: Vec<PhraseHits>,
    doc_count: i32,
    column_averages: Vec<i32>,
    column_lengths: Vec<i32>,
}

fn encoded_cases() -> Vec<EncodedCase> {
    vec![
        EncodedCase {
            column_count: 1,
            phrases: Vec::new(),
            doc_count: 0,
            column_averages: vec![0],
            column_lengths: vec![0],
        },
        EncodedCase {
            column_count: 1,
            phrases: vec![PhraseHits(vec![(1, 1, 1)])],
            doc_count: 1,
            column_averages: vec![5],
            column_lengths: vec![5],
        },
        EncodedCase {
            column_count: 3,
            phrases: vec![PhraseHits(vec![(4, 10, 2), (0, 3, 1), (1, 1, 1)])],
            doc_count: 40,
            column_averages: vec![2, 7, 11],
            column_lengths: vec![1, 0, 5],
        },
        EncodedCase {
            column_count: 3,
            phrases: vec![
                PhraseHits(vec![(0, 0, 0), (0, 0, 0), (0, 0, 0)]),
                PhraseHits(vec![(2, 6, 3), (1, 2, 2), (3, 3, 1)]),
                PhraseHits(vec![(7, 7, 1), (0, 9, 4), (0, 1, 1)]),
            ],
            doc_count: 250,
            column_averages: vec![4, 12, 30],
            column_lengths: vec![3, 9, 41],
        },
        EncodedCase {
            column_count: 5,
            phrases: vec![
                PhraseHits(vec![(1, 2, 1), (0, 0, 0), (2, 2, 1), (0, 4, 3), (9, 9, 9)]),
                PhraseHits(vec![(0, 1, 1), (0, 1, 1), (0, 1, 1), (0, 1, 1), (1, 1, 1)]),
            ],
            doc_count: i32::MAX,
            column_averages: vec![1, 1, 1, 1, 1],
            column_lengths: vec![0, 0, 0, 0, 1],
        },
    ]
}

fn widen(value: i32) -> u64 {
    u64::try_from(value).expect("non-negative counter")
}

#[test]
fn parser_reproduces_encoded_statistics() {
    for (index, case) in encoded_cases().iter().enumerate() {
        let raw = encode_match_info(
            case.column_count,
            &case.phrases,
            case.doc_count,
            &case.column_averages,
            &case.column_lengths,
        );
        let stats = MatchStatistics::parse(&raw)
            .unwrap_or_else(|err| panic!("case {index} failed to parse: {err}"));

        let mut expected_words = Vec::new();
        for phrase in &case.phrases {
            let mut appearances = 0;
            let mut matched_docs = 0;
            for (this_row, _, docs) in &phrase.0 {
                appearances += widen(*this_row);
                matched_docs += widen(*docs);
            }
            expected_words.push(QueryWordStat::new(appearances, matched_docs));
        }
        let mut expected_avg = 0.0;
        for average in &case.column_averages {
            expected_avg += f64::from(*average);
        }
        let mut expected_len = 0;
        for length in &case.column_lengths {
            expected_len += widen(*length);
        }

        assert_eq!(stats.query_word_stats, expected_words, "case {index}");
        assert_eq!(stats.doc_count, widen(case.doc_count), "case {index}");
        assert_close(stats.avg_word_count, expected_avg);
        assert_eq!(stats.doc_word_count, expected_len, "case {index}");
    }
}

#[test]
fn parser_accepts_queries_without_phrases() {
    let raw = encode_match_info(1, &[], 3, &[4], &[2]);
    let stats = MatchStatistics::parse(&raw).expect("parse");
    assert!(stats.query_word_stats.is_empty());
    assert_eq!(stats.doc_word_count, 2);
}

#[test]
fn every_truncation_of_a_valid_buffer_is_rejected() {
    let raw = two_phrase_two_column_buffer();
    for len in 0..raw.len() {
        let err = MatchStatistics::parse(&raw[..len]).expect_err("truncated buffer must fail");
        assert!(
            matches!(err, WaymarkError::MalformedMatchInfo(_)),
            "unexpected error at length {len}: {err}"
        );
    }
}

#[test]
fn parser_rejects_header_claiming_more_phrases_than_present() {
    let mut raw = two_phrase_two_column_buffer();
    raw[..4].copy_from_slice(&1_000_000_i32.to_ne_bytes());
    assert!(matches!(
        MatchStatistics::parse(&raw),
        Err(WaymarkError::MalformedMatchInfo(_))
    ));
}

#[test]
fn parser_rejects_negative_header_counts() {
    let mut raw = two_phrase_two_column_buffer();
    raw[4..8].copy_from_slice(&(-2_i32).to_ne_bytes());
    assert!(matches!(
        MatchStatistics::parse(&raw),
        Err(WaymarkError::MalformedMatchInfo(_))
    ));
}

#[test]
fn tfidf_multiplies_term_frequency_by_decimal_idf() {
    let score = TfIdf.rank(&[QueryWordStat::new(2, 1)], 4, 0.0, 9);
    assert_close(score, 0.5 * 5.0_f64.log10());
}

#[test]
fn tfidf_sums_phrase_contributions() {
    let stats = [QueryWordStat::new(1, 0), QueryWordStat::new(3, 4)];
    let expected = (1.0 / 6.0) * (11.0_f64 / 1.0).log10() + (3.0 / 6.0) * (11.0_f64 / 5.0).log10();
    assert_close(TfIdf.rank(&stats, 6, 3.0, 10), expected);
}

#[test]
fn tfidf_empty_document_contributes_nothing() {
    let score = TfIdf.rank(&[QueryWordStat::new(0, 2), QueryWordStat::new(4, 1)], 0, 0.0, 5);
    assert!(score.is_finite());
    assert_close(score, 0.0);
}

#[test]
fn tfidf_is_non_negative_for_consistent_corpora() {
    for doc_count in 0..8_u64 {
        for matched in 0..=doc_count {
            for appearance in 0..4_u64 {
                let score = TfIdf.rank(&[QueryWordStat::new(appearance, matched)], 5, 5.0, doc_count);
                assert!(score.is_finite());
                assert!(score >= 0.0, "negative score for n={doc_count} m={matched}");
            }
        }
    }
}

#[test]
fn tfidf_goes_negative_only_when_more_docs_match_than_exist() {
    // matched > doc_count cannot come from a consistent index
    let score = TfIdf.rank(&[QueryWordStat::new(1, 9)], 2, 2.0, 3);
    assert!(score.is_finite());
    assert!(score < 0.0);
}

#[test]
fn bm25_matches_okapi_formula() {
    let bm25 = Bm25::default();
    let score = bm25.rank(&[QueryWordStat::new(1, 1)], 3, 6.0, 10);

    let addend = 1.2 * (1.0 - 0.75 + 0.75 * 3.0 / 6.0);
    let idf = ((10.0 - 1.0 + 0.5) / (1.0 + 0.5) + 1.0_f64).ln();
    assert_close(score, idf * (1.0 * 2.2) / (1.0 + addend));
}

#[test]
fn bm25_never_decreases_with_more_appearances() {
    let bm25 = Bm25::default();
    let mut previous = f64::NEG_INFINITY;
    for appearance in 0..64 {
        let score = bm25.rank(&[QueryWordStat::new(appearance, 3)], 7, 5.5, 20);
        assert!(score >= previous, "score dropped at {appearance} appearances");
        previous = score;
    }
}

#[test]
fn bm25_saturates_instead_of_growing_linearly() {
    let bm25 = Bm25::default();
    let one = bm25.rank(&[QueryWordStat::new(1, 2)], 4, 4.0, 10);
    let ten = bm25.rank(&[QueryWordStat::new(10, 2)], 4, 4.0, 10);
    assert!(ten > one);
    assert!(ten < 10.0 * one);
}

#[test]
fn bm25_empty_document_is_finite() {
    let score = Bm25::default().rank(&[QueryWordStat::new(0, 1)], 0, 4.0, 3);
    assert!(score.is_finite());
    assert_close(score, 0.0);
}

#[test]
fn bm25_zero_average_acts_like_double_length_document() {
    let bm25 = Bm25::default();
    let stats = [QueryWordStat::new(2, 1)];
    let zero_avg = bm25.rank(&stats, 5, 0.0, 6);
    let double_length = bm25.rank(&stats, 10, 5.0, 6);
    assert!(zero_avg.is_finite());
    assert_close(zero_avg, double_length);
}

#[test]
fn bm25_zero_denominator_contributes_nothing() {
    let bm25 = Bm25::new(0.75, 0.0).expect("k1 = 0 is valid");
    let score = bm25.rank(&[QueryWordStat::new(0, 1)], 0, 0.0, 2);
    assert!(score.is_finite());
    assert_close(score, 0.0);
}

#[test]
fn bm25_idf_stays_positive_for_consistent_corpora() {
    let bm25 = Bm25::default();
    for doc_count in 0..6_u64 {
        for matched in 0..=doc_count {
            let score = bm25.rank(&[QueryWordStat::new(1, matched)], 3, 3.0, doc_count);
            assert!(score.is_finite());
            assert!(score > 0.0);
        }
    }
}

#[test]
fn bm25_rejects_out_of_range_parameters() {
    assert!(matches!(Bm25::new(1.5, 1.2), Err(WaymarkError::Validation(_))));
    assert!(matches!(Bm25::new(-0.1, 1.2), Err(WaymarkError::Validation(_))));
    assert!(matches!(Bm25::new(0.5, -1.0), Err(WaymarkError::Validation(_))));
    assert!(Bm25::new(f64::NAN, 1.2).is_err());
    assert!(Bm25::new(0.5, f64::INFINITY).is_err());

    let bm25 = Bm25::new(1.0, 2.0).expect("edge values are valid");
    assert_close(bm25.b(), 1.0);
    assert_close(bm25.k1(), 2.0);
}

#[test]
fn rankers_are_interchangeable_over_raw_match_info() {
    let raw = two_phrase_two_column_buffer();
    let stats = MatchStatistics::parse(&raw).expect("parse");
    let rankers: Vec<Box<dyn Ranker + Send + Sync>> = vec![Box::new(TfIdf), Box::new(Bm25::default())];

    for ranker in &rankers {
        let from_raw = ranker.rank_match_info(&raw).expect("rank raw");
        let from_stats = ranker.rank(
            &stats.query_word_stats,
            stats.doc_word_count,
            stats.avg_word_count,
            stats.doc_count,
        );
        assert!(from_raw.is_finite(), "{} produced {from_raw}", ranker.name());
        assert_close(from_raw, from_stats);
    }
}

#[test]
fn malformed_match_info_surfaces_from_rank_match_info() {
    let err = Bm25::default()
        .rank_match_info(&[0, 0])
        .expect_err("two bytes cannot hold a header");
    assert_eq!(err.code(), "MALFORMED_MATCH_INFO");
}

#[test]
fn scored_ordering_puts_tier_then_score_then_key() {
    let mut hits = vec![
        (MatchTier::Ranked, 1.0, 4_i64),
        (MatchTier::Ranked, 3.0, 9),
        (MatchTier::ExactField, 0.1, 7),
        (MatchTier::Ranked, 3.0, 2),
        (MatchTier::ExactTitle, 0.0, 8),
    ];
    hits.sort_by(|a, b| compare_scored((a.0, a.1, &a.2), (b.0, b.1, &b.2)));

    let keys = hits.iter().map(|hit| hit.2).collect::<Vec<_>>();
    assert_eq!(keys, vec![8, 7, 2, 9, 4]);
}
