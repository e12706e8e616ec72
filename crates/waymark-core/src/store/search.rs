use std::cmp::Ordering;

use rusqlite::params;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::models::{Language, MarkerSearchHit, MarkerText};
use crate::ranking::{MATCHINFO_FORMAT, MatchTier, Ranker, compare_scored};

use super::SqliteMarkerStore;
use super::markers::{
    MARKER_WITH_TEXT_COLUMN_COUNT, MARKER_WITH_TEXT_COLUMNS, marker_with_text_from_row,
};
use super::query::tokenize_query;

impl SqliteMarkerStore {
    /// Full-text search over marker texts of one map in one language.
    ///
    /// Whole-field matches come first, the rest are ordered by `ranker`.
    /// Matches whose statistics cannot be parsed are skipped.
    pub fn search(
        &self,
        map_id: i64,
        query: &str,
        language: Language,
        ranker: &dyn Ranker,
    ) -> Result<Vec<MarkerSearchHit>> {
        let Some(tokens) = tokenize_query(query) else {
            debug!(query, "search query has no terms");
            return Ok(Vec::new());
        };

        let candidates = self.with_conn(|conn| {
            let sql = format!(
                r"
                SELECT {MARKER_WITH_TEXT_COLUMNS}, hits.info
                FROM (
                    SELECT docid, matchinfo(marker_text_fts, '{MATCHINFO_FORMAT}') AS info
                    FROM marker_text_fts
                    WHERE marker_text_fts MATCH ?1
                ) AS hits
                JOIN marker_text t ON t.rowid = hits.docid
                JOIN marker m ON m.id = t.marker_id
                WHERE m.map_id = ?2 AND t.language_id = ?3
                "
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![tokens, map_id, language.as_str()], |row| {
                let found = marker_with_text_from_row(row)?;
                let info = row.get::<_, Vec<u8>>(MARKER_WITH_TEXT_COLUMN_COUNT)?;
                Ok((found, info))
            })?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })?;

        let needle = query.trim().to_lowercase();
        let mut hits = Vec::with_capacity(candidates.len());
        for (found, info) in candidates {
            let score = match ranker.rank_match_info(&info) {
                Ok(score) => score,
                Err(err) => {
                    warn!(marker_id = found.marker.id, error = %err, "skipping search match");
                    continue;
                }
            };
            let tier = match_tier(&needle, &found.text);
            trace!(marker_id = found.marker.id, ?tier, score, "scored search match");
            hits.push(MarkerSearchHit {
                marker: found.marker,
                text: found.text,
                tier,
                score,
            });
        }
        hits.sort_by(compare_hits);

        debug!(
            map_id,
            %language,
            tokens = tokens.as_str(),
            ranker = ranker.name(),
            hits = hits.len(),
            "marker search finished"
        );
        Ok(hits)
    }
}

/// Tier first, then score descending, then marker id ascending.
pub fn compare_hits(a: &MarkerSearchHit, b: &MarkerSearchHit) -> Ordering {
    compare_scored(
        (a.tier, a.score, &a.marker.id),
        (b.tier, b.score, &b.marker.id),
    )
}

fn match_tier(needle: &str, text: &MarkerText) -> MatchTier {
    let equals = |field: Option<&str>| field.is_some_and(|value| value.trim().to_lowercase() == needle);
    if equals(text.title.as_deref()) {
        MatchTier::ExactTitle
    } else if equals(text.location.as_deref()) || equals(text.description.as_deref()) {
        MatchTier::ExactField
    } else {
        MatchTier::Ranked
    }
}
