use chrono::DateTime;
use rusqlite::{OptionalExtension, Row, params};

use crate::error::{Result, WaymarkError};
use crate::models::SearchHistoryEntry;

use super::{SqliteMarkerStore, conversion_failure};

/// Entries kept per map when the caller does not choose a cap.
pub const DEFAULT_SEARCH_HISTORY_SIZE: usize = 10;

impl SqliteMarkerStore {
    /// Records `entry`, replacing any entry for the same marker, then evicts the
    /// oldest entries of the marker's map until at most `max_entries` remain.
    ///
    /// The new entry itself is evicted when its timestamp is older than every
    /// entry that would otherwise survive.
    pub fn insert_history_not_exceeding(
        &self,
        entry: &SearchHistoryEntry,
        max_entries: usize,
    ) -> Result<()> {
        if max_entries == 0 {
            return Err(WaymarkError::Validation(
                "search history size must be at least 1".to_string(),
            ));
        }
        let limit = i64::try_from(max_entries).map_err(|_| {
            WaymarkError::Validation(format!("search history size too large: {max_entries}"))
        })?;

        let evicted = self.with_tx(|tx| {
            let map_id = tx
                .query_row(
                    "SELECT map_id FROM marker WHERE id = ?1",
                    params![entry.marker_id],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?
                .ok_or_else(|| WaymarkError::NotFound(format!("marker {}", entry.marker_id)))?;

            tx.execute(
                r"
                INSERT INTO search_history_entry(marker_id, timestamp_ms)
                VALUES (?1, ?2)
                ON CONFLICT(marker_id) DO UPDATE SET timestamp_ms = excluded.timestamp_ms
                ",
                params![entry.marker_id, entry.timestamp.timestamp_millis()],
            )?;

            let evicted = tx.execute(
                r"
                DELETE FROM search_history_entry
                WHERE marker_id IN (
                    SELECT h.marker_id
                    FROM search_history_entry h
                    JOIN marker m ON m.id = h.marker_id
                    WHERE m.map_id = ?1
                    ORDER BY h.timestamp_ms DESC, h.marker_id DESC
                    LIMIT -1 OFFSET ?2
                )
                ",
                params![map_id, limit],
            )?;
            Ok(evicted)
        })?;
        tracing::debug!(
            marker_id = entry.marker_id,
            evicted,
            "search history entry recorded"
        );
        Ok(())
    }

    /// History of one map, oldest first.
    pub fn load_history_by_map(&self, map_id: i64) -> Result<Vec<SearchHistoryEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT h.marker_id, h.timestamp_ms
                FROM search_history_entry h
                JOIN marker m ON m.id = h.marker_id
                WHERE m.map_id = ?1
                ORDER BY h.timestamp_ms ASC, h.marker_id ASC
                ",
            )?;
            let rows = stmt.query_map(params![map_id], history_entry_from_row)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }
}

fn history_entry_from_row(row: &Row<'_>) -> rusqlite::Result<SearchHistoryEntry> {
    let millis = row.get::<_, i64>(1)?;
    let timestamp = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| conversion_failure(1, format!("invalid timestamp {millis}")))?;
    Ok(SearchHistoryEntry {
        marker_id: row.get(0)?,
        timestamp,
    })
}
