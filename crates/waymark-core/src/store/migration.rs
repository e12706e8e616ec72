use crate::error::{Result, WaymarkError};

use super::SqliteMarkerStore;

// `marker_text_fts` is an external-content FTS4 index over `marker_text`; its
// docid is the `marker_text` rowid and the triggers keep both in sync.
const MIGRATION_SCHEMA_SQL: &str = r"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS map_info (
        id INTEGER PRIMARY KEY,
        internal_name TEXT NOT NULL UNIQUE,
        floor_width INTEGER NOT NULL,
        floor_height INTEGER NOT NULL,
        tile_size INTEGER NOT NULL,
        levels_num INTEGER NOT NULL,
        floors_num INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS marker (
        id INTEGER PRIMARY KEY,
        map_id INTEGER NOT NULL,
        type TEXT NOT NULL,
        is_closed INTEGER NOT NULL,
        floor INTEGER NOT NULL,
        x REAL NOT NULL,
        y REAL NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_marker_map_floor
    ON marker(map_id, floor);

    CREATE TABLE IF NOT EXISTS marker_text (
        marker_id INTEGER NOT NULL REFERENCES marker(id) ON UPDATE CASCADE ON DELETE RESTRICT,
        language_id TEXT NOT NULL,
        title TEXT,
        location TEXT,
        description TEXT,
        PRIMARY KEY (marker_id, language_id)
    );

    CREATE TABLE IF NOT EXISTS search_history_entry (
        marker_id INTEGER PRIMARY KEY REFERENCES marker(id) ON DELETE RESTRICT,
        timestamp_ms INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_search_history_timestamp
    ON search_history_entry(timestamp_ms);

    CREATE VIRTUAL TABLE IF NOT EXISTS marker_text_fts USING fts4(
        content='marker_text',
        title,
        location,
        description,
        tokenize=unicode61
    );

    CREATE TRIGGER IF NOT EXISTS marker_text_fts_after_insert
    AFTER INSERT ON marker_text BEGIN
        INSERT INTO marker_text_fts(docid, title, location, description)
        VALUES (new.rowid, new.title, new.location, new.description);
    END;

    CREATE TRIGGER IF NOT EXISTS marker_text_fts_before_update
    BEFORE UPDATE ON marker_text BEGIN
        DELETE FROM marker_text_fts WHERE docid = old.rowid;
    END;

    CREATE TRIGGER IF NOT EXISTS marker_text_fts_after_update
    AFTER UPDATE ON marker_text BEGIN
        INSERT INTO marker_text_fts(docid, title, location, description)
        VALUES (new.rowid, new.title, new.location, new.description);
    END;

    CREATE TRIGGER IF NOT EXISTS marker_text_fts_before_delete
    BEFORE DELETE ON marker_text BEGIN
        DELETE FROM marker_text_fts WHERE docid = old.rowid;
    END;
";

impl SqliteMarkerStore {
    /// Creates missing tables, indexes and triggers. Safe to run repeatedly.
    pub fn migrate(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| WaymarkError::mutex_poisoned("sqlite"))?;
        conn.execute_batch(MIGRATION_SCHEMA_SQL)?;
        tracing::debug!("marker schema migrated");
        Ok(())
    }
}
