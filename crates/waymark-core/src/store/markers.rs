use rusqlite::{OptionalExtension, Row, params};
use serde::Serialize;

use crate::error::{Result, WaymarkError};
use crate::models::{Language, Marker, MarkerCatalog, MarkerText, MarkerType, MarkerWithText};

use super::maps::{insert_maps, validate_map};
use super::{SqliteMarkerStore, conversion_failure};

/// Columns read by [`marker_with_text_from_row`], in order.
pub(super) const MARKER_WITH_TEXT_COLUMNS: &str = r"
    m.id, m.map_id, m.type, m.is_closed, m.floor, m.x, m.y,
    t.language_id, t.title, t.location, t.description
";

/// Number of columns in [`MARKER_WITH_TEXT_COLUMNS`].
pub(super) const MARKER_WITH_TEXT_COLUMN_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub maps: usize,
    pub markers: usize,
    pub texts: usize,
}

impl SqliteMarkerStore {
    /// Inserts every map, marker and text of `catalog` in one transaction.
    pub fn insert_catalog(&self, catalog: &MarkerCatalog) -> Result<ImportSummary> {
        for map in &catalog.maps {
            validate_map(map)?;
        }
        for marker in &catalog.markers {
            validate_marker(marker)?;
        }
        let summary = self.with_tx(|tx| {
            insert_maps(tx, &catalog.maps)?;

            let mut insert_marker = tx.prepare(
                r"
                INSERT INTO marker(id, map_id, type, is_closed, floor, x, y)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )?;
            for marker in &catalog.markers {
                insert_marker.execute(params![
                    marker.id,
                    marker.map_id,
                    marker.marker_type.as_str(),
                    bool_to_i64(marker.is_closed),
                    marker.floor,
                    marker.x,
                    marker.y,
                ])?;
            }

            let mut insert_text = tx.prepare(
                r"
                INSERT INTO marker_text(marker_id, language_id, title, location, description)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )?;
            for text in &catalog.texts {
                insert_text.execute(params![
                    text.marker_id,
                    text.language.as_str(),
                    text.title.as_deref(),
                    text.location.as_deref(),
                    text.description.as_deref(),
                ])?;
            }

            Ok(ImportSummary {
                maps: catalog.maps.len(),
                markers: catalog.markers.len(),
                texts: catalog.texts.len(),
            })
        })?;
        tracing::debug!(
            maps = summary.maps,
            markers = summary.markers,
            texts = summary.texts,
            "marker catalog imported"
        );
        Ok(summary)
    }

    /// The marker alone, whatever languages its text exists in.
    pub fn load_marker(&self, id: i64) -> Result<Marker> {
        let found = self.with_conn(|conn| {
            let value = conn
                .query_row(
                    r"
                    SELECT id, map_id, type, is_closed, floor, x, y
                    FROM marker
                    WHERE id = ?1
                    ",
                    params![id],
                    marker_from_row,
                )
                .optional()?;
            Ok(value)
        })?;
        found.ok_or_else(|| WaymarkError::NotFound(format!("marker {id}")))
    }

    pub fn load_by_id(&self, id: i64, language: Language) -> Result<MarkerWithText> {
        let found = self.with_conn(|conn| {
            let sql = format!(
                r"
                SELECT {MARKER_WITH_TEXT_COLUMNS}
                FROM marker m
                JOIN marker_text t ON t.marker_id = m.id
                WHERE m.id = ?1 AND t.language_id = ?2
                "
            );
            let value = conn
                .query_row(
                    &sql,
                    params![id, language.as_str()],
                    marker_with_text_from_row,
                )
                .optional()?;
            Ok(value)
        })?;
        found.ok_or_else(|| WaymarkError::NotFound(format!("marker {id} with {language} text")))
    }

    /// Markers of one floor that have text in `language`, ordered by id.
    pub fn load_by_floor(
        &self,
        map_id: i64,
        floor: i64,
        language: Language,
    ) -> Result<Vec<MarkerWithText>> {
        self.with_conn(|conn| {
            let sql = format!(
                r"
                SELECT {MARKER_WITH_TEXT_COLUMNS}
                FROM marker m
                JOIN marker_text t ON t.marker_id = m.id
                WHERE m.map_id = ?1 AND m.floor = ?2 AND t.language_id = ?3
                ORDER BY m.id ASC
                "
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![map_id, floor, language.as_str()],
                marker_with_text_from_row,
            )?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }
}

/// Reads the seven marker columns starting at index 0.
fn marker_from_row(row: &Row<'_>) -> rusqlite::Result<Marker> {
    let marker_type = row
        .get::<_, String>(2)?
        .parse::<MarkerType>()
        .map_err(|err| conversion_failure(2, err))?;
    Ok(Marker {
        id: row.get(0)?,
        map_id: row.get(1)?,
        marker_type,
        is_closed: row.get::<_, i64>(3)? != 0,
        floor: row.get(4)?,
        x: row.get(5)?,
        y: row.get(6)?,
    })
}

pub(super) fn marker_with_text_from_row(row: &Row<'_>) -> rusqlite::Result<MarkerWithText> {
    let marker = marker_from_row(row)?;
    let language = row
        .get::<_, String>(7)?
        .parse::<Language>()
        .map_err(|err| conversion_failure(7, err))?;

    Ok(MarkerWithText {
        text: MarkerText {
            marker_id: marker.id,
            language,
            title: row.get(8)?,
            location: row.get(9)?,
            description: row.get(10)?,
        },
        marker,
    })
}

fn validate_marker(marker: &Marker) -> Result<()> {
    let in_unit = |value: f64| (0.0..=1.0).contains(&value);
    if !in_unit(marker.x) || !in_unit(marker.y) {
        return Err(WaymarkError::Validation(format!(
            "marker {} position ({}, {}) is outside the normalized map",
            marker.id, marker.x, marker.y
        )));
    }
    Ok(())
}

const fn bool_to_i64(value: bool) -> i64 {
    if value { 1 } else { 0 }
}
