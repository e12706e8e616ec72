use rusqlite::{OptionalExtension, Row, Transaction, params};

use crate::error::{Result, WaymarkError};
use crate::models::MapInfo;

use super::{SqliteMarkerStore, conversion_failure};

const MAP_INFO_COLUMNS: &str =
    "id, internal_name, floor_width, floor_height, tile_size, levels_num, floors_num";

impl SqliteMarkerStore {
    pub fn load_map_info(&self, map_id: i64) -> Result<MapInfo> {
        let found = self.with_conn(|conn| {
            let value = conn
                .query_row(
                    &format!("SELECT {MAP_INFO_COLUMNS} FROM map_info WHERE id = ?1"),
                    params![map_id],
                    map_info_from_row,
                )
                .optional()?;
            Ok(value)
        })?;
        found.ok_or_else(|| WaymarkError::NotFound(format!("map {map_id}")))
    }

    pub fn load_map_info_by_name(&self, internal_name: &str) -> Result<MapInfo> {
        let found = self.with_conn(|conn| {
            let value = conn
                .query_row(
                    &format!("SELECT {MAP_INFO_COLUMNS} FROM map_info WHERE internal_name = ?1"),
                    params![internal_name],
                    map_info_from_row,
                )
                .optional()?;
            Ok(value)
        })?;
        found.ok_or_else(|| WaymarkError::NotFound(format!("map {internal_name}")))
    }
}

pub(super) fn insert_maps(tx: &Transaction<'_>, maps: &[MapInfo]) -> Result<()> {
    let mut stmt = tx.prepare(
        r"
        INSERT INTO map_info(id, internal_name, floor_width, floor_height, tile_size, levels_num, floors_num)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ",
    )?;
    for map in maps {
        stmt.execute(params![
            map.id,
            map.internal_name,
            map.floor_width,
            map.floor_height,
            map.tile_size,
            map.levels_num,
            map.floors_num,
        ])?;
    }
    Ok(())
}

pub(super) fn validate_map(map: &MapInfo) -> Result<()> {
    if map.internal_name.trim().is_empty() {
        return Err(WaymarkError::Validation(format!(
            "map {} has an empty internal name",
            map.id
        )));
    }
    if map.floor_width == 0 || map.floor_height == 0 || map.tile_size == 0 {
        return Err(WaymarkError::Validation(format!(
            "map {} has zero floor or tile size",
            map.id
        )));
    }
    Ok(())
}

fn map_info_from_row(row: &Row<'_>) -> rusqlite::Result<MapInfo> {
    Ok(MapInfo {
        id: row.get(0)?,
        internal_name: row.get(1)?,
        floor_width: dimension(row, 2)?,
        floor_height: dimension(row, 3)?,
        tile_size: dimension(row, 4)?,
        levels_num: dimension(row, 5)?,
        floors_num: dimension(row, 6)?,
    })
}

fn dimension(row: &Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    let raw = row.get::<_, i64>(idx)?;
    u32::try_from(raw).map_err(|_| conversion_failure(idx, format!("invalid map dimension {raw}")))
}
