use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::{PixelSize, Point};
use crate::ranking::MatchTier;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(format!("unknown language: {other} (expected en|ru)")),
        }
    }
}

/// Kind of object a marker stands for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerType {
    Entrance,
    Room,
    StairsUp,
    StairsDown,
    StairsBoth,
    Elevator,
    WcMan,
    WcWoman,
    Wc,
    Other,
}

impl MarkerType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entrance => "ENTRANCE",
            Self::Room => "ROOM",
            Self::StairsUp => "STAIRS_UP",
            Self::StairsDown => "STAIRS_DOWN",
            Self::StairsBoth => "STAIRS_BOTH",
            Self::Elevator => "ELEVATOR",
            Self::WcMan => "WC_MAN",
            Self::WcWoman => "WC_WOMAN",
            Self::Wc => "WC",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for MarkerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "ENTRANCE" => Ok(Self::Entrance),
            "ROOM" => Ok(Self::Room),
            "STAIRS_UP" => Ok(Self::StairsUp),
            "STAIRS_DOWN" => Ok(Self::StairsDown),
            "STAIRS_BOTH" => Ok(Self::StairsBoth),
            "ELEVATOR" => Ok(Self::Elevator),
            "WC_MAN" => Ok(Self::WcMan),
            "WC_WOMAN" => Ok(Self::WcWoman),
            "WC" => Ok(Self::Wc),
            "OTHER" => Ok(Self::Other),
            other => Err(format!("unknown marker type: {other}")),
        }
    }
}

/// A point of interest placed on one floor of a map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub id: i64,
    pub map_id: i64,
    pub marker_type: MarkerType,
    #[serde(default)]
    pub is_closed: bool,
    pub floor: i64,
    /// Normalized map coordinates in `[0, 1]`.
    pub x: f64,
    pub y: f64,
}

impl Marker {
    #[must_use]
    pub fn pixel_position(&self, full_map_size: PixelSize) -> Point {
        Point::new(
            self.x * f64::from(full_map_size.width),
            self.y * f64::from(full_map_size.height),
        )
    }
}

/// Localized text of a marker; every field may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkerText {
    pub marker_id: i64,
    pub language: Language,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerWithText {
    pub marker: Marker,
    pub text: MarkerText,
}

/// Pixel geometry of a map's floors and its tile pyramid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapInfo {
    pub id: i64,
    /// Stable name used for tile storage outside the database.
    pub internal_name: String,
    pub floor_width: u32,
    pub floor_height: u32,
    pub tile_size: u32,
    pub levels_num: u32,
    pub floors_num: u32,
}

impl MapInfo {
    #[must_use]
    pub const fn full_size(&self) -> PixelSize {
        PixelSize::new(self.floor_width, self.floor_height)
    }
}

/// A marker picked from search results at `timestamp`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHistoryEntry {
    pub marker_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl SearchHistoryEntry {
    #[must_use]
    pub fn now(marker_id: i64) -> Self {
        Self {
            marker_id,
            timestamp: Utc::now(),
        }
    }
}

/// Import format: maps, their markers and the marker texts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarkerCatalog {
    #[serde(default)]
    pub maps: Vec<MapInfo>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub texts: Vec<MarkerText>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerSearchHit {
    pub marker: Marker,
    pub text: MarkerText,
    pub tier: MatchTier,
    pub score: f64,
}
