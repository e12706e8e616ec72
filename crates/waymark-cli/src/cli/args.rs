use std::path::PathBuf;

use clap::Args;
use waymark_core::config::RankerKind;
use waymark_core::models::Language;
use waymark_core::store::DEFAULT_SEARCH_HISTORY_SIZE;

use super::parsers::{
    parse_finite_f64, parse_language, parse_min_one_usize, parse_non_negative_f64,
    parse_positive_f64, parse_ranker_kind, parse_unit_interval_f64,
};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file with `markers` and `texts` arrays.
    pub catalog: PathBuf,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(allow_hyphen_values = true)]
    pub query: String,
    #[arg(long = "map")]
    pub map_id: i64,
    #[arg(long = "lang", default_value = "en", value_parser = parse_language)]
    pub language: Language,
    #[arg(long, default_value_t = 10, value_parser = parse_min_one_usize)]
    pub limit: usize,
    /// Overrides `WAYMARK_RANKER`.
    #[arg(long, value_parser = parse_ranker_kind)]
    pub ranker: Option<RankerKind>,
    /// Overrides `WAYMARK_BM25_B`.
    #[arg(long = "bm25-b", value_parser = parse_unit_interval_f64)]
    pub bm25_b: Option<f64>,
    /// Overrides `WAYMARK_BM25_K1`.
    #[arg(long = "bm25-k1", value_parser = parse_non_negative_f64)]
    pub bm25_k1: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,
    #[arg(long = "lang", default_value = "en", value_parser = parse_language)]
    pub language: Language,
}

#[derive(Debug, Args)]
pub struct FloorArgs {
    #[arg(long = "map")]
    pub map_id: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub floor: i64,
    #[arg(long = "lang", default_value = "en", value_parser = parse_language)]
    pub language: Language,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct RememberArgs {
    pub marker_id: i64,
    /// Entries kept for the marker's map.
    #[arg(long = "max", default_value_t = DEFAULT_SEARCH_HISTORY_SIZE, value_parser = parse_min_one_usize)]
    pub max_entries: usize,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long = "map")]
    pub map_id: i64,
}

/// Map state and pin, in normalized map coordinates unless noted.
#[derive(Debug, Args)]
pub struct PointerArgs {
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite_f64)]
    pub center_x: f64,
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite_f64)]
    pub center_y: f64,
    #[arg(long, default_value_t = 1.0, value_parser = parse_positive_f64)]
    pub scale: f64,
    /// Clockwise map rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = parse_finite_f64)]
    pub rotation: f64,
    /// Full map width in pixels; defaults to the stored map info.
    #[arg(long, requires = "map_height")]
    pub map_width: Option<u32>,
    #[arg(long, requires = "map_width")]
    pub map_height: Option<u32>,
    /// Map whose stored info gives the full map size.
    #[arg(long = "map")]
    pub map_id: Option<i64>,
    /// Stored marker to point at instead of `--pin-x`/`--pin-y`.
    #[arg(long = "marker", conflicts_with_all = ["pin_x", "pin_y"])]
    pub marker_id: Option<i64>,
    /// Layout width in screen pixels.
    #[arg(long)]
    pub layout_width: u32,
    #[arg(long)]
    pub layout_height: u32,
    #[arg(long, requires = "pin_y", allow_negative_numbers = true, value_parser = parse_finite_f64)]
    pub pin_x: Option<f64>,
    #[arg(long, requires = "pin_x", allow_negative_numbers = true, value_parser = parse_finite_f64)]
    pub pin_y: Option<f64>,
    /// Pointer glyph size in screen pixels.
    #[arg(long, default_value_t = 48)]
    pub indicator_size: u32,
    /// Overrides `WAYMARK_POINTER_EPSILON`.
    #[arg(long, value_parser = parse_positive_f64)]
    pub epsilon: Option<f64>,
}
